use serde_json::Value;
use uuid::Uuid;

use super::error::FilterError;
use super::types::{FilterOp, FilterWhereInfo, SqlParam};

/// Builds a parameterised WHERE clause over the `schemes` table, where `id` is
/// a UUID column and every other field lives in the `doc` JSONB column.
pub struct FilterWhere {
    param_values: Vec<SqlParam>,
    param_index: usize,
}

impl FilterWhere {
    pub fn new(starting_param_index: usize) -> Self {
        Self {
            param_values: vec![],
            param_index: starting_param_index,
        }
    }

    pub fn generate(conditions: &[FilterWhereInfo], starting_param_index: usize) -> Result<(String, Vec<SqlParam>), FilterError> {
        let mut filter_where = Self::new(starting_param_index);
        filter_where.build(conditions)
    }

    fn build(&mut self, conditions: &[FilterWhereInfo]) -> Result<(String, Vec<SqlParam>), FilterError> {
        let mut sql_conditions = Vec::with_capacity(conditions.len());
        for condition in conditions {
            sql_conditions.push(self.build_sql_condition(condition)?);
        }
        let where_clause = if sql_conditions.is_empty() { "1=1".to_string() } else { sql_conditions.join(" AND ") };
        Ok((where_clause, std::mem::take(&mut self.param_values)))
    }

    fn build_sql_condition(&mut self, condition: &FilterWhereInfo) -> Result<String, FilterError> {
        let is_id = condition.column == "id";
        match condition.operator {
            FilterOp::Eq if is_id => {
                let id = Self::uuid_operand(&condition.data)?;
                Ok(format!("\"id\" = {}", self.param(SqlParam::Uuid(id))))
            }
            FilterOp::Eq => {
                if condition.data.is_null() {
                    return Ok(format!("{} IS NULL", Self::doc_field(&condition.column)));
                }
                let text = Self::text_operand(&condition.data)?;
                Ok(format!("{} = {}", Self::doc_field(&condition.column), self.param(SqlParam::Text(text))))
            }
            FilterOp::In => {
                let values = match &condition.data {
                    Value::Array(values) => values.as_slice(),
                    other => std::slice::from_ref(other),
                };
                if values.is_empty() { return Ok("1=0".to_string()); }
                if is_id {
                    let ids = values.iter().map(Self::uuid_operand).collect::<Result<Vec<_>, _>>()?;
                    Ok(format!("\"id\" = ANY({})", self.param(SqlParam::UuidArray(ids))))
                } else {
                    let texts = values.iter().map(Self::text_operand).collect::<Result<Vec<_>, _>>()?;
                    Ok(format!("{} = ANY({})", Self::doc_field(&condition.column), self.param(SqlParam::TextArray(texts))))
                }
            }
            FilterOp::IContains => {
                let fragment = condition.data.as_str().ok_or_else(|| {
                    FilterError::InvalidOperatorData("$icontains requires a string".to_string())
                })?;
                let column = if is_id { "\"id\"::text".to_string() } else { Self::doc_field(&condition.column) };
                let pattern = format!("%{}%", escape_like(fragment));
                Ok(format!("{} ILIKE {} ESCAPE '\\'", column, self.param(SqlParam::Text(pattern))))
            }
        }
    }

    // Column names are checked against FILTER_COLUMNS before they get here.
    fn doc_field(column: &str) -> String {
        format!("doc->>'{}'", column)
    }

    fn text_operand(value: &Value) -> Result<String, FilterError> {
        match value {
            Value::String(s) => Ok(s.clone()),
            Value::Number(n) => Ok(n.to_string()),
            Value::Bool(b) => Ok(b.to_string()),
            other => Err(FilterError::InvalidOperatorData(format!("unsupported operand: {}", other))),
        }
    }

    fn uuid_operand(value: &Value) -> Result<Uuid, FilterError> {
        value
            .as_str()
            .and_then(|s| Uuid::parse_str(s).ok())
            .ok_or_else(|| FilterError::InvalidOperatorData(format!("invalid id: {}", value)))
    }

    fn param(&mut self, value: SqlParam) -> String {
        self.param_values.push(value);
        self.param_index += 1;
        format!("${}", self.param_index)
    }
}

/// Escape `%`, `_` and the escape character itself for use inside ILIKE.
pub fn escape_like(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::Filter;

    #[test]
    fn empty_filter_renders_tautology() {
        let sql = Filter::new().to_where_sql(0).unwrap();
        assert_eq!(sql.query, "1=1");
        assert!(sql.params.is_empty());
    }

    #[test]
    fn doc_fields_use_jsonb_text_extraction() {
        let sql = Filter::new()
            .eq("schemename", "PM Kisan").unwrap()
            .icontains("ministry", "50%_off").unwrap()
            .to_where_sql(0)
            .unwrap();
        assert_eq!(sql.query, "doc->>'schemename' = $1 AND doc->>'ministry' ILIKE $2 ESCAPE '\\'");
        assert_eq!(
            sql.params,
            vec![SqlParam::Text("PM Kisan".into()), SqlParam::Text("%50\\%\\_off%".into())]
        );
    }

    #[test]
    fn id_conditions_bind_uuids() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let sql = Filter::new()
            .any_of("id", [a.to_string(), b.to_string()]).unwrap()
            .to_where_sql(1)
            .unwrap();
        assert_eq!(sql.query, "\"id\" = ANY($2)");
        assert_eq!(sql.params, vec![SqlParam::UuidArray(vec![a, b])]);
    }

    #[test]
    fn malformed_id_is_rejected() {
        let err = Filter::new().eq("id", "not-a-uuid").unwrap().to_where_sql(0).unwrap_err();
        assert!(matches!(err, FilterError::InvalidOperatorData(_)));
    }

    #[test]
    fn empty_in_matches_nothing() {
        let none: Vec<String> = vec![];
        let sql = Filter::new().any_of("schemename", none).unwrap().to_where_sql(0).unwrap();
        assert_eq!(sql.query, "1=0");
    }

    #[test]
    fn numeric_srno_is_compared_as_text() {
        let sql = Filter::new().eq("srno", 42).unwrap().to_where_sql(0).unwrap();
        assert_eq!(sql.params, vec![SqlParam::Text("42".into())]);
    }
}
