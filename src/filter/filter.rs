use serde_json::Value;

use super::error::FilterError;
use super::filter_where::FilterWhere;
use super::types::{FilterOp, FilterWhereInfo, SqlResult};

/// Document fields a filter may reference.
pub const FILTER_COLUMNS: &[&str] = &[
    "id",
    "schemename",
    "ministry",
    "desc",
    "place",
    "timeOfSchemeAdded",
    "date",
    "srno",
];

/// Conjunction of field conditions over a scheme document.
///
/// An empty filter matches every document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    conditions: Vec<FilterWhereInfo>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// `{ column: value }`
    pub fn eq(mut self, column: &str, value: impl Into<Value>) -> Result<Self, FilterError> {
        Self::validate_column(column)?;
        self.conditions.push(FilterWhereInfo { column: column.to_string(), operator: FilterOp::Eq, data: value.into() });
        Ok(self)
    }

    /// `{ column: { "$in": values } }`
    pub fn any_of<I, V>(mut self, column: &str, values: I) -> Result<Self, FilterError>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::validate_column(column)?;
        let data = Value::Array(values.into_iter().map(Into::into).collect());
        self.conditions.push(FilterWhereInfo { column: column.to_string(), operator: FilterOp::In, data });
        Ok(self)
    }

    /// `{ column: { "$icontains": fragment } }`
    pub fn icontains(mut self, column: &str, fragment: &str) -> Result<Self, FilterError> {
        Self::validate_column(column)?;
        self.conditions.push(FilterWhereInfo {
            column: column.to_string(),
            operator: FilterOp::IContains,
            data: Value::String(fragment.to_string()),
        });
        Ok(self)
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Evaluate the filter against a serialized document.
    pub fn matches(&self, document: &Value) -> bool {
        self.conditions.iter().all(|condition| {
            let field = document.get(&condition.column).unwrap_or(&Value::Null);
            match condition.operator {
                FilterOp::Eq => field == &condition.data,
                FilterOp::In => match &condition.data {
                    Value::Array(values) => values.iter().any(|v| v == field),
                    other => other == field,
                },
                FilterOp::IContains => match (field.as_str(), condition.data.as_str()) {
                    (Some(haystack), Some(needle)) => haystack.to_lowercase().contains(&needle.to_lowercase()),
                    _ => false,
                },
            }
        })
    }

    /// Render as a SQL predicate over the `schemes` table.
    pub fn to_where_sql(&self, starting_param_index: usize) -> Result<SqlResult, FilterError> {
        let (query, params) = FilterWhere::generate(&self.conditions, starting_param_index)?;
        Ok(SqlResult { query, params })
    }

    fn validate_column(column: &str) -> Result<(), FilterError> {
        if FILTER_COLUMNS.contains(&column) {
            Ok(())
        } else {
            Err(FilterError::InvalidColumn(column.to_string()))
        }
    }
}
