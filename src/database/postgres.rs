use std::time::Instant;

use async_trait::async_trait;
use sqlx::{
    postgres::{PgArguments, PgRow},
    types::Json,
    FromRow, PgPool, Postgres,
};
use uuid::Uuid;

use crate::config::DatabaseConfig;
use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::{DeleteSummary, Scheme, SchemeDocument, SchemeId, SchemeUpdate};
use crate::database::store::SchemeStore;
use crate::filter::{Filter, SqlParam};

const CREATE_TABLE_SQL: &str = "CREATE TABLE IF NOT EXISTS schemes (
    id UUID PRIMARY KEY,
    seq BIGSERIAL NOT NULL,
    doc JSONB NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
)";

const CREATE_NAME_INDEX_SQL: &str =
    "CREATE INDEX IF NOT EXISTS schemes_schemename_idx ON schemes ((doc->>'schemename'))";

#[derive(FromRow)]
struct SchemeRow {
    id: Uuid,
    doc: Json<SchemeDocument>,
}

impl From<SchemeRow> for Scheme {
    fn from(row: SchemeRow) -> Self {
        Scheme::new(SchemeId::from(row.id), row.doc.0)
    }
}

/// Document store over a single Postgres table with a JSONB body column.
#[derive(Clone)]
pub struct PgSchemeStore {
    pool: PgPool,
    config: DatabaseConfig,
}

impl PgSchemeStore {
    pub fn new(pool: PgPool, config: DatabaseConfig) -> Self {
        Self { pool, config }
    }

    /// Connect with `DATABASE_URL` and make sure the table exists.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        let pool = DatabaseManager::connect(config).await?;
        let store = Self::new(pool, config.clone());
        store.migrate().await?;
        Ok(store)
    }

    pub async fn migrate(&self) -> Result<(), DatabaseError> {
        sqlx::query(CREATE_TABLE_SQL).execute(&self.pool).await?;
        sqlx::query(CREATE_NAME_INDEX_SQL).execute(&self.pool).await?;
        tracing::info!("schemes table ready");
        Ok(())
    }

    fn observe(&self, sql: &str, started: Instant) {
        let elapsed = started.elapsed();
        if self.config.enable_query_logging {
            tracing::debug!(elapsed_ms = elapsed.as_millis() as u64, "{}", sql);
        }
        if self.config.enable_slow_query_warning && elapsed.as_millis() as u64 > self.config.slow_query_threshold_ms {
            tracing::warn!(elapsed_ms = elapsed.as_millis() as u64, "slow query: {}", sql);
        }
    }

    async fn fetch_schemes(&self, sql: &str, params: &[SqlParam]) -> Result<Vec<Scheme>, DatabaseError> {
        let started = Instant::now();
        let mut q = sqlx::query_as::<_, SchemeRow>(sql);
        for p in params {
            q = bind_param_query_as(q, p);
        }
        let rows = q.fetch_all(&self.pool).await;
        self.observe(sql, started);
        Ok(rows?.into_iter().map(Scheme::from).collect())
    }

    async fn fetch_optional_scheme(&self, sql: &str, params: &[SqlParam]) -> Result<Option<Scheme>, DatabaseError> {
        let started = Instant::now();
        let mut q = sqlx::query_as::<_, SchemeRow>(sql);
        for p in params {
            q = bind_param_query_as(q, p);
        }
        let row = q.fetch_optional(&self.pool).await;
        self.observe(sql, started);
        Ok(row?.map(Scheme::from))
    }
}

#[async_trait]
impl SchemeStore for PgSchemeStore {
    async fn find_all(&self, filter: &Filter) -> Result<Vec<Scheme>, DatabaseError> {
        let where_sql = filter.to_where_sql(0)?;
        let sql = format!("SELECT id, doc FROM schemes WHERE {} ORDER BY seq", where_sql.query);
        self.fetch_schemes(&sql, &where_sql.params).await
    }

    async fn find_by_id(&self, id: SchemeId) -> Result<Option<Scheme>, DatabaseError> {
        let sql = "SELECT id, doc FROM schemes WHERE id = $1";
        self.fetch_optional_scheme(sql, &[SqlParam::Uuid(id.as_uuid())]).await
    }

    async fn insert_many(&self, documents: Vec<SchemeDocument>) -> Result<Vec<Scheme>, DatabaseError> {
        if documents.is_empty() {
            return Ok(vec![]);
        }

        let sql = "INSERT INTO schemes (id, doc) VALUES ($1, $2) RETURNING id, doc";
        let started = Instant::now();
        let mut tx = self.pool.begin().await?;
        let mut created = Vec::with_capacity(documents.len());
        for document in documents {
            let row = sqlx::query_as::<_, SchemeRow>(sql)
                .bind(SchemeId::new().as_uuid())
                .bind(Json(document))
                .fetch_one(&mut *tx)
                .await?;
            created.push(Scheme::from(row));
        }
        tx.commit().await?;
        self.observe(sql, started);

        Ok(created)
    }

    async fn delete_by_id(&self, id: SchemeId) -> Result<Option<Scheme>, DatabaseError> {
        let sql = "DELETE FROM schemes WHERE id = $1 RETURNING id, doc";
        self.fetch_optional_scheme(sql, &[SqlParam::Uuid(id.as_uuid())]).await
    }

    async fn delete_one(&self, filter: &Filter) -> Result<Option<Scheme>, DatabaseError> {
        let where_sql = filter.to_where_sql(0)?;
        let sql = format!(
            "DELETE FROM schemes WHERE id = (SELECT id FROM schemes WHERE {} ORDER BY seq LIMIT 1) RETURNING id, doc",
            where_sql.query
        );
        self.fetch_optional_scheme(&sql, &where_sql.params).await
    }

    async fn delete_many(&self, filter: &Filter) -> Result<DeleteSummary, DatabaseError> {
        let where_sql = filter.to_where_sql(0)?;
        let sql = format!("DELETE FROM schemes WHERE {}", where_sql.query);

        let started = Instant::now();
        let mut q = sqlx::query(&sql);
        for p in where_sql.params.iter() {
            q = bind_param_query(q, p);
        }
        let result = q.execute(&self.pool).await;
        self.observe(&sql, started);

        Ok(DeleteSummary::deleted(result?.rows_affected()))
    }

    async fn update_by_id(&self, id: SchemeId, update: &SchemeUpdate) -> Result<Option<Scheme>, DatabaseError> {
        let sql = "UPDATE schemes SET doc = doc || $2 WHERE id = $1 RETURNING id, doc";
        let started = Instant::now();
        let row = sqlx::query_as::<_, SchemeRow>(sql)
            .bind(id.as_uuid())
            .bind(update.to_json_patch())
            .fetch_optional(&self.pool)
            .await;
        self.observe(sql, started);
        Ok(row?.map(Scheme::from))
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        DatabaseManager::health_check(&self.pool).await
    }
}

fn bind_param_query<'q>(
    q: sqlx::query::Query<'q, Postgres, PgArguments>,
    p: &'q SqlParam,
) -> sqlx::query::Query<'q, Postgres, PgArguments> {
    match p {
        SqlParam::Text(s) => q.bind(s),
        SqlParam::TextArray(values) => q.bind(values),
        SqlParam::Uuid(id) => q.bind(*id),
        SqlParam::UuidArray(ids) => q.bind(ids),
    }
}

fn bind_param_query_as<'q, O>(
    q: sqlx::query::QueryAs<'q, Postgres, O, PgArguments>,
    p: &'q SqlParam,
) -> sqlx::query::QueryAs<'q, Postgres, O, PgArguments>
where
    O: for<'r> FromRow<'r, PgRow>,
{
    match p {
        SqlParam::Text(s) => q.bind(s),
        SqlParam::TextArray(values) => q.bind(values),
        SqlParam::Uuid(id) => q.bind(*id),
        SqlParam::UuidArray(ids) => q.bind(ids),
    }
}
