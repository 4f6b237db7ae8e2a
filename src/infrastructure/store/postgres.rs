use std::{str::FromStr, time::Duration};

use async_trait::async_trait;
use serde_json::Value;
use sqlx::{
    postgres::{PgConnectOptions, PgPool, PgPoolOptions},
    Postgres, QueryBuilder,
};
use tracing::info;

use crate::{
    errors::StoreError,
    store::{BackendKind, SelectQuery, StoreBackend},
};

/// Direct Postgres connection. Rows travel as JSON (`row_to_json` / `jsonb_populate_record`)
/// so the gateway decodes them exactly as it decodes REST responses.
pub struct PgBackend {
    pool: PgPool,
}

impl PgBackend {
    /// The store key is used as the connection password. No connection is opened until first use.
    pub fn connect_lazy(database_url: &str, key: &str, timeout: Duration) -> Result<Self, StoreError> {
        let options = PgConnectOptions::from_str(database_url)
            .map_err(|e| StoreError::InvalidConfig(e.to_string()))?
            .password(key);

        let pool = PgPoolOptions::new()
            .max_connections(20)
            .acquire_timeout(timeout)
            .connect_lazy_with(options);

        info!("Database pool created; connections open on first use.");
        Ok(PgBackend { pool })
    }
}

fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Column list of a JSON object payload, quoted.
fn columns_of(row: &Value) -> Result<Vec<String>, StoreError> {
    let object = row
        .as_object()
        .ok_or_else(|| StoreError::Decode("row payload must be a JSON object".into()))?;
    if object.is_empty() {
        return Err(StoreError::Decode("row payload has no columns".into()));
    }
    Ok(object.keys().map(|k| quote_ident(k)).collect())
}

#[async_trait]
impl StoreBackend for PgBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Postgres
    }

    async fn select(&self, query: &SelectQuery) -> Result<Vec<Value>, StoreError> {
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT row_to_json(t) FROM {} t", quote_ident(query.table)));

        if let Some(filter) = &query.filter {
            builder.push(format!(" WHERE t.{}::text = ", quote_ident(filter.column)));
            builder.push_bind(filter.value.clone());
        }

        if let Some(order) = &query.order {
            builder.push(format!(
                " ORDER BY t.{} {}",
                quote_ident(order.column),
                order.direction.as_str().to_uppercase()
            ));
        }

        let rows = builder
            .build_query_scalar::<Value>()
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    async fn insert(&self, table: &'static str, row: Value) -> Result<Value, StoreError> {
        let table = quote_ident(table);
        let columns = columns_of(&row)?.join(", ");

        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(format!(
            "INSERT INTO {table} AS t ({columns}) SELECT {columns} FROM jsonb_populate_record(NULL::{table}, "
        ));
        builder.push_bind(row);
        builder.push(") RETURNING row_to_json(t)");

        let stored = builder
            .build_query_scalar::<Value>()
            .fetch_one(&self.pool)
            .await?;

        Ok(stored)
    }

    async fn update(&self, table: &'static str, id: &str, patch: Value) -> Result<Option<Value>, StoreError> {
        let table = quote_ident(table);
        let columns = columns_of(&patch)?;
        let column_list = columns.join(", ");

        // A parenthesized single-column target is not a row, so use the scalar form there.
        let target = if columns.len() == 1 { column_list.clone() } else { format!("({column_list})") };

        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(format!(
            "UPDATE {table} AS t SET {target} = (SELECT {column_list} FROM jsonb_populate_record(NULL::{table}, "
        ));
        builder.push_bind(patch);
        builder.push(")) WHERE t.id::text = ");
        builder.push_bind(id.to_string());
        builder.push(" RETURNING row_to_json(t)");

        let updated = builder
            .build_query_scalar::<Value>()
            .fetch_optional(&self.pool)
            .await?;

        Ok(updated)
    }

    async fn delete(&self, table: &'static str, id: &str) -> Result<bool, StoreError> {
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("DELETE FROM {} WHERE id::text = ", quote_ident(table)));
        builder.push_bind(id.to_string());

        let result = builder.build().execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
