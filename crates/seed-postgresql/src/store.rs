//! PostgreSQL implementation of [`SeedStore`].

use crate::error::PostgreSQLStoreError;
use crate::insert::{
    quote_ident, row_params, to_param, truncate_sql, update_sql, written_columns, Param,
    SETVAL_SQL,
};
use async_trait::async_trait;
use seed_core::{Column, GeneratedRow, Table};
use seed_engine::{DialectKind, SeedError, SeedStore};
use tokio_postgres::types::ToSql;
use tokio_postgres::{Client, NoTls};
use tracing::{debug, info};

/// Writes generated rows through a `tokio-postgres` client.
pub struct PostgreSQLStore {
    client: Client,
    dialect: DialectKind,
}

impl PostgreSQLStore {
    /// Connect and verify the connection.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let store = PostgreSQLStore::connect(
    ///     "host=localhost user=postgres password=postgres dbname=testdb",
    /// ).await?;
    /// ```
    pub async fn connect(connection_string: &str) -> Result<Self, PostgreSQLStoreError> {
        let (client, connection) = tokio_postgres::connect(connection_string, NoTls).await?;

        // Spawn the connection task
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                tracing::error!("PostgreSQL connection error: {}", e);
            }
        });

        // Test connection
        client.simple_query("SELECT 1").await?;

        Ok(Self::with_client(client))
    }

    /// Wrap an existing client.
    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            dialect: DialectKind::PostgreSQL,
        }
    }

    /// Use the parameter ceiling of another PostgreSQL-compatible engine.
    pub fn with_dialect(mut self, dialect: DialectKind) -> Self {
        self.dialect = dialect;
        self
    }

    /// Delete all rows of `tables` and reset their sequences.
    pub async fn truncate(&self, tables: &[&str]) -> Result<(), PostgreSQLStoreError> {
        if tables.is_empty() {
            return Ok(());
        }
        info!("Truncating tables: {}", tables.join(", "));
        self.client.batch_execute(&truncate_sql(tables)).await?;
        Ok(())
    }

    async fn execute(&self, sql: &str, params: &[Param]) -> Result<u64, PostgreSQLStoreError> {
        let param_refs: Vec<&(dyn ToSql + Sync)> = params
            .iter()
            .map(|p| p.as_ref() as &(dyn ToSql + Sync))
            .collect();
        Ok(self.client.execute(sql, &param_refs).await?)
    }
}

#[async_trait]
impl SeedStore for PostgreSQLStore {
    fn dialect(&self) -> DialectKind {
        self.dialect
    }

    async fn insert(
        &mut self,
        table: &Table,
        rows: &[GeneratedRow],
        override_identity: bool,
    ) -> Result<u64, SeedError> {
        if rows.is_empty() {
            return Ok(0);
        }
        let columns = written_columns(table, rows);
        let sql = crate::insert::insert_sql(table, &columns, rows.len(), override_identity);
        let params = row_params(table, &columns, rows)?;
        debug!(table = %table.name, rows = rows.len(), params = params.len(), "Executing INSERT");
        Ok(self.execute(&sql, &params).await?)
    }

    async fn update(
        &mut self,
        table: &Table,
        row: &GeneratedRow,
        key_column: &str,
    ) -> Result<u64, SeedError> {
        let missing_key = || PostgreSQLStoreError::MissingKey {
            table: table.name.clone(),
            column: key_column.to_string(),
        };
        let key = table.get_column(key_column).ok_or_else(missing_key)?;
        let key_value = row.get(key_column).ok_or_else(missing_key)?;
        let set: Vec<&Column> = table
            .columns
            .iter()
            .filter(|c| c.name != key_column && row.get(&c.name).is_some())
            .collect();
        if set.is_empty() {
            return Ok(0);
        }

        let sql = update_sql(table, &set, key);
        let mut params = row_params(table, &set, std::slice::from_ref(row))?;
        params.push(to_param(&table.name, key, key_value)?);
        Ok(self.execute(&sql, &params).await?)
    }

    async fn advance_sequence(
        &mut self,
        table: &Table,
        column: &str,
        value: i128,
    ) -> Result<(), SeedError> {
        let value = i64::try_from(value).map_err(|_| {
            SeedError::Config(format!(
                "sequence value {value} of '{}.{column}' exceeds bigint",
                table.name
            ))
        })?;
        let params: Vec<Param> = vec![
            Box::new(quote_ident(&table.name)),
            Box::new(column.to_string()),
            Box::new(value),
        ];
        debug!(table = %table.name, column, value, "Advancing sequence");
        self.execute(SETVAL_SQL, &params)
            .await
            .map_err(SeedError::from)?;
        Ok(())
    }
}
