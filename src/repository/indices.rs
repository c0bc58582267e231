use async_trait::async_trait;
use sqlx::{Postgres, QueryBuilder};

use super::database::Database;
use crate::models::{IndexRecord, INDEX_TABLE_NAME};

const INDEX_COLUMNS: &str = "\"index\", company_name, industry, tradingsymbol, series, isin_code";

/// Postgres caps a statement at 65535 bind parameters; six per row
const INSERT_BATCH_ROWS: usize = 1000;

/// NSE index constituents
#[async_trait]
pub trait IndexStore: Send + Sync {
    /// Empty the table and reset its id sequence
    async fn truncate_indices(&self) -> Result<(), sqlx::Error>;

    /// Returns the number of rows inserted
    async fn insert_indices(&self, records: &[IndexRecord]) -> Result<u64, sqlx::Error>;

    async fn indices_record_count(&self) -> Result<i64, sqlx::Error>;

    async fn index_instruments(&self, index_name: &str) -> Result<Vec<IndexRecord>, sqlx::Error>;

    async fn index_names(&self) -> Result<Vec<String>, sqlx::Error>;
}

fn insert_statement<'a>(schema: &str, records: &'a [IndexRecord]) -> QueryBuilder<'a, Postgres> {
    let mut builder = QueryBuilder::new(format!(
        "INSERT INTO {}.{} ({}) ",
        schema, INDEX_TABLE_NAME, INDEX_COLUMNS
    ));
    builder.push_values(records, |mut row, record| {
        row.push_bind(&record.index)
            .push_bind(&record.company_name)
            .push_bind(&record.industry)
            .push_bind(&record.tradingsymbol)
            .push_bind(&record.series)
            .push_bind(&record.isin_code);
    });
    builder
}

#[async_trait]
impl IndexStore for Database {
    async fn truncate_indices(&self) -> Result<(), sqlx::Error> {
        let sql = format!(
            "TRUNCATE TABLE {}.{} RESTART IDENTITY CASCADE",
            self.schema(),
            INDEX_TABLE_NAME
        );
        self.execute(&sql).await.map(|_| ())
    }

    async fn insert_indices(&self, records: &[IndexRecord]) -> Result<u64, sqlx::Error> {
        let mut inserted = 0;
        for chunk in records.chunks(INSERT_BATCH_ROWS) {
            let mut builder = insert_statement(self.schema(), chunk);
            let sql = builder.sql().to_string();
            let query = builder.build().execute(self.pool());

            inserted += self.observe(&sql, query).await?.rows_affected();
        }
        Ok(inserted)
    }

    async fn indices_record_count(&self) -> Result<i64, sqlx::Error> {
        let sql = format!("SELECT COUNT(*) FROM {}.{}", self.schema(), INDEX_TABLE_NAME);
        let query = sqlx::query_scalar::<_, i64>(&sql).fetch_one(self.pool());

        self.observe(&sql, query).await
    }

    async fn index_instruments(&self, index_name: &str) -> Result<Vec<IndexRecord>, sqlx::Error> {
        let sql = format!(
            "SELECT {} FROM {}.{} WHERE \"index\" = $1",
            INDEX_COLUMNS,
            self.schema(),
            INDEX_TABLE_NAME
        );
        let query = sqlx::query_as::<_, IndexRecord>(&sql)
            .bind(index_name)
            .fetch_all(self.pool());

        self.observe(&sql, query).await
    }

    async fn index_names(&self) -> Result<Vec<String>, sqlx::Error> {
        let sql = format!(
            "SELECT DISTINCT \"index\" FROM {}.{} ORDER BY \"index\"",
            self.schema(),
            INDEX_TABLE_NAME
        );
        let query = sqlx::query_scalar::<_, String>(&sql).fetch_all(self.pool());

        self.observe(&sql, query).await
    }
}
