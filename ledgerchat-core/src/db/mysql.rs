//! sqlx-backed MySQL implementation of the database capability

use super::{ConnectionParameters, Database, DatabaseDriver, Rows, Value};
use async_trait::async_trait;
use sqlx::mysql::{MySqlPool, MySqlRow};
use sqlx::{Column, Row, TypeInfo};
use std::sync::Arc;

pub struct MySqlDriver;

impl MySqlDriver {
    pub fn new() -> Self {
        MySqlDriver
    }
}

impl Default for MySqlDriver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DatabaseDriver for MySqlDriver {
    async fn open(&self, params: &ConnectionParameters) -> anyhow::Result<Arc<dyn Database>> {
        let pool = MySqlPool::connect(&params.url()).await?;
        Ok(Arc::new(MySqlDatabase { pool }))
    }
}

pub struct MySqlDatabase {
    pool: MySqlPool,
}

#[async_trait]
impl Database for MySqlDatabase {
    async fn run(&self, query: &str) -> anyhow::Result<Rows> {
        let fetched = sqlx::query(query).fetch_all(&self.pool).await?;

        let columns = fetched
            .first()
            .map(|row| {
                row.columns()
                    .iter()
                    .map(|column| column.name().to_string())
                    .collect()
            })
            .unwrap_or_default();

        let rows = fetched
            .iter()
            .map(|row| {
                (0..row.columns().len())
                    .map(|index| decode_value(row, index))
                    .collect()
            })
            .collect();

        Ok(Rows::new(columns, rows))
    }
}

/// Best-effort mapping of a MySQL cell onto [`Value`].
///
/// DECIMAL arrives as text on the wire; it is parsed into a float so
/// aggregates over the quantity columns render as numbers. Anything the
/// mapping does not recognize is carried as text rather than dropped.
fn decode_value(row: &MySqlRow, index: usize) -> Value {
    let type_name = row.columns()[index].type_info().name().to_uppercase();

    if type_name.contains("INT") || type_name == "YEAR" {
        if let Ok(value) = row.try_get::<Option<i64>, _>(index) {
            return value.map(Value::Int).unwrap_or(Value::Null);
        }
        if let Ok(value) = row.try_get::<Option<u64>, _>(index) {
            return match value {
                Some(v) => i64::try_from(v)
                    .map(Value::Int)
                    .unwrap_or_else(|_| Value::Text(v.to_string())),
                None => Value::Null,
            };
        }
    }

    if type_name == "FLOAT" || type_name == "DOUBLE" {
        if let Ok(value) = row.try_get::<Option<f64>, _>(index) {
            return value.map(Value::Float).unwrap_or(Value::Null);
        }
    }

    if type_name == "DECIMAL" {
        if let Ok(value) = row.try_get::<Option<String>, _>(index) {
            return match value {
                Some(text) => text
                    .parse::<f64>()
                    .map(Value::Float)
                    .unwrap_or(Value::Text(text)),
                None => Value::Null,
            };
        }
    }

    if type_name == "DATE" {
        if let Ok(value) = row.try_get::<Option<chrono::NaiveDate>, _>(index) {
            return value
                .map(|date| Value::Text(date.to_string()))
                .unwrap_or(Value::Null);
        }
    }

    if type_name == "DATETIME" || type_name == "TIMESTAMP" {
        if let Ok(value) = row.try_get::<Option<chrono::NaiveDateTime>, _>(index) {
            return value
                .map(|datetime| Value::Text(datetime.to_string()))
                .unwrap_or(Value::Null);
        }
    }

    match row.try_get::<Option<String>, _>(index) {
        Ok(Some(text)) => Value::Text(text),
        Ok(None) => Value::Null,
        Err(_) => Value::Null,
    }
}
