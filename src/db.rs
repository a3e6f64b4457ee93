// src/db.rs

use serde_json::{Map, Value};
use sqlx::{
    Column, Connection, MySqlConnection, Row, TypeInfo, ValueRef,
    mysql::{MySqlConnectOptions, MySqlRow},
};

use crate::{config::Config, error::AppError};

/// Data store accessor.
///
/// Holds connection options only; every request opens its own connection
/// through [`Database::connect`] and drops it when the handler returns.
/// Statements run in autocommit mode.
#[derive(Debug, Clone)]
pub struct Database {
    options: MySqlConnectOptions,
}

impl Database {
    pub fn new(config: &Config) -> Self {
        let options = MySqlConnectOptions::new()
            .host(&config.db_host)
            .port(config.db_port)
            .username(&config.db_user)
            .password(&config.db_password)
            .database(&config.db_name);

        Self { options }
    }

    pub async fn connect(&self) -> Result<MySqlConnection, AppError> {
        MySqlConnection::connect_with(&self.options)
            .await
            .map_err(|e| {
                tracing::error!("Failed to open database connection: {:?}", e);
                AppError::from(e)
            })
    }
}

/// Converts a row of unknown shape into a JSON object keyed by column name.
pub fn row_to_json(row: &MySqlRow) -> Value {
    let mut record = Map::new();
    for column in row.columns() {
        let value = column_to_json(row, column.ordinal(), column.type_info().name());
        record.insert(column.name().to_string(), value);
    }
    Value::Object(record)
}

fn column_to_json(row: &MySqlRow, idx: usize, type_name: &str) -> Value {
    match row.try_get_raw(idx) {
        Ok(raw) if !raw.is_null() => {}
        _ => return Value::Null,
    }

    if type_name == "BOOLEAN" {
        if let Ok(v) = row.try_get::<bool, _>(idx) {
            return Value::from(v);
        }
    }
    if let Ok(v) = row.try_get::<i64, _>(idx) {
        return Value::from(v);
    }
    if let Ok(v) = row.try_get::<u64, _>(idx) {
        return Value::from(v);
    }
    if let Ok(v) = row.try_get::<f64, _>(idx) {
        return Value::from(v);
    }
    if let Ok(v) = row.try_get::<String, _>(idx) {
        return Value::from(v);
    }
    if let Ok(v) = row.try_get::<chrono::NaiveDateTime, _>(idx) {
        return Value::from(v.to_string());
    }
    if let Ok(v) = row.try_get::<chrono::NaiveDate, _>(idx) {
        return Value::from(v.to_string());
    }
    if let Ok(v) = row.try_get::<Value, _>(idx) {
        return v;
    }
    if let Ok(v) = row.try_get::<Vec<u8>, _>(idx) {
        return Value::from(String::from_utf8_lossy(&v).into_owned());
    }

    tracing::warn!(column = idx, type_name, "Unsupported column type, returning null");
    Value::Null
}

/// Rewrites the integer flag columns of a dynamic record as booleans.
/// NULL becomes `false`; columns the row does not have stay absent.
pub fn normalize_flags(record: &mut Value, flags: &[&str]) {
    if let Value::Object(map) = record {
        for flag in flags {
            let Some(value) = map.get_mut(*flag) else {
                continue;
            };
            let truthy = match &*value {
                Value::Bool(b) => *b,
                Value::Number(n) => n.as_i64().map(|v| v != 0).unwrap_or(true),
                Value::String(s) => s != "0" && !s.is_empty(),
                _ => false,
            };
            *value = Value::Bool(truthy);
        }
    }
}
