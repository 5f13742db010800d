//! JSON bodies for the GridDB Web API.

use chrono::{DateTime, Utc};
use loader_core::{ContainerSchema, Row, Value};
use loader_populate::StoreError;
use serde::Serialize;
use serde_json::{Number, Value as JsonValue};

/// Timestamp format accepted by the row endpoints.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// Column entry of a container definition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: String,
}

/// Body of `POST /containers`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContainerInfo {
    pub container_name: String,
    pub container_type: String,
    pub rowkey: bool,
    pub columns: Vec<ColumnInfo>,
}

impl ContainerInfo {
    /// Describe `schema` under the container name `name`.
    pub fn from_schema(name: &str, schema: &ContainerSchema) -> Self {
        Self {
            container_name: name.to_string(),
            container_type: schema.kind.wire_name().to_string(),
            rowkey: schema.key_column().is_some(),
            columns: schema
                .columns
                .iter()
                .map(|c| ColumnInfo {
                    name: c.name.clone(),
                    column_type: c.column_type.wire_name().to_string(),
                })
                .collect(),
        }
    }
}

pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Convert one value to its JSON cell.
pub fn value_to_json(value: &Value) -> Result<JsonValue, StoreError> {
    Ok(match value {
        Value::Timestamp(ts) => JsonValue::String(format_timestamp(ts)),
        Value::Integer(i) => JsonValue::from(*i),
        Value::String(s) => JsonValue::String(s.clone()),
        Value::Bool(b) => JsonValue::Bool(*b),
        Value::Double(d) => float_to_json(*d)?,
        Value::Float(f) => float_to_json(f64::from(*f))?,
    })
}

fn float_to_json(value: f64) -> Result<JsonValue, StoreError> {
    Number::from_f64(value)
        .map(JsonValue::Number)
        .ok_or_else(|| StoreError::Encoding(format!("non-finite float {value}")))
}

/// Body of `PUT /containers/{name}/rows`: one array per row.
pub fn rows_body(rows: &[Row]) -> Result<JsonValue, StoreError> {
    let rows = rows
        .iter()
        .map(|row| {
            row.values()
                .iter()
                .map(value_to_json)
                .collect::<Result<Vec<_>, _>>()
                .map(JsonValue::Array)
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(JsonValue::Array(rows))
}
