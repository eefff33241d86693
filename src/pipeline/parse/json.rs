use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::NormalizeError;
use crate::pipeline::parse::Parser;
use crate::types::export::{ExportData, ExportDocument};

pub struct JsonParser;

impl Parser for JsonParser {
    fn parse(&self, bytes: &[u8]) -> Result<ExportDocument, NormalizeError> {
        let root: Value = serde_json::from_slice(bytes)
            .map_err(|e| NormalizeError::InvalidDocument(format!("Failed to parse JSON: {}", e)))?;

        let mut data = match root {
            Value::Object(mut root) => match root.remove("data") {
                Some(Value::Object(data)) => data,
                Some(other) => {
                    return Err(NormalizeError::InvalidDocument(format!(
                        "\"data\" must be an object, found {}",
                        kind_of(&other)
                    )))
                }
                None => {
                    return Err(NormalizeError::InvalidDocument(
                        "missing top-level \"data\" key".to_string(),
                    ))
                }
            },
            other => {
                return Err(NormalizeError::InvalidDocument(format!(
                    "document root must be an object, found {}",
                    kind_of(&other)
                )))
            }
        };

        Ok(ExportDocument {
            data: ExportData {
                workouts: entries(&mut data, "workouts")?,
                metrics: entries(&mut data, "metrics")?,
            },
        })
    }
}

/// Entries are decoded one by one so a failure can name the offending index.
fn entries<T: DeserializeOwned>(
    data: &mut Map<String, Value>,
    key: &str,
) -> Result<Vec<T>, NormalizeError> {
    match data.remove(key) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .into_iter()
            .enumerate()
            .map(|(index, item)| {
                serde_json::from_value(item).map_err(|e| {
                    NormalizeError::MalformedRecord(format!("{}[{}]: {}", key, index, e))
                })
            })
            .collect(),
        Some(other) => Err(NormalizeError::MalformedRecord(format!(
            "\"{}\" must be an array, found {}",
            key,
            kind_of(&other)
        ))),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
