use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::export::Quantity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordType {
    Workout,
    Metric,
}

impl RecordType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::Workout => "workout",
            RecordType::Metric => "metric",
        }
    }
}

/// One normalized row. Every column is always present; columns that do not
/// apply to `record_type` stay `None` and serialize as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlatRecord {
    pub health_data_user: String,
    #[serde(rename = "type")]
    pub record_type: RecordType,
    pub date: Option<String>,
    pub source: Option<String>,
    pub workout_qty: Option<Quantity>,
    pub workout_units: Option<String>,
    pub elevation_qty: Option<Quantity>,
    pub elevation_units: Option<String>,
    pub location: Option<String>,
    pub value: Option<Quantity>,
    pub units: Option<String>,
    pub metric_name: Option<String>,
}

impl FlatRecord {
    /// Column order of the `health_data` table.
    pub const COLUMNS: [&'static str; 12] = [
        "health_data_user",
        "type",
        "date",
        "source",
        "workout_qty",
        "workout_units",
        "elevation_qty",
        "elevation_units",
        "location",
        "value",
        "units",
        "metric_name",
    ];

    pub fn row(&self) -> [Value; 12] {
        let text = |v: &Option<String>| v.clone().map(Value::String).unwrap_or(Value::Null);
        let qty = |v: &Option<Quantity>| v.as_ref().map(Quantity::to_json).unwrap_or(Value::Null);

        [
            Value::String(self.health_data_user.clone()),
            Value::String(self.record_type.as_str().to_string()),
            text(&self.date),
            text(&self.source),
            qty(&self.workout_qty),
            text(&self.workout_units),
            qty(&self.elevation_qty),
            text(&self.elevation_units),
            text(&self.location),
            qty(&self.value),
            text(&self.units),
            text(&self.metric_name),
        ]
    }

    /// Row for delimited output; absent values become empty cells.
    pub fn text_row(&self) -> [String; 12] {
        let text = |v: &Option<String>| v.clone().unwrap_or_default();
        let qty = |v: &Option<Quantity>| v.as_ref().map(|q| q.to_string()).unwrap_or_default();

        [
            self.health_data_user.clone(),
            self.record_type.as_str().to_string(),
            text(&self.date),
            text(&self.source),
            qty(&self.workout_qty),
            text(&self.workout_units),
            qty(&self.elevation_qty),
            text(&self.elevation_units),
            text(&self.location),
            qty(&self.value),
            text(&self.units),
            text(&self.metric_name),
        ]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordCounts {
    pub workout_records: usize,
    pub metric_records: usize,
}

impl RecordCounts {
    pub fn tally(records: &[FlatRecord]) -> Self {
        let workout_records = records
            .iter()
            .filter(|r| r.record_type == RecordType::Workout)
            .count();
        Self {
            workout_records,
            metric_records: records.len() - workout_records,
        }
    }
}
