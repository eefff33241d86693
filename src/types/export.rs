use serde::{Deserialize, Serialize};

/// A quantity as it appears in the export. Numbers keep their native JSON
/// representation (integer or float); some exporters write quantities as text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Quantity {
    Number(serde_json::Number),
    Text(String),
}

impl Quantity {
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Quantity::Number(n) => serde_json::Value::Number(n.clone()),
            Quantity::Text(s) => serde_json::Value::String(s.clone()),
        }
    }
}

impl std::fmt::Display for Quantity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Quantity::Number(n) => write!(f, "{}", n),
            Quantity::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Quantity {
    fn from(value: i64) -> Self {
        Quantity::Number(value.into())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Elevation {
    pub qty: Option<Quantity>,
    pub units: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StepSample {
    pub date: Option<String>,
    pub source: Option<String>,
    pub qty: Option<Quantity>,
    pub units: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutEntry {
    pub location: Option<String>,
    pub elevation_up: Option<Elevation>,
    pub step_count: Option<Vec<StepSample>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetricSample {
    pub date: Option<String>,
    pub source: Option<String>,
    pub qty: Option<Quantity>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetricSeries {
    pub name: Option<String>,
    pub units: Option<String>,
    pub data: Option<Vec<MetricSample>>,
}

/// Both collections are independently optional; an absent or `null`
/// collection loads as empty.
#[derive(Debug, Clone, Default)]
pub struct ExportData {
    pub workouts: Vec<WorkoutEntry>,
    pub metrics: Vec<MetricSeries>,
}

/// One parsed export file.
#[derive(Debug, Clone, Default)]
pub struct ExportDocument {
    pub data: ExportData,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExportFormat {
    Json,
}

impl ExportFormat {
    pub fn from_filename(filename: &str) -> Option<Self> {
        let (_, ext) = filename.rsplit_once('.')?;
        match ext.to_lowercase().as_str() {
            "json" => Some(ExportFormat::Json),
            _ => None,
        }
    }
}
