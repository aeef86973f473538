use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

/// Describe-style statistics of the Value column.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, ToSchema)]
pub struct ValueStats {
    pub count: usize,
    pub mean: Option<f64>,
    /// Sample standard deviation (n - 1 denominator)
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub q25: Option<f64>,
    pub median: Option<f64>,
    pub q75: Option<f64>,
    pub max: Option<f64>,
}

/// Overview of the loaded dataset, reported once at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DatasetSummary {
    pub rows: usize,
    /// Columns present in the source file, in file order
    pub columns: Vec<String>,
    /// Missing (null or unparseable) cells per column
    pub missing: BTreeMap<String, usize>,
    pub measures: Vec<String>,
    pub value: ValueStats,
}
