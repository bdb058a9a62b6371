use serde::{Deserialize, Serialize};

use crate::features::Record;

// ============================================================================
// Prediction Types
// ============================================================================

/// Body of `POST /api/predict`: either a bare list of records or `{"records": [...]}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PredictRequest {
    Records(Vec<Record>),
    Wrapped { records: Vec<Record> },
}

impl PredictRequest {
    pub fn into_records(self) -> Vec<Record> {
        match self {
            Self::Records(records) | Self::Wrapped { records } => records,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictResponse {
    pub predictions: Vec<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

// ============================================================================
// Schema / Health Types
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaResponse {
    pub features: Vec<String>,
    pub target_year: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSummary {
    pub kind: String,
    pub input_dim: Option<usize>,
    pub declares_feature_names: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub model: ModelSummary,
    pub uptime_seconds: i64,
}
