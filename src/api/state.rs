use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::predict::Predictor;

/// Shared application state for API handlers
#[derive(Clone)]
pub struct AppState {
    /// Loaded model bound to its feature schema (read-only)
    pub predictor: Arc<Predictor>,

    /// Year the model forecasts
    pub target_year: i32,

    /// Application start time
    pub start_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(predictor: Arc<Predictor>, target_year: i32) -> Self {
        Self {
            predictor,
            target_year,
            start_time: Utc::now(),
        }
    }

    pub fn uptime_seconds(&self) -> i64 {
        (Utc::now() - self.start_time).num_seconds()
    }
}
