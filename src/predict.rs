//! Prediction adapter: validated rows in, one number per row out.

use std::time::Instant;

use tracing::{debug, info};

use crate::config::AppConfig;
use crate::error::{RatecastError, Result};
use crate::features::{FeatureRow, FeatureSchema, Record};
use crate::model::{load_model, ModelHandle, Regressor};

/// Binds a loaded model to the feature schema it was trained on.
#[derive(Clone)]
pub struct Predictor {
    model: ModelHandle,
    schema: FeatureSchema,
}

impl std::fmt::Debug for Predictor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Predictor")
            .field("model", &self.model.kind())
            .field("features", &self.schema.len())
            .finish()
    }
}

impl Predictor {
    /// Pair `model` with `schema`, rejecting models whose declared input
    /// width or column names disagree with the schema.
    pub fn new(model: ModelHandle, schema: FeatureSchema) -> Result<Self> {
        if let Some(dim) = model.input_dim() {
            if dim != schema.len() {
                return Err(RatecastError::SchemaMismatch(format!(
                    "model expects {dim} columns, schema has {}",
                    schema.len()
                )));
            }
        }
        if let Some(names) = model.feature_names() {
            schema.ensure_matches(&names)?;
        }
        Ok(Self { model, schema })
    }

    /// Load the configured model and bind it to the configured schema.
    ///
    /// A model that does not fit the schema is a load failure.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let schema = config.features.schema();
        let model = load_model(&config.model.path, config.model.format, &schema)?;
        let predictor = Self::new(model, schema).map_err(|e| match e {
            RatecastError::SchemaMismatch(msg) => RatecastError::load(&config.model.path, msg),
            other => other,
        })?;
        info!(
            model = predictor.model.kind(),
            features = predictor.schema.len(),
            "Predictor ready"
        );
        Ok(predictor)
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn model(&self) -> &dyn Regressor {
        self.model.as_ref()
    }

    /// Predict a single validated row.
    pub fn predict_row(&self, row: &FeatureRow) -> Result<f64> {
        let out = self.predict_rows(std::slice::from_ref(row))?;
        Ok(out[0])
    }

    /// Predict every row, preserving order.
    pub fn predict_rows(&self, rows: &[FeatureRow]) -> Result<Vec<f64>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        if let Some(bad) = rows.iter().position(|r| r.len() != self.schema.len()) {
            return Err(RatecastError::SchemaMismatch(format!(
                "row {bad} has {} columns, schema has {}",
                rows[bad].len(),
                self.schema.len()
            )));
        }

        let started = Instant::now();
        let out = self.model.predict(rows)?;
        if out.len() != rows.len() {
            return Err(RatecastError::Inference(format!(
                "model returned {} predictions for {} rows",
                out.len(),
                rows.len()
            )));
        }
        debug!(
            rows = rows.len(),
            elapsed_us = started.elapsed().as_micros() as u64,
            "Batch predicted"
        );
        Ok(out)
    }

    /// Validate each record against the schema, then predict them as one batch.
    pub fn predict_batch(&self, records: &[Record]) -> Result<Vec<f64>> {
        let rows = records
            .iter()
            .enumerate()
            .map(|(idx, rec)| {
                self.schema.row_from_record(rec).map_err(|e| match e {
                    RatecastError::SchemaMismatch(msg) => {
                        RatecastError::SchemaMismatch(format!("record {idx}: {msg}"))
                    }
                    other => other,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        self.predict_rows(&rows)
    }
}
