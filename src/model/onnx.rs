//! ONNX inference wrapper (pure Rust via `tract-onnx`).
//!
//! Serves regressors exported from Python tooling (e.g. skl2onnx) without a
//! Python runtime. The graph is specialized to a `[1, N]` f32 input.

use std::path::Path;

use tract_onnx::prelude::*;

use super::Regressor;
use crate::error::{RatecastError, Result};
use crate::features::FeatureRow;

#[derive(Clone)]
pub struct OnnxModel {
    plan: TypedRunnableModel<TypedModel>,
    input_dim: usize,
}

impl std::fmt::Debug for OnnxModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxModel")
            .field("input_dim", &self.input_dim)
            .finish()
    }
}

impl OnnxModel {
    /// Load an ONNX model and specialize it to a fixed `[1, input_dim]` f32 input.
    pub fn load_for_vec_input(path: &Path, input_dim: usize) -> Result<Self> {
        if input_dim == 0 {
            return Err(RatecastError::load(path, "input_dim must be > 0"));
        }

        let plan = tract_onnx::onnx()
            .model_for_path(path)
            .and_then(|m| {
                m.with_input_fact(0, InferenceFact::dt_shape(f32::datum_type(), tvec!(1, input_dim)))
            })
            .and_then(|m| m.into_optimized())
            .and_then(|m| m.into_runnable())
            .map_err(|e| RatecastError::load(path, format!("onnx load failed: {e}")))?;

        let model = Self { plan, input_dim };

        // Dry run so a graph with the wrong output shape fails at startup.
        model
            .run(&vec![0.0; input_dim])
            .map_err(|e| RatecastError::load(path, e))?;

        Ok(model)
    }

    fn run(&self, input: &[f64]) -> Result<f32> {
        let data: Vec<f32> = input.iter().map(|v| *v as f32).collect();
        let tensor =
            tract_ndarray::ArrayD::<f32>::from_shape_vec(tract_ndarray::IxDyn(&[1, self.input_dim]), data)
            .map_err(|e| RatecastError::Inference(format!("onnx input reshape failed: {e}")))?
            .into_tvalue();

        let outputs = self
            .plan
            .run(tvec!(tensor))
            .map_err(|e| RatecastError::Inference(format!("onnx run failed: {e}")))?;
        let first = outputs
            .first()
            .ok_or_else(|| RatecastError::Inference("onnx produced no outputs".to_string()))?;
        let arr = first
            .to_array_view::<f32>()
            .map_err(|e| RatecastError::Inference(format!("onnx output decode failed: {e}")))?;

        if arr.len() != 1 {
            return Err(RatecastError::Inference(format!(
                "onnx regressor must produce one value, got {}",
                arr.len()
            )));
        }
        Ok(arr.iter().copied().next().unwrap_or_default())
    }
}

impl Regressor for OnnxModel {
    fn predict(&self, rows: &[FeatureRow]) -> Result<Vec<f64>> {
        rows.iter()
            .map(|row| {
                if row.len() != self.input_dim {
                    return Err(RatecastError::SchemaMismatch(format!(
                        "onnx model expects {} columns, got {}",
                        self.input_dim,
                        row.len()
                    )));
                }
                self.run(row.values()).map(f64::from)
            })
            .collect()
    }

    fn input_dim(&self) -> Option<usize> {
        Some(self.input_dim)
    }

    fn feature_names(&self) -> Option<Vec<String>> {
        None
    }

    fn kind(&self) -> &'static str {
        "onnx"
    }
}
