//! Model loading and the `Regressor` capability.
//!
//! Every supported format loads into an `Arc<dyn Regressor>`, which is created
//! once at startup and shared read-only afterwards.

pub mod dense;
pub mod xgboost;
#[cfg(feature = "onnx")]
pub mod onnx;

pub use dense::{Activation, DenseLayer, DenseNetwork};
pub use xgboost::XgbRegressor;
#[cfg(feature = "onnx")]
pub use onnx::OnnxModel;

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{RatecastError, Result};
use crate::features::{FeatureRow, FeatureSchema};

/// A trained regression estimator.
pub trait Regressor: Send + Sync {
    /// One prediction per row, in row order.
    fn predict(&self, rows: &[FeatureRow]) -> Result<Vec<f64>>;

    /// Fixed input width, when the model records one.
    fn input_dim(&self) -> Option<usize>;

    /// Column names the model was trained on, when the model records them.
    fn feature_names(&self) -> Option<Vec<String>>;

    /// Short name of the model family, for logs and the health endpoint.
    fn kind(&self) -> &'static str;
}

/// Shared, immutable handle to a loaded model.
pub type ModelHandle = Arc<dyn Regressor>;

/// On-disk serialization format of a model file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ModelFormat {
    /// Pick from the file extension or the JSON layout
    #[default]
    Auto,
    /// JSON dense network / linear regressor
    Dense,
    /// XGBoost JSON model
    Xgboost,
    /// ONNX graph (requires the `onnx` feature)
    Onnx,
}

impl fmt::Display for ModelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Auto => "auto",
            Self::Dense => "dense",
            Self::Xgboost => "xgboost",
            Self::Onnx => "onnx",
        };
        f.write_str(s)
    }
}

/// Load a model from `path`.
///
/// `schema` is only consulted by formats that cannot describe their own input
/// width (ONNX). Any failure is reported as [`RatecastError::Load`].
pub fn load_model(
    path: impl AsRef<Path>,
    format: ModelFormat,
    schema: &FeatureSchema,
) -> Result<ModelHandle> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(RatecastError::load(path, "file not found"));
    }

    let format = match format {
        ModelFormat::Auto => detect_format(path)?,
        other => other,
    };

    let model: ModelHandle = match format {
        ModelFormat::Dense => Arc::new(DenseNetwork::from_file(path)?),
        ModelFormat::Xgboost => Arc::new(XgbRegressor::from_file(path)?),
        ModelFormat::Onnx => load_onnx(path, schema)?,
        ModelFormat::Auto => unreachable!("auto format is resolved above"),
    };

    info!(
        path = %path.display(),
        %format,
        kind = model.kind(),
        input_dim = ?model.input_dim(),
        "Model loaded"
    );
    Ok(model)
}

#[cfg(feature = "onnx")]
fn load_onnx(path: &Path, schema: &FeatureSchema) -> Result<ModelHandle> {
    Ok(Arc::new(OnnxModel::load_for_vec_input(path, schema.len())?))
}

#[cfg(not(feature = "onnx"))]
fn load_onnx(path: &Path, _schema: &FeatureSchema) -> Result<ModelHandle> {
    Err(RatecastError::load(
        path,
        "ONNX support is not compiled in (rebuild with `--features onnx`)",
    ))
}

fn detect_format(path: &Path) -> Result<ModelFormat> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    if ext.as_deref() == Some("onnx") {
        return Ok(ModelFormat::Onnx);
    }

    let content = std::fs::read_to_string(path).map_err(|e| RatecastError::load(path, e))?;
    let value: serde_json::Value = serde_json::from_str(&content)
        .map_err(|e| RatecastError::load(path, format!("not a JSON model: {e}")))?;

    if value.get("learner").is_some() {
        Ok(ModelFormat::Xgboost)
    } else if value.get("layers").is_some() {
        Ok(ModelFormat::Dense)
    } else {
        Err(RatecastError::load(
            path,
            "unrecognized model layout (expected a dense network or an XGBoost model)",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DENSE: &str = r#"{
        "input_dim": 2,
        "feature_names": ["1980", "1981"],
        "layers": [{"weights": [[0.5, 0.25]], "bias": [1.0]}]
    }"#;

    #[test]
    fn missing_file_is_load_error() {
        let schema = FeatureSchema::years(1980..=1981);
        let err = load_model("does/not/exist.json", ModelFormat::Auto, &schema)
            .err()
            .expect("load must fail");
        assert!(matches!(err, RatecastError::Load { .. }));
    }

    #[test]
    fn auto_detects_dense_network() {
        let tmp = tempfile::tempdir().expect("tmpdir");
        let path = tmp.path().join("model.json");
        std::fs::write(&path, DENSE).expect("write");

        let schema = FeatureSchema::years(1980..=1981);
        let model = load_model(&path, ModelFormat::Auto, &schema).expect("load");
        assert_eq!(model.kind(), "dense");
        assert_eq!(model.input_dim(), Some(2));
    }

    #[test]
    fn corrupt_json_is_load_error() {
        let tmp = tempfile::tempdir().expect("tmpdir");
        let path = tmp.path().join("model.json");
        std::fs::write(&path, "{ not json").expect("write");

        let schema = FeatureSchema::years(1980..=1981);
        let err = load_model(&path, ModelFormat::Auto, &schema)
            .err()
            .expect("load must fail");
        assert!(err.to_string().contains("not a JSON model"));
    }

    #[test]
    fn unknown_layout_is_load_error() {
        let tmp = tempfile::tempdir().expect("tmpdir");
        let path = tmp.path().join("model.json");
        std::fs::write(&path, r#"{"coef": [1, 2]}"#).expect("write");

        let schema = FeatureSchema::years(1980..=1981);
        let err = load_model(&path, ModelFormat::Auto, &schema)
            .err()
            .expect("load must fail");
        assert!(matches!(err, RatecastError::Load { .. }));
    }

    #[cfg(not(feature = "onnx"))]
    #[test]
    fn onnx_without_feature_is_load_error() {
        let tmp = tempfile::tempdir().expect("tmpdir");
        let path = tmp.path().join("model.onnx");
        std::fs::write(&path, b"\x08\x01").expect("write");

        let schema = FeatureSchema::years(1980..=1981);
        let err = load_model(&path, ModelFormat::Auto, &schema)
            .err()
            .expect("load must fail");
        assert!(err.to_string().contains("--features onnx"));
    }

    #[test]
    fn format_parses_from_config_strings() {
        let f: ModelFormat = serde_json::from_str("\"xgboost\"").unwrap();
        assert_eq!(f, ModelFormat::Xgboost);
        assert_eq!(ModelFormat::default().to_string(), "auto");
    }
}
