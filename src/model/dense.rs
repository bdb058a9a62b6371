//! Dense network inference (CPU-only).
//!
//! Loads small regressors from JSON. A linear regression is a single layer
//! with one output and a linear activation; deeper MLPs stack more layers.
//!
//! Shapes are validated once at load so `forward` never indexes out of bounds.

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::Regressor;
use crate::error::{RatecastError, Result};
use crate::features::FeatureRow;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activation {
    #[default]
    Linear,
    Relu,
    Tanh,
    Sigmoid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DenseLayer {
    /// Weights shape: [out_dim][in_dim]
    pub weights: Vec<Vec<f64>>,
    /// Bias shape: [out_dim]
    pub bias: Vec<f64>,
    #[serde(default)]
    pub activation: Activation,
}

impl DenseLayer {
    fn out_dim(&self) -> usize {
        self.weights.len()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DenseNetwork {
    /// Expected input dimension.
    pub input_dim: usize,

    /// Column names in training order.
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,

    /// Optional z-score normalization.
    #[serde(default)]
    pub input_mean: Option<Vec<f64>>,
    #[serde(default)]
    pub input_std: Option<Vec<f64>>,

    pub layers: Vec<DenseLayer>,

    /// Optional free-form metadata (versioning, training info, etc).
    #[serde(default)]
    pub metadata: serde_json::Value,
}

impl DenseNetwork {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| RatecastError::load(path, e))?;
        let model: Self = serde_json::from_str(&content)
            .map_err(|e| RatecastError::load(path, format!("invalid dense model: {e}")))?;
        model.validate().map_err(|e| RatecastError::load(path, e))?;
        Ok(model)
    }

    /// Single-layer linear regressor `y = w . x + b`.
    pub fn linear(weights: Vec<f64>, bias: f64) -> Self {
        Self {
            input_dim: weights.len(),
            feature_names: None,
            input_mean: None,
            input_std: None,
            layers: vec![DenseLayer {
                weights: vec![weights],
                bias: vec![bias],
                activation: Activation::Linear,
            }],
            metadata: serde_json::Value::Null,
        }
    }

    pub fn with_feature_names(mut self, names: Vec<String>) -> Self {
        self.feature_names = Some(names);
        self
    }

    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.input_dim == 0 {
            return Err("input_dim must be > 0".to_string());
        }
        if self.layers.is_empty() {
            return Err("layers must not be empty".to_string());
        }
        if let Some(names) = &self.feature_names {
            if names.len() != self.input_dim {
                return Err(format!(
                    "feature_names length {} != input_dim {}",
                    names.len(),
                    self.input_dim
                ));
            }
        }
        match (&self.input_mean, &self.input_std) {
            (Some(mean), Some(std)) => {
                if mean.len() != self.input_dim {
                    return Err(format!(
                        "input_mean length {} != input_dim {}",
                        mean.len(),
                        self.input_dim
                    ));
                }
                if std.len() != self.input_dim {
                    return Err(format!(
                        "input_std length {} != input_dim {}",
                        std.len(),
                        self.input_dim
                    ));
                }
                if std.iter().any(|v| !v.is_finite() || *v <= 0.0) {
                    return Err("input_std must be finite and > 0".to_string());
                }
            }
            (None, None) => {}
            _ => return Err("input_mean and input_std must be provided together".to_string()),
        }

        let mut expected_in = self.input_dim;
        for (idx, layer) in self.layers.iter().enumerate() {
            if layer.out_dim() == 0 {
                return Err(format!("layer[{idx}] out_dim must be > 0"));
            }
            if layer.bias.len() != layer.out_dim() {
                return Err(format!(
                    "layer[{idx}] bias len {} != out_dim {}",
                    layer.bias.len(),
                    layer.out_dim()
                ));
            }
            for (r, row) in layer.weights.iter().enumerate() {
                if row.len() != expected_in {
                    return Err(format!(
                        "layer[{idx}] weights row {r} len {} != expected in_dim {expected_in}",
                        row.len()
                    ));
                }
                if row.iter().any(|v| !v.is_finite()) {
                    return Err(format!("layer[{idx}] weights contain non-finite values"));
                }
            }
            if layer.bias.iter().any(|v| !v.is_finite()) {
                return Err(format!("layer[{idx}] bias contain non-finite values"));
            }
            expected_in = layer.out_dim();
        }

        if expected_in != 1 {
            return Err(format!(
                "regressor must have a single output, last layer has {expected_in}"
            ));
        }
        Ok(())
    }

    pub fn forward_scalar(&self, input: &[f64]) -> Result<f64> {
        if input.len() != self.input_dim {
            return Err(RatecastError::SchemaMismatch(format!(
                "dense model expects {} columns, got {}",
                self.input_dim,
                input.len()
            )));
        }

        let mut x: Vec<f64> = input.to_vec();

        if let (Some(mean), Some(std)) = (&self.input_mean, &self.input_std) {
            for (i, v) in x.iter_mut().enumerate() {
                *v = (*v - mean[i]) / std[i].max(1e-12);
            }
        }

        for layer in &self.layers {
            x = layer
                .weights
                .iter()
                .zip(&layer.bias)
                .map(|(row, b)| {
                    let sum = row.iter().zip(&x).fold(*b, |acc, (w, v)| acc + w * v);
                    apply_activation(sum, layer.activation)
                })
                .collect();
        }

        // validate() guarantees a single output
        Ok(x[0])
    }
}

impl Regressor for DenseNetwork {
    fn predict(&self, rows: &[FeatureRow]) -> Result<Vec<f64>> {
        rows.iter().map(|row| self.forward_scalar(row.values())).collect()
    }

    fn input_dim(&self) -> Option<usize> {
        Some(self.input_dim)
    }

    fn feature_names(&self) -> Option<Vec<String>> {
        self.feature_names.clone()
    }

    fn kind(&self) -> &'static str {
        "dense"
    }
}

fn apply_activation(x: f64, act: Activation) -> f64 {
    match act {
        Activation::Linear => x,
        Activation::Relu => x.max(0.0),
        Activation::Tanh => x.tanh(),
        Activation::Sigmoid => sigmoid(x),
    }
}

fn sigmoid(x: f64) -> f64 {
    // Numerically-stable sigmoid.
    if x >= 0.0 {
        let z = (-x).exp();
        1.0 / (1.0 + z)
    } else {
        let z = x.exp();
        z / (1.0 + z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::FeatureSchema;

    #[test]
    fn linear_regressor_is_dot_plus_bias() {
        let net = DenseNetwork::linear(vec![1.0, 2.0, -0.5], 0.25);
        net.validate().unwrap();

        let y = net.forward_scalar(&[1.0, 1.0, 2.0]).unwrap();
        assert!((y - 2.25).abs() < 1e-12);
    }

    #[test]
    fn hidden_layer_with_relu() {
        let net = DenseNetwork {
            input_dim: 2,
            feature_names: None,
            input_mean: None,
            input_std: None,
            layers: vec![
                DenseLayer {
                    weights: vec![vec![1.0, 0.0], vec![0.0, -1.0]],
                    bias: vec![0.0, 0.0],
                    activation: Activation::Relu,
                },
                DenseLayer {
                    weights: vec![vec![1.0, 1.0]],
                    bias: vec![0.5],
                    activation: Activation::Linear,
                },
            ],
            metadata: serde_json::json!({}),
        };
        net.validate().unwrap();

        // relu(3) + relu(-2) + 0.5
        let y = net.forward_scalar(&[3.0, 2.0]).unwrap();
        assert!((y - 3.5).abs() < 1e-12);
    }

    #[test]
    fn normalization_is_applied_before_layers() {
        let mut net = DenseNetwork::linear(vec![1.0], 0.0);
        net.input_mean = Some(vec![10.0]);
        net.input_std = Some(vec![2.0]);
        net.validate().unwrap();

        let y = net.forward_scalar(&[14.0]).unwrap();
        assert!((y - 2.0).abs() < 1e-12);
    }

    #[test]
    fn validates_shapes() {
        let bad = DenseNetwork {
            input_dim: 3,
            feature_names: None,
            input_mean: None,
            input_std: None,
            layers: vec![DenseLayer {
                weights: vec![vec![1.0, 2.0]], // in_dim mismatch
                bias: vec![0.0],
                activation: Activation::Linear,
            }],
            metadata: serde_json::json!({}),
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn rejects_multi_output() {
        let bad = DenseNetwork {
            input_dim: 1,
            feature_names: None,
            input_mean: None,
            input_std: None,
            layers: vec![DenseLayer {
                weights: vec![vec![1.0], vec![2.0]],
                bias: vec![0.0, 0.0],
                activation: Activation::Linear,
            }],
            metadata: serde_json::Value::Null,
        };
        let err = bad.validate().unwrap_err();
        assert!(err.contains("single output"));
    }

    #[test]
    fn feature_names_must_match_width() {
        let net = DenseNetwork::linear(vec![1.0, 2.0], 0.0).with_feature_names(vec!["a".into()]);
        assert!(net.validate().is_err());
    }

    #[test]
    fn predict_keeps_row_order() {
        let schema = FeatureSchema::years(2000..=2001);
        let net = DenseNetwork::linear(vec![1.0, 0.0], 0.0);
        let rows = vec![
            schema.row_from_values(vec![3.0, 9.0]).unwrap(),
            schema.row_from_values(vec![1.0, 9.0]).unwrap(),
            schema.row_from_values(vec![2.0, 9.0]).unwrap(),
        ];
        assert_eq!(net.predict(&rows).unwrap(), vec![3.0, 1.0, 2.0]);
    }

    #[test]
    fn from_file_reports_invalid_shapes_as_load_error() {
        let tmp = tempfile::tempdir().expect("tmpdir");
        let path = tmp.path().join("model.json");
        std::fs::write(&path, r#"{"input_dim": 0, "layers": []}"#).expect("write");

        let err = DenseNetwork::from_file(&path).unwrap_err();
        assert!(matches!(err, RatecastError::Load { .. }));
        assert!(err.to_string().contains("input_dim"));
    }
}
