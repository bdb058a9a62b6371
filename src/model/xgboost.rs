//! XGBoost JSON model support (`Booster.save_model("model.json")`).
//!
//! Only regression objectives with a single output are accepted. Tree
//! ensembles (`gbtree`, `dart`) and linear boosters (`gblinear`) are converted
//! into a compact in-memory form at load time and validated there, so
//! prediction never has to bounds-check node links.

use std::path::Path;

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use serde_with::{serde_as, DisplayFromStr};

use super::Regressor;
use crate::error::{RatecastError, Result};
use crate::features::FeatureRow;

// --- On-disk layout (subset of the XGBoost JSON schema) -----------------------------

#[derive(Debug, Deserialize)]
struct XgbModel {
    learner: Learner,
}

#[derive(Debug, Deserialize)]
struct Learner {
    #[serde(default)]
    feature_names: Vec<String>,
    gradient_booster: GradientBooster,
    objective: Objective,
    learner_model_param: LearnerModelParam,
}

#[derive(Debug, Deserialize)]
struct Objective {
    name: String,
}

#[serde_as]
#[derive(Debug, Deserialize)]
struct LearnerModelParam {
    #[serde(deserialize_with = "deserialize_base_score")]
    base_score: f64,
    #[serde_as(as = "DisplayFromStr")]
    #[serde(default)]
    num_class: i64,
    #[serde_as(as = "DisplayFromStr")]
    num_feature: i64,
    #[serde_as(as = "DisplayFromStr")]
    #[serde(default = "default_num_target")]
    num_target: i64,
}

fn default_num_target() -> i64 {
    1
}

#[derive(Debug, Deserialize)]
#[serde(tag = "name", rename_all = "lowercase")]
enum GradientBooster {
    Gbtree { model: ModelTrees },
    Gblinear { model: GbLinearModel },
    Dart { gbtree: GbTreeDefinition, weight_drop: Vec<f64> },
}

#[derive(Debug, Deserialize)]
struct GbTreeDefinition {
    model: ModelTrees,
}

#[derive(Debug, Deserialize)]
struct ModelTrees {
    trees: Vec<Tree>,
}

#[derive(Debug, Deserialize)]
struct GbLinearModel {
    weights: Vec<f64>,
}

#[derive(Debug, Deserialize)]
struct Tree {
    base_weights: Vec<f64>,
    left_children: Vec<i32>,
    right_children: Vec<i32>,
    split_indices: Vec<i64>,
    split_conditions: Vec<f32>,
    #[serde(deserialize_with = "deserialize_flags")]
    default_left: Vec<bool>,
}

/// `base_score` appears as a number, a string (`"0.5"`, `"[5E-1]"`), or a
/// one-element array depending on the XGBoost version.
fn deserialize_base_score<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error as _;

    let mut cur = Value::deserialize(deserializer)?;
    loop {
        match cur {
            Value::Number(n) => {
                return n.as_f64().ok_or_else(|| D::Error::custom("invalid base_score"));
            }
            Value::String(s) => {
                let t = s.trim().trim_start_matches('[').trim_end_matches(']');
                return t.parse::<f64>().map_err(|_| {
                    D::Error::custom(format!("cannot parse base_score from {s:?}"))
                });
            }
            Value::Array(arr) => match arr.into_iter().next() {
                Some(first) => cur = first,
                None => return Err(D::Error::custom("empty base_score array")),
            },
            _ => return Err(D::Error::custom("base_score must be number, string, or array")),
        }
    }
}

/// Flags stored as booleans or as 0/1 integers.
fn deserialize_flags<'de, D>(deserializer: D) -> std::result::Result<Vec<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error as _;

    Vec::<Value>::deserialize(deserializer)?
        .into_iter()
        .map(|v| match v {
            Value::Bool(b) => Ok(b),
            Value::Number(n) => Ok(n.as_f64().map(|f| f != 0.0).unwrap_or(false)),
            other => Err(D::Error::custom(format!("invalid flag {other}"))),
        })
        .collect()
}

// --- In-memory model --------------------------------------------------------------

/// Transform from the summed margin to the prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Link {
    Identity,
    Exp,
    Logistic,
}

impl Link {
    fn for_objective(name: &str) -> std::result::Result<Self, String> {
        match name {
            "reg:squarederror" | "reg:linear" | "reg:pseudohubererror" | "reg:squaredlogerror"
            | "reg:absoluteerror" | "reg:quantileerror" => Ok(Self::Identity),
            "reg:gamma" | "reg:tweedie" | "count:poisson" => Ok(Self::Exp),
            "reg:logistic" => Ok(Self::Logistic),
            other => Err(format!("objective {other:?} is not a supported regression objective")),
        }
    }

    /// Base score is stored in output space; prediction starts from margin space.
    fn to_margin(self, base_score: f64) -> f64 {
        match self {
            Self::Identity => base_score,
            Self::Exp => base_score.max(1e-7).ln(),
            Self::Logistic => {
                let p = base_score.clamp(1e-7, 1.0 - 1e-7);
                (p / (1.0 - p)).ln()
            }
        }
    }

    fn apply(self, margin: f64) -> f64 {
        match self {
            Self::Identity => margin,
            Self::Exp => margin.exp(),
            Self::Logistic => 1.0 / (1.0 + (-margin).exp()),
        }
    }
}

#[derive(Debug, Clone)]
struct Node {
    /// -1 for leaves
    left: i32,
    right: i32,
    feature: usize,
    threshold: f32,
    default_left: bool,
    value: f64,
}

#[derive(Debug, Clone)]
struct RegTree {
    nodes: Vec<Node>,
}

impl RegTree {
    fn from_json(tree: Tree, idx: usize, num_feature: usize) -> std::result::Result<Self, String> {
        let n = tree.left_children.len();
        if n == 0 {
            return Err(format!("tree {idx} has no nodes"));
        }
        let columns = [
            tree.right_children.len(),
            tree.split_indices.len(),
            tree.split_conditions.len(),
            tree.default_left.len(),
            tree.base_weights.len(),
        ];
        if columns.iter().any(|len| *len != n) {
            return Err(format!("tree {idx} has node arrays of different lengths"));
        }

        let mut nodes = Vec::with_capacity(n);
        for i in 0..n {
            let (left, right) = (tree.left_children[i], tree.right_children[i]);
            let is_leaf = left == -1;
            if !is_leaf {
                for child in [left, right] {
                    if child <= i as i32 || child as usize >= n {
                        return Err(format!(
                            "tree {idx} node {i} references invalid child {child} ({n} nodes)"
                        ));
                    }
                }
            }
            let feature = tree.split_indices[i];
            if !is_leaf && (feature < 0 || feature as usize >= num_feature) {
                return Err(format!(
                    "tree {idx} node {i} splits on feature {feature}, model has {num_feature}"
                ));
            }
            nodes.push(Node {
                left,
                right,
                feature: feature.max(0) as usize,
                threshold: tree.split_conditions[i],
                default_left: tree.default_left[i],
                value: tree.base_weights[i],
            });
        }
        Ok(Self { nodes })
    }

    fn leaf_value(&self, x: &[f64]) -> f64 {
        let mut idx = 0usize;
        loop {
            let node = &self.nodes[idx];
            if node.left == -1 {
                return node.value;
            }
            let v = x[node.feature];
            let go_left = if v.is_nan() {
                node.default_left
            } else {
                (v as f32) < node.threshold
            };
            let next = if go_left { node.left } else { node.right };
            idx = next as usize;
        }
    }
}

#[derive(Debug, Clone)]
enum Booster {
    Trees { trees: Vec<RegTree>, weights: Vec<f64> },
    Linear { weights: Vec<f64>, bias: f64 },
}

/// Regressor backed by an XGBoost JSON model.
#[derive(Debug, Clone)]
pub struct XgbRegressor {
    booster: Booster,
    base_margin: f64,
    link: Link,
    num_feature: usize,
    feature_names: Vec<String>,
}

impl XgbRegressor {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| RatecastError::load(path, e))?;
        Self::from_json_str(&content).map_err(|e| RatecastError::load(path, e))
    }

    pub fn from_json_str(content: &str) -> std::result::Result<Self, String> {
        let model: XgbModel =
            serde_json::from_str(content).map_err(|e| format!("invalid XGBoost model: {e}"))?;
        let learner = model.learner;
        let params = learner.learner_model_param;

        if params.num_class > 1 || params.num_target > 1 {
            return Err(format!(
                "only single-output regression is supported (num_class={}, num_target={})",
                params.num_class, params.num_target
            ));
        }
        if params.num_feature <= 0 {
            return Err("num_feature must be > 0".to_string());
        }
        let num_feature = params.num_feature as usize;

        if !learner.feature_names.is_empty() && learner.feature_names.len() != num_feature {
            return Err(format!(
                "feature_names length {} != num_feature {num_feature}",
                learner.feature_names.len()
            ));
        }

        let link = Link::for_objective(&learner.objective.name)?;

        let booster = match learner.gradient_booster {
            GradientBooster::Gbtree { model } => Booster::Trees {
                weights: vec![1.0; model.trees.len()],
                trees: convert_trees(model.trees, num_feature)?,
            },
            GradientBooster::Dart { gbtree, weight_drop } => {
                if weight_drop.len() != gbtree.model.trees.len() {
                    return Err(format!(
                        "dart weight_drop has {} entries for {} trees",
                        weight_drop.len(),
                        gbtree.model.trees.len()
                    ));
                }
                Booster::Trees {
                    trees: convert_trees(gbtree.model.trees, num_feature)?,
                    weights: weight_drop,
                }
            }
            GradientBooster::Gblinear { model } => {
                // Layout: one weight per feature, then the bias.
                if model.weights.len() != num_feature + 1 {
                    return Err(format!(
                        "gblinear expects {} weights, got {}",
                        num_feature + 1,
                        model.weights.len()
                    ));
                }
                let mut weights = model.weights;
                let bias = weights.pop().unwrap_or(0.0);
                Booster::Linear { weights, bias }
            }
        };

        Ok(Self {
            booster,
            base_margin: link.to_margin(params.base_score),
            link,
            num_feature,
            feature_names: learner.feature_names,
        })
    }

    pub fn num_trees(&self) -> usize {
        match &self.booster {
            Booster::Trees { trees, .. } => trees.len(),
            Booster::Linear { .. } => 0,
        }
    }

    fn predict_one(&self, x: &[f64]) -> Result<f64> {
        if x.len() != self.num_feature {
            return Err(RatecastError::SchemaMismatch(format!(
                "XGBoost model expects {} columns, got {}",
                self.num_feature,
                x.len()
            )));
        }

        let contribution = match &self.booster {
            Booster::Trees { trees, weights } => trees
                .iter()
                .zip(weights)
                .map(|(tree, w)| tree.leaf_value(x) * w)
                .sum::<f64>(),
            Booster::Linear { weights, bias } => {
                // Missing values contribute nothing, as in XGBoost's linear updater.
                weights
                    .iter()
                    .zip(x)
                    .filter(|(_, v)| !v.is_nan())
                    .map(|(w, v)| w * v)
                    .sum::<f64>()
                    + bias
            }
        };

        Ok(self.link.apply(self.base_margin + contribution))
    }
}

fn convert_trees(trees: Vec<Tree>, num_feature: usize) -> std::result::Result<Vec<RegTree>, String> {
    trees
        .into_iter()
        .enumerate()
        .map(|(idx, tree)| RegTree::from_json(tree, idx, num_feature))
        .collect()
}

impl Regressor for XgbRegressor {
    fn predict(&self, rows: &[FeatureRow]) -> Result<Vec<f64>> {
        rows.iter().map(|row| self.predict_one(row.values())).collect()
    }

    fn input_dim(&self) -> Option<usize> {
        Some(self.num_feature)
    }

    fn feature_names(&self) -> Option<Vec<String>> {
        if self.feature_names.is_empty() {
            None
        } else {
            Some(self.feature_names.clone())
        }
    }

    fn kind(&self) -> &'static str {
        match self.booster {
            Booster::Trees { .. } => "xgboost-gbtree",
            Booster::Linear { .. } => "xgboost-gblinear",
        }
    }
}
