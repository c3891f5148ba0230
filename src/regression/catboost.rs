//! CatBoost oblivious-tree regressor loaded from a JSON model export
//!
//! Models are produced with `model.save_model(path, format="json")`. Only the
//! parts needed for float-feature regression are read:
//!
//! ```text
//! {
//!   "oblivious_trees": [
//!     { "splits": [{ "float_feature_index": 1, "border": 11.5, "split_type": "FloatFeature" }],
//!       "leaf_values": [0.3, 1.2] }
//!   ],
//!   "scale_and_bias": [1, [4.0]]
//! }
//! ```
//!
//! Split `d` of a tree sets bit `d` of the leaf index when the feature value
//! is strictly greater than the border.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use super::Regressor;
use crate::error::ForecastError;
use crate::features::{FEATURE_COUNT, FEATURE_NAMES, FeatureVector};

/// Deepest tree CatBoost will export
const MAX_TREE_DEPTH: usize = 16;

#[derive(Debug, Deserialize)]
struct ModelJson {
    oblivious_trees: Vec<TreeJson>,
    #[serde(default)]
    scale_and_bias: Option<(f64, BiasJson)>,
}

#[derive(Debug, Deserialize)]
struct TreeJson {
    #[serde(default)]
    splits: Vec<SplitJson>,
    leaf_values: Vec<f64>,
}

#[derive(Debug, Deserialize)]
struct SplitJson {
    float_feature_index: Option<usize>,
    border: Option<f64>,
    #[serde(default = "default_split_type")]
    split_type: String,
}

fn default_split_type() -> String {
    "FloatFeature".to_string()
}

/// Older exports write a bare number, newer ones a per-dimension list
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum BiasJson {
    Scalar(f64),
    PerDimension(Vec<f64>),
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Split {
    feature: usize,
    border: f64,
}

#[derive(Debug, Clone, PartialEq)]
struct ObliviousTree {
    splits: Vec<Split>,
    leaf_values: Vec<f64>,
}

impl ObliviousTree {
    fn leaf_index(&self, features: &[f64; FEATURE_COUNT]) -> usize {
        self.splits
            .iter()
            .enumerate()
            .fold(0, |index, (depth, split)| {
                if features[split.feature] > split.border {
                    index | (1 << depth)
                } else {
                    index
                }
            })
    }

    fn evaluate(&self, features: &[f64; FEATURE_COUNT]) -> f64 {
        self.leaf_values[self.leaf_index(features)]
    }
}

/// Gradient-boosted ensemble of symmetric trees
#[derive(Debug, Clone, PartialEq)]
pub struct CatBoostRegressor {
    trees: Vec<ObliviousTree>,
    scale: f64,
    bias: f64,
}

impl CatBoostRegressor {
    /// Load and validate a JSON model export
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ForecastError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|e| {
            ForecastError::startup(format!("Cannot read model {}: {e}", path.display()))
        })?;
        Self::from_json(&raw)
            .map_err(|e| ForecastError::startup(format!("Corrupt model {}: {e}", path.display())))
    }

    /// Parse a JSON model export held in memory
    pub fn from_json(raw: &str) -> Result<Self, String> {
        let model: ModelJson = serde_json::from_str(raw).map_err(|e| e.to_string())?;

        let trees = model
            .oblivious_trees
            .into_iter()
            .enumerate()
            .map(|(tree_id, tree)| convert_tree(tree_id, tree))
            .collect::<Result<Vec<_>, _>>()?;

        let (scale, bias) = match model.scale_and_bias {
            None => (1.0, 0.0),
            Some((scale, BiasJson::Scalar(bias))) => (scale, bias),
            Some((scale, BiasJson::PerDimension(biases))) => match biases.as_slice() {
                [] => (scale, 0.0),
                [bias] => (scale, *bias),
                _ => {
                    return Err(format!(
                        "expected a single-dimension regressor, got {} bias values",
                        biases.len()
                    ));
                }
            },
        };

        Ok(Self { trees, scale, bias })
    }

    #[must_use]
    pub fn tree_count(&self) -> usize {
        self.trees.len()
    }

    /// Prediction for a single row
    #[must_use]
    pub fn predict_one(&self, features: &FeatureVector) -> f64 {
        let row = features.as_array();
        let sum: f64 = self.trees.iter().map(|tree| tree.evaluate(&row)).sum();
        self.scale * sum + self.bias
    }
}

impl Regressor for CatBoostRegressor {
    fn predict(&self, rows: &[FeatureVector]) -> Vec<f64> {
        rows.iter().map(|row| self.predict_one(row)).collect()
    }
}

fn convert_tree(tree_id: usize, tree: TreeJson) -> Result<ObliviousTree, String> {
    let depth = tree.splits.len();
    if depth > MAX_TREE_DEPTH {
        return Err(format!("tree {tree_id} has depth {depth}, max is {MAX_TREE_DEPTH}"));
    }

    let splits = tree
        .splits
        .into_iter()
        .map(|split| {
            if split.split_type != "FloatFeature" {
                return Err(format!(
                    "tree {tree_id} uses unsupported split type '{}'",
                    split.split_type
                ));
            }
            let feature = split
                .float_feature_index
                .ok_or_else(|| format!("tree {tree_id} has a split without float_feature_index"))?;
            let border = split
                .border
                .ok_or_else(|| format!("tree {tree_id} has a split without border"))?;
            if feature >= FEATURE_COUNT {
                return Err(format!(
                    "tree {tree_id} splits on feature {feature}, model inputs are [{}]",
                    FEATURE_NAMES.join(", ")
                ));
            }
            Ok(Split { feature, border })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let expected_leaves = 1usize << depth;
    if tree.leaf_values.len() != expected_leaves {
        return Err(format!(
            "tree {tree_id} has {} leaf values, expected {expected_leaves}",
            tree.leaf_values.len()
        ));
    }

    Ok(ObliviousTree {
        splits,
        leaf_values: tree.leaf_values,
    })
}
