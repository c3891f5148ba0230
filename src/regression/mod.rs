//! Pretrained regression models
//!
//! This module provides model loading and inference:
//! - [`Regressor`]: the inference seam every model implements
//! - [`CatBoostRegressor`]: oblivious-tree ensembles from CatBoost JSON exports
//! - [`ModelStore`]: one loaded model per [`crate::models::Target`]

pub mod catboost;
pub mod store;

pub use catboost::CatBoostRegressor;
pub use store::ModelStore;

use crate::features::FeatureVector;

/// A trained model mapping feature rows to one real-valued prediction each
pub trait Regressor: Send + Sync {
    /// Predict every row, returning one value per row in the same order
    fn predict(&self, rows: &[FeatureVector]) -> Vec<f64>;
}
