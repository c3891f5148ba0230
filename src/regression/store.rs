//! Process-wide registry of loaded models

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use tracing::{info, instrument};

use super::{CatBoostRegressor, Regressor};
use crate::error::ForecastError;
use crate::features::FeatureVector;
use crate::models::Target;

/// Extension of model artifacts inside the model directory
pub const MODEL_EXTENSION: &str = "json";

/// Immutable set of models, exactly one per [`Target`].
///
/// Built once at startup and shared read-only between requests.
pub struct ModelStore {
    models: BTreeMap<Target, Box<dyn Regressor>>,
}

impl ModelStore {
    /// Load `<dir>/<target>.json` for every target
    #[instrument(skip_all, fields(dir = %dir.as_ref().display()))]
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, ForecastError> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(ForecastError::startup(format!(
                "Model directory {} does not exist",
                dir.display()
            )));
        }

        let mut models: Vec<(Target, Box<dyn Regressor>)> = Vec::with_capacity(Target::COUNT);
        for target in Target::ALL {
            let path = dir.join(format!("{target}.{MODEL_EXTENSION}"));
            let model = CatBoostRegressor::load(&path)?;
            info!(
                target = %target,
                trees = model.tree_count(),
                "Loaded model from {}",
                path.display()
            );
            models.push((target, Box::new(model)));
        }

        Self::from_models(models)
    }

    /// Build a store from already constructed models
    pub fn from_models(
        models: impl IntoIterator<Item = (Target, Box<dyn Regressor>)>,
    ) -> Result<Self, ForecastError> {
        let mut by_target = BTreeMap::new();
        for (target, model) in models {
            if by_target.insert(target, model).is_some() {
                return Err(ForecastError::startup(format!(
                    "Model for {target} supplied more than once"
                )));
            }
        }

        if let Some(missing) = Target::ALL.iter().find(|t| !by_target.contains_key(*t)) {
            return Err(ForecastError::startup(format!("No model for {missing}")));
        }

        Ok(Self { models: by_target })
    }

    /// Loaded targets in [`Target::ALL`] order
    pub fn targets(&self) -> impl Iterator<Item = Target> + '_ {
        self.models.keys().copied()
    }

    /// Run one target's model over a feature matrix
    pub fn predict(&self, target: Target, rows: &[FeatureVector]) -> Result<Vec<f64>, ForecastError> {
        let model = self
            .models
            .get(&target)
            .ok_or_else(|| ForecastError::prediction(format!("No model loaded for {target}")))?;

        let predictions = model.predict(rows);
        if predictions.len() != rows.len() {
            return Err(ForecastError::prediction(format!(
                "Model {target} returned {} predictions for {} rows",
                predictions.len(),
                rows.len()
            )));
        }
        Ok(predictions)
    }
}

impl fmt::Debug for ModelStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelStore")
            .field("targets", &self.models.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
pub(crate) mod stubs {
    use super::*;

    /// Predicts `base + temperature` for every row
    pub struct LinearStub {
        pub base: f64,
    }

    impl Regressor for LinearStub {
        fn predict(&self, rows: &[FeatureVector]) -> Vec<f64> {
            rows.iter()
                .map(|row| self.base + row.apparent_temperature_mean)
                .collect()
        }
    }

    /// Always returns a single value regardless of input size
    pub struct TruncatingStub;

    impl Regressor for TruncatingStub {
        fn predict(&self, _rows: &[FeatureVector]) -> Vec<f64> {
            vec![1.0]
        }
    }

    /// Store whose target `i` predicts `i * 10 + temperature`
    pub fn linear_store() -> ModelStore {
        ModelStore::from_models(Target::ALL.map(|target| {
            let model: Box<dyn Regressor> = Box::new(LinearStub {
                base: target.index() as f64 * 10.0,
            });
            (target, model)
        }))
        .unwrap()
    }
}
