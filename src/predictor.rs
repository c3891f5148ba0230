//! Runs every target's model over a week of features

use tracing::debug;

use crate::error::ForecastError;
use crate::features::FeatureVector;
use crate::models::Target;
use crate::regression::ModelStore;

/// Raw (unrounded) predictions for one day, indexed by [`Target::index`]
pub type DayPredictions = [f64; Target::COUNT];

/// Apply all six models to the feature matrix.
///
/// Returns one row per input day. Any model failure fails the whole batch.
pub fn predict_all(
    store: &ModelStore,
    rows: &[FeatureVector],
) -> Result<Vec<DayPredictions>, ForecastError> {
    let mut per_day = vec![[0.0; Target::COUNT]; rows.len()];

    for target in Target::ALL {
        let column = store.predict(target, rows)?;
        debug!(target = %target, values = ?column, "Model predictions");
        for (day, value) in per_day.iter_mut().zip(column) {
            day[target.index()] = value;
        }
    }

    Ok(per_day)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regression::store::stubs::linear_store;

    fn row(temp: f64) -> FeatureVector {
        FeatureVector {
            is_friday: 0.0,
            apparent_temperature_mean: temp,
            precipitation_sum: 0.0,
            shortwave_radiation_sum: 0.0,
        }
    }

    #[test]
    fn test_predict_all_shapes_output_by_day() {
        let store = linear_store();
        let predictions = predict_all(&store, &[row(1.5), row(2.0), row(-1.0)]).unwrap();

        assert_eq!(predictions.len(), 3);
        assert_eq!(predictions[0], [1.5, 11.5, 21.5, 31.5, 41.5, 51.5]);
        assert_eq!(predictions[2][Target::FruitBeer.index()], 49.0);
    }

    #[test]
    fn test_predict_all_keeps_full_precision() {
        let store = linear_store();
        let predictions = predict_all(&store, &[row(0.123_456)]).unwrap();
        assert_eq!(predictions[0][Target::PaleAle.index()], 0.123_456);
    }

    #[test]
    fn test_predict_all_empty_matrix() {
        let store = linear_store();
        assert!(predict_all(&store, &[]).unwrap().is_empty());
    }
}
