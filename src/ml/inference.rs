//! Load prediction pipeline: scale → regress → inverse-scale → clamp.

use super::{LoadFeatures, ModelArtifacts, ModelError};
use crate::utils::round2;

/// Predicted household load in kW, never negative, rounded to 2 decimals.
pub fn predict_load(artifacts: &ModelArtifacts, features: &LoadFeatures) -> Result<f64, ModelError> {
    let x = artifacts.scaler_x().transform(&features.to_array())?;
    let y_scaled = artifacts.regressor().predict(&x)?;
    let load_kw = artifacts.scaler_y().inverse_scalar(y_scaled)?;

    if !load_kw.is_finite() {
        return Err(ModelError::NonFinite);
    }

    // the regressor is unconstrained; negative load is not physical
    Ok(round2(load_kw.max(0.0)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::{Feature, LinearRegressionModel, StandardScaler};
    use proptest::prelude::*;

    fn canonical() -> Vec<String> {
        Feature::names().into_iter().map(String::from).collect()
    }

    /// Identity input scaling, load = 0.1 * temperature - 0.5 * intensity + 1.0
    fn linear_artifacts() -> ModelArtifacts {
        let regressor =
            LinearRegressionModel::new(canonical(), vec![0.0, 0.0, 0.0, 0.1, 0.0, -0.5], 1.0).unwrap();
        let scaler_x = StandardScaler::new(canonical(), vec![0.0; 6], vec![1.0; 6]).unwrap();
        let scaler_y = StandardScaler::new(vec!["load_kw".to_string()], vec![0.0], vec![1.0]).unwrap();
        ModelArtifacts::new(Box::new(regressor), scaler_x, scaler_y).unwrap()
    }

    fn features(temperature: f64, intensity: f64) -> LoadFeatures {
        LoadFeatures {
            hour: 12,
            month: 6,
            weekday: 2,
            temperature,
            voltage: 230.0,
            intensity,
        }
    }

    #[test]
    fn test_predict_load() {
        let artifacts = linear_artifacts();
        // 0.1 * 25 - 0.5 * 2 + 1
        assert_eq!(predict_load(&artifacts, &features(25.0, 2.0)).unwrap(), 2.5);
    }

    #[test]
    fn test_negative_prediction_clamped() {
        let artifacts = linear_artifacts();
        assert_eq!(predict_load(&artifacts, &features(0.0, 40.0)).unwrap(), 0.0);
    }

    #[test]
    fn test_output_is_inverse_scaled_and_rounded() {
        let regressor = LinearRegressionModel::new(canonical(), vec![0.0; 6], 1.0).unwrap();
        let scaler_x = StandardScaler::new(canonical(), vec![0.0; 6], vec![1.0; 6]).unwrap();
        let scaler_y = StandardScaler::new(vec!["load_kw".to_string()], vec![1.0911], vec![0.9]).unwrap();
        let artifacts = ModelArtifacts::new(Box::new(regressor), scaler_x, scaler_y).unwrap();

        // 1.0 * 0.9 + 1.0911
        assert_eq!(predict_load(&artifacts, &features(20.0, 4.0)).unwrap(), 1.99);
    }

    #[test]
    fn test_non_finite_input_reported() {
        let artifacts = linear_artifacts();
        assert_eq!(
            predict_load(&artifacts, &features(f64::INFINITY, 4.0)),
            Err(ModelError::NonFinite)
        );
    }

    proptest! {
        #[test]
        fn prop_prediction_never_negative(
            hour in 0u32..24,
            month in 1u32..=12,
            weekday in 0u32..7,
            temperature in -30.0f64..50.0,
            voltage in 180.0f64..260.0,
            intensity in 0.0f64..60.0,
        ) {
            let artifacts = linear_artifacts();
            let input = LoadFeatures { hour, month, weekday, temperature, voltage, intensity };
            let kw = predict_load(&artifacts, &input).unwrap();
            prop_assert!(kw >= 0.0);
        }
    }
}
