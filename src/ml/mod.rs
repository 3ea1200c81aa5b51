//! Load Prediction Model
//!
//! Serving side of the household load regressor:
//! - [`Feature`] fixes the named, ordered input schema shared with training
//! - [`scaler`] standardizes inputs and de-standardizes the output
//! - [`models`] holds the regressor implementations
//! - [`store`] loads and validates the three artifacts at startup
//! - [`inference`] runs the scale → predict → inverse-scale pipeline

use ndarray::Array1;
use serde::{Deserialize, Serialize};
use strum::{EnumCount, EnumIter, IntoEnumIterator, IntoStaticStr};
use thiserror::Error;

pub mod inference;
pub mod models;
pub mod scaler;
pub mod store;

pub use inference::predict_load;
pub use models::{LinearRegressionModel, MlpRegressor, Regressor};
pub use scaler::StandardScaler;
pub use store::{ModelArtifacts, StoreError};

/// Model input columns, in the order the scaler and regressor were fitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, EnumCount, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum Feature {
    Hour,
    Month,
    Weekday,
    Temperature,
    Voltage,
    Intensity,
}

impl Feature {
    pub fn name(self) -> &'static str {
        self.into()
    }

    /// Canonical feature names in fitting order.
    pub fn names() -> Vec<&'static str> {
        Feature::iter().map(Feature::name).collect()
    }
}

/// Checks that `names` lists exactly the canonical features in order.
pub fn check_feature_order(what: &str, names: &[String]) -> Result<(), ModelError> {
    let expected = Feature::names();
    if names.len() != expected.len() || names.iter().zip(&expected).any(|(a, b)| a != b) {
        return Err(ModelError::Schema(format!(
            "{what} features {names:?} do not match expected order {expected:?}"
        )));
    }
    Ok(())
}

/// One resolved model input row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoadFeatures {
    pub hour: u32,
    pub month: u32,
    /// Monday = 0
    pub weekday: u32,
    pub temperature: f64,
    pub voltage: f64,
    pub intensity: f64,
}

impl LoadFeatures {
    pub fn get(&self, feature: Feature) -> f64 {
        match feature {
            Feature::Hour => f64::from(self.hour),
            Feature::Month => f64::from(self.month),
            Feature::Weekday => f64::from(self.weekday),
            Feature::Temperature => self.temperature,
            Feature::Voltage => self.voltage,
            Feature::Intensity => self.intensity,
        }
    }

    pub fn to_array(&self) -> Array1<f64> {
        Feature::iter().map(|f| self.get(f)).collect()
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ModelError {
    #[error("schema mismatch: {0}")]
    Schema(String),

    #[error("dimension mismatch: expected {expected} values, got {actual}")]
    Dimension { expected: usize, actual: usize },

    #[error("model produced a non-finite value")]
    NonFinite,
}
