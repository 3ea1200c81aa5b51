//! Standard (z-score) scaler fitted offline alongside the regressor.

use super::ModelError;
use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// On-disk form of a fitted scaler.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScalerArtifact {
    pub feature_names: Vec<String>,
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "ScalerArtifact")]
pub struct StandardScaler {
    feature_names: Vec<String>,
    mean: Array1<f64>,
    scale: Array1<f64>,
}

impl StandardScaler {
    pub fn new(feature_names: Vec<String>, mean: Vec<f64>, scale: Vec<f64>) -> Result<Self, ModelError> {
        if mean.len() != feature_names.len() || scale.len() != feature_names.len() {
            return Err(ModelError::Schema(format!(
                "scaler has {} feature names but {} means and {} scales",
                feature_names.len(),
                mean.len(),
                scale.len()
            )));
        }
        if mean.iter().chain(&scale).any(|v| !v.is_finite()) {
            return Err(ModelError::Schema("scaler parameters must be finite".to_string()));
        }

        // constant columns were fitted with unit scale
        let scale = Array1::from(scale).mapv(|s| if s.abs() < 1e-12 { 1.0 } else { s });

        Ok(Self {
            feature_names,
            mean: Array1::from(mean),
            scale,
        })
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn len(&self) -> usize {
        self.feature_names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.feature_names.is_empty()
    }

    /// `(x - mean) / scale`
    pub fn transform(&self, x: &Array1<f64>) -> Result<Array1<f64>, ModelError> {
        self.check_dim(x.len())?;
        Ok((x - &self.mean) / &self.scale)
    }

    /// `y * scale + mean`
    pub fn inverse_transform(&self, y: &Array1<f64>) -> Result<Array1<f64>, ModelError> {
        self.check_dim(y.len())?;
        Ok(y * &self.scale + &self.mean)
    }

    /// Inverse transform for a single-output scaler.
    pub fn inverse_scalar(&self, y: f64) -> Result<f64, ModelError> {
        self.check_dim(1)?;
        Ok(y * self.scale[0] + self.mean[0])
    }

    fn check_dim(&self, actual: usize) -> Result<(), ModelError> {
        if actual != self.len() {
            return Err(ModelError::Dimension {
                expected: self.len(),
                actual,
            });
        }
        Ok(())
    }
}

impl TryFrom<ScalerArtifact> for StandardScaler {
    type Error = ModelError;

    fn try_from(artifact: ScalerArtifact) -> Result<Self, Self::Error> {
        Self::new(artifact.feature_names, artifact.mean, artifact.scale)
    }
}
