//! Model artifact loading
//!
//! The regressor and both scalers are read once at startup and validated
//! against the [`Feature`](super::Feature) schema. The result is immutable and
//! shared by reference for the lifetime of the process.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, info};

use super::{check_feature_order, models::RegressorArtifact, ModelError, Regressor, StandardScaler};
use crate::config::ModelConfig;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("artifact not found: {0}")]
    Missing(PathBuf),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid artifact {path}: {source}")]
    Invalid {
        path: PathBuf,
        #[source]
        source: ModelError,
    },
}

/// Regressor plus its input and output scalers
#[derive(Debug)]
pub struct ModelArtifacts {
    regressor: Box<dyn Regressor>,
    scaler_x: StandardScaler,
    scaler_y: StandardScaler,
}

impl ModelArtifacts {
    /// Assembles the triple, rejecting components fitted on a different schema.
    pub fn new(
        regressor: Box<dyn Regressor>,
        scaler_x: StandardScaler,
        scaler_y: StandardScaler,
    ) -> Result<Self, ModelError> {
        check_feature_order("input scaler", scaler_x.feature_names())?;
        check_feature_order("regressor", regressor.input_features())?;
        if scaler_y.len() != 1 {
            return Err(ModelError::Schema(format!(
                "output scaler describes {} values, expected 1",
                scaler_y.len()
            )));
        }
        Ok(Self {
            regressor,
            scaler_x,
            scaler_y,
        })
    }

    pub fn load(cfg: &ModelConfig) -> Result<Self, StoreError> {
        let regressor_path = cfg.regressor_path();
        let scaler_x_path = cfg.scaler_x_path();
        let scaler_y_path = cfg.scaler_y_path();

        let regressor = read_artifact::<RegressorArtifact>(&regressor_path)?
            .build()
            .map_err(|source| StoreError::Invalid {
                path: regressor_path.clone(),
                source,
            })?;
        let scaler_x: StandardScaler = read_artifact(&scaler_x_path)?;
        let scaler_y: StandardScaler = read_artifact(&scaler_y_path)?;

        let artifacts = Self::new(regressor, scaler_x, scaler_y).map_err(|source| StoreError::Invalid {
            path: cfg.dir.clone(),
            source,
        })?;

        info!(
            kind = artifacts.regressor.kind(),
            dir = %cfg.dir.display(),
            "model artifacts loaded"
        );
        Ok(artifacts)
    }

    pub fn regressor(&self) -> &dyn Regressor {
        self.regressor.as_ref()
    }

    pub fn scaler_x(&self) -> &StandardScaler {
        &self.scaler_x
    }

    pub fn scaler_y(&self) -> &StandardScaler {
        &self.scaler_y
    }
}

fn read_artifact<T: DeserializeOwned>(path: &Path) -> Result<T, StoreError> {
    if !path.exists() {
        return Err(StoreError::Missing(path.to_path_buf()));
    }
    debug!(path = %path.display(), "reading model artifact");
    let raw = std::fs::read_to_string(path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| StoreError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
