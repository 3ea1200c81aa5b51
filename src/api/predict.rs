use axum::{extract::rejection::JsonRejection, extract::State, Json};
use chrono::{Datelike, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::{
    api::{error::ApiError, state::AppState},
    config::DefaultsConfig,
    ml::{predict_load, LoadFeatures},
};

/// Prediction inputs; anything left out is filled from the clock or defaults
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PredictRequest {
    pub hour: Option<u32>,
    pub month: Option<u32>,
    pub weekday: Option<u32>,
    pub temperature: Option<f64>,
    pub voltage: Option<f64>,
    pub intensity: Option<f64>,
}

impl PredictRequest {
    pub fn resolve(&self, now: NaiveDateTime, defaults: &DefaultsConfig) -> LoadFeatures {
        LoadFeatures {
            hour: self.hour.unwrap_or_else(|| now.hour()),
            month: self.month.unwrap_or_else(|| now.month()),
            weekday: self
                .weekday
                .unwrap_or_else(|| now.weekday().num_days_from_monday()),
            temperature: self.temperature.unwrap_or(defaults.temperature_c),
            voltage: self.voltage.unwrap_or(defaults.voltage_v),
            intensity: self.intensity.unwrap_or(defaults.intensity_a),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub predicted_load_kw: f64,
    pub inputs: PredictInputs,
}

/// Echo of the inputs that shaped the prediction
#[derive(Debug, Serialize)]
pub struct PredictInputs {
    pub hour: u32,
    pub temperature: f64,
}

/// POST /predict - Predict household load in kW
pub async fn predict(
    State(state): State<AppState>,
    body: Result<Json<PredictRequest>, JsonRejection>,
) -> Result<Json<PredictResponse>, ApiError> {
    // readiness is checked before the body so a missing model always reads as 503
    let artifacts = state.model.as_deref().ok_or(ApiError::ModelNotReady)?;
    let Json(request) = body?;

    let features = request.resolve(state.clock.now(), &state.cfg.defaults);
    let predicted_load_kw = predict_load(artifacts, &features)?;

    tracing::debug!(
        hour = features.hour,
        month = features.month,
        weekday = features.weekday,
        temperature = features.temperature,
        predicted_load_kw,
        "load predicted"
    );

    Ok(Json(PredictResponse {
        predicted_load_kw,
        inputs: PredictInputs {
            hour: features.hour,
            temperature: features.temperature,
        },
    }))
}
