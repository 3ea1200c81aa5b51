use axum::{extract::State, Json};
use serde::Serialize;

use crate::api::state::AppState;

pub const STATUS_ONLINE: &str = "Online";
pub const STATUS_MODEL_MISSING: &str = "Modelo no cargado";

/// Liveness and model readiness
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    pub message: &'static str,
}

/// GET / - Service status
///
/// Always 200; `status` tells whether predictions can be served.
pub async fn get_status(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        status: if state.model_ready() {
            STATUS_ONLINE
        } else {
            STATUS_MODEL_MISSING
        },
        message: "Backend de ElectrIA funcionando",
    })
}
