use axum::Json;

use crate::breakdown::{generate_breakdown, ApplianceConsumption};

/// GET|POST /appliance-breakdown - Simulated per-appliance consumption
pub async fn get_appliance_breakdown() -> Json<Vec<ApplianceConsumption>> {
    let breakdown = generate_breakdown(&mut rand::thread_rng());
    Json(breakdown)
}
