pub mod breakdown;
pub mod error;
pub mod predict;
pub mod report;
pub mod state;
pub mod status;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

pub use state::AppState;

pub fn router(state: AppState) -> Router {
    let server = state.cfg.server.clone();

    let mut router = Router::new()
        .route("/", get(status::get_status))
        .route("/predict", post(predict::predict))
        .route(
            "/appliance-breakdown",
            get(breakdown::get_appliance_breakdown).post(breakdown::get_appliance_breakdown),
        )
        .route("/generate-report", post(report::generate_report))
        .with_state(state);

    if server.enable_cors {
        // the dashboard is served from its own origin
        router = router.layer(CorsLayer::permissive());
    }

    router
        .layer(
            ServiceBuilder::new()
                .layer(DefaultBodyLimit::max(server.max_body_bytes))
                .layer(TimeoutLayer::new(Duration::from_secs(server.request_timeout_secs))),
        )
        .layer(TraceLayer::new_for_http())
}
