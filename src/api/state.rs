use std::sync::Arc;

use crate::{clock::Clock, config::Config, ml::ModelArtifacts, report::ReportRenderer};

/// Shared, read-only request context.
#[derive(Clone)]
pub struct AppState {
    pub cfg: Arc<Config>,
    /// `None` when the artifacts failed to load at startup.
    pub model: Option<Arc<ModelArtifacts>>,
    pub clock: Arc<dyn Clock>,
    pub renderer: Arc<ReportRenderer>,
}

impl AppState {
    pub fn new(cfg: Config, model: Option<ModelArtifacts>, clock: Arc<dyn Clock>) -> Self {
        let renderer = Arc::new(ReportRenderer::new(cfg.report.clone()));
        Self {
            cfg: Arc::new(cfg),
            model: model.map(Arc::new),
            clock,
            renderer,
        }
    }

    pub fn model_ready(&self) -> bool {
        self.model.is_some()
    }
}
