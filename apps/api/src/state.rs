use std::sync::Arc;

use crate::config::Config;
use crate::export::Exporter;
use crate::tailoring::ResumeTailor;

/// Shared application state injected into all route handlers via Axum extractors.
/// Everything here is read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Renderer for all export formats, configured with the heading policy.
    pub exporter: Arc<Exporter>,
    /// Tailoring backend. `None` when no model API key is configured.
    pub tailor: Option<Arc<dyn ResumeTailor>>,
}
