use crate::analysis::analyzer::Analyzer;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Holds the optional completion client; cheap to clone.
    pub analyzer: Analyzer,
}
