//! Application state shared across all handlers.

use std::sync::Arc;

use validuser_auth::ValidationOrchestrator;
use validuser_core::config::AppConfig;

/// Application state passed to every handler via `State<AppState>`.
///
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Token, session, and domain validation.
    pub orchestrator: Arc<ValidationOrchestrator>,
}

impl AppState {
    /// Creates the state from its parts.
    pub fn new(config: Arc<AppConfig>, orchestrator: Arc<ValidationOrchestrator>) -> Self {
        Self {
            config,
            orchestrator,
        }
    }
}
