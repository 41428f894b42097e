use std::sync::Arc;

use crate::catalog::Catalog;
use crate::config::Config;
use crate::session::registry::SessionRegistry;
use crate::session::terminator::SessionTerminator;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Read-only after startup.
    pub catalog: Arc<Catalog>,
    pub config: Config,
    pub sessions: SessionRegistry,
    /// Forced sign-out sink. `HttpTerminator` when AUTH_SIGN_OUT_URL is set,
    /// otherwise `LoggingTerminator`.
    pub terminator: Arc<dyn SessionTerminator>,
}
