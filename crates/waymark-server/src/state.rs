//! Application state.
//!
//! Shared state for all request handlers.

use std::sync::Arc;

use waymark_site::SiteRouter;

use crate::ServerConfig;

/// Application state shared across all handlers.
pub(crate) struct AppState {
    /// Router holding the current site map.
    pub(crate) router: Arc<SiteRouter>,
    /// Runtime server settings.
    pub(crate) config: ServerConfig,
}
