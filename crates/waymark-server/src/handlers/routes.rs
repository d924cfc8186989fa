//! Route manifest and reload endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use serde::Serialize;
use waymark_site::Manifest;

use crate::error::ServerError;
use crate::state::AppState;

/// Response for POST /api/reload.
#[derive(Serialize)]
pub(crate) struct ReloadResponse {
    /// Number of routes in the rebuilt table.
    routes: usize,
}

/// Handle GET /api/routes.
///
/// Returns the full route manifest: every entry plus the flat navigation
/// tables, in the same format `waymark routes` emits.
pub(crate) async fn get_routes(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Manifest>, ServerError> {
    let map = state.router.reload_if_needed()?;
    Ok(Json(Manifest::from_map(&map)))
}

/// Handle POST /api/reload.
///
/// Drops the published site map and rebuilds from the spec source. A failed
/// rebuild returns an error while the previous map keeps serving reads.
pub(crate) async fn reload(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ReloadResponse>, ServerError> {
    state.router.invalidate();
    let map = state.router.rebuild()?;

    tracing::info!(routes = map.table.len(), "Route table rebuilt");
    Ok(Json(ReloadResponse {
        routes: map.table.len(),
    }))
}

#[cfg(test)]
mod tests {
    use waymark_site::{
        RouteOptions, SidebarSpec, SiteRouter, SiteSpec, StandalonePage, StaticSpecSource,
    };

    use super::*;
    use crate::ServerConfig;

    fn test_state() -> Arc<AppState> {
        let spec = SiteSpec {
            sidebar: SidebarSpec::from_yaml("name: docs\nentries:\n  - guide\n").unwrap(),
            pages: vec![StandalonePage::new("/", "home")],
        };
        let router = SiteRouter::new(
            Arc::new(StaticSpecSource::new(spec)),
            RouteOptions::default(),
        );
        Arc::new(AppState {
            router: Arc::new(router),
            config: ServerConfig::default(),
        })
    }

    #[test]
    fn test_manifest_covers_all_entries() {
        let state = test_state();
        let map = state.router.reload_if_needed().unwrap();

        let manifest = Manifest::from_map(&map);

        // guide + home + wildcard
        assert_eq!(manifest.routes.len(), 3);
        assert_eq!(manifest.nav_nodes.len(), 1);
    }

    #[test]
    fn test_reload_response_serialization() {
        let response = ReloadResponse { routes: 7 };
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["routes"], 7);
    }
}
