//! Pages API endpoint.
//!
//! Resolves a requested URL path against the route table and returns the
//! matched route together with the sidebar trail leading to it.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::IntoResponse;
use md5::{Digest, Md5};
use serde::Serialize;
use waymark_site::{MatchMode, RouteEntry, SiteMap};

use crate::error::ServerError;
use crate::handlers::to_url_path;
use crate::state::AppState;

/// Response for GET /api/pages/{path}.
#[derive(Serialize)]
struct PageResponse {
    /// Matched route entry.
    route: RouteEntry,
    /// Sidebar trail from root category to the resolved document.
    trail: Vec<TrailItem>,
}

/// Trail item for serialization.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TrailItem {
    /// Navigation key.
    key: String,
    /// Display label.
    label: String,
    /// Route path (absent for categories, which do not resolve).
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<String>,
}

/// Handle GET /api/pages/ (root page).
pub(crate) async fn get_root_page(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ServerError> {
    get_page_impl(String::new(), state, headers)
}

/// Handle GET /api/pages/{path}.
pub(crate) async fn get_page(
    Path(path): Path<String>,
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ServerError> {
    get_page_impl(path, state, headers)
}

/// Shared implementation for page resolution.
#[allow(clippy::needless_pass_by_value)]
fn get_page_impl(
    path: String,
    state: Arc<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ServerError> {
    let map = state.router.reload_if_needed()?;

    // Resolution is total: unknown paths land on the wildcard entry
    let entry = map.table.resolve(&to_url_path(&path));
    let status = match entry.match_mode {
        MatchMode::Exact => StatusCode::OK,
        MatchMode::Wildcard => StatusCode::NOT_FOUND,
    };

    let trail = match entry.match_mode {
        MatchMode::Exact => trail_for(&map, &entry.target),
        MatchMode::Wildcard => Vec::new(),
    };

    let response = PageResponse {
        route: entry.clone(),
        trail,
    };

    // Compute ETag
    let etag = compute_etag(
        &state.config.version,
        &serde_json::to_string(&response).unwrap_or_default(),
    );

    // Check If-None-Match header for conditional request
    if let Some(if_none_match) = headers.get(header::IF_NONE_MATCH)
        && if_none_match.as_bytes() == etag.as_bytes()
    {
        return Ok(StatusCode::NOT_MODIFIED.into_response());
    }

    Ok((
        status,
        [
            (header::ETAG, etag),
            (header::CACHE_CONTROL, "private, max-age=60".to_string()),
        ],
        Json(response),
    )
        .into_response())
}

/// Build the sidebar trail for a resolved document target.
///
/// Standalone pages have no sidebar position and get an empty trail.
fn trail_for(map: &SiteMap, target: &str) -> Vec<TrailItem> {
    let Some(nodes) = map.nav.find_path(target) else {
        return Vec::new();
    };

    nodes
        .into_iter()
        .map(|node| TrailItem {
            key: node.key.clone(),
            label: node.label.clone(),
            path: map
                .table
                .entries()
                .iter()
                .find(|entry| {
                    entry.match_mode == MatchMode::Exact && entry.target == node.key
                })
                .map(|entry| entry.path.clone()),
        })
        .collect()
}

/// Compute `ETag` from version and content.
///
/// Uses MD5 hash truncated to 64 bits (16 hex chars) - sufficient for
/// cache validation with negligible collision probability.
fn compute_etag(version: &str, content: &str) -> String {
    let hash = Md5::digest(format!("{version}:{content}").as_bytes());
    format!("\"{}\"", &hex::encode(hash)[..16])
}

#[cfg(test)]
mod tests {
    use waymark_site::{
        RouteOptions, SidebarSpec, SiteRouter, SiteSpec, StandalonePage, StaticSpecSource,
    };

    use super::*;
    use crate::ServerConfig;

    const SIDEBAR_YAML: &str = "
name: docs
entries:
  - guide/intro
  - label: Guides
    items:
      - guide/setup
";

    fn test_state() -> Arc<AppState> {
        let spec = SiteSpec {
            sidebar: SidebarSpec::from_yaml(SIDEBAR_YAML).unwrap(),
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

    fn etag_of(response: &axum::response::Response) -> String {
        response
            .headers()
            .get(header::ETAG)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string()
    }

    #[test]
    fn test_resolved_page_returns_ok() {
        let state = test_state();

        let response = get_page_impl("docs/guide/intro".to_string(), state, HeaderMap::new())
            .unwrap()
            .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(header::ETAG));
        assert_eq!(
            response.headers().get(header::CACHE_CONTROL).unwrap(),
            "private, max-age=60"
        );
    }

    #[test]
    fn test_root_page_resolves_standalone_home() {
        let state = test_state();

        let response = get_page_impl(String::new(), state, HeaderMap::new())
            .unwrap()
            .into_response();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn test_unknown_path_returns_not_found() {
        let state = test_state();

        let response = get_page_impl("no/such/page".to_string(), state, HeaderMap::new())
            .unwrap()
            .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_if_none_match_returns_not_modified() {
        let state = test_state();

        let first = get_page_impl(
            "docs/guide/intro".to_string(),
            Arc::clone(&state),
            HeaderMap::new(),
        )
        .unwrap()
        .into_response();
        let etag = etag_of(&first);

        let mut headers = HeaderMap::new();
        headers.insert(header::IF_NONE_MATCH, etag.parse().unwrap());
        let second = get_page_impl("docs/guide/intro".to_string(), state, headers)
            .unwrap()
            .into_response();

        assert_eq!(second.status(), StatusCode::NOT_MODIFIED);
    }

    #[test]
    fn test_trail_includes_category_ancestors() {
        let state = test_state();
        let map = state.router.reload_if_needed().unwrap();

        let trail = trail_for(&map, "guide/setup");

        assert_eq!(trail.len(), 2);
        assert_eq!(trail[0].key, "guides");
        assert_eq!(trail[0].path, None);
        assert_eq!(trail[1].key, "guide/setup");
        assert_eq!(trail[1].path.as_deref(), Some("/docs/guide/setup"));
    }

    #[test]
    fn test_trail_empty_for_standalone_target() {
        let state = test_state();
        let map = state.router.reload_if_needed().unwrap();

        assert!(trail_for(&map, "home").is_empty());
    }

    #[test]
    fn test_compute_etag_includes_version() {
        let etag1 = compute_etag("1.0.0", "content");
        let etag2 = compute_etag("1.0.1", "content");

        assert_ne!(etag1, etag2);
    }

    #[test]
    fn test_compute_etag_includes_content() {
        let etag1 = compute_etag("1.0.0", "content1");
        let etag2 = compute_etag("1.0.0", "content2");

        assert_ne!(etag1, etag2);
    }

    #[test]
    fn test_compute_etag_format() {
        let etag = compute_etag("1.0.0", "content");

        assert!(etag.starts_with('"'));
        assert!(etag.ends_with('"'));
        // 16 hex chars + 2 quotes = 18 total
        assert_eq!(etag.len(), 18);
    }

    #[test]
    fn test_trail_item_serialization() {
        let item = TrailItem {
            key: "guides".to_string(),
            label: "Guides".to_string(),
            path: None,
        };

        let json = serde_json::to_value(&item).unwrap();

        assert_eq!(json["key"], "guides");
        assert_eq!(json["label"], "Guides");
        // path should be omitted when None
        assert!(json.get("path").is_none());
    }
}
