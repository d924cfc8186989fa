//! Navigation API endpoint.
//!
//! Returns the sidebar navigation tree with route paths attached to
//! every document node.

use std::collections::HashMap;
use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use serde::Serialize;
use waymark_site::{MatchMode, NavNode, NavTree};

use crate::error::ServerError;
use crate::state::AppState;

/// Response for GET /api/navigation.
#[derive(Serialize)]
pub(crate) struct NavigationResponse {
    /// Navigation tree items.
    items: Vec<NavItem>,
}

/// Nested navigation item.
#[derive(Serialize)]
pub(crate) struct NavItem {
    /// Navigation key.
    key: String,
    /// Display label.
    label: String,
    /// Route path (absent for categories, which do not resolve).
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<String>,
    /// Child items, in sidebar order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    children: Vec<NavItem>,
}

/// Handle GET /api/navigation.
pub(crate) async fn get_navigation(
    State(state): State<Arc<AppState>>,
) -> Result<Json<NavigationResponse>, ServerError> {
    let map = state.router.reload_if_needed()?;

    // Paths come from the route table, so the sidebar links to exactly
    // what resolves
    let paths: HashMap<&str, &str> = map
        .table
        .entries()
        .iter()
        .filter(|entry| entry.match_mode == MatchMode::Exact)
        .map(|entry| (entry.target.as_str(), entry.path.as_str()))
        .collect();

    let items = map
        .nav
        .root_nodes()
        .into_iter()
        .map(|node| build_item(&map.nav, node, &paths))
        .collect();

    Ok(Json(NavigationResponse { items }))
}

/// Build one navigation item and its subtree.
fn build_item(tree: &NavTree, node: &NavNode, paths: &HashMap<&str, &str>) -> NavItem {
    NavItem {
        key: node.key.clone(),
        label: node.label.clone(),
        path: paths.get(node.key.as_str()).map(|&path| path.to_string()),
        children: tree
            .children_of(&node.key)
            .into_iter()
            .map(|child| build_item(tree, child, paths))
            .collect(),
    }
}
