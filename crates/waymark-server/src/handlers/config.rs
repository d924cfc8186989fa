//! Configuration API endpoint.
//!
//! Returns the site shell configuration for the frontend: title, navbar
//! links, and footer groups.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use serde::Serialize;
use waymark_config::LinkConfig;

use crate::state::AppState;

/// Response for GET /api/config.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ConfigResponse {
    /// Site title.
    title: String,
    /// Site tagline.
    tagline: String,
    /// Public site URL.
    url: String,
    /// Base URL path.
    base_url: String,
    /// Navbar links.
    navbar: Vec<LinkResponse>,
    /// Footer contents.
    footer: FooterResponse,
    /// Application version.
    version: String,
}

/// Link item for serialization.
#[derive(Serialize)]
struct LinkResponse {
    /// Display label.
    label: String,
    /// Internal route path.
    #[serde(skip_serializing_if = "Option::is_none")]
    to: Option<String>,
    /// External URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    href: Option<String>,
    /// Navbar position ("left" or "right").
    #[serde(skip_serializing_if = "Option::is_none")]
    position: Option<String>,
}

/// Footer contents for serialization.
#[derive(Serialize)]
struct FooterResponse {
    /// Footer style ("dark" or "light").
    style: String,
    /// Link groups.
    groups: Vec<FooterGroupResponse>,
    /// Copyright line.
    copyright: String,
}

/// Footer link group for serialization.
#[derive(Serialize)]
struct FooterGroupResponse {
    /// Group heading.
    title: String,
    /// Links in the group.
    items: Vec<LinkResponse>,
}

impl From<&LinkConfig> for LinkResponse {
    fn from(link: &LinkConfig) -> Self {
        Self {
            label: link.label.clone(),
            to: link.to.clone(),
            href: link.href.clone(),
            position: link.position.clone(),
        }
    }
}

/// Handle GET /api/config.
pub(crate) async fn get_config(State(state): State<Arc<AppState>>) -> Json<ConfigResponse> {
    let config = &state.config;

    Json(ConfigResponse {
        title: config.site_title.clone(),
        tagline: config.site_tagline.clone(),
        url: config.site_url.clone(),
        base_url: config.base_url.clone(),
        navbar: config.navbar.items.iter().map(LinkResponse::from).collect(),
        footer: FooterResponse {
            style: config.footer.style.clone(),
            groups: config
                .footer
                .groups
                .iter()
                .map(|group| FooterGroupResponse {
                    title: group.title.clone(),
                    items: group.items.iter().map(LinkResponse::from).collect(),
                })
                .collect(),
            copyright: config.footer.copyright.clone(),
        },
        version: config.version.clone(),
    })
}
