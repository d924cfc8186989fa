//! HTTP server for the Waymark documentation site.
//!
//! This crate provides a native Rust HTTP server using axum, serving:
//! - API endpoints for page resolution, navigation, and the route manifest
//! - Site shell configuration for the frontend SPA
//! - A reload endpoint that rebuilds the route table from the sidebar spec
//!
//! # Quick Start
//!
//! ```ignore
//! use std::path::PathBuf;
//! use waymark_server::{ServerConfig, run_server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ServerConfig {
//!         host: "127.0.0.1".to_string(),
//!         port: 7878,
//!         sidebar_file: PathBuf::from("sidebar.yaml"),
//!         version: "1.0.0".to_string(),
//!         ..ServerConfig::default()
//!     };
//!
//!     run_server(config).await.unwrap();
//! }
//! ```
//!
//! # Architecture
//!
//! ```text
//! Browser ──HTTP──► Rust axum server (waymark-server)
//!                        │
//!                        ├─► API routes (Rust handlers)
//!                        │       │
//!                        │       └─► Direct call ──► SiteRouter (navigation + route table)
//!                        │
//!                        └─► Security headers / compression (tower-http)
//! ```

mod app;
mod error;
mod handlers;
mod middleware;
mod state;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use state::AppState;
use waymark_config::{FooterConfig, NavbarConfig};
use waymark_site::{FsSpecSource, RouteOptions, SiteRouter, StandalonePage};

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Sidebar spec file the route table is built from.
    pub sidebar_file: PathBuf,
    /// Standalone pages registered outside the sidebar.
    pub pages: Vec<StandalonePage>,
    /// Prefix for document routes.
    pub route_base: String,
    /// Target served by the catch-all route.
    pub not_found_target: String,
    /// Site title shown in the shell.
    pub site_title: String,
    /// Site tagline shown in the shell.
    pub site_tagline: String,
    /// Public site URL.
    pub site_url: String,
    /// Base URL path the site is served under.
    pub base_url: String,
    /// Navbar links.
    pub navbar: NavbarConfig,
    /// Footer link groups.
    pub footer: FooterConfig,
    /// Enable verbose output.
    pub verbose: bool,
    /// Application version (for cache validation).
    pub version: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 7878,
            sidebar_file: PathBuf::from("sidebar.yaml"),
            pages: Vec::new(),
            route_base: "/docs".to_string(),
            not_found_target: "not-found".to_string(),
            site_title: "Documentation".to_string(),
            site_tagline: String::new(),
            site_url: "http://localhost".to_string(),
            base_url: "/".to_string(),
            navbar: NavbarConfig::default(),
            footer: FooterConfig::default(),
            verbose: false,
            version: String::new(),
        }
    }
}

/// Run the server.
///
/// # Arguments
///
/// * `config` - Server configuration
///
/// # Errors
///
/// Returns an error if the initial route table build fails or the server
/// fails to start.
pub async fn run_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    // Create the spec source and routing options from configuration
    let source = FsSpecSource::new(config.sidebar_file.clone(), config.pages.clone());
    let options = RouteOptions {
        route_base: config.route_base.clone(),
        not_found_target: config.not_found_target.clone(),
    };
    let router = Arc::new(SiteRouter::new(Arc::new(source), options));

    // Build the initial site map; a broken sidebar spec fails startup
    // instead of serving an empty table.
    let map = router.rebuild()?;
    tracing::info!(routes = map.table.len(), "Route table built");
    if config.verbose {
        for entry in map.table.entries() {
            tracing::info!(path = %entry.path, target = %entry.target, "Route registered");
        }
    }

    // Create app state
    let state = Arc::new(AppState { router, config: config.clone() });

    // Create router
    let app = app::create_router(state);

    // Bind and run server
    let addr = SocketAddr::from_str(&format!("{}:{}", config.host, config.port))?;
    tracing::info!(address = %addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Wait for shutdown signal (Ctrl-C).
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received, stopping server...");
}

/// Create server configuration from Waymark config.
///
/// # Arguments
///
/// * `config` - Waymark configuration
/// * `version` - Application version
/// * `verbose` - Enable verbose output
#[must_use]
pub fn server_config_from_waymark_config(
    config: &waymark_config::Config,
    version: String,
    verbose: bool,
) -> ServerConfig {
    ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        sidebar_file: config.docs_resolved.sidebar_file.clone(),
        pages: config
            .pages
            .iter()
            .map(|page| StandalonePage::new(page.path.clone(), page.target.clone()))
            .collect(),
        route_base: config.docs_resolved.route_base.clone(),
        not_found_target: config.docs_resolved.not_found_target.clone(),
        site_title: config.site.title.clone(),
        site_tagline: config.site.tagline.clone(),
        site_url: config.site.url.clone(),
        base_url: config.site.base_url.clone(),
        navbar: config.navbar.clone(),
        footer: config.footer.clone(),
        verbose,
        version,
    }
}
