//! HTTP request handlers.

pub(crate) mod config;
pub(crate) mod navigation;
pub(crate) mod pages;
pub(crate) mod routes;

/// Convert a captured path segment (without leading slash) to a URL path.
///
/// The wildcard capture strips the leading slash (e.g., "docs/guide" for
/// a request to /api/pages/docs/guide), but the route table stores
/// normalized paths with leading slashes ("/docs/guide", "/" for root).
pub(crate) fn to_url_path(path: &str) -> String {
    if path.is_empty() {
        "/".to_string()
    } else {
        format!("/{path}")
    }
}
