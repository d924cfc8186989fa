//! Error types for the HTTP server.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Server error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum ServerError {
    /// Site map rebuild failed with no previous map to serve.
    #[error("Site build error: {0}")]
    Build(#[from] waymark_site::BuildError),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            Self::Build(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({"error": e.to_string()}),
            ),
        };

        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use waymark_site::{BuildError, SidebarError};

    use super::*;

    #[test]
    fn test_build_error_maps_to_internal_server_error() {
        let err = ServerError::Build(BuildError::Sidebar(SidebarError::NotFound(
            "missing.yaml".into(),
        )));

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
