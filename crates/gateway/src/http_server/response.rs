use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use common::prelude::{AccessError, RefreshError, ResolveError};

/// Successful envelope: `{"code": "success", "data": ...}`
pub fn ok<T: Serialize>(data: T) -> Response {
    let body = serde_json::json!({ "code": "success", "data": data });
    (StatusCode::OK, Json(body)).into_response()
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("not logged in")]
    NotLoggedIn,
    #[error("file tree is still loading")]
    NotReady,
    #[error("not found: {0}")]
    NotFound(String),
    #[error(transparent)]
    Access(#[from] AccessError),
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    #[error(transparent)]
    Refresh(#[from] RefreshError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotLoggedIn => StatusCode::UNAUTHORIZED,
            ApiError::NotReady => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Access(_) => StatusCode::FORBIDDEN,
            ApiError::Resolve(ResolveError::HostNotConfigured(_)) => {
                StatusCode::MISDIRECTED_REQUEST
            }
            ApiError::Resolve(_) => StatusCode::NOT_FOUND,
            ApiError::Refresh(e) if e.is_not_logged_in() => StatusCode::UNAUTHORIZED,
            ApiError::Refresh(RefreshError::AlreadyRunning) => StatusCode::CONFLICT,
            ApiError::Refresh(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// Machine readable reason the frontend switches on
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::NotLoggedIn => "redirect_login",
            ApiError::NotReady => "load_not_ready",
            ApiError::NotFound(_) => "item_not_found",
            ApiError::Access(_) => "pass_error",
            ApiError::Resolve(ResolveError::HostNotConfigured(_)) => "host_not_configured",
            ApiError::Resolve(ResolveError::SiteFolderNotFound(_)) => "site_folder_not_found",
            ApiError::Resolve(ResolveError::NotAFile(_)) => "not_a_file",
            ApiError::Resolve(ResolveError::PathNotFound(_)) => "item_not_found",
            ApiError::Refresh(e) if e.is_not_logged_in() => "redirect_login",
            ApiError::Refresh(RefreshError::AlreadyRunning) => "refresh_running",
            ApiError::Refresh(_) => "refresh_failed",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            ApiError::Resolve(e) if e.is_configuration() => {
                tracing::warn!(error = %e, "site configuration mismatch");
            }
            _ if status.is_server_error() => {
                tracing::warn!(error = %self, "request failed");
            }
            _ => {}
        }

        let body = serde_json::json!({ "code": self.code(), "msg": self.to_string() });
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::NotLoggedIn.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::NotReady.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            ApiError::from(AccessError::Denied("/docs".into())).status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError::from(ResolveError::PathNotFound("/x".into())).status(),
            StatusCode::NOT_FOUND
        );

        let misdirected = ApiError::from(ResolveError::HostNotConfigured("b.example".into()));
        assert_eq!(misdirected.status(), StatusCode::MISDIRECTED_REQUEST);
        assert_eq!(misdirected.code(), "host_not_configured");
    }

    #[test]
    fn test_refresh_in_flight() {
        let busy = ApiError::from(RefreshError::AlreadyRunning);
        assert_eq!(busy.status(), StatusCode::CONFLICT);
        assert_eq!(busy.code(), "refresh_running");
    }

    #[test]
    fn test_login_code() {
        let response = ApiError::NotLoggedIn.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::NotLoggedIn.code(), "redirect_login");
    }
}
