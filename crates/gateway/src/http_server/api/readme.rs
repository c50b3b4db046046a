use axum::extract::{Query, State};
use axum::response::Response;

use crate::http_server::extract::{normalize_path, PathQuery};
use crate::http_server::guard::Unlocked;
use crate::http_server::response::{ok, ApiError};
use crate::ServiceState;

/// Rendered README of the folder at `?path=`, as an html fragment
pub async fn handler(
    _: Unlocked,
    State(state): State<ServiceState>,
    Query(query): Query<PathQuery>,
) -> Result<Response, ApiError> {
    let path = normalize_path(query.path());
    let rendered = state
        .readmes()
        .get(&path)
        .ok_or(ApiError::NotFound(path))?;
    Ok(ok(String::from_utf8_lossy(&rendered)))
}
