use axum::extract::{Query, State};
use axum::response::Response;

use crate::http_server::extract::{PathQuery, RequestHost};
use crate::http_server::guard::Unlocked;
use crate::http_server::response::{ok, ApiError};
use crate::ServiceState;

/// One folder (or file) of the caller's virtual root with its immediate
///  children
pub async fn handler(
    _: Unlocked,
    State(state): State<ServiceState>,
    RequestHost(host): RequestHost,
    Query(query): Query<PathQuery>,
) -> Result<Response, ApiError> {
    let view = state.resolver().resolve(query.path(), &host)?;
    Ok(ok(view))
}
