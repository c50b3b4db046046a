use axum::extract::State;
use axum::response::Response;

use crate::http_server::guard::LoggedIn;
use crate::http_server::response::{ok, ApiError};
use crate::ServiceState;

/// Rebuild the tree now, outside the periodic schedule
pub async fn handler(
    _: LoggedIn,
    State(state): State<ServiceState>,
) -> Result<Response, ApiError> {
    tracing::info!("manual refresh requested");
    let report = state.refresher().refresh_all().await?;
    Ok(ok(report))
}
