use axum::extract::State;
use axum::response::Response;
use serde::Serialize;

use crate::http_server::extract::RequestHost;
use crate::http_server::guard::LoggedIn;
use crate::http_server::response::{ok, ApiError};
use crate::ServiceState;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteInfo {
    pub html_title: String,
    pub site_header: String,
}

/// Title and header configured for the requesting host
pub async fn handler(
    _: LoggedIn,
    State(state): State<ServiceState>,
    RequestHost(host): RequestHost,
) -> Result<Response, ApiError> {
    tracing::debug!(host = %host, "getting site info");
    let pair = state
        .resolver()
        .site_info(&host)
        .ok_or_else(|| ApiError::NotFound(host.clone()))?;

    Ok(ok(SiteInfo {
        html_title: pair.html_title.clone(),
        site_header: pair.site_header.clone(),
    }))
}
