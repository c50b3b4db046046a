//! `/_status/readyz`: can the drive routes answer yet, and if not, why

use std::time::Duration;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tokio::time::timeout;

use super::data_source::*;

const READINESS_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Serialize)]
struct Readiness {
    ready: bool,
    /// `ready`, `loading`, `logged_out` or `timed_out`
    state: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<String>,
}

#[tracing::instrument]
pub async fn handler(data_src: StateDataSource) -> Response {
    let readiness = match timeout(READINESS_TIMEOUT, data_src.is_ready()).await {
        Ok(Ok(())) => Readiness {
            ready: true,
            state: "ready",
            detail: None,
        },
        Ok(Err(err)) => Readiness {
            ready: false,
            state: match &err {
                DataSourceError::Loading => "loading",
                DataSourceError::DependencyFailure => "logged_out",
            },
            detail: Some(err.to_string()),
        },
        Err(_) => Readiness {
            ready: false,
            state: "timed_out",
            detail: None,
        },
    };

    let status = if readiness.ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(readiness)).into_response()
}
