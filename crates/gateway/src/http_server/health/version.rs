use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use common::prelude::build_info;

pub async fn handler() -> Response {
    (StatusCode::OK, Json(build_info())).into_response()
}
