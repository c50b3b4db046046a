use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use http::header::LOCATION;
use http::StatusCode;
use serde::Deserialize;

use crate::http_server::extract::{normalize_path, FolderPass, RequestHost};
use crate::http_server::guard::TreeReady;
use crate::http_server::response::ApiError;
use crate::ServiceState;

/// Plain links cannot carry headers, so the secret may also come as `?pass=`
#[derive(Debug, Default, Deserialize)]
pub struct DownloadQuery {
    #[serde(default)]
    pub pass: Option<String>,
}

/// Redirect to the direct download link of a file
pub async fn handler(
    _: TreeReady,
    State(state): State<ServiceState>,
    RequestHost(host): RequestHost,
    FolderPass(header_pass): FolderPass,
    Path(path): Path<String>,
    Query(query): Query<DownloadQuery>,
) -> Result<Response, ApiError> {
    let path = normalize_path(&path);
    let pass = query.pass.unwrap_or(header_pass);

    state.gate().check_access(&path, &host, &pass)?;

    let url = state.resolver().download_url(&path, &host)?;
    tracing::debug!(path = %path, host = %host, "redirecting download");
    Ok((StatusCode::FOUND, [(LOCATION, url)]).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::tests::*;

    async fn download(
        state: ServiceState,
        path: &str,
        pass: Option<&str>,
    ) -> Result<Response, ApiError> {
        handler(
            TreeReady,
            State(state),
            host("any"),
            FolderPass::default(),
            Path(path.to_string()),
            Query(DownloadQuery {
                pass: pass.map(str::to_string),
            }),
        )
        .await
    }

    #[tokio::test]
    async fn test_handler_direct() {
        let state = ready_state(docs_tree(), Default::default());

        let response = download(state.clone(), "a.txt", None).await.unwrap();
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.headers()[LOCATION], "https://dl.test/a.txt");

        let err = download(state.clone(), "docs", None).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::FORBIDDEN);
        let err = download(state.clone(), "docs", Some("s3cr3t")).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_protected_folder_needs_pass() {
        let state = ready_state(docs_tree(), Default::default());

        let err = download(state.clone(), "docs/guide.pdf", None).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::FORBIDDEN);

        let err = download(state.clone(), "docs/guide.pdf", Some("wrong"))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::FORBIDDEN);

        let response = download(state, "docs/guide.pdf", Some("s3cr3t")).await.unwrap();
        assert_eq!(response.headers()[LOCATION], "https://dl.test/docs/guide.pdf");
    }
}
