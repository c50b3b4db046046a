use std::convert::Infallible;

use axum::async_trait;
use axum::extract::FromRequestParts;
use http::header::{HOST, ORIGIN};
use http::request::Parts;
use http::HeaderMap;
use serde::Deserialize;

/// Header carrying a caller-supplied folder secret
pub const PASS_HEADER: &str = "pass";

/// The host a request was made for: the authority of `Origin` when the
///  browser sent one (cross-origin frontends), `Host` otherwise
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestHost(pub String);

impl RequestHost {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let origin = headers
            .get(ORIGIN)
            .and_then(|v| v.to_str().ok())
            .and_then(|origin| origin.split_once("//").map(|(_, rest)| rest))
            .map(|authority| authority.trim_end_matches('/'))
            .filter(|authority| !authority.is_empty());

        let host = origin.or_else(|| headers.get(HOST).and_then(|v| v.to_str().ok()));
        Self(host.unwrap_or_default().to_string())
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for RequestHost
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_headers(&parts.headers))
    }
}

/// Secret from the `pass` header, empty when none was sent
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FolderPass(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for FolderPass
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_headers(&parts.headers))
    }
}

impl FolderPass {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let pass = headers
            .get(PASS_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        Self(pass.to_string())
    }
}

/// `?path=` of the listing and README routes
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathQuery {
    #[serde(default)]
    pub path: Option<String>,
}

impl PathQuery {
    pub fn path(&self) -> &str {
        self.path.as_deref().unwrap_or("/")
    }
}

/// Canonical form of an external folder path: leading `/`, no trailing one
pub fn normalize_path(path: &str) -> String {
    let trimmed = path.trim_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", trimmed)
    }
}
