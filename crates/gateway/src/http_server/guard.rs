//! Request guards for the drive routes
//!
//! Each guard is an extractor that implies the ones before it:
//!  [`LoggedIn`] < [`TreeReady`] < [`Unlocked`].
//!  Handlers name the strongest guard they need as their first argument.

use axum::async_trait;
use axum::extract::{FromRequestParts, Query};
use http::request::Parts;

use super::extract::{FolderPass, PathQuery, RequestHost};
use super::response::ApiError;
use crate::ServiceState;

/// An authenticated client for the remote drive is available
#[derive(Debug, Clone, Copy)]
pub struct LoggedIn;

#[async_trait]
impl FromRequestParts<ServiceState> for LoggedIn {
    type Rejection = ApiError;

    async fn from_request_parts(
        _parts: &mut Parts,
        state: &ServiceState,
    ) -> Result<Self, Self::Rejection> {
        if !state.provider().is_logged_in() {
            return Err(ApiError::NotLoggedIn);
        }
        Ok(LoggedIn)
    }
}

/// Logged in and the first tree build has been published
#[derive(Debug, Clone, Copy)]
pub struct TreeReady;

#[async_trait]
impl FromRequestParts<ServiceState> for TreeReady {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServiceState,
    ) -> Result<Self, Self::Rejection> {
        LoggedIn::from_request_parts(parts, state).await?;
        if !state.store().is_ready() {
            return Err(ApiError::NotReady);
        }
        Ok(TreeReady)
    }
}

/// Tree ready and the `pass` header opens `?path=`, or the folder holding it
///  when `?path=` names a file
#[derive(Debug, Clone, Copy)]
pub struct Unlocked;

#[async_trait]
impl FromRequestParts<ServiceState> for Unlocked {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServiceState,
    ) -> Result<Self, Self::Rejection> {
        TreeReady::from_request_parts(parts, state).await?;

        let RequestHost(host) = RequestHost::from_headers(&parts.headers);
        let FolderPass(pass) = FolderPass::from_headers(&parts.headers);
        let query = Query::<PathQuery>::try_from_uri(&parts.uri)
            .map(|Query(query)| query)
            .unwrap_or_default();

        state.gate().check_access(query.path(), &host, &pass)?;
        Ok(Unlocked)
    }
}
