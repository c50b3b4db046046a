use std::fmt::Debug;
use std::ops::Deref;
use std::sync::Arc;

use axum::async_trait;
use axum::extract::FromRequestParts;
use http::request::Parts;

use common::prelude::{SharedClientProvider, TreeStore};

use crate::ServiceState;

#[async_trait]
pub trait DataSource {
    /// Perform various checks on the system to ensure its healthy and ready to accept requests.
    async fn is_ready(&self) -> Result<(), DataSourceError>;
}

#[derive(Debug, thiserror::Error)]
pub enum DataSourceError {
    #[error("no authenticated client for the remote drive")]
    DependencyFailure,

    #[error("initial file tree has not been published yet")]
    Loading,
}

pub type DynDataSource = Arc<dyn DataSource + Send + Sync>;

pub struct StateDataSource(DynDataSource);

impl Debug for StateDataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateDataSource").finish()
    }
}

impl StateDataSource {
    #[cfg(test)]
    pub fn new(dds: DynDataSource) -> Self {
        Self(dds)
    }
}

impl Deref for StateDataSource {
    type Target = DynDataSource;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

struct TreeSource {
    provider: Arc<SharedClientProvider>,
    store: Arc<TreeStore>,
}

#[async_trait]
impl DataSource for TreeSource {
    async fn is_ready(&self) -> Result<(), DataSourceError> {
        if !self.provider.is_logged_in() {
            return Err(DataSourceError::DependencyFailure);
        }
        if !self.store.is_ready() {
            return Err(DataSourceError::Loading);
        }
        Ok(())
    }
}

#[async_trait]
impl FromRequestParts<ServiceState> for StateDataSource {
    type Rejection = ();

    async fn from_request_parts(
        _parts: &mut Parts,
        state: &ServiceState,
    ) -> Result<Self, Self::Rejection> {
        Ok(StateDataSource(Arc::new(TreeSource {
            provider: state.provider().clone(),
            store: state.store().clone(),
        })))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    #[derive(Clone)]
    pub(crate) enum MockReadiness {
        DependencyFailure,
        Loading,
        Ready,
    }

    #[async_trait]
    impl DataSource for MockReadiness {
        async fn is_ready(&self) -> Result<(), DataSourceError> {
            use MockReadiness::*;

            match self {
                DependencyFailure => Err(DataSourceError::DependencyFailure),
                Loading => Err(DataSourceError::Loading),
                Ready => Ok(()),
            }
        }
    }

    #[tokio::test]
    async fn test_tree_source_tracks_store() {
        let state = crate::state::tests::logged_in_state(Default::default());
        let source = TreeSource {
            provider: state.provider().clone(),
            store: state.store().clone(),
        };
        assert!(matches!(source.is_ready().await, Err(DataSourceError::Loading)));

        state.store().set_ready(true);
        assert!(source.is_ready().await.is_ok());

        state.provider().clear();
        assert!(matches!(
            source.is_ready().await,
            Err(DataSourceError::DependencyFailure)
        ));
    }
}
