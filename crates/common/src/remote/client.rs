use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::RwLock;
use url::Url;

/// An authenticated client able to GET anything the drive links to:
///  listing pages, continuation links and pre-authenticated download urls.
#[async_trait]
pub trait RemoteClient: Send + Sync {
    async fn get(&self, url: &Url) -> Result<Bytes, RequestError>;
}

/// Hands out the current authenticated client.
///
/// `None` means nobody is logged in. Callers must treat that as a distinct
///  outcome and never fall back to an unauthenticated request.
pub trait ClientProvider: Send + Sync {
    fn client(&self) -> Option<Arc<dyn RemoteClient>>;
}

#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error("request to {0} timed out")]
    Timeout(Url),
    #[error("request to {url} failed with status {status}: {message}")]
    Status {
        url: Url,
        status: u16,
        message: String,
    },
    #[error("request to {url} failed: {message}")]
    Transport { url: Url, message: String },
}

impl RequestError {
    /// Only timeouts are worth retrying in place
    pub fn is_timeout(&self) -> bool {
        matches!(self, RequestError::Timeout(_))
    }
}

/// A provider whose client can be swapped at runtime, e.g. once a login
///  completes or a token is revoked.
#[derive(Clone, Default)]
pub struct SharedClientProvider {
    client: Arc<RwLock<Option<Arc<dyn RemoteClient>>>>,
}

impl SharedClientProvider {
    pub fn new(client: Option<Arc<dyn RemoteClient>>) -> Self {
        Self {
            client: Arc::new(RwLock::new(client)),
        }
    }

    pub fn set(&self, client: Arc<dyn RemoteClient>) {
        *self.client.write() = Some(client);
    }

    pub fn clear(&self) {
        *self.client.write() = None;
    }

    pub fn is_logged_in(&self) -> bool {
        self.client.read().is_some()
    }
}

impl ClientProvider for SharedClientProvider {
    fn client(&self) -> Option<Arc<dyn RemoteClient>> {
        self.client.read().clone()
    }
}

impl std::fmt::Debug for SharedClientProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedClientProvider")
            .field("logged_in", &self.is_logged_in())
            .finish()
    }
}
