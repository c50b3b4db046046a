use std::sync::Arc;
use std::time::Duration;

use common::prelude::*;

use crate::config::GatewayConfig;

/// Everything request handlers and background tasks share
#[derive(Clone)]
pub struct ServiceState {
    provider: Arc<SharedClientProvider>,
    store: Arc<TreeStore>,
    resolver: PathResolver,
    gate: AccessGate,
    readmes: ReadmeCache,
    refresher: Arc<Refresher>,
    refresh_interval: Duration,
}

#[derive(Debug, thiserror::Error)]
pub enum StateSetupError {
    #[error(transparent)]
    HttpClient(#[from] HttpClientError),
}

impl ServiceState {
    pub fn from_config(config: &GatewayConfig) -> Result<Self, StateSetupError> {
        let provider = Arc::new(SharedClientProvider::default());
        match config.access_token() {
            Some(token) => {
                let client = HttpRemoteClient::new(&token, config.request_timeout())?;
                provider.set(Arc::new(client));
            }
            None => tracing::warn!("no access token configured, serving as logged out"),
        }

        let endpoints = Endpoints::for_cloud(config.server.china_cloud);
        Ok(Self::new(
            provider,
            endpoints,
            config.site(),
            config.refresh_interval(),
        ))
    }

    /// Wire up the engine around an existing client provider
    pub fn new(
        provider: Arc<SharedClientProvider>,
        endpoints: Endpoints,
        site: SiteConfig,
        refresh_interval: Duration,
    ) -> Self {
        let site = Arc::new(site);
        let store = Arc::new(TreeStore::new());
        let readmes = ReadmeCache::new();
        let resolver = PathResolver::new(store.clone(), site.clone());
        let gate = AccessGate::new(resolver.clone(), site.clone());
        let fetcher = TreeFetcher::new(provider.clone(), endpoints);
        let refresher = Arc::new(Refresher::new(
            fetcher,
            store.clone(),
            readmes.clone(),
            Arc::new(CommonMarkRenderer),
            site,
        ));

        Self {
            provider,
            store,
            resolver,
            gate,
            readmes,
            refresher,
            refresh_interval,
        }
    }

    pub fn provider(&self) -> &Arc<SharedClientProvider> {
        &self.provider
    }

    pub fn store(&self) -> &Arc<TreeStore> {
        &self.store
    }

    pub fn resolver(&self) -> &PathResolver {
        &self.resolver
    }

    pub fn gate(&self) -> &AccessGate {
        &self.gate
    }

    pub fn readmes(&self) -> &ReadmeCache {
        &self.readmes
    }

    pub fn refresher(&self) -> &Arc<Refresher> {
        &self.refresher
    }

    pub fn refresh_interval(&self) -> Duration {
        self.refresh_interval
    }
}

impl std::fmt::Debug for ServiceState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceState")
            .field("logged_in", &self.provider.is_logged_in())
            .field("ready", &self.store.is_ready())
            .finish()
    }
}
