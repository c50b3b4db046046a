//! Keeps the published snapshot in step with the remote drive
//!
//! A full refresh runs in a fixed order:
//!  1. build a complete new tree from the remote listing
//!  2. resolve folder secrets into it while it is still private
//!  3. publish it to the store in one swap
//!  4. render READMEs of the published snapshot into the cache
//!
//! The first refresh at startup is mandatory. After it succeeds the store is
//!  marked ready and a single periodic loop takes over; periodic failures
//!  are logged and the last good snapshot keeps being served.

mod hydrate;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::fetcher::{FetchError, TreeFetcher};
use crate::readme::{MarkdownRenderer, ReadmeCache};
use crate::resolve::PathResolver;
use crate::site::SiteConfig;
use crate::store::TreeStore;

/// Default pause between periodic refreshes
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Shortest pause the periodic loop accepts
pub const MIN_REFRESH_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, thiserror::Error)]
pub enum RefreshError {
    #[error("failed to fetch tree: {0}")]
    Fetch(#[from] FetchError),
    #[error("failed to resolve password of {path}: {source}")]
    Secret {
        path: String,
        #[source]
        source: FetchError,
    },
    #[error("a refresh is already running")]
    AlreadyRunning,
}

impl RefreshError {
    /// Whether the refresh failed because nobody is logged in
    pub fn is_not_logged_in(&self) -> bool {
        matches!(self, RefreshError::Fetch(FetchError::NotLoggedIn))
    }
}

/// What a successful refresh published
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RefreshReport {
    pub nodes: usize,
    pub passwords: usize,
    pub readmes: usize,
}

pub struct Refresher {
    fetcher: TreeFetcher,
    store: Arc<TreeStore>,
    resolver: PathResolver,
    readmes: ReadmeCache,
    renderer: Arc<dyn MarkdownRenderer>,
    site: Arc<SiteConfig>,
    // held for a whole refresh; contenders give up instead of queueing
    running: Mutex<()>,
    periodic_started: AtomicBool,
}

impl Refresher {
    pub fn new(
        fetcher: TreeFetcher,
        store: Arc<TreeStore>,
        readmes: ReadmeCache,
        renderer: Arc<dyn MarkdownRenderer>,
        site: Arc<SiteConfig>,
    ) -> Self {
        let resolver = PathResolver::new(store.clone(), site.clone());
        Self {
            fetcher,
            store,
            resolver,
            readmes,
            renderer,
            site,
            running: Mutex::new(()),
            periodic_started: AtomicBool::new(false),
        }
    }

    pub fn store(&self) -> &Arc<TreeStore> {
        &self.store
    }

    /// Rebuild, publish and hydrate. On error the previously published
    ///  snapshot is left untouched. Fails with
    ///  [`RefreshError::AlreadyRunning`] rather than waiting when another
    ///  refresh is in flight.
    pub async fn refresh_all(&self) -> Result<RefreshReport, RefreshError> {
        let _running = self
            .running
            .try_lock()
            .map_err(|_| RefreshError::AlreadyRunning)?;

        tracing::info!("refreshing file tree");
        let mut root = self.fetcher.build_root(self.site.fetch_prefix()).await?;
        let passwords = self.resolve_secrets(&mut root).await?;
        let nodes = root.count();

        self.store.set_root(root);
        tracing::info!(nodes, passwords, "published new snapshot");

        let readmes = self.hydrate_readmes().await;
        tracing::info!(readmes, "refreshed README cache");

        Ok(RefreshReport {
            nodes,
            passwords,
            readmes,
        })
    }

    /// Mandatory first refresh. On success the store is marked ready and the
    ///  periodic loop is started; the error is for the caller to treat as
    ///  fatal.
    pub async fn bootstrap(
        self: &Arc<Self>,
        period: Duration,
        shutdown: watch::Receiver<()>,
    ) -> Result<Option<JoinHandle<()>>, RefreshError> {
        let report = self.refresh_all().await?;
        self.store.set_ready(true);
        tracing::info!(nodes = report.nodes, "initial tree ready");

        Ok(self.start_periodic(period, shutdown))
    }

    /// Start the periodic refresh loop. Only the first call starts anything;
    ///  later calls return `None`. Periods below [`MIN_REFRESH_INTERVAL`] are
    ///  raised to it.
    pub fn start_periodic(
        self: &Arc<Self>,
        period: Duration,
        mut shutdown: watch::Receiver<()>,
    ) -> Option<JoinHandle<()>> {
        if self.periodic_started.swap(true, Ordering::AcqRel) {
            tracing::debug!("periodic refresh already running");
            return None;
        }

        if period < MIN_REFRESH_INTERVAL {
            tracing::warn!(?period, "refresh period too short, using the minimum");
        }
        let period = period.max(MIN_REFRESH_INTERVAL);

        let refresher = self.clone();
        let handle = tokio::spawn(async move {
            let mut timer = tokio::time::interval(period);
            timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
            timer.tick().await; // Skip first immediate tick

            tracing::info!(period_secs = period.as_secs(), "periodic refresh started");

            loop {
                tokio::select! {
                    _ = timer.tick() => {
                        match refresher.refresh_all().await {
                            Ok(_) => {}
                            Err(RefreshError::AlreadyRunning) => {
                                tracing::debug!("refresh already in flight, skipping tick");
                            }
                            Err(e) => {
                                tracing::warn!(error = %e, "periodic refresh failed, keeping previous tree");
                            }
                        }
                    }
                    _ = shutdown.changed() => {
                        tracing::info!("periodic refresh shutting down");
                        break;
                    }
                }
            }
        });

        Some(handle)
    }

    pub fn periodic_started(&self) -> bool {
        self.periodic_started.load(Ordering::Acquire)
    }
}

impl std::fmt::Debug for Refresher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Refresher")
            .field("ready", &self.store.is_ready())
            .field("periodic_started", &self.periodic_started())
            .finish()
    }
}
