use std::collections::HashMap;

use bytes::Bytes;
use futures::stream::{self, StreamExt, TryStreamExt};

use crate::fetcher::FetchError;
use crate::tree::Node;

use super::{RefreshError, Refresher};

/// Downloads running at once while hydrating a snapshot
const HYDRATION_CONCURRENCY: usize = 8;

impl Refresher {
    /// Resolve every folder's `.password` into its `password` field.
    ///
    /// Runs on the freshly built tree before it is published. A secret that
    ///  cannot be downloaded fails the refresh rather than publishing that
    ///  folder unprotected.
    pub(super) async fn resolve_secrets(&self, root: &mut Node) -> Result<usize, RefreshError> {
        let sources: Vec<(String, String)> = root
            .folders()
            .into_iter()
            .filter_map(|folder| {
                folder
                    .password_url
                    .as_ref()
                    .map(|url| (folder.path.clone(), url.clone()))
            })
            .collect();

        if sources.is_empty() {
            return Ok(0);
        }

        let secrets: HashMap<String, String> = stream::iter(sources)
            .map(|(path, url)| async move {
                match self.fetcher.download(&url).await {
                    Ok(body) => Ok((path, String::from_utf8_lossy(&body).trim().to_string())),
                    Err(source) => {
                        tracing::warn!(path = %path, error = %source, "download password file error");
                        Err(RefreshError::Secret { path, source })
                    }
                }
            })
            .buffer_unordered(HYDRATION_CONCURRENCY)
            .try_collect()
            .await?;

        root.visit_folders_mut(&mut |folder| {
            if let Some(secret) = secrets.get(&folder.path) {
                folder.password = secret.clone();
            }
        });

        Ok(secrets.len())
    }

    /// Render every README of the published snapshot into the cache, keyed by
    ///  each external path its folder is visible at.
    ///
    /// Best effort: a README that fails to download is logged and skipped.
    pub(super) async fn hydrate_readmes(&self) -> usize {
        let root = self.store.root();
        let sources: Vec<(String, String)> = root
            .folders()
            .into_iter()
            .filter_map(|folder| {
                folder
                    .readme_url
                    .as_ref()
                    .map(|url| (folder.path.clone(), url.clone()))
            })
            .collect();
        drop(root);

        let downloads: Vec<(String, Result<Bytes, FetchError>)> = stream::iter(sources)
            .map(|(path, url)| async move {
                let download = self.fetcher.download(&url).await;
                (path, download)
            })
            .buffer_unordered(HYDRATION_CONCURRENCY)
            .collect()
            .await;

        let mut cached = 0;
        for (path, download) in downloads {
            let source = match download {
                Ok(source) => source,
                Err(e) => {
                    tracing::info!(path = %path, error = %e, "download readme file to cache error");
                    continue;
                }
            };

            let rendered = Bytes::from(self.renderer.render(&source));
            for external in self.resolver.external_paths(&path) {
                self.readmes.put(external, rendered.clone());
                cached += 1;
            }
        }

        cached
    }
}
