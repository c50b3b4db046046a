//! Builds a complete snapshot of the remote folder tree
//!
//! Every folder is listed page by page (following continuation links until
//!  none is left), merged, and then interpreted:
//!  - folders are fetched depth first
//!  - a `README.md` file becomes its folder's documentation source
//!  - a `.password` file becomes its folder's secret source; its size and
//!    download link are scrubbed before it joins the folder's children
//!
//! Any failure aborts the whole build. A half-built tree is simply dropped,
//!  so callers either get a complete snapshot or an error.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use futures::future::BoxFuture;
use url::Url;

use crate::remote::{ClientProvider, DriveItem, Endpoints, Listing, RemoteClient, RequestError};
use crate::tree::{child_path, Node, PASSWORD_FILE_NAME, README_FILE_NAME, ROOT_PATH};

/// Largest page the listing API will hand out
pub const PAGE_SIZE: u32 = 3000;
/// Attempts per request, counting the first one
pub const MAX_ATTEMPTS: u32 = 3;
/// Pause between attempts after a timeout
pub const RETRY_DELAY: Duration = Duration::from_secs(1);
/// Deepest folder nesting a build will follow
pub const MAX_DEPTH: usize = 64;

/// Contents of one fetched folder: its children (recursively complete) and
///  where its README and .password sources live
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FolderListing {
    pub children: Vec<Node>,
    pub readme_url: Option<String>,
    pub password_url: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("not logged in: no authenticated client available")]
    NotLoggedIn,
    #[error("request error: {0}")]
    Request(#[from] RequestError),
    #[error("invalid listing from {url}: {source}")]
    Decode {
        url: Url,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid remote url {link}: {source}")]
    InvalidUrl {
        link: String,
        #[source]
        source: url::ParseError,
    },
    #[error("folder {0} is nested deeper than {} levels", MAX_DEPTH)]
    TooDeep(String),
}

#[derive(Clone)]
pub struct TreeFetcher {
    provider: Arc<dyn ClientProvider>,
    endpoints: Endpoints,
    retry_delay: Duration,
}

impl TreeFetcher {
    pub fn new(provider: Arc<dyn ClientProvider>, endpoints: Endpoints) -> Self {
        Self {
            provider,
            endpoints,
            retry_delay: RETRY_DELAY,
        }
    }

    /// Override the pause between timed-out attempts
    pub fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }

    /// Fetch the whole subtree below `prefix` (`""` or `/` for the drive root)
    pub async fn build_tree(&self, prefix: &str) -> Result<FolderListing, FetchError> {
        let client = self.provider.client().ok_or(FetchError::NotLoggedIn)?;
        self.build_folder(client.as_ref(), prefix, 0).await
    }

    /// Fetch the subtree below `prefix` and hang it under a fresh root node
    pub async fn build_root(&self, prefix: &str) -> Result<Node, FetchError> {
        let listing = self.build_tree(prefix).await?;

        let mut root = Node::root();
        root.children = listing.children;
        root.readme_url = listing.readme_url;
        root.password_url = listing.password_url;

        tracing::debug!(prefix, nodes = root.count(), "built tree");
        Ok(root)
    }

    fn build_folder<'a>(
        &'a self,
        client: &'a dyn RemoteClient,
        path: &'a str,
        depth: usize,
    ) -> BoxFuture<'a, Result<FolderListing, FetchError>> {
        Box::pin(async move {
            if depth > MAX_DEPTH {
                return Err(FetchError::TooDeep(path.to_string()));
            }

            let items = self.list_with(client, path).await?;
            let parent = if path.is_empty() { ROOT_PATH } else { path };

            let mut listing = FolderListing::default();
            for item in items {
                let mut node = to_node(parent, item);

                if node.is_folder {
                    let sub = self.build_folder(client, &node.path, depth + 1).await?;
                    node.children = sub.children;
                    node.readme_url = sub.readme_url;
                    node.password_url = sub.password_url;
                } else if node.name == README_FILE_NAME {
                    listing.readme_url = Some(node.download_url.clone());
                } else if node.name == PASSWORD_FILE_NAME {
                    listing.password_url = Some(std::mem::take(&mut node.download_url));
                    node.size = 0;
                }

                listing.children.push(node);
            }

            Ok(listing)
        })
    }

    /// Every entry of the folder at `path`, all pages merged in order
    pub async fn list(&self, path: &str) -> Result<Vec<DriveItem>, FetchError> {
        let client = self.provider.client().ok_or(FetchError::NotLoggedIn)?;
        self.list_with(client.as_ref(), path).await
    }

    async fn list_with(
        &self,
        client: &dyn RemoteClient,
        path: &str,
    ) -> Result<Vec<DriveItem>, FetchError> {
        let mut url = self.endpoints.children(path, PAGE_SIZE);
        let mut items = Vec::new();

        loop {
            let body = self.get_with_retry(client, &url).await?;
            let page: Listing = serde_json::from_slice(&body).map_err(|source| {
                FetchError::Decode {
                    url: url.clone(),
                    source,
                }
            })?;
            tracing::trace!(%url, entries = page.value.len(), "fetched listing page");

            items.extend(page.value);

            match page.next_link {
                Some(link) => {
                    url = Url::parse(&link)
                        .map_err(|source| FetchError::InvalidUrl { link, source })?;
                }
                None => break,
            }
        }

        Ok(items)
    }

    /// Download one file through the authenticated client, e.g. a folder's
    ///  README or .password source
    pub async fn download(&self, link: &str) -> Result<Bytes, FetchError> {
        let client = self.provider.client().ok_or(FetchError::NotLoggedIn)?;
        let url = Url::parse(link).map_err(|source| FetchError::InvalidUrl {
            link: link.to_string(),
            source,
        })?;
        Ok(self.get_with_retry(client.as_ref(), &url).await?)
    }

    /// GET `url`, retrying in place while the failure is a timeout
    async fn get_with_retry(
        &self,
        client: &dyn RemoteClient,
        url: &Url,
    ) -> Result<Bytes, RequestError> {
        let mut attempt = 1;
        loop {
            match client.get(url).await {
                Err(e) if e.is_timeout() && attempt < MAX_ATTEMPTS => {
                    tracing::warn!(%url, attempt, "request timed out, retrying");
                    tokio::time::sleep(self.retry_delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    tracing::info!(%url, attempt, error = %e, "request failed");
                    return Err(e);
                }
                Ok(body) => return Ok(body),
            }
        }
    }
}

fn to_node(parent: &str, item: DriveItem) -> Node {
    let path = child_path(parent, &item.name);
    let is_folder = item.is_folder();
    Node {
        is_folder,
        download_url: if is_folder {
            String::new()
        } else {
            item.download_url.unwrap_or_default()
        },
        size: item.size,
        last_modified: item.last_modified_date_time,
        ..Node::folder(item.name, path)
    }
}
