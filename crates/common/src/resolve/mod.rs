//! Maps external request paths onto the published snapshot
//!
//! A request is scoped to a virtual root first: the requesting host's
//!  mapped subfolder when domain based sub folders are enabled, the whole
//!  snapshot otherwise. The path is then walked one segment at a time from
//!  there, and the node found is projected into a [`NodeView`] whose paths
//!  are rewritten relative to that virtual root.

mod rewrite;

use std::sync::Arc;

use crate::site::{DomainSubFolder, SiteConfig};
use crate::store::TreeStore;
use crate::tree::{Node, NodeView};

pub use rewrite::{is_within, rewrite_path};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("host not configured: {0}")]
    HostNotConfigured(String),
    #[error("site subfolder not found: {0}")]
    SiteFolderNotFound(String),
    #[error("path not found: {0}")]
    PathNotFound(String),
    #[error("not a file: {0}")]
    NotAFile(String),
}

impl ResolveError {
    /// Configuration mismatches are reported differently from missing paths
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            ResolveError::HostNotConfigured(_) | ResolveError::SiteFolderNotFound(_)
        )
    }
}

#[derive(Debug, Clone)]
pub struct PathResolver {
    store: Arc<TreeStore>,
    site: Arc<SiteConfig>,
}

impl PathResolver {
    pub fn new(store: Arc<TreeStore>, site: Arc<SiteConfig>) -> Self {
        Self { store, site }
    }

    pub fn site(&self) -> &SiteConfig {
        &self.site
    }

    /// Look up `path` as seen by `host`
    pub fn resolve(&self, path: &str, host: &str) -> Result<NodeView, ResolveError> {
        let root = self.store.root();
        let node = self.locate(&root, path, host)?;
        Ok(NodeView::project(node, self.site.rewrite_prefix(host)))
    }

    /// Direct download link of the file at `path`, with the configured
    ///  redirect prefix applied
    pub fn download_url(&self, path: &str, host: &str) -> Result<String, ResolveError> {
        let root = self.store.root();
        let node = self.locate(&root, path, host)?;
        if node.is_folder || node.download_url.is_empty() {
            return Err(ResolveError::NotAFile(path.to_string()));
        }
        Ok(format!(
            "{}{}",
            self.site.download_redirect_prefix, node.download_url
        ))
    }

    /// Title and header configured for `host`, if it is a mapped domain
    pub fn site_info(&self, host: &str) -> Option<&DomainSubFolder> {
        self.site.domain(host)
    }

    /// Every externally visible path of the real path `path`: one per mapped
    ///  domain whose virtual root contains it, or the single rewritten path
    ///  when domains are not in use
    pub fn external_paths(&self, path: &str) -> Vec<String> {
        if self.site.domain_mode() {
            let mut paths: Vec<String> = self
                .site
                .domain_based_sub_folders
                .pairs
                .iter()
                .filter(|pair| is_within(path, &pair.sub_folder))
                .map(|pair| rewrite_path(path, &pair.sub_folder))
                .collect();
            paths.dedup();
            paths
        } else {
            vec![rewrite_path(path, self.site.rewrite_prefix(""))]
        }
    }

    fn virtual_root<'a>(&self, root: &'a Node, host: &str) -> Result<&'a Node, ResolveError> {
        if !self.site.domain_mode() {
            return Ok(root);
        }

        let pair = self
            .site
            .domain(host)
            .ok_or_else(|| ResolveError::HostNotConfigured(host.to_string()))?;

        root.descendant(&pair.sub_folder)
            .filter(|node| node.is_folder)
            .ok_or_else(|| ResolveError::SiteFolderNotFound(pair.sub_folder.clone()))
    }

    fn locate<'a>(&self, root: &'a Node, path: &str, host: &str) -> Result<&'a Node, ResolveError> {
        let mut node = self.virtual_root(root, host)?;

        // no separator at all is a request for the virtual root itself
        if !path.contains('/') {
            return Ok(node);
        }

        for segment in path.split('/').filter(|s| !s.is_empty()) {
            node = node.child(segment).ok_or_else(|| {
                tracing::debug!(path, host, segment, "path segment not found");
                ResolveError::PathNotFound(path.to_string())
            })?;
        }

        Ok(node)
    }
}
