//! Decides whether a caller-supplied secret opens a folder
//!
//! Two independent requirements, both must hold:
//!  - every site-wide pass list entry guarding the path (or an ancestor)
//!  - the folder's own `.password` secret, when it has one. A file is
//!    guarded by the secret of the folder holding it.
//!
//! Paths that do not resolve are not an access failure; the resolver reports
//!  them on its own.

use std::sync::Arc;

use crate::resolve::{is_within, PathResolver};
use crate::site::SiteConfig;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccessError {
    #[error("access denied: {0}")]
    Denied(String),
}

#[derive(Debug, Clone)]
pub struct AccessGate {
    resolver: PathResolver,
    site: Arc<SiteConfig>,
}

impl AccessGate {
    pub fn new(resolver: PathResolver, site: Arc<SiteConfig>) -> Self {
        Self { resolver, site }
    }

    pub fn check_access(&self, path: &str, host: &str, supplied: &str) -> Result<(), AccessError> {
        if !self.check_pass_list(path, supplied) {
            tracing::debug!(path, host, "site-wide pass rejected");
            return Err(AccessError::Denied(path.to_string()));
        }

        if let Some(secret) = self.folder_secret(path, host) {
            if !secret.is_empty() && secret != supplied {
                tracing::debug!(path, host, "folder pass rejected");
                return Err(AccessError::Denied(path.to_string()));
            }
        }

        Ok(())
    }

    pub fn is_allowed(&self, path: &str, host: &str, supplied: &str) -> bool {
        self.check_access(path, host, supplied).is_ok()
    }

    /// Secret of the folder at `path`, or of the folder holding the file at
    ///  `path`. `None` when nothing resolves.
    fn folder_secret(&self, path: &str, host: &str) -> Option<String> {
        let view = self.resolver.resolve(path, host).ok()?;
        if view.is_folder {
            return Some(view.password().to_string());
        }

        let path = normalize(path);
        let folder = self.resolver.resolve(parent(&path), host).ok()?;
        Some(folder.password().to_string())
    }

    fn check_pass_list(&self, path: &str, supplied: &str) -> bool {
        let path = normalize(path);
        self.site
            .pass_list
            .iter()
            .filter(|entry| is_within(&path, &normalize(&entry.path)))
            .all(|entry| entry.pass == supplied)
    }
}

fn normalize(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}

/// Containing folder of an absolute path, `/` at the top
pub fn parent(path: &str) -> &str {
    match path.rfind('/') {
        Some(0) | None => "/",
        Some(index) => &path[..index],
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::site::PassEntry;
    use crate::store::TreeStore;
    use crate::tree::Node;

    fn gate(pass_list: Vec<PassEntry>) -> AccessGate {
        let mut docs = Node::folder("docs", "/docs");
        docs.password = "s3cr3t".to_string();
        docs.children.push(Node::file(".password", "/docs/.password", "", 0));
        docs.children
            .push(Node::file("guide.pdf", "/docs/guide.pdf", "https://dl/guide", 9));

        let mut root = Node::root();
        root.children.push(docs);
        root.children.push(Node::folder("open", "/open"));
        root.children.push(Node::file("a.txt", "/a.txt", "https://dl/a", 1));

        let store = Arc::new(TreeStore::new());
        store.set_root(root);

        let site = Arc::new(SiteConfig {
            pass_list,
            ..SiteConfig::default()
        });
        AccessGate::new(PathResolver::new(store, site.clone()), site)
    }

    #[test]
    fn test_folder_password() {
        let gate = gate(Vec::new());
        assert!(gate.is_allowed("/docs", "host", "s3cr3t"));
        assert!(!gate.is_allowed("/docs", "host", "wrong"));
        assert!(!gate.is_allowed("/docs", "host", "S3CR3T"));
        assert!(gate.is_allowed("/open", "host", ""));
    }

    #[test]
    fn test_file_inherits_folder_password() {
        let gate = gate(Vec::new());
        assert_eq!(
            gate.check_access("/docs/guide.pdf", "host", ""),
            Err(AccessError::Denied("/docs/guide.pdf".to_string()))
        );
        assert!(!gate.is_allowed("docs/guide.pdf/", "host", "wrong"));
        assert!(gate.is_allowed("/docs/guide.pdf", "host", "s3cr3t"));
        assert!(gate.is_allowed("/a.txt", "host", ""));
    }

    #[test]
    fn test_parent() {
        assert_eq!(parent("/a.txt"), "/");
        assert_eq!(parent("/docs/guide.pdf"), "/docs");
        assert_eq!(parent("/"), "/");
    }

    #[test]
    fn test_unresolvable_path_is_not_denied() {
        let gate = gate(Vec::new());
        assert!(gate.is_allowed("/missing", "host", ""));
    }

    #[test]
    fn test_pass_list_guards_subtree() {
        let gate = gate(vec![PassEntry {
            path: "/open".to_string(),
            pass: "site".to_string(),
        }]);
        assert!(gate.is_allowed("/open", "host", "site"));
        assert!(!gate.is_allowed("/open", "host", ""));
        assert!(!gate.is_allowed("/open/deeper", "host", "nope"));
        assert!(gate.is_allowed("/docs", "host", "s3cr3t"));
        assert!(gate.is_allowed("/", "host", ""));
    }

    #[test]
    fn test_both_requirements_apply() {
        let gate = gate(vec![PassEntry {
            path: "/".to_string(),
            pass: "site".to_string(),
        }]);
        assert_eq!(
            gate.check_access("/docs", "host", "s3cr3t"),
            Err(AccessError::Denied("/docs".to_string()))
        );
        assert!(gate.is_allowed("/open", "host", "site"));
    }
}
