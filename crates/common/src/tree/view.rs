use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::resolve::rewrite_path;

use super::Node;

/// What a lookup hands back to the outside world: one node, its immediate
///  children, and every path rewritten relative to the caller's virtual root.
///
/// The `.password` child never makes it into `children`, and folder secrets
///  are never serialized; only whether one exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeView {
    pub name: String,
    pub path: String,
    pub is_folder: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub download_url: String,
    pub size: u64,
    pub last_modified: DateTime<Utc>,
    pub has_password: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<NodeView>>,
    #[serde(skip)]
    pub(crate) password: String,
}

impl NodeView {
    /// Project `node` and its immediate children, stripping `prefix` from
    ///  every path
    pub fn project(node: &Node, prefix: &str) -> Self {
        let children = node
            .children
            .iter()
            .filter(|child| !child.is_password_file())
            .map(|child| Self::leaf(child, prefix))
            .collect();

        Self {
            children: Some(children),
            ..Self::leaf(node, prefix)
        }
    }

    fn leaf(node: &Node, prefix: &str) -> Self {
        Self {
            name: node.name.clone(),
            path: rewrite_path(&node.path, prefix),
            is_folder: node.is_folder,
            download_url: node.download_url.clone(),
            size: node.size,
            last_modified: node.last_modified,
            has_password: node.has_password(),
            children: None,
            password: node.password.clone(),
        }
    }

    /// The folder secret this view is gated by, empty when there is none
    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn children(&self) -> &[NodeView] {
        self.children.as_deref().unwrap_or_default()
    }
}
