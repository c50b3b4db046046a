//! Holds the currently published snapshot
//!
//! Readers clone the root `Arc` under a momentary shared lock and then walk
//!  the snapshot without holding anything, so a publish never waits on a
//!  slow reader and a reader never sees a mix of two snapshots.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::tree::Node;

#[derive(Debug)]
pub struct TreeStore {
    root: RwLock<Arc<Node>>,
    ready: AtomicBool,
}

impl Default for TreeStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeStore {
    /// An empty, not yet ready store
    pub fn new() -> Self {
        Self {
            root: RwLock::new(Arc::new(Node::root())),
            ready: AtomicBool::new(false),
        }
    }

    /// Publish a new snapshot, replacing the previous one wholesale
    pub fn set_root(&self, root: Node) {
        let root = Arc::new(root);
        *self.root.write() = root;
    }

    /// The current snapshot
    pub fn root(&self) -> Arc<Node> {
        self.root.read().clone()
    }

    pub fn set_ready(&self, ready: bool) {
        self.ready.store(ready, Ordering::Release);
    }

    /// Whether at least one full build has been published
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }
}
