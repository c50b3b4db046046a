//! In-memory mirror of the remote folder structure
//!
//! - **[`Node`]**: one file or folder of a snapshot, owned by its parent
//! - **[`NodeView`]**: the one-level, path-rewritten projection handed to
//!   external consumers
//!
//! A snapshot is a single root [`Node`] (path `/`) owning every descendant.
//!  Once the store publishes a snapshot it is shared behind an `Arc` and is
//!  never mutated again; a refresh always builds a brand new tree.

mod node;
mod view;

pub use node::{child_path, Node, PASSWORD_FILE_NAME, README_FILE_NAME, ROOT_NAME, ROOT_PATH};
pub use view::NodeView;
