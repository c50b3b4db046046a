use chrono::{DateTime, Utc};

/// Name of the file whose rendered content documents a folder
pub const README_FILE_NAME: &str = "README.md";
/// Name of the hidden file whose content gates access to a folder
pub const PASSWORD_FILE_NAME: &str = ".password";

pub const ROOT_NAME: &str = "root";
pub const ROOT_PATH: &str = "/";

/**
 * Nodes
 * =====
 * A node is either a folder or a file of the remote drive.
 *  - Files carry a direct download url, a size and a modification time
 *  - Folders own their children, in the order the remote listed them,
 *     and remember where their README and .password sources live
 * The `password` of a folder is resolved from its `.password` source
 *  before the snapshot is published, so a published folder either
 *  has its secret or has none.
 */
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub name: String,
    pub path: String,
    pub is_folder: bool,
    /// Empty for folders and for the scrubbed `.password` entry
    pub download_url: String,
    pub size: u64,
    pub last_modified: DateTime<Utc>,
    pub children: Vec<Node>,
    /// Download url of this folder's README.md, if it has one
    pub readme_url: Option<String>,
    /// Download url of this folder's .password, if it has one
    pub password_url: Option<String>,
    /// Resolved folder secret, empty when the folder has none
    pub password: String,
}

impl Default for Node {
    fn default() -> Self {
        Self::root()
    }
}

impl Node {
    /// An empty root folder, the store's content before the first build
    pub fn root() -> Self {
        Self::folder(ROOT_NAME, ROOT_PATH)
    }

    pub fn folder(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            is_folder: true,
            download_url: String::new(),
            size: 0,
            last_modified: Utc::now(),
            children: Vec::new(),
            readme_url: None,
            password_url: None,
            password: String::new(),
        }
    }

    pub fn file(
        name: impl Into<String>,
        path: impl Into<String>,
        download_url: impl Into<String>,
        size: u64,
    ) -> Self {
        Self {
            is_folder: false,
            download_url: download_url.into(),
            size,
            ..Self::folder(name, path)
        }
    }

    pub fn is_root(&self) -> bool {
        self.path == ROOT_PATH
    }

    pub fn is_password_file(&self) -> bool {
        !self.is_folder && self.name == PASSWORD_FILE_NAME
    }

    pub fn has_password(&self) -> bool {
        !self.password.is_empty()
    }

    /// First child with the given name.
    ///
    /// Sibling names are unique on the remote, so the first match is the
    ///  only match for well-formed data.
    pub fn child(&self, name: &str) -> Option<&Node> {
        self.children.iter().find(|child| child.name == name)
    }

    /// Walk `/`-separated segments down from this node
    pub fn descendant(&self, path: &str) -> Option<&Node> {
        path.split('/')
            .filter(|segment| !segment.is_empty())
            .try_fold(self, |node, segment| node.child(segment))
    }

    /// Every folder of the subtree rooted here, this node included, depth first
    pub fn folders(&self) -> Vec<&Node> {
        let mut folders = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            if !node.is_folder {
                continue;
            }
            folders.push(node);
            stack.extend(node.children.iter().rev());
        }
        folders
    }

    /// Apply `f` to every folder of the subtree, this node first.
    ///
    /// Only meaningful on trees that have not been published yet; recursion
    ///  depth is bounded by the fetcher's depth limit.
    pub fn visit_folders_mut<F: FnMut(&mut Node)>(&mut self, f: &mut F) {
        if !self.is_folder {
            return;
        }
        f(self);
        for child in &mut self.children {
            child.visit_folders_mut(f);
        }
    }

    /// Total number of nodes in the subtree, this node included
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(Node::count).sum::<usize>()
    }
}

/// Join a parent path and a child name into the child's absolute path
pub fn child_path(parent: &str, name: &str) -> String {
    if parent.ends_with('/') {
        format!("{}{}", parent, name)
    } else {
        format!("{}/{}", parent, name)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn sample() -> Node {
        let mut docs = Node::folder("docs", "/docs");
        docs.children
            .push(Node::file("README.md", "/docs/README.md", "https://dl/readme", 12));
        docs.children.push(Node::file("a.txt", "/docs/a.txt", "https://dl/a", 1));
        let mut root = Node::root();
        root.children.push(docs);
        root.children.push(Node::file("b.txt", "/b.txt", "https://dl/b", 2));
        root
    }

    #[test]
    fn test_child_path() {
        assert_eq!(child_path("/", "docs"), "/docs");
        assert_eq!(child_path("/docs", "a.txt"), "/docs/a.txt");
    }

    #[test]
    fn test_descendant() {
        let root = sample();
        assert_eq!(root.descendant("/docs/a.txt").unwrap().path, "/docs/a.txt");
        assert_eq!(root.descendant("/").unwrap().path, "/");
        assert!(root.descendant("/docs/missing").is_none());
    }

    #[test]
    fn test_folders_depth_first() {
        let root = sample();
        let paths: Vec<_> = root.folders().iter().map(|f| f.path.clone()).collect();
        assert_eq!(paths, vec!["/".to_string(), "/docs".to_string()]);
        assert_eq!(root.count(), 5);
    }

    #[test]
    fn test_visit_folders_mut() {
        let mut root = sample();
        root.visit_folders_mut(&mut |folder| {
            folder.password = format!("pw{}", folder.path);
        });
        assert_eq!(root.password, "pw/");
        assert_eq!(root.child("docs").unwrap().password, "pw/docs");
    }
}
