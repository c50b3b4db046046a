//! Rendered folder documentation
//!
//! Each folder's `README.md` is downloaded during a refresh, rendered once,
//!  and kept here under every external path that folder is visible at.
//!  Entries expire on their own; a miss just means no documentation.

use std::time::Duration;

use bytes::Bytes;
use moka::sync::Cache;

/// How long a rendered README stays servable without a refresh
pub const README_TTL: Duration = Duration::from_secs(2 * 24 * 60 * 60);

/// Turns markup source into what the frontend displays
pub trait MarkdownRenderer: Send + Sync {
    fn render(&self, source: &[u8]) -> Vec<u8>;
}

/// CommonMark to HTML fragment, with the GitHub-style extensions READMEs
///  tend to use
#[derive(Debug, Clone, Copy, Default)]
pub struct CommonMarkRenderer;

impl MarkdownRenderer for CommonMarkRenderer {
    fn render(&self, source: &[u8]) -> Vec<u8> {
        use pulldown_cmark::{html, Options, Parser};

        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);

        let markdown = String::from_utf8_lossy(source);
        let parser = Parser::new_ext(&markdown, options);
        let mut html_output = String::new();
        html::push_html(&mut html_output, parser);
        html_output.into_bytes()
    }
}

/// Expiring map from external folder path to rendered README
#[derive(Clone)]
pub struct ReadmeCache {
    entries: Cache<String, Bytes>,
}

impl Default for ReadmeCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ReadmeCache {
    pub fn new() -> Self {
        Self::with_ttl(README_TTL)
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            entries: Cache::builder().time_to_live(ttl).build(),
        }
    }

    pub fn put(&self, path: impl Into<String>, rendered: impl Into<Bytes>) {
        self.entries.insert(path.into(), rendered.into());
    }

    /// Rendered README for the folder at external `path`, if one is cached
    ///  and has not expired
    pub fn get(&self, path: &str) -> Option<Bytes> {
        let hit = self.entries.get(path);
        if hit.is_none() {
            tracing::debug!(path, "README not in cache");
        }
        hit
    }

    pub fn len(&self) -> u64 {
        self.entries.run_pending_tasks();
        self.entries.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for ReadmeCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReadmeCache")
            .field("entries", &self.entries.entry_count())
            .finish()
    }
}
