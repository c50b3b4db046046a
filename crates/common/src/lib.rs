/**
 * Site-wide and per-folder access checks.
 */
pub mod access;
/**
 * Builds a complete tree snapshot from the
 *  paginated remote listing API.
 */
pub mod fetcher;
/**
 * Time-bounded cache of rendered folder
 *  READMEs, plus the markdown renderer.
 */
pub mod readme;
/**
 * Periodic and on-demand resynchronization:
 *  build, resolve secrets, publish, hydrate.
 */
pub mod refresh;
/**
 * The remote drive: listing schema, endpoints
 *  and the authenticated-client seam.
 */
pub mod remote;
/**
 * Path lookups against the published snapshot,
 *  scoped to per-host virtual roots.
 */
pub mod resolve;
/**
 * How the tree is presented: virtual roots,
 *  download prefix, site-wide secrets.
 */
pub mod site;
/**
 * Holds the published snapshot and the
 *  readiness flag.
 */
pub mod store;
/**
 * Node types of the mirrored tree.
 */
pub mod tree;
/**
 * Helper for setting build version information
 *  at compile time.
 */
pub mod version;

pub mod prelude {
    pub use crate::access::{AccessError, AccessGate};
    pub use crate::fetcher::{FetchError, FolderListing, TreeFetcher};
    pub use crate::readme::{CommonMarkRenderer, MarkdownRenderer, ReadmeCache};
    pub use crate::refresh::{RefreshError, RefreshReport, Refresher, DEFAULT_REFRESH_INTERVAL};
    pub use crate::remote::{
        ClientProvider, Endpoints, HttpClientError, HttpRemoteClient, RemoteClient,
        RequestError, SharedClientProvider, DEFAULT_REQUEST_TIMEOUT,
    };
    pub use crate::resolve::{rewrite_path, PathResolver, ResolveError};
    pub use crate::site::{DomainSubFolder, DomainSubFolders, PassEntry, SiteConfig};
    pub use crate::store::TreeStore;
    pub use crate::tree::{Node, NodeView};
    pub use crate::version::build_info;
}
