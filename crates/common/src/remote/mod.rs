//! Everything that talks to the remote drive
//!
//! - **[`Listing`] / [`DriveItem`]**: strict schema of one listing page
//! - **[`Endpoints`]**: where listings live (global or China cloud)
//! - **[`RemoteClient`] / [`ClientProvider`]**: the authenticated-client seam.
//!   Token acquisition happens elsewhere; a provider that hands out no
//!   client means nobody is logged in.
//! - **[`HttpRemoteClient`]**: the reqwest-backed client

mod client;
mod endpoints;
mod http;
mod schema;

pub use client::{ClientProvider, RemoteClient, RequestError, SharedClientProvider};
pub use endpoints::Endpoints;
pub use http::{HttpClientError, HttpRemoteClient, DEFAULT_REQUEST_TIMEOUT};
pub use schema::{DriveItem, FolderFacet, Listing};
