//! Shared test utilities: a scripted stand-in for the remote drive
#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;
use serde_json::{json, Value};
use url::Url;

use common::fetcher::{TreeFetcher, PAGE_SIZE};
use common::readme::{CommonMarkRenderer, ReadmeCache};
use common::refresh::Refresher;
use common::remote::{Endpoints, RemoteClient, RequestError, SharedClientProvider};
use common::site::SiteConfig;
use common::store::TreeStore;

#[derive(Debug, Clone)]
pub enum Reply {
    Body(String),
    Timeout,
    Status(u16),
}

/// Answers GETs from a script keyed by url. Each url replays its replies in
///  order and keeps repeating the last one.
#[derive(Default)]
pub struct ScriptedClient {
    routes: Mutex<HashMap<String, VecDeque<Reply>>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedClient {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn route(&self, url: impl Into<String>, replies: Vec<Reply>) {
        self.routes.lock().insert(url.into(), replies.into());
    }

    pub fn body(&self, url: impl Into<String>, body: impl Into<String>) {
        self.route(url, vec![Reply::Body(body.into())]);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    pub fn calls_to(&self, url: &str) -> usize {
        self.calls.lock().iter().filter(|c| c.as_str() == url).count()
    }
}

#[async_trait]
impl RemoteClient for ScriptedClient {
    async fn get(&self, url: &Url) -> Result<Bytes, RequestError> {
        self.calls.lock().push(url.to_string());

        let reply = {
            let mut routes = self.routes.lock();
            match routes.get_mut(url.as_str()) {
                Some(queue) if queue.len() > 1 => queue.pop_front(),
                Some(queue) => queue.front().cloned(),
                None => None,
            }
        };

        match reply {
            Some(Reply::Body(body)) => Ok(Bytes::from(body)),
            Some(Reply::Timeout) => Err(RequestError::Timeout(url.clone())),
            Some(Reply::Status(status)) => Err(RequestError::Status {
                url: url.clone(),
                status,
                message: "scripted failure".to_string(),
            }),
            None => Err(RequestError::Status {
                url: url.clone(),
                status: 404,
                message: "no route".to_string(),
            }),
        }
    }
}

/// First listing page url of the folder at `path`
pub fn children_url(path: &str) -> String {
    Endpoints::global().children(path, PAGE_SIZE).to_string()
}

pub fn folder(name: &str) -> Value {
    json!({
        "name": name,
        "size": 0,
        "lastModifiedDateTime": "2024-03-01T10:00:00Z",
        "folder": { "childCount": 0 }
    })
}

pub fn file(name: &str, download_url: &str, size: u64) -> Value {
    json!({
        "name": name,
        "size": size,
        "lastModifiedDateTime": "2024-03-01T10:00:00Z",
        "file": { "mimeType": "application/octet-stream" },
        "@microsoft.graph.downloadUrl": download_url
    })
}

pub fn page(items: Vec<Value>, next_link: Option<&str>) -> String {
    let mut page = json!({ "value": items });
    if let Some(next) = next_link {
        page["@odata.nextLink"] = json!(next);
    }
    page.to_string()
}

pub fn logged_in(client: Arc<ScriptedClient>) -> Arc<SharedClientProvider> {
    let client: Arc<dyn RemoteClient> = client;
    Arc::new(SharedClientProvider::new(Some(client)))
}

pub fn fetcher(client: Arc<ScriptedClient>) -> TreeFetcher {
    TreeFetcher::new(logged_in(client), Endpoints::global())
}

pub struct Harness {
    pub client: Arc<ScriptedClient>,
    pub provider: Arc<SharedClientProvider>,
    pub store: Arc<TreeStore>,
    pub readmes: ReadmeCache,
    pub refresher: Arc<Refresher>,
}

/// A refresher wired to a scripted drive, nothing published yet
pub fn harness(client: Arc<ScriptedClient>, site: SiteConfig) -> Harness {
    let provider = logged_in(client.clone());
    let store = Arc::new(TreeStore::new());
    let readmes = ReadmeCache::new();
    let refresher = Arc::new(Refresher::new(
        TreeFetcher::new(provider.clone(), Endpoints::global()),
        store.clone(),
        readmes.clone(),
        Arc::new(CommonMarkRenderer),
        Arc::new(site),
    ));

    Harness {
        client,
        provider,
        store,
        readmes,
        refresher,
    }
}

/// Root holding `docs/` (README.md + .password) and `a.txt`
pub fn script_docs_drive(client: &ScriptedClient, secret: &str) {
    client.body(
        children_url("/"),
        page(
            vec![folder("docs"), file("a.txt", "https://dl.test/a.txt", 3)],
            None,
        ),
    );
    client.body(
        children_url("/docs"),
        page(
            vec![
                file("README.md", "https://dl.test/docs/README.md", 20),
                file(".password", "https://dl.test/docs/.password", 8),
                file("guide.pdf", "https://dl.test/docs/guide.pdf", 1024),
            ],
            None,
        ),
    );
    client.body("https://dl.test/docs/README.md", "# Docs\n\nWelcome.\n");
    client.body("https://dl.test/docs/.password", format!("{}\n", secret));
}
