//! Route-level tests: guards, routing and CORS through the full router

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::response::Response;
use bytes::Bytes;
use tower::ServiceExt;
use url::Url;

use common::prelude::{
    Endpoints, Node, RemoteClient, RequestError, SharedClientProvider, SiteConfig,
};
use gateway::http_server::router;
use gateway::ServiceState;

struct OfflineClient;

#[async_trait]
impl RemoteClient for OfflineClient {
    async fn get(&self, url: &Url) -> Result<Bytes, RequestError> {
        Err(RequestError::Transport {
            url: url.clone(),
            message: "offline".to_string(),
        })
    }
}

fn tree() -> Node {
    let mut docs = Node::folder("docs", "/docs");
    docs.password = "s3cr3t".to_string();
    docs.children
        .push(Node::file(".password", "/docs/.password", "", 0));
    docs.children.push(Node::file(
        "guide.pdf",
        "/docs/guide.pdf",
        "https://dl.test/docs/guide.pdf",
        1024,
    ));

    let mut root = Node::root();
    root.children.push(docs);
    root.children
        .push(Node::file("a.txt", "/a.txt", "https://dl.test/a.txt", 3));
    root
}

fn state(logged_in: bool, ready: bool) -> ServiceState {
    let provider = Arc::new(SharedClientProvider::default());
    if logged_in {
        provider.set(Arc::new(OfflineClient));
    }

    let state = ServiceState::new(
        provider,
        Endpoints::global(),
        SiteConfig::default(),
        Duration::from_secs(3600),
    );
    if ready {
        state.store().set_root(tree());
        state.store().set_ready(true);
    }
    state
}

async fn get(state: ServiceState, uri: &str, pass: Option<&str>) -> Response {
    let mut request = Request::builder().uri(uri).header("origin", "https://files.example");
    if let Some(pass) = pass {
        request = request.header("pass", pass);
    }
    router(state)
        .oneshot(request.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn json(response: Response) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_logged_out_redirects_to_login() {
    let response = get(state(false, false), "/onedrive/getpath?path=/", None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json(response).await["code"], "redirect_login");

    let response = get(state(false, false), "/info/site", None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_not_ready_until_first_build() {
    let response = get(state(true, false), "/onedrive/getpath?path=/", None).await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json(response).await["code"], "load_not_ready");

    let response = get(state(true, false), "/_status/readyz", None).await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let response = get(state(true, true), "/_status/readyz", None).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_folder_pass_guard() {
    let response = get(state(true, true), "/onedrive/getpath?path=/docs", None).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(json(response).await["code"], "pass_error");

    let response = get(state(true, true), "/onedrive/getpath?path=/docs", Some("s3cr3t")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json(response).await;
    assert_eq!(body["data"]["path"], "/docs");
    assert_eq!(body["data"]["children"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_file_listing_needs_folder_pass() {
    let uri = "/onedrive/getpath?path=/docs/guide.pdf";
    let response = get(state(true, true), uri, None).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = json(response).await;
    assert_eq!(body["code"], "pass_error");
    assert!(body.get("data").is_none());

    let response = get(state(true, true), uri, Some("s3cr3t")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json(response).await["data"]["downloadUrl"],
        "https://dl.test/docs/guide.pdf"
    );

    let response = get(state(true, true), "/d/docs/guide.pdf", None).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_listing_and_download() {
    let response = get(state(true, true), "/onedrive/getpath", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json(response).await;
    assert_eq!(body["data"]["path"], "/");
    assert_eq!(body["data"]["children"][1]["downloadUrl"], "https://dl.test/a.txt");

    let response = get(state(true, true), "/d/a.txt", None).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(response.headers()["location"], "https://dl.test/a.txt");
}

#[tokio::test]
async fn test_liveness_and_fallback() {
    let response = get(state(false, false), "/_status/livez", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get(state(true, true), "/nowhere", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cors_allows_pass_header() {
    let request = Request::builder()
        .method("OPTIONS")
        .uri("/onedrive/getpath")
        .header("origin", "https://files.example")
        .header("access-control-request-method", "GET")
        .header("access-control-request-headers", "pass")
        .body(Body::empty())
        .unwrap();

    let response = router(state(true, true)).oneshot(request).await.unwrap();
    let allowed = response.headers()["access-control-allow-headers"]
        .to_str()
        .unwrap()
        .to_string();
    assert!(allowed.contains("pass"));
    assert_eq!(response.headers()["access-control-allow-origin"], "*");
}
