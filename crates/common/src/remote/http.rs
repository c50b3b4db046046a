use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderValue, InvalidHeaderValue, AUTHORIZATION};
use reqwest::Client;
use url::Url;

use super::client::{RemoteClient, RequestError};

/// Longest any single remote request may take before it counts as a timeout
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, thiserror::Error)]
pub enum HttpClientError {
    #[error("access token is empty")]
    EmptyToken,
    #[error("access token is not a valid header value: {0}")]
    InvalidToken(#[from] InvalidHeaderValue),
    #[error("failed to build http client: {0}")]
    Build(#[from] reqwest::Error),
}

/// reqwest-backed [`RemoteClient`] carrying a bearer token
#[derive(Debug, Clone)]
pub struct HttpRemoteClient {
    client: Client,
}

impl HttpRemoteClient {
    /// A token that cannot be sent is an error; requests never go out
    ///  without the bearer header
    pub fn new(access_token: &str, timeout: Duration) -> Result<Self, HttpClientError> {
        if access_token.is_empty() {
            return Err(HttpClientError::EmptyToken);
        }

        let mut value = HeaderValue::from_str(&format!("Bearer {}", access_token))?;
        value.set_sensitive(true);
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, value);

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self { client })
    }

    /// Wrap an already configured client, e.g. one managed by a token refresher
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl RemoteClient for HttpRemoteClient {
    async fn get(&self, url: &Url) -> Result<Bytes, RequestError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| classify(url, e))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(RequestError::Status {
                url: url.clone(),
                status: status.as_u16(),
                message,
            });
        }

        response.bytes().await.map_err(|e| classify(url, e))
    }
}

fn classify(url: &Url, err: reqwest::Error) -> RequestError {
    if err.is_timeout() {
        RequestError::Timeout(url.clone())
    } else {
        RequestError::Transport {
            url: url.clone(),
            message: err.to_string(),
        }
    }
}
