use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::error::UpstreamError;

/// Browser-like identifier; both upstream services reject default client agents.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/119.0.0.0 Safari/537.36";

/// Raw result of one HTTP exchange.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub url: String,
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_json(&self) -> bool {
        self.content_type
            .as_deref()
            .map(|ct| ct.to_ascii_lowercase().contains("application/json"))
            .unwrap_or(false)
    }

    /// Decode the body regardless of status or content type.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, UpstreamError> {
        serde_json::from_slice(&self.body).map_err(|e| UpstreamError::InvalidBody {
            url: self.url.clone(),
            status: self.status,
            reason: e.to_string(),
        })
    }

    /// Decode the body of a successful JSON response. Anything else, such as
    /// an HTML error page served with 200, is an upstream error.
    pub fn expect_json<T: DeserializeOwned>(&self) -> Result<T, UpstreamError> {
        if !self.is_success() {
            return Err(UpstreamError::Status {
                url: self.url.clone(),
                status: self.status,
            });
        }

        if !self.is_json() {
            return Err(UpstreamError::UnexpectedContentType {
                url: self.url.clone(),
                status: self.status,
                content_type: self.content_type.clone().unwrap_or_else(|| "none".to_string()),
            });
        }

        self.json()
    }
}

/// Performs single GET requests for the resolver and traversal code.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &Url) -> Result<HttpResponse, UpstreamError>;
}

/// Pooled reqwest client shared by every request of a run.
#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, UpstreamError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .gzip(true)
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &Url) -> Result<HttpResponse, UpstreamError> {
        debug!("GET {}", url);

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| classify(url, e))?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().await.map_err(|e| classify(url, e))?.to_vec();

        debug!("{} -> {} ({} bytes)", url, status, body.len());

        Ok(HttpResponse {
            url: url.to_string(),
            status,
            content_type,
            body,
        })
    }
}

fn classify(url: &Url, err: reqwest::Error) -> UpstreamError {
    if err.is_timeout() {
        UpstreamError::Timeout { url: url.to_string() }
    } else {
        UpstreamError::Http(err)
    }
}
