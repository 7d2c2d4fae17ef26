//! In-memory transport for tests: canned responses per path, every request recorded.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Mutex;
use url::Url;

use super::transport::{HttpResponse, Transport};
use crate::error::UpstreamError;

enum Reply {
    Respond {
        status: u16,
        content_type: Option<String>,
        body: Vec<u8>,
    },
    Timeout,
}

struct Route {
    path: String,
    query: Option<(String, String)>,
    reply: Reply,
}

#[derive(Default)]
pub struct ScriptedTransport {
    routes: Vec<Route>,
    requests: Mutex<Vec<Url>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn route(mut self, path: &str, query: Option<(&str, &str)>, reply: Reply) -> Self {
        self.routes.push(Route {
            path: path.to_string(),
            query: query.map(|(k, v)| (k.to_string(), v.to_string())),
            reply,
        });
        self
    }

    pub fn json(self, path: &str, body: Value) -> Self {
        self.respond(path, None, 200, Some("application/json; charset=utf-8"), body.to_string())
    }

    /// JSON reply only for requests carrying `key=value` in their query.
    pub fn json_when(self, path: &str, key: &str, value: &str, body: Value) -> Self {
        self.respond(path, Some((key, value)), 200, Some("application/json; charset=utf-8"), body.to_string())
    }

    pub fn status(self, path: &str, status: u16) -> Self {
        self.respond(path, None, status, Some("application/json"), "{}".to_string())
    }

    pub fn html(self, path: &str, status: u16, body: &str) -> Self {
        self.respond(path, None, status, Some("text/html"), body.to_string())
    }

    pub fn timeout(self, path: &str) -> Self {
        self.route(path, None, Reply::Timeout)
    }

    fn respond(self, path: &str, query: Option<(&str, &str)>, status: u16, content_type: Option<&str>, body: String) -> Self {
        self.route(
            path,
            query,
            Reply::Respond {
                status,
                content_type: content_type.map(str::to_string),
                body: body.into_bytes(),
            },
        )
    }

    pub fn requests(&self) -> Vec<Url> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_paths(&self) -> Vec<String> {
        self.requests().iter().map(|url| url.path().to_string()).collect()
    }

    pub fn count(&self, path: &str) -> usize {
        self.requests().iter().filter(|url| url.path() == path).count()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn get(&self, url: &Url) -> Result<HttpResponse, UpstreamError> {
        self.requests.lock().unwrap().push(url.clone());

        let route = self.routes.iter().find(|route| {
            route.path == url.path()
                && route.query.as_ref().map_or(true, |(key, value)| {
                    url.query_pairs().any(|(k, v)| k == key.as_str() && v == value.as_str())
                })
        });

        match route.map(|route| &route.reply) {
            Some(Reply::Respond { status, content_type, body }) => Ok(HttpResponse {
                url: url.to_string(),
                status: *status,
                content_type: content_type.clone(),
                body: body.clone(),
            }),
            Some(Reply::Timeout) => Err(UpstreamError::Timeout { url: url.to_string() }),
            None => Ok(HttpResponse {
                url: url.to_string(),
                status: 404,
                content_type: Some("text/plain".to_string()),
                body: b"not found".to_vec(),
            }),
        }
    }
}
