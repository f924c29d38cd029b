//! HTTP plumbing for the Clowder REST API.
//!
//! Every path handed to a [`Transport`] is relative to `{url}/api/`. Bodies
//! come back as decoded JSON; an empty body decodes to `Value::Null`.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use tracing::debug;

use crate::config::{Auth, ClientConfig};
use crate::error::{ClowderError, Result};

/// Multipart payload for `uploadToDataset`.
#[derive(Debug, Clone, PartialEq)]
pub enum UploadPayload {
    /// File content, sent in the `File` field.
    Bytes { file_name: String, data: Vec<u8> },
    /// A path the service reads directly, sent in the `file` field as
    /// `{"path": ...}`.
    PathReference { path: String },
}

impl UploadPayload {
    fn into_form(self) -> Form {
        match self {
            UploadPayload::Bytes { file_name, data } => {
                Form::new().part("File", Part::bytes(data).file_name(file_name))
            }
            UploadPayload::PathReference { path } => {
                let reference = serde_json::json!({ "path": path }).to_string();
                Form::new().text("file", reference)
            }
        }
    }
}

/// Low-level REST operations. Implemented over reqwest for real use and by
/// a recording mock in tests.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<Value>;

    async fn post_json(&self, path: &str, body: &Value) -> Result<Value>;

    async fn post_multipart(&self, path: &str, payload: UploadPayload) -> Result<Value>;

    async fn delete(&self, path: &str, query: &[(&str, &str)]) -> Result<Value>;
}

pub struct HttpTransport {
    client: reqwest::Client,
    config: ClientConfig,
}

impl HttpTransport {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .danger_accept_invalid_certs(!config.verify_tls)
            .build()
            .map_err(|source| ClowderError::Transport {
                url: config.url.clone(),
                source,
            })?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn request(
        &self,
        method: reqwest::Method,
        url: &str,
        query: &[(&str, &str)],
    ) -> reqwest::RequestBuilder {
        let mut req = self.client.request(method, url);
        if !query.is_empty() {
            req = req.query(query);
        }
        match &self.config.auth {
            Auth::Anonymous => req,
            Auth::Basic { login, password } => req.basic_auth(login, Some(password)),
            Auth::Key(key) => req.query(&[("key", key.as_str())]),
        }
    }

    async fn send(&self, req: reqwest::RequestBuilder, url: String) -> Result<Value> {
        let resp = req.send().await.map_err(|source| ClowderError::Transport {
            url: url.clone(),
            source,
        })?;
        let status = resp.status();
        let text = resp.text().await.map_err(|source| ClowderError::Transport {
            url: url.clone(),
            source,
        })?;
        debug!(status = status.as_u16(), url = %url, body_len = text.len(), "response");

        if !status.is_success() {
            return Err(ClowderError::Http {
                status: status.as_u16(),
                url,
                body: text.chars().take(500).collect(),
            });
        }
        decode_body(&text)
    }
}

/// Parse a response body, treating an empty body as `null`.
fn decode_body(text: &str) -> Result<Value> {
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(text).map_err(|source| ClowderError::Decode {
        what: "response body",
        source,
    })
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<Value> {
        let url = self.config.api_url(path);
        debug!(method = "GET", path, "request");
        let req = self.request(reqwest::Method::GET, &url, query);
        self.send(req, url).await
    }

    async fn post_json(&self, path: &str, body: &Value) -> Result<Value> {
        let url = self.config.api_url(path);
        debug!(method = "POST", path, "request");
        let req = self.request(reqwest::Method::POST, &url, &[]).json(body);
        self.send(req, url).await
    }

    async fn post_multipart(&self, path: &str, payload: UploadPayload) -> Result<Value> {
        let url = self.config.api_url(path);
        debug!(method = "POST", path, "multipart request");
        let req = self
            .request(reqwest::Method::POST, &url, &[])
            .multipart(payload.into_form());
        self.send(req, url).await
    }

    async fn delete(&self, path: &str, query: &[(&str, &str)]) -> Result<Value> {
        let url = self.config.api_url(path);
        debug!(method = "DELETE", path, "request");
        let req = self.request(reqwest::Method::DELETE, &url, query);
        self.send(req, url).await
    }
}

#[cfg(test)]
pub(crate) mod mock {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum Method {
        Get,
        Post,
        Delete,
    }

    #[derive(Debug, Clone)]
    pub struct RecordedCall {
        pub method: Method,
        pub path: String,
        pub query: Vec<(String, String)>,
        pub body: Option<Value>,
        pub upload: Option<UploadPayload>,
    }

    /// Serves canned responses keyed by method and path, and records every
    /// call. Unknown routes answer 404.
    #[derive(Default)]
    pub struct MockTransport {
        routes: HashMap<(Method, String), std::result::Result<Value, u16>>,
        calls: Mutex<Vec<RecordedCall>>,
    }

    impl MockTransport {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn respond(mut self, method: Method, path: &str, body: Value) -> Self {
            self.routes.insert((method, path.to_string()), Ok(body));
            self
        }

        pub fn fail(mut self, method: Method, path: &str, status: u16) -> Self {
            self.routes.insert((method, path.to_string()), Err(status));
            self
        }

        pub fn calls(&self) -> Vec<RecordedCall> {
            self.calls.lock().unwrap().clone()
        }

        pub fn calls_with(&self, method: Method) -> Vec<RecordedCall> {
            self.calls()
                .into_iter()
                .filter(|c| c.method == method)
                .collect()
        }

        fn serve(
            &self,
            method: Method,
            path: &str,
            query: &[(&str, &str)],
            body: Option<Value>,
            upload: Option<UploadPayload>,
        ) -> Result<Value> {
            self.calls.lock().unwrap().push(RecordedCall {
                method,
                path: path.to_string(),
                query: query
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
                body,
                upload,
            });
            match self.routes.get(&(method, path.to_string())).cloned() {
                Some(Ok(value)) => Ok(value),
                Some(Err(status)) => Err(ClowderError::Http {
                    status,
                    url: path.to_string(),
                    body: String::new(),
                }),
                None => Err(ClowderError::Http {
                    status: 404,
                    url: path.to_string(),
                    body: "no route".to_string(),
                }),
            }
        }
    }

    #[async_trait]
    impl Transport for MockTransport {
        async fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<Value> {
            self.serve(Method::Get, path, query, None, None)
        }

        async fn post_json(&self, path: &str, body: &Value) -> Result<Value> {
            self.serve(Method::Post, path, &[], Some(body.clone()), None)
        }

        async fn post_multipart(&self, path: &str, payload: UploadPayload) -> Result<Value> {
            self.serve(Method::Post, path, &[], None, Some(payload))
        }

        async fn delete(&self, path: &str, query: &[(&str, &str)]) -> Result<Value> {
            self.serve(Method::Delete, path, query, None, None)
        }
    }
}
