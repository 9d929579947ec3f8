//! The HTTP gateway every endpoint call flows through.
//!
//! # Purpose
//! Builds requests against the configured origin, attaches the bearer
//! token when a session holds one, and maps every failure into the
//! [`ApiError`] taxonomy. Endpoint modules describe requests; only this
//! module talks to the wire.
//!
//! # Key invariants
//! - A 401 from any endpoint tears the session down before the error is
//!   returned; no caller observes a 401 with the session still live.
//! - A 2xx response whose envelope says `success: false` is a server
//!   error, not a success.
//! - Response bodies are read once; classification and decoding work from
//!   the same buffered text.
use crate::config::ClientConfig;
use crate::session::SessionStore;
use bytes::Bytes;
use hms_api::{ApiError, ApiResult, Envelope, FieldViolation};
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// A wire-ready multipart body: text parts plus at most a handful of
/// file parts.
#[derive(Debug, Clone, Default)]
pub struct MultipartPayload {
    parts: Vec<MultipartPart>,
}

#[derive(Debug, Clone)]
enum MultipartPart {
    Text {
        name: String,
        value: String,
    },
    File {
        name: String,
        file_name: String,
        content_type: String,
        bytes: Bytes,
    },
}

impl MultipartPayload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parts.push(MultipartPart::Text {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    pub fn file(
        mut self,
        name: impl Into<String>,
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Bytes,
    ) -> Self {
        self.parts.push(MultipartPart::File {
            name: name.into(),
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        });
        self
    }

    fn into_form(self) -> ApiResult<reqwest::multipart::Form> {
        let mut form = reqwest::multipart::Form::new();
        for part in self.parts {
            form = match part {
                MultipartPart::Text { name, value } => form.text(name, value),
                MultipartPart::File {
                    name,
                    file_name,
                    content_type,
                    bytes,
                } => {
                    let part = reqwest::multipart::Part::stream(reqwest::Body::from(bytes))
                        .file_name(file_name)
                        .mime_str(&content_type)
                        .map_err(|err| {
                            ApiError::Transport(format!("invalid multipart content type: {err}"))
                        })?;
                    form.part(name, part)
                }
            };
        }
        Ok(form)
    }
}

#[derive(Debug, Clone)]
pub enum RequestBody {
    Empty,
    Json(serde_json::Value),
    Multipart(MultipartPayload),
}

/// Everything an endpoint needs to say about one request.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: RequestBody,
}

impl RequestDescriptor {
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: RequestBody::Empty,
        }
    }

    pub fn query(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((name.into(), value.to_string()));
        self
    }

    pub fn query_opt(self, name: impl Into<String>, value: Option<impl ToString>) -> Self {
        match value {
            Some(value) => self.query(name, value),
            None => self,
        }
    }

    pub fn json<T: Serialize>(mut self, body: &T) -> ApiResult<Self> {
        let value = serde_json::to_value(body)
            .map_err(|err| ApiError::Transport(format!("encode request body: {err}")))?;
        self.body = RequestBody::Json(value);
        Ok(self)
    }

    pub fn multipart(mut self, payload: MultipartPayload) -> Self {
        self.body = RequestBody::Multipart(payload);
        self
    }
}

pub struct Gateway {
    http: reqwest::Client,
    base_url: String,
    session: Arc<SessionStore>,
}

impl Gateway {
    pub fn new(config: &ClientConfig, session: Arc<SessionStore>) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.request_timeout)
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    /// Send a request and decode the envelope's `data` as `T`.
    pub async fn send<T: DeserializeOwned>(&self, descriptor: RequestDescriptor) -> ApiResult<T> {
        let (status, text) = self.dispatch(descriptor).await?;
        let envelope: Envelope<T> = serde_json::from_str(&text)
            .map_err(|err| ApiError::Transport(format!("decode response body: {err}")))?;
        if !envelope.success {
            return Err(ApiError::Server {
                status: status.as_u16(),
                message: envelope.message_or("request failed").to_string(),
            });
        }
        envelope.data.ok_or_else(|| ApiError::Server {
            status: status.as_u16(),
            message: "response envelope is missing data".to_string(),
        })
    }

    /// Send a request where only the envelope's success flag matters.
    pub async fn send_unit(&self, descriptor: RequestDescriptor) -> ApiResult<()> {
        let (status, text) = self.dispatch(descriptor).await?;
        let envelope: Envelope<serde_json::Value> = serde_json::from_str(&text)
            .map_err(|err| ApiError::Transport(format!("decode response body: {err}")))?;
        if !envelope.success {
            return Err(ApiError::Server {
                status: status.as_u16(),
                message: envelope.message_or("request failed").to_string(),
            });
        }
        Ok(())
    }

    /// Send a request whose success body is raw bytes, not an envelope.
    pub async fn send_bytes(&self, descriptor: RequestDescriptor) -> ApiResult<Bytes> {
        let response = self.execute(descriptor).await?;
        let status = response.status();
        if status.is_success() {
            return response
                .bytes()
                .await
                .map_err(|err| ApiError::Transport(format!("read response body: {err}")));
        }
        let text = response.text().await.unwrap_or_default();
        Err(self.classify_failure(status, &text))
    }

    async fn dispatch(&self, descriptor: RequestDescriptor) -> ApiResult<(StatusCode, String)> {
        let response = self.execute(descriptor).await?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|err| ApiError::Transport(format!("read response body: {err}")))?;
        if status.is_success() {
            return Ok((status, text));
        }
        Err(self.classify_failure(status, &text))
    }

    async fn execute(&self, descriptor: RequestDescriptor) -> ApiResult<reqwest::Response> {
        let url = format!("{}{}", self.base_url, descriptor.path);
        tracing::debug!(method = %descriptor.method, path = %descriptor.path, "sending request");
        let mut builder = self.http.request(descriptor.method, &url);
        if !descriptor.query.is_empty() {
            builder = builder.query(&descriptor.query);
        }
        if let Some(token) = self.session.token() {
            builder = builder.bearer_auth(token);
        }
        builder = match descriptor.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(&value),
            RequestBody::Multipart(payload) => builder.multipart(payload.into_form()?),
        };
        builder
            .send()
            .await
            .map_err(|err| ApiError::Transport(err.to_string()))
    }

    fn classify_failure(&self, status: StatusCode, body: &str) -> ApiError {
        let envelope: Option<Envelope<serde_json::Value>> = serde_json::from_str(body).ok();
        let message = envelope
            .as_ref()
            .and_then(|envelope| envelope.message.clone())
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            });
        match status {
            StatusCode::UNAUTHORIZED => {
                self.session.handle_unauthorized();
                ApiError::Unauthorized(message)
            }
            StatusCode::FORBIDDEN => ApiError::Forbidden(message),
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => ApiError::Validation {
                message,
                fields: envelope
                    .and_then(|envelope| envelope.data)
                    .map(field_violations)
                    .unwrap_or_default(),
            },
            _ => ApiError::Server {
                status: status.as_u16(),
                message,
            },
        }
    }
}

// A validation envelope may carry a `{ field: message }` object in `data`.
fn field_violations(data: serde_json::Value) -> Vec<FieldViolation> {
    match data {
        serde_json::Value::Object(map) => map
            .into_iter()
            .filter_map(|(field, value)| {
                value.as_str().map(|message| FieldViolation {
                    field,
                    message: message.to_string(),
                })
            })
            .collect(),
        _ => Vec::new(),
    }
}
