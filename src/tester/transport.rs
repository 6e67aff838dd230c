use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Url};
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::debug;

use super::{truncate_chars, HttpMethod};
use crate::config::TesterConfig;
use crate::errors::RequestError;

/// Fully validated request, ready to go on the wire.
#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingRequest {
    pub method: HttpMethod,
    pub url: Url,
    pub headers: BTreeMap<String, String>,
    pub body: Option<Value>,
}

/// Response as received. A transport may stop reading the body early and
/// report it through `truncated`.
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
    pub truncated: bool,
}

#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Send exactly one request. No retries.
    async fn send(&self, request: OutgoingRequest) -> Result<RawResponse, RequestError>;
}

pub struct ReqwestTransport {
    client: Client,
    timeout_secs: u64,
    max_body_chars: usize,
}

impl ReqwestTransport {
    pub fn new(config: &TesterConfig) -> Result<Self, RequestError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| RequestError::Network(format!("building http client: {}", e)))?;

        Ok(Self {
            client,
            timeout_secs: config.timeout_secs,
            max_body_chars: config.max_body_chars,
        })
    }

    fn map_error(&self, e: reqwest::Error) -> RequestError {
        if e.is_timeout() {
            RequestError::Timeout(self.timeout_secs)
        } else {
            RequestError::Network(e.to_string())
        }
    }
}

/// Body bytes kept while streaming, bounded by what `max_chars` characters
/// can occupy in UTF-8 plus one byte to tell that the cap was passed.
struct BodyBuffer {
    bytes: Vec<u8>,
    limit: usize,
}

impl BodyBuffer {
    fn new(max_chars: usize) -> Self {
        Self {
            bytes: Vec::new(),
            limit: max_chars.saturating_mul(4).saturating_add(1),
        }
    }

    /// Returns false once the buffer is full and reading should stop.
    fn push(&mut self, chunk: &[u8]) -> bool {
        let room = self.limit - self.bytes.len();
        self.bytes.extend_from_slice(&chunk[..chunk.len().min(room)]);
        self.bytes.len() < self.limit
    }

    fn finish(self, max_chars: usize) -> (String, bool) {
        truncate_chars(String::from_utf8_lossy(&self.bytes).into_owned(), max_chars)
    }
}

fn header_map(headers: &BTreeMap<String, String>) -> Result<HeaderMap, RequestError> {
    let mut map = HeaderMap::new();
    for (name, value) in headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| RequestError::MalformedHeaders(format!("{}: {}", name, e)))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| RequestError::MalformedHeaders(format!("{}: {}", name.as_str(), e)))?;
        map.append(name, value);
    }
    Ok(map)
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: OutgoingRequest) -> Result<RawResponse, RequestError> {
        let headers = header_map(&request.headers)?;
        debug!("{} {}", request.method, request.url);

        let mut builder = self
            .client
            .request(request.method.as_reqwest(), request.url)
            .headers(headers);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let mut response = builder.send().await.map_err(|e| self.map_error(e))?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();

        let mut buffer = BodyBuffer::new(self.max_body_chars);
        while let Some(chunk) = response.chunk().await.map_err(|e| self.map_error(e))? {
            if !buffer.push(&chunk) {
                debug!("Body passed {} characters, closing the response", self.max_body_chars);
                break;
            }
        }
        let (body, truncated) = buffer.finish(self.max_body_chars);

        Ok(RawResponse {
            status,
            headers,
            body,
            truncated,
        })
    }
}

/// Reject header names or values that could never be sent.
pub(crate) fn validate_headers(headers: &BTreeMap<String, String>) -> Result<(), RequestError> {
    header_map(headers).map(|_| ())
}
