//! One-shot HTTP requests against arbitrary endpoints.
//!
//! Input is validated in full before anything is sent; the outcome is either a
//! complete [`TestResponse`] or a single [`RequestError`].

mod transport;

pub use transport::{HttpTransport, OutgoingRequest, RawResponse, ReqwestTransport};

use reqwest::Url;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::time::Instant;
use tracing::{info, warn};

use crate::config::TesterConfig;
use crate::errors::RequestError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn parse(value: &str) -> Result<Self, RequestError> {
        match value.trim().to_ascii_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "DELETE" => Ok(HttpMethod::Delete),
            _ => Err(RequestError::UnsupportedMethod(value.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }

    pub(crate) fn as_reqwest(&self) -> reqwest::Method {
        match self {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestResponse {
    pub status: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
    pub truncated: bool,
    pub elapsed_ms: u64,
}

impl TestResponse {
    /// Body re-parsed as JSON, when it is JSON.
    pub fn json_body(&self) -> Option<Value> {
        serde_json::from_str(&self.body).ok()
    }
}

fn parse_headers(text: &str) -> Result<BTreeMap<String, String>, RequestError> {
    if text.trim().is_empty() {
        return Ok(BTreeMap::new());
    }
    let value: Value =
        serde_json::from_str(text).map_err(|e| RequestError::MalformedHeaders(e.to_string()))?;
    let Value::Object(object) = value else {
        return Err(RequestError::MalformedHeaders(
            "expected a JSON object".to_string(),
        ));
    };

    let mut headers = BTreeMap::new();
    for (name, value) in object {
        match value {
            Value::String(s) => {
                headers.insert(name, s);
            }
            other => {
                return Err(RequestError::MalformedHeaders(format!(
                    "value of {:?} must be a string, got {}",
                    name, other
                )))
            }
        }
    }
    transport::validate_headers(&headers)?;
    Ok(headers)
}

fn parse_body(method: HttpMethod, text: &str) -> Result<Option<Value>, RequestError> {
    if method == HttpMethod::Get || text.trim().is_empty() {
        return Ok(None);
    }
    serde_json::from_str(text)
        .map(Some)
        .map_err(|e| RequestError::MalformedBody(e.to_string()))
}

fn parse_url(url: &str) -> Result<Url, RequestError> {
    let invalid = |reason: String| RequestError::InvalidUrl {
        url: url.to_string(),
        reason,
    };
    let parsed = Url::parse(url.trim()).map_err(|e| invalid(e.to_string()))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(invalid(format!("unsupported scheme {:?}", other))),
    }
}

impl OutgoingRequest {
    /// Validate user input. Blank headers or body mean "none"; the body is
    /// ignored for GET.
    pub fn parse(method: &str, url: &str, headers: &str, body: &str) -> Result<Self, RequestError> {
        let method = HttpMethod::parse(method)?;
        let url = parse_url(url)?;
        let headers = parse_headers(headers)?;
        let body = parse_body(method, body)?;
        Ok(Self {
            method,
            url,
            headers,
            body,
        })
    }
}

pub(crate) fn truncate_chars(text: String, max_chars: usize) -> (String, bool) {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => (text[..cut].to_string(), true),
        None => (text, false),
    }
}

/// Send one request and shape the response for display.
pub async fn test_endpoint<T>(
    transport: &T,
    config: &TesterConfig,
    method: &str,
    url: &str,
    headers: &str,
    body: &str,
) -> Result<TestResponse, RequestError>
where
    T: HttpTransport + ?Sized,
{
    let request = OutgoingRequest::parse(method, url, headers, body).map_err(|e| {
        warn!("Rejected request input: {}", e);
        e
    })?;

    info!("Testing {} {}", request.method, request.url);
    let started = Instant::now();
    let raw = transport.send(request).await.map_err(|e| {
        warn!("Request failed: {}", e);
        e
    })?;
    let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

    let mut headers: BTreeMap<String, String> = BTreeMap::new();
    for (name, value) in raw.headers {
        headers
            .entry(name)
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(&value);
            })
            .or_insert(value);
    }

    let (body, cut) = truncate_chars(raw.body, config.max_body_chars);
    let truncated = raw.truncated || cut;
    info!("Received status {} in {}ms", raw.status, elapsed_ms);

    Ok(TestResponse {
        status: raw.status,
        headers,
        body,
        truncated,
        elapsed_ms,
    })
}
