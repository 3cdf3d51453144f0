use std::time::Duration;

use once_cell::sync::Lazy;
use reqwest::Client;
use serde_json::Value;
use thiserror::Error;

const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 6;
const ERROR_PREVIEW_CHARS: usize = 180;

static DEFAULT_CLIENT: Lazy<Client> = Lazy::new(|| {
    build_client(DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_CONNECT_TIMEOUT_SECS)
});

pub fn build_client(timeout_secs: u64, connect_timeout_secs: u64) -> Client {
    Client::builder()
        .user_agent("directcreate/0.1")
        .timeout(Duration::from_secs(timeout_secs.max(1)))
        .connect_timeout(Duration::from_secs(connect_timeout_secs.max(1)))
        .build()
        .expect("failed to build HTTP client")
}

/// Shared client with default timeouts. reqwest clients are cheap to clone.
pub fn shared_client() -> Client {
    DEFAULT_CLIENT.clone()
}

/// Every expected remote failure becomes a value of this type; nothing in
/// the gateway panics or escapes as an unhandled rejection.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum GatewayError {
    #[error("request failed: {url}: {message}")]
    Transport { url: String, message: String },
    #[error("{url} returned {status}: {preview}")]
    Status {
        url: String,
        status: u16,
        preview: String,
    },
    #[error("invalid JSON response from {url}: {message}")]
    InvalidFormat { url: String, message: String },
    #[error("server does not support path {path}; available: {}", available.join(", "))]
    UnknownEndpoint { path: String, available: Vec<String> },
    #[error("API reported failure for {path}: {message}")]
    Rejected { path: String, message: String },
}

/// Send a prepared request and decode the JSON body. `url` is the label
/// used in error values (the logical endpoint, query noise omitted).
pub async fn execute_json(
    url: &str,
    request: reqwest::RequestBuilder,
) -> Result<Value, GatewayError> {
    let response = request.send().await.map_err(|e| transport(url, e))?;
    decode_response(url, response).await
}

async fn decode_response(url: &str, response: reqwest::Response) -> Result<Value, GatewayError> {
    let status = response.status();
    let body = response.text().await.map_err(|e| transport(url, e))?;
    if !status.is_success() {
        return Err(GatewayError::Status {
            url: url.to_string(),
            status: status.as_u16(),
            preview: body.chars().take(ERROR_PREVIEW_CHARS).collect(),
        });
    }
    serde_json::from_str(&body).map_err(|e| GatewayError::InvalidFormat {
        url: url.to_string(),
        message: e.to_string(),
    })
}

fn transport(url: &str, error: reqwest::Error) -> GatewayError {
    GatewayError::Transport {
        url: url.to_string(),
        message: error.to_string(),
    }
}

/// Number, or a string holding a number with separators/percent signs.
pub fn coerce_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let sanitized = s.trim().replace(',', "").replace('%', "").replace('_', "");
            sanitized.parse::<f64>().ok()
        }
        _ => None,
    }
}

/// Integer id, or a numeric-string id.
pub fn coerce_id(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    }
}
