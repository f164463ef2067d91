//! Error model used by Tempo API client operations.

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

use crate::transport::ResponseMeta;

pub type Result<T> = std::result::Result<T, ApiError>;

/// Failure raised at the transport boundary: building the request, exchanging it, or decoding the body.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("http {}: {}", .response.status, .messages.join("; "))]
    Http {
        response: ResponseMeta,
        messages: Vec<String>,
        body: String,
    },
    #[error("authentication error ({}): {body}", .response.status)]
    Authentication { response: ResponseMeta, body: String },
    #[error("request timed out: {0}")]
    Timeout(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("unexpected error: {0}")]
    Other(String),
}

impl TransportError {
    /// Builds an HTTP error from a non-success response, pulling Jira's error messages out of the body.
    pub fn http(response: ResponseMeta, body: impl Into<String>) -> Self {
        let body = body.into();
        let mut messages = extract_error_messages(&body);
        if messages.is_empty() {
            messages.push(if body.trim().is_empty() {
                response
                    .status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            } else {
                body.clone()
            });
        }
        TransportError::Http {
            response,
            messages,
            body,
        }
    }

    /// Response metadata attached to the failure, when the server answered at all.
    pub fn response(&self) -> Option<&ResponseMeta> {
        match self {
            TransportError::Http { response, .. } | TransportError::Authentication { response, .. } => {
                Some(response)
            }
            _ => None,
        }
    }
}

impl From<reqwest::Error> for TransportError {
    /// Converts reqwest errors into semantic TransportError variants.
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout(err.to_string())
        } else if err.is_builder() {
            TransportError::InvalidRequest(err.to_string())
        } else if err.is_connect() || err.is_request() {
            TransportError::Network(err.to_string())
        } else {
            TransportError::Other(err.to_string())
        }
    }
}

/// Error returned by service operations: the underlying transport failure plus whatever response metadata was available.
#[derive(Debug, Error)]
#[error("tempo request{} failed: {source}", request_target(.response))]
pub struct ApiError {
    response: Option<ResponseMeta>,
    #[source]
    source: TransportError,
}

impl ApiError {
    pub fn wrap(response: Option<ResponseMeta>, source: TransportError) -> Self {
        Self { response, source }
    }

    pub fn response(&self) -> Option<&ResponseMeta> {
        self.response.as_ref()
    }

    pub fn status(&self) -> Option<StatusCode> {
        self.response.as_ref().map(|response| response.status)
    }

    pub fn kind(&self) -> &TransportError {
        &self.source
    }

    pub fn into_parts(self) -> (Option<ResponseMeta>, TransportError) {
        (self.response, self.source)
    }
}

impl From<TransportError> for ApiError {
    fn from(err: TransportError) -> Self {
        let response = err.response().cloned();
        ApiError::wrap(response, err)
    }
}

// Status is left to the wrapped error so it is printed once.
fn request_target(response: &Option<ResponseMeta>) -> String {
    response
        .as_ref()
        .map(|response| format!(" to {}", response.url))
        .unwrap_or_default()
}

/// Collects `errorMessages` and `errors` entries from a Jira error body.
fn extract_error_messages(body: &str) -> Vec<String> {
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return Vec::new();
    };
    let mut messages: Vec<String> = value
        .get("errorMessages")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();
    if let Some(errors) = value.get("errors").and_then(Value::as_object) {
        for (field, message) in errors {
            if let Some(text) = message.as_str() {
                messages.push(format!("{field}: {text}"));
            }
        }
    }
    messages
}
