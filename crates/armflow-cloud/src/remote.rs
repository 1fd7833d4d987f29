//! Errors returned by the Azure Resource Manager API

use serde::Deserialize;
use std::fmt;

const NOT_FOUND_CODES: [&str; 3] = ["ResourceNotFound", "NotFound", "ResourceGroupNotFound"];

/// A failed remote call.
///
/// `status` is absent when the request never produced a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteError {
    pub status: Option<u16>,
    pub code: Option<String>,
    pub message: String,
}

impl RemoteError {
    pub fn new(status: u16, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            code: Some(code.into()),
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(404, "ResourceNotFound", message)
    }

    /// Transport-level failure with no HTTP response
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            status: None,
            code: None,
            message: message.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status == Some(404)
            || self
                .code
                .as_deref()
                .is_some_and(|code| NOT_FOUND_CODES.contains(&code))
    }

    /// Build from a non-success response body, falling back to the raw text.
    pub fn from_response(status: u16, body: &str) -> Self {
        match serde_json::from_str::<ErrorEnvelope>(body) {
            Ok(envelope) => Self {
                status: Some(status),
                code: Some(envelope.error.code),
                message: envelope.error.message,
            },
            Err(_) => Self {
                status: Some(status),
                code: None,
                message: if body.trim().is_empty() {
                    format!("unexpected status {status}")
                } else {
                    body.trim().to_string()
                },
            },
        }
    }
}

impl fmt::Display for RemoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.status, &self.code) {
            (Some(status), Some(code)) => write!(f, "{} ({status} {code})", self.message),
            (Some(status), None) => write!(f, "{} ({status})", self.message),
            _ => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for RemoteError {}

impl From<reqwest::Error> for RemoteError {
    fn from(e: reqwest::Error) -> Self {
        match e.status() {
            Some(status) => Self {
                status: Some(status.as_u16()),
                code: None,
                message: e.to_string(),
            },
            None => Self::transport(e.to_string()),
        }
    }
}

/// `{"error": {"code": "...", "message": "..."}}`
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}
