//! Unified error types for the mouth client.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The content of a template could not be processed
pub const TEMPLATE_CONTENT_ERROR: i64 = 1300;
/// An attachment did not have the expected structure
pub const ATTACHMENT_STRUCTURE: i64 = 1301;
/// An attachment could not be decoded
pub const ATTACHMENT_DECODE: i64 = 1302;
/// The SMTP server rejected or failed the delivery
pub const SMTP_ERROR: i64 = 1303;

/// Short human readable label for a mouth service error code.
pub fn describe(code: i64) -> Option<&'static str> {
    match code {
        TEMPLATE_CONTENT_ERROR => Some("Template content error"),
        ATTACHMENT_STRUCTURE => Some("Invalid attachment structure"),
        ATTACHMENT_DECODE => Some("Attachment could not be decoded"),
        SMTP_ERROR => Some("SMTP error"),
        _ => None,
    }
}

/// Error body carried in a response envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceError {
    pub code: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub msg: Option<serde_json::Value>,
}

impl ServiceError {
    pub fn new(code: i64, msg: impl Into<String>) -> Self {
        Self {
            code,
            msg: Some(serde_json::Value::String(msg.into())),
        }
    }

    /// Render the error for display, e.g. `1301: Invalid attachment structure`
    pub fn message(&self) -> String {
        match &self.msg {
            Some(serde_json::Value::String(s)) => format!("{}: {}", self.code, s),
            Some(other) => format!("{}: {}", self.code, other),
            None => match describe(self.code) {
                Some(label) => format!("{}: {}", self.code, label),
                None => self.code.to_string(),
            },
        }
    }
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message())
    }
}

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Service error: {0}")]
    Service(ServiceError),

    #[error("No data returned for {noun}")]
    NoData { noun: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Transport error: {0}")]
    Transport(String),
}

pub type Result<T> = std::result::Result<T, ClientError>;
