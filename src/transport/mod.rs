//! Request transport abstraction.
//!
//! Every call to the remote service goes through a [`Transport`], which
//! performs one of the four REST verbs against a `service/noun` pair and
//! hands back the raw [`Response`] envelope. Interpreting the envelope is
//! left to [`crate::client::ServiceClient`].

mod memory;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ClientError, ServiceError};

pub use memory::{MemoryTransport, INVALID_REQUEST, RECORD_EXISTS, RECORD_NOT_FOUND};

/// The verbs a transport understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Create,
    Read,
    Update,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Create => "create",
            Method::Read => "read",
            Method::Update => "update",
            Method::Delete => "delete",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result envelope returned by every request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Response {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ServiceError>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<Value>,

    /// Set when something upstream already reported the error
    #[serde(rename = "_handled", default, skip_serializing_if = "std::ops::Not::not")]
    pub handled: bool,
}

impl Response {
    pub fn data(data: Value) -> Self {
        Self {
            data: Some(data),
            ..Default::default()
        }
    }

    pub fn error(error: ServiceError) -> Self {
        Self {
            error: Some(error),
            ..Default::default()
        }
    }

    pub fn with_warning(mut self, warning: Value) -> Self {
        self.warning = Some(warning);
        self
    }
}

/// Transport for requests against the remote service.
///
/// Implementations must not interpret the envelope; errors reported by the
/// service travel inside [`Response::error`]. An `Err` is reserved for
/// failures to reach the service at all.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn request(
        &self,
        method: Method,
        service: &str,
        noun: &str,
        body: Value,
    ) -> Result<Response, ClientError>;

    async fn create(&self, service: &str, noun: &str, body: Value) -> Result<Response, ClientError> {
        self.request(Method::Create, service, noun, body).await
    }

    async fn read(&self, service: &str, noun: &str, body: Value) -> Result<Response, ClientError> {
        self.request(Method::Read, service, noun, body).await
    }

    async fn update(&self, service: &str, noun: &str, body: Value) -> Result<Response, ClientError> {
        self.request(Method::Update, service, noun, body).await
    }

    async fn delete(&self, service: &str, noun: &str, body: Value) -> Result<Response, ClientError> {
        self.request(Method::Delete, service, noun, body).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_envelope_wire_format() {
        let res: Response = serde_json::from_value(json!({
            "error": {"code": 1303, "msg": "relay down"},
            "_handled": true
        }))
        .unwrap();

        assert!(res.data.is_none());
        assert!(res.handled);
        assert_eq!(res.error.unwrap().code, 1303);

        let encoded = serde_json::to_value(Response::data(json!([]))).unwrap();
        assert_eq!(encoded, json!({"data": []}));
    }
}
