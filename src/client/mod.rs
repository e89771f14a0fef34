//! Requests against the mouth service.
//!
//! [`ServiceClient`] wraps a [`Transport`] and applies one policy to every
//! response envelope:
//! - an error not already handled upstream is published on the [`EventBus`]
//! - a warning is published on the [`EventBus`]
//! - `data`, when present, is returned; otherwise the error (or
//!   [`ClientError::NoData`]) is
//!
//! The per-noun helpers live in [`locale`] and [`template`].

mod locale;
mod template;

use std::sync::Arc;

use serde_json::Value;

use crate::config::ServiceConfig;
use crate::error::{ClientError, Result};
use crate::events::EventBus;
use crate::transport::{Method, Response, Transport};

/// Client for one remote service
#[derive(Clone)]
pub struct ServiceClient {
    transport: Arc<dyn Transport>,
    events: EventBus,
    service: String,
}

impl ServiceClient {
    pub fn new(transport: Arc<dyn Transport>, events: EventBus, config: &ServiceConfig) -> Self {
        Self {
            transport,
            events,
            service: config.name.clone(),
        }
    }

    /// Name of the service requests are addressed to
    pub fn service(&self) -> &str {
        &self.service
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// Send one request and unwrap its envelope
    pub async fn request(&self, method: Method, noun: &str, body: Value) -> Result<Value> {
        tracing::debug!(%method, service = %self.service, noun, "Sending request");

        let response = match self
            .transport
            .request(method, &self.service, noun, body)
            .await
        {
            Ok(response) => response,
            Err(e) => {
                self.events.error(e.to_string());
                return Err(e);
            }
        };

        self.unwrap_response(noun, response)
    }

    fn unwrap_response(&self, noun: &str, response: Response) -> Result<Value> {
        let Response {
            data,
            error,
            warning,
            handled,
        } = response;

        if let Some(error) = &error {
            if !handled {
                self.events.error(error.message());
            }
        }

        if let Some(warning) = warning {
            self.events.warning(warning);
        }

        match (data, error) {
            (Some(data), _) => Ok(data),
            (None, Some(error)) => Err(ClientError::Service(error)),
            (None, None) => Err(ClientError::NoData {
                noun: noun.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ServiceError, SMTP_ERROR};
    use crate::events::ServiceEvent;
    use crate::transport::MemoryTransport;
    use async_trait::async_trait;
    use serde_json::json;

    /// Transport that never reaches the service
    struct UnreachableTransport;

    #[async_trait]
    impl Transport for UnreachableTransport {
        async fn request(
            &self,
            _method: Method,
            service: &str,
            _noun: &str,
            _body: Value,
        ) -> Result<Response> {
            Err(ClientError::Transport(format!("{} unreachable", service)))
        }
    }

    fn client_with(transport: Arc<MemoryTransport>) -> ServiceClient {
        ServiceClient::new(transport, EventBus::new(), &ServiceConfig::default())
    }

    #[tokio::test]
    async fn test_unhandled_error_is_published() {
        let transport = Arc::new(MemoryTransport::new());
        transport.fail_next(ServiceError::new(SMTP_ERROR, "relay down"));
        let client = client_with(transport);
        let mut events = client.events().subscribe();

        let result = client.request(Method::Read, "locale", json!({})).await;

        assert!(matches!(result, Err(ClientError::Service(ref e)) if e.code == SMTP_ERROR));
        assert_eq!(
            events.try_recv().unwrap(),
            ServiceEvent::Error("1303: relay down".to_string())
        );
    }

    #[tokio::test]
    async fn test_handled_error_is_not_published() {
        let transport = Arc::new(MemoryTransport::new());
        let mut response = Response::error(ServiceError::new(SMTP_ERROR, "relay down"));
        response.handled = true;
        transport.enqueue_response(response);
        let client = client_with(transport);
        let mut events = client.events().subscribe();

        let result = client.request(Method::Read, "locale", json!({})).await;

        assert!(matches!(result, Err(ClientError::Service(_))));
        assert!(events.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_warning_is_published_and_data_returned() {
        let transport = Arc::new(MemoryTransport::new());
        transport.enqueue_response(Response::data(json!("abc")).with_warning(json!("slow down")));
        let client = client_with(transport);
        let mut events = client.events().subscribe();

        let data = client.request(Method::Create, "locale", json!({})).await.unwrap();

        assert_eq!(data, json!("abc"));
        assert_eq!(
            events.try_recv().unwrap(),
            ServiceEvent::Warning(json!("slow down"))
        );
    }

    #[tokio::test]
    async fn test_transport_failure_is_published_and_returned() {
        let client = ServiceClient::new(
            Arc::new(UnreachableTransport),
            EventBus::new(),
            &ServiceConfig::default(),
        );
        let mut events = client.events().subscribe();

        let result = client.request(Method::Read, "locale", json!({})).await;

        assert!(matches!(result, Err(ClientError::Transport(ref msg)) if msg == "mouth unreachable"));
        assert_eq!(
            events.try_recv().unwrap(),
            ServiceEvent::Error("Transport error: mouth unreachable".to_string())
        );
    }

    #[tokio::test]
    async fn test_empty_envelope_is_no_data() {
        let transport = Arc::new(MemoryTransport::new());
        transport.enqueue_response(Response::default());
        let client = client_with(transport);

        let result = client.request(Method::Read, "templates", json!({})).await;
        assert!(matches!(result, Err(ClientError::NoData { ref noun }) if noun == "templates"));
    }
}
