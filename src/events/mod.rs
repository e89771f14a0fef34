//! Application-wide error and warning signals.
//!
//! Request helpers publish here whenever the service reports an unhandled
//! error or a warning, so UI layers can surface them in one place instead of
//! at every call site.

use serde_json::Value;
use tokio::sync::broadcast;

const DEFAULT_CAPACITY: usize = 64;

/// A signal raised by the request layer
#[derive(Debug, Clone, PartialEq)]
pub enum ServiceEvent {
    /// Rendered error message, e.g. `1303: relay down`
    Error(String),
    /// Warning payload exactly as sent by the service
    Warning(Value),
}

/// Broadcast bus for [`ServiceEvent`]s.
///
/// Cloning shares the same channel. Publishing with no receivers is fine;
/// the event is dropped.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<ServiceEvent>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ServiceEvent> {
        self.sender.subscribe()
    }

    pub fn error(&self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!(error = %message, "Service error");
        let _ = self.sender.send(ServiceEvent::Error(message));
    }

    pub fn warning(&self, warning: Value) {
        tracing::debug!(warning = %warning, "Service warning");
        let _ = self.sender.send(ServiceEvent::Warning(warning));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_events_reach_every_receiver() {
        let bus = EventBus::new();
        let mut first = bus.subscribe();
        let mut second = bus.subscribe();

        bus.error("1303: relay down");
        bus.warning(json!("quota nearly reached"));

        for rx in [&mut first, &mut second] {
            assert_eq!(
                rx.recv().await.unwrap(),
                ServiceEvent::Error("1303: relay down".to_string())
            );
            assert_eq!(
                rx.recv().await.unwrap(),
                ServiceEvent::Warning(json!("quota nearly reached"))
            );
        }
    }

    #[test]
    fn test_publish_without_receivers() {
        let bus = EventBus::new();
        bus.error("nobody listening");
    }
}
