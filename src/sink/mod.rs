//! Trait abstraction for command delivery to enable testing

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;

pub mod websocket;

pub use websocket::WebSocketSink;

/// Trait for delivering named commands to the cockpit server
#[async_trait]
pub trait CommandSink: Send {
    /// Send one command with its JSON payload
    async fn send(&mut self, name: &str, payload: Value) -> Result<()>;

    /// Close the underlying connection
    async fn close(&mut self) -> Result<()>;
}


#[cfg(test)]
mod tests {
    use super::mocks::MockCommandSink;
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_mock_sink_records_commands_in_order() {
        let mut sink = MockCommandSink::new();
        sink.send("/pilot/move", json!({"action": "back", "speed": 0.2}))
            .await
            .unwrap();
        sink.send("/pilot/drone", json!({"action": "stop"})).await.unwrap();

        let sent = sink.get_sent_commands();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].0, "/pilot/move");
        assert_eq!(sent[1].1, json!({"action": "stop"}));
    }

    #[tokio::test]
    async fn test_mock_sink_injected_failure() {
        let mut sink = MockCommandSink::new();
        sink.set_send_error(true);
        assert!(sink.send("/pilot/move", json!({})).await.is_err());
        assert!(sink.get_sent_commands().is_empty());

        // Recovery after the fault clears
        sink.set_send_error(false);
        assert!(sink.send("/pilot/move", json!({})).await.is_ok());
    }
}
