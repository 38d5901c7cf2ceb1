//! # Error Types
//!
//! Custom error types for Gamepad Bridge using `thiserror`.

use thiserror::Error;

/// Main error type for Gamepad Bridge
#[derive(Debug, Error)]
pub enum GamepadBridgeError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// WebSocket transport errors
    #[error("WebSocket error: {0}")]
    Socket(#[from] tokio_tungstenite::tungstenite::Error),

    /// Command serialization errors
    #[error("Command serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for Gamepad Bridge
pub type Result<T> = std::result::Result<T, GamepadBridgeError>;
