//! # Gamepad Bridge
//!
//! Fly a webflight-style drone cockpit with a standard gamepad.
//!
//! This application bridges gamepad input to the cockpit server's WebSocket
//! command interface: sticks become `/pilot/move` commands, buttons become
//! one-shot drone commands, and releasing all sticks triggers an
//! auto-stabilize stop.

use anyhow::Result;
use std::path::Path;
use std::time::Instant;
use tokio::sync::mpsc;
use tokio::time::{interval, sleep, Duration};
use tracing::{debug, info, warn};
use tracing_subscriber;

use gamepad_bridge::config::{Config, Overrides};
use gamepad_bridge::input::{GilrsSource, InputSource};
use gamepad_bridge::pilot::GamepadPilot;
use gamepad_bridge::sink::{CommandSink, WebSocketSink};

/// Default configuration file path when none is given on the command line
const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Number of ticks between status log messages (~10 seconds at 60Hz)
const LOG_INTERVAL_TICKS: u64 = 600;

/// How one pass through the command loop ended
enum LoopExit {
    /// Ctrl+C received, exit the process
    Shutdown,
    /// The connection dropped, reconnect and keep flying
    Reconnect,
}

/// Main entry point for Gamepad Bridge application
///
/// # Control Flow
///
/// 1. **Initialization**
///    - Set up logging with tracing subscriber
///    - Load configuration (optional file path as first argument)
///    - Start the gamepad event thread
///
/// 2. **Connection Loop**
///    - Connect to the cockpit server, retrying at the configured interval
///    - Run the command loop until the connection drops, then reconnect
///
/// 3. **Command Loop**
///    - Tick at the configured poll rate
///    - Apply any server-pushed configuration overrides
///    - Translate the first controller's snapshot into commands and send them
///    - Handle Ctrl+C for graceful shutdown
///
/// # Errors
///
/// Returns error if the configuration file exists but cannot be parsed.
///
/// # Examples
///
/// Run the application:
/// ```bash
/// cargo run --release -- config/default.toml
/// ```
///
/// Expected output:
/// ```text
/// INFO gamepad_bridge: Gamepad Bridge v0.1.0 starting...
/// INFO gamepad_bridge::input::gamepad: Gamepad connected: "Xbox Wireless Controller"
/// INFO gamepad_bridge::sink::websocket: Connected to cockpit server at ws://127.0.0.1:3001/cockpit
/// INFO gamepad_bridge: Command loop running at 60Hz
/// ```
#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into())
        )
        .init();

    info!("Gamepad Bridge v{} starting...", env!("CARGO_PKG_VERSION"));

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let config = if Path::new(&config_path).exists() {
        info!("Loading configuration from {}", config_path);
        Config::load(&config_path)?
    } else {
        info!("No configuration file at {}, using defaults", config_path);
        Config::default()
    };

    let mut source = GilrsSource::start();
    let mut pilot = GamepadPilot::new(config.clone());

    let reconnect_interval = Duration::from_millis(config.socket.reconnect_interval_ms);

    // Connection loop: reconnect until Ctrl+C
    loop {
        let (sink, override_rx) = match WebSocketSink::connect(&config.socket.url).await {
            Ok(pair) => pair,
            Err(e) => {
                warn!("Connection to {} failed: {}, retrying in {:?}",
                    config.socket.url, e, reconnect_interval);
                tokio::select! {
                    _ = sleep(reconnect_interval) => continue,
                    _ = tokio::signal::ctrl_c() => break,
                }
            }
        };

        match run_command_loop(&mut pilot, &mut source, sink, override_rx, &config).await {
            LoopExit::Shutdown => break,
            LoopExit::Reconnect => continue,
        }
    }

    info!("Received Ctrl+C, shutting down...");
    pilot.suspend();
    source.shutdown();
    info!("Shutdown complete");

    Ok(())
}

/// Runs the fixed-rate command loop over one live connection.
async fn run_command_loop(
    pilot: &mut GamepadPilot,
    source: &mut GilrsSource,
    mut sink: WebSocketSink,
    mut override_rx: mpsc::Receiver<Overrides>,
    config: &Config,
) -> LoopExit {
    let period = Duration::from_secs_f64(1.0 / f64::from(config.poll.rate_hz));
    let mut poll_interval = interval(period);

    info!("Command loop running at {}Hz", config.poll.rate_hz);
    info!("Press Ctrl+C to exit");

    let mut controller_present = false;
    let mut tick_count: u64 = 0;
    let mut command_count: u64 = 0;
    let mut last_log_tick: u64 = 0;

    loop {
        tokio::select! {
            _ = poll_interval.tick() => {
                // Server overrides arrive asynchronously; fold them in
                // before reading input so this tick already uses them.
                while let Ok(overrides) = override_rx.try_recv() {
                    pilot.apply_overrides(&overrides);
                }

                let snapshots = source.poll();
                if snapshots.is_empty() {
                    if controller_present {
                        info!("No controller present, suspending");
                        pilot.suspend();
                        controller_present = false;
                    }
                    continue;
                }
                controller_present = true;

                // Single-pilot cockpit: only the first controller flies
                let commands = pilot.tick(&snapshots[0], Instant::now());
                for command in &commands {
                    if let Err(e) = sink.send(command.name(), command.payload()).await {
                        warn!("Failed to send {}: {}, reconnecting", command.name(), e);
                        let _ = sink.close().await;
                        return LoopExit::Reconnect;
                    }
                    command_count += 1;
                }

                tick_count += 1;
                if tick_count - last_log_tick >= LOG_INTERVAL_TICKS {
                    info!("Sent {} commands over {} ticks", command_count, tick_count);
                    last_log_tick = tick_count;
                }
            }

            _ = tokio::signal::ctrl_c() => {
                let _ = sink.close().await;
                debug!("Total commands sent: {}", command_count);
                return LoopExit::Shutdown;
            }
        }
    }
}
