use dora_node_api::arrow::array::Array;
use dora_node_api::{arrow::array::BinaryArray, dora_core::config::DataId, DoraNode, Event};
use eyre::{eyre, Result};
use hand_control_lib::{
    init_tracing, ActionDispatcher, ConnectionState, ControllerConnection, DispatchStatus,
    HandObservation, SendOutcome, SessionConfig,
};
use std::env;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

fn main() -> Result<()> {
    let _guard = init_tracing("gesture_dispatcher");

    info!("Starting gesture dispatcher node");

    let config = load_session_config()?;
    let reconnect_interval = env::var("RECONNECT_INTERVAL_SECS")
        .ok()
        .and_then(|v| v.parse::<f64>().ok())
        .filter(|secs| *secs > 0.0 && secs.is_finite())
        .map(Duration::from_secs_f64);

    info!("Session configuration:");
    info!("  Controller: {}", config.controller.endpoint());
    info!("  Connect timeout: {:.1} s", config.controller.connect_timeout_secs);
    info!("  Action cooldown: {:.1} s", config.controller.action_cooldown_secs);
    info!("  Smoothing window: {} frames", config.handler.buffer_size);
    info!(
        "  Thresholds: open={:.2} margin={:.3} orientation={:.3} confidence={:.2}",
        config.thresholds.open_ratio,
        config.thresholds.visibility_margin,
        config.thresholds.orientation_threshold,
        config.thresholds.handedness_confidence_floor
    );
    match reconnect_interval {
        Some(interval) => info!("  Reconnect interval: {:?}", interval),
        None => info!("  Reconnect: disabled"),
    }

    let mut connection = ControllerConnection::from_config(&config.controller);
    if !connection.connect() {
        warn!("Controller unavailable; commands are held until a connection exists");
    }
    let mut last_connect_attempt = Instant::now();

    let mut dispatcher = ActionDispatcher::from_config(&config, connection);

    let (mut node, mut events) = DoraNode::init_from_env()?;
    let status_output = DataId::from("dispatch_status".to_owned());

    info!("Gesture dispatcher initialized");
    info!("Left hand: open = accelerate, closed = stop");
    info!("Right hand: index finger points left/right/straight");

    let mut frame_id: u64 = 0;
    let mut sent_count: usize = 0;
    let mut throttled_count: usize = 0;

    while let Some(event) = events.recv() {
        match event {
            Event::Input {
                id,
                metadata: _,
                data,
            } => match id.as_str() {
                "hands" => {
                    let Some(array) = data.as_any().downcast_ref::<BinaryArray>() else {
                        warn!("Expected binary data on 'hands' input");
                        continue;
                    };
                    if array.len() == 0 {
                        continue;
                    }

                    // A malformed frame breaks the vision node contract
                    let observations: Vec<HandObservation> =
                        serde_json::from_slice(array.value(0))
                            .map_err(|e| eyre!("Malformed hand observations: {}", e))?;
                    frame_id += 1;
                    debug!("Frame #{}: {} hand(s)", frame_id, observations.len());

                    if let Some(interval) = reconnect_interval {
                        let connection = dispatcher.sink_mut();
                        if connection.state() == ConnectionState::Disconnected
                            && last_connect_attempt.elapsed() >= interval
                        {
                            info!("Reconnecting to controller {}", connection.endpoint());
                            connection.connect();
                            last_connect_attempt = Instant::now();
                        }
                    }

                    let sent = dispatcher.decide(&observations);
                    for dispatched in &sent {
                        match dispatched.outcome {
                            SendOutcome::Sent => sent_count += 1,
                            SendOutcome::CoolingDown => throttled_count += 1,
                        }
                        debug!(
                            slot = dispatched.slot.as_str(),
                            "Dispatched {} ({:?})", dispatched.action, dispatched.outcome
                        );
                    }

                    let status = DispatchStatus {
                        frame_id,
                        connected: dispatcher.sink().state() == ConnectionState::Connected,
                        last_dispatched: dispatcher.last_dispatched_all(),
                        sent,
                        timestamp: chrono::Utc::now().timestamp_millis(),
                    };

                    let serialized = serde_json::to_vec(&status)?;
                    let arrow_data = BinaryArray::from_vec(vec![serialized.as_slice()]);
                    node.send_output(status_output.clone(), Default::default(), arrow_data)?;
                }
                other => {
                    debug!("Unknown input ID: '{}'", other);
                }
            },
            Event::Stop(_) => {
                info!("Stop event received - shutting down gesture dispatcher");
                break;
            }
            other_event => {
                debug!("Other event type: {:?}", other_event);
            }
        }
    }

    info!("Final statistics:");
    info!("   Frames processed: {}", frame_id);
    info!("   Commands sent: {}", sent_count);
    info!("   Commands dropped by cooldown: {}", throttled_count);

    dispatcher.sink_mut().close();
    info!("Gesture dispatcher stopped");
    Ok(())
}

/// Load the session config from `GESTURE_CONFIG`, falling back to
/// defaults, then apply endpoint overrides from the environment.
fn load_session_config() -> Result<SessionConfig> {
    let mut config = match env::var("GESTURE_CONFIG") {
        Ok(path) => {
            info!("Loading session config from {}", path);
            SessionConfig::load_from_file(&path)?
        }
        Err(_) => {
            info!("GESTURE_CONFIG not set, using default session config");
            SessionConfig::default()
        }
    };

    if let Ok(ip) = env::var("CONTROLLER_IP") {
        config.controller.ip = ip;
    }
    if let Some(port) = env::var("CONTROLLER_PORT")
        .ok()
        .and_then(|v| v.parse::<u16>().ok())
    {
        config.controller.port = port;
    }

    config.validate()?;
    Ok(config)
}
