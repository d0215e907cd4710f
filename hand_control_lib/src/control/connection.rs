//! Outbound TCP link to the embedded car controller.
//!
//! The link is either disconnected or connected; there are no
//! intermediate states. Frames are the three character action code
//! followed by a newline. Consecutive sends are spaced by a cooldown;
//! a send inside the cooldown window is dropped, not queued.

use std::io::{self, Write};
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::{Action, ControllerConfig, GestureError, GestureResult, SendOutcome};

/// Anything that can deliver actions to the car.
pub trait ActionSink {
    /// Non-destructive liveness check. Must not block indefinitely.
    fn is_connected(&mut self) -> bool;

    fn send_action(&mut self, action: Action) -> GestureResult<SendOutcome>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connected,
}

pub struct ControllerConnection {
    host: String,
    port: u16,
    stream: Option<TcpStream>,
    last_send: Option<Instant>,
    cooldown: Duration,
    connect_timeout: Duration,
}

impl ControllerConnection {
    pub fn new(host: impl Into<String>, port: u16, connect_timeout: Duration, cooldown: Duration) -> Self {
        Self {
            host: host.into(),
            port,
            stream: None,
            last_send: None,
            cooldown,
            connect_timeout,
        }
    }

    pub fn from_config(config: &ControllerConfig) -> Self {
        Self::new(
            config.ip.clone(),
            config.port,
            config.connect_timeout(),
            config.action_cooldown(),
        )
    }

    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn state(&self) -> ConnectionState {
        if self.stream.is_some() {
            ConnectionState::Connected
        } else {
            ConnectionState::Disconnected
        }
    }

    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    /// Open the connection. Name resolution and every address attempt
    /// share one connect-timeout budget. Failures are logged and leave
    /// the link disconnected; nothing is retried.
    ///
    /// Resolution goes through the system resolver, which cannot be
    /// interrupted: an mDNS name such as `esp32.local` may block past the
    /// budget, after which no address is tried.
    pub fn connect(&mut self) -> bool {
        self.close();
        let deadline = Instant::now() + self.connect_timeout;

        let addrs: Vec<SocketAddr> = match (self.host.as_str(), self.port).to_socket_addrs() {
            Ok(addrs) => addrs.collect(),
            Err(e) => {
                warn!("Failed to resolve controller {}: {}", self.endpoint(), e);
                return false;
            }
        };

        for addr in addrs {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                break;
            }

            match TcpStream::connect_timeout(&addr, remaining) {
                Ok(stream) => {
                    if let Err(e) = Self::configure(&stream, self.connect_timeout) {
                        warn!("Failed to configure socket for {}: {}", addr, e);
                        continue;
                    }
                    info!("Connected to controller at {}", addr);
                    self.stream = Some(stream);
                    return true;
                }
                Err(e) => {
                    debug!("Connect to {} failed: {}", addr, e);
                }
            }
        }

        warn!(
            "Could not connect to controller {} within {:?}",
            self.endpoint(),
            self.connect_timeout
        );
        false
    }

    fn configure(stream: &TcpStream, timeout: Duration) -> io::Result<()> {
        stream.set_nodelay(true)?;
        stream.set_write_timeout(Some(timeout))?;
        Ok(())
    }

    /// Probe the socket without consuming data. Any I/O error marks the
    /// link as disconnected.
    pub fn is_connected(&mut self) -> bool {
        let Some(stream) = self.stream.as_mut() else {
            return false;
        };

        if Self::probe(stream) {
            true
        } else {
            warn!("Lost connection to controller {}", self.endpoint());
            self.close();
            false
        }
    }

    fn probe(stream: &mut TcpStream) -> bool {
        match stream.take_error() {
            Ok(None) => {}
            _ => return false,
        }

        if stream.write(&[]).is_err() {
            return false;
        }

        if stream.set_nonblocking(true).is_err() {
            return false;
        }
        let mut buf = [0u8; 1];
        let alive = match stream.peek(&mut buf) {
            Ok(0) => false, // peer closed
            Ok(_) => true,
            Err(e) => e.kind() == io::ErrorKind::WouldBlock,
        };
        stream.set_nonblocking(false).is_ok() && alive
    }

    pub fn send_action(&mut self, action: Action) -> GestureResult<SendOutcome> {
        self.send_action_at(action, Instant::now())
    }

    /// Send using `now` as the current time for the cooldown check.
    pub fn send_action_at(&mut self, action: Action, now: Instant) -> GestureResult<SendOutcome> {
        let Some(stream) = self.stream.as_mut() else {
            return Err(GestureError::NotConnected);
        };

        if let Some(last) = self.last_send {
            let elapsed = now.saturating_duration_since(last);
            if elapsed < self.cooldown {
                debug!(
                    action = action.as_str(),
                    "Dropping action inside cooldown ({:?} < {:?})", elapsed, self.cooldown
                );
                return Ok(SendOutcome::CoolingDown);
            }
        }

        let frame = action.to_frame();
        match stream.write_all(frame.as_bytes()) {
            Ok(()) => {
                self.last_send = Some(now);
                info!(code = action.wire_code(), "Sent action: {}", action);
                Ok(SendOutcome::Sent)
            }
            Err(e) => {
                warn!("Failed to send {} to controller: {}", action, e);
                self.close();
                Err(GestureError::Io(e))
            }
        }
    }

    pub fn close(&mut self) {
        if let Some(stream) = self.stream.take() {
            let _ = stream.shutdown(std::net::Shutdown::Both);
            info!("Connection to controller {} closed", self.endpoint());
        }
    }
}

impl ActionSink for ControllerConnection {
    fn is_connected(&mut self) -> bool {
        ControllerConnection::is_connected(self)
    }

    fn send_action(&mut self, action: Action) -> GestureResult<SendOutcome> {
        ControllerConnection::send_action(self, action)
    }
}

impl Drop for ControllerConnection {
    fn drop(&mut self) {
        self.close();
    }
}
