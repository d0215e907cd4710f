use eyre::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::time::Duration;

/// Shortest accepted connect timeout. A zero duration fails to connect.
pub const MIN_CONNECT_TIMEOUT_SECS: f64 = 0.001;

/// Session configuration, loaded once at start-up and fixed afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub controller: ControllerConfig,
    pub handler: HandlerConfig,
    pub thresholds: ThresholdConfig,
}

/// Embedded controller endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    pub ip: String,
    pub port: u16,
    pub connect_timeout_secs: f64,
    pub action_cooldown_secs: f64,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            ip: "esp32.local".to_string(),
            port: 1234,
            connect_timeout_secs: 5.0,
            action_cooldown_secs: 2.0,
        }
    }
}

impl ControllerConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs_f64(self.connect_timeout_secs)
    }

    pub fn action_cooldown(&self) -> Duration {
        Duration::from_secs_f64(self.action_cooldown_secs)
    }

    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.ip, self.port)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HandlerConfig {
    pub buffer_size: usize, // Majority vote window, in frames
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self { buffer_size: 30 }
    }
}

/// Geometry thresholds used by the hand classifier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdConfig {
    pub open_ratio: f64,                  // Finger extension / hand size
    pub visibility_margin: f64,           // Normalized border that counts as clipped
    pub orientation_threshold: f64,       // Index tip/base x difference
    pub handedness_confidence_floor: f64, // Minimum handedness score
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            open_ratio: 0.6,
            visibility_margin: 0.01,
            orientation_threshold: 0.05,
            handedness_confidence_floor: 0.7,
        }
    }
}

impl SessionConfig {
    pub fn load_from_file(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: SessionConfig = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save_to_file(&self, path: &str) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.controller.ip.trim().is_empty() {
            return Err(eyre::eyre!("Controller ip must not be empty"));
        }

        if self.controller.port == 0 {
            return Err(eyre::eyre!("Controller port must be non-zero"));
        }

        if !(self.controller.connect_timeout_secs >= MIN_CONNECT_TIMEOUT_SECS
            && self.controller.connect_timeout_secs.is_finite())
        {
            return Err(eyre::eyre!(
                "Connect timeout ({}) must be at least {} seconds",
                self.controller.connect_timeout_secs,
                MIN_CONNECT_TIMEOUT_SECS
            ));
        }

        if !(self.controller.action_cooldown_secs >= 0.0
            && self.controller.action_cooldown_secs.is_finite())
        {
            return Err(eyre::eyre!(
                "Action cooldown ({}) must be a non-negative number of seconds",
                self.controller.action_cooldown_secs
            ));
        }

        if self.handler.buffer_size == 0 {
            return Err(eyre::eyre!("Buffer size must be at least 1"));
        }

        let t = &self.thresholds;
        if !(t.open_ratio > 0.0 && t.open_ratio.is_finite()) {
            return Err(eyre::eyre!("Open ratio ({}) must be positive", t.open_ratio));
        }

        if !(0.0..0.5).contains(&t.visibility_margin) {
            return Err(eyre::eyre!(
                "Visibility margin ({}) must be in [0, 0.5)",
                t.visibility_margin
            ));
        }

        if !(t.orientation_threshold >= 0.0 && t.orientation_threshold.is_finite()) {
            return Err(eyre::eyre!(
                "Orientation threshold ({}) must be non-negative",
                t.orientation_threshold
            ));
        }

        if !(0.0..=1.0).contains(&t.handedness_confidence_floor) {
            return Err(eyre::eyre!(
                "Handedness confidence floor ({}) must be in [0, 1]",
                t.handedness_confidence_floor
            ));
        }

        Ok(())
    }
}
