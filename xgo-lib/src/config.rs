use crate::constants::{DEFAULT_BAUD_RATE, DEFAULT_CRUISE_SPEED, INIT_DELAY, MOTION_PAUSE};
use crate::error::XgoError;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Link and command-layer settings. Every field has a default, so `{}` is a valid file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RiderConfig {
    pub port: String,
    pub baud_rate: u32,
    pub motion_pause_ms: u64,
    pub init_delay_ms: u64,
    pub cruise_speed: u8,
    /// `None` blocks on a reply forever
    pub read_timeout_ms: Option<u64>,
    pub verify_replies: bool,
}

impl Default for RiderConfig {
    fn default() -> Self {
        Self {
            port: "/dev/ttyUSB0".to_string(),
            baud_rate: DEFAULT_BAUD_RATE,
            motion_pause_ms: MOTION_PAUSE.as_millis() as u64,
            init_delay_ms: INIT_DELAY.as_millis() as u64,
            cruise_speed: DEFAULT_CRUISE_SPEED,
            read_timeout_ms: None,
            verify_replies: false,
        }
    }
}

impl RiderConfig {
    pub fn from_json(json: &str) -> Result<Self, XgoError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, XgoError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn motion_pause(&self) -> Duration {
        Duration::from_millis(self.motion_pause_ms)
    }

    pub fn init_delay(&self) -> Duration {
        Duration::from_millis(self.init_delay_ms)
    }

    pub fn read_timeout(&self) -> Option<Duration> {
        self.read_timeout_ms.map(Duration::from_millis)
    }
}
