use serde::{Deserialize, Serialize};

use super::error::CaptureError;

/// Configuration for a capture controller.
///
/// Fixed at construction time; the controller never mutates it except to
/// adopt the sample rate actually granted by the device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfiguration {
    /// Capture device index, or None for the system default.
    pub capture_id: Option<u32>,

    /// Target sample rate in Hz (default: 16000).
    pub sample_rate: u32,

    /// Retained history in milliseconds (default: 10000).
    pub window_ms: u32,

    /// Frames per device callback requested from the driver (default: 1024).
    pub frames_per_buffer: u16,
}

impl CaptureConfiguration {
    pub fn new(capture_id: Option<u32>, sample_rate: u32, window_ms: u32) -> Self {
        Self {
            capture_id,
            sample_rate,
            window_ms,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), CaptureError> {
        if self.sample_rate == 0 {
            return Err(CaptureError::ConfigurationFailed(
                "sample rate must be positive".into(),
            ));
        }
        if self.window_ms == 0 {
            return Err(CaptureError::ConfigurationFailed(
                "window length must be positive".into(),
            ));
        }
        if self.capacity() == 0 {
            return Err(CaptureError::ConfigurationFailed(format!(
                "a {} ms window at {} Hz holds no samples",
                self.window_ms, self.sample_rate
            )));
        }
        if self.frames_per_buffer == 0 {
            return Err(CaptureError::ConfigurationFailed(
                "frames per buffer must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Window capacity in samples at the configured rate.
    pub fn capacity(&self) -> usize {
        self.capacity_at(self.sample_rate)
    }

    /// Window capacity in samples at `sample_rate`.
    pub fn capacity_at(&self, sample_rate: u32) -> usize {
        (sample_rate as u64 * self.window_ms as u64 / 1000) as usize
    }

    pub fn from_json(json: &str) -> Result<Self, CaptureError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| CaptureError::ConfigurationFailed(format!("invalid configuration: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, CaptureError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| CaptureError::ConfigurationFailed(format!("failed to serialize configuration: {}", e)))
    }
}

impl Default for CaptureConfiguration {
    fn default() -> Self {
        Self {
            capture_id: None,
            sample_rate: 16_000,
            window_ms: 10_000,
            frames_per_buffer: 1024,
        }
    }
}
