use thiserror::Error;

use audio_window_core::CaptureError;

/// Failures inside the WASAPI backend, before they are reported to the core.
#[derive(Debug, Error)]
pub enum WasapiError {
    #[error("COM call failed: {0}")]
    Com(#[from] windows::core::Error),

    #[error("no capture device at index {0}")]
    NoSuchDevice(u32),

    #[error("capture thread exited before reporting its format")]
    ThreadGone,

    #[error("failed to spawn capture thread: {0}")]
    Spawn(String),
}

impl From<WasapiError> for CaptureError {
    fn from(e: WasapiError) -> Self {
        match e {
            WasapiError::NoSuchDevice(_) => CaptureError::NoDevice,
            other => CaptureError::InitializationFailed(other.to_string()),
        }
    }
}
