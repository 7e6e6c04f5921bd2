use thiserror::Error;

use super::state::{CaptureAction, CaptureState};

/// Errors reported by the capture controller and its sources.
///
/// None of these are fatal to the process; the caller decides whether to
/// retry, reconfigure, or give up on capture.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CaptureError {
    /// The device subsystem could not be initialized or no device could be opened.
    #[error("initialization failed: {0}")]
    InitializationFailed(String),

    /// An operation that needs a producer was called before one was configured.
    #[error("no capture source configured")]
    NoSource,

    /// The device-backed source has no open device to control.
    #[error("no audio device")]
    NoDevice,

    #[error("cannot {action} while {state}")]
    InvalidStateTransition {
        action: CaptureAction,
        state: CaptureState,
    },

    /// The stream source reached end-of-stream.
    #[error("stream exhausted")]
    StreamExhausted,

    #[error("configuration failed: {0}")]
    ConfigurationFailed(String),

    #[error("i/o error: {0}")]
    Io(String),
}

impl CaptureError {
    pub(crate) fn transition(action: CaptureAction, state: CaptureState) -> Self {
        Self::InvalidStateTransition { action, state }
    }

    /// `resume` was rejected because capture is already running.
    pub fn is_already_running(&self) -> bool {
        matches!(
            self,
            Self::InvalidStateTransition {
                state: CaptureState::Running,
                ..
            }
        )
    }

    /// An operation that requires a running capture was rejected.
    pub fn is_not_running(&self) -> bool {
        matches!(
            self,
            Self::InvalidStateTransition { state, .. } if *state != CaptureState::Running
        )
    }
}

impl From<std::io::Error> for CaptureError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}
