//! Capture state machine.
//!
//! The state lives in an `AtomicU8` so the device callback thread can check
//! it without taking any lock.

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};

/// Capture controller states.
///
/// State transitions:
/// ```text
/// idle → running ⇄ paused
/// ```
/// Stream sources additionally carry an "exhausted" condition on top of
/// `Running`; it is tracked by the source, not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CaptureState {
    Idle = 0,
    Running = 1,
    Paused = 2,
}

impl CaptureState {
    fn from_u8(v: u8) -> Self {
        match v {
            1 => Self::Running,
            2 => Self::Paused,
            _ => Self::Idle,
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running)
    }
}

impl fmt::Display for CaptureState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Running => write!(f, "running"),
            Self::Paused => write!(f, "paused"),
        }
    }
}

/// Operations that are gated by the capture state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CaptureAction {
    Init,
    Resume,
    Pause,
    Clear,
    Get,
    Pump,
}

impl fmt::Display for CaptureAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Init => write!(f, "initialize"),
            Self::Resume => write!(f, "resume"),
            Self::Pause => write!(f, "pause"),
            Self::Clear => write!(f, "clear"),
            Self::Get => write!(f, "get"),
            Self::Pump => write!(f, "pump"),
        }
    }
}

/// Thread-safe capture state, shared via `Arc` between the controller and
/// the producer side.
#[derive(Debug)]
pub struct SharedCaptureState {
    state: AtomicU8,
}

impl SharedCaptureState {
    pub fn new() -> Self {
        Self {
            state: AtomicU8::new(CaptureState::Idle as u8),
        }
    }

    pub fn current(&self) -> CaptureState {
        CaptureState::from_u8(self.state.load(Ordering::Acquire))
    }

    pub fn is_running(&self) -> bool {
        self.current().is_running()
    }

    /// Record a new state. Callers serialize transitions among themselves;
    /// readers on the producer side only ever load.
    pub fn set(&self, state: CaptureState) {
        self.state.store(state as u8, Ordering::Release);
    }
}

impl Default for SharedCaptureState {
    fn default() -> Self {
        Self::new()
    }
}
