//! Non-blocking quit/stop checks polled alongside `get` in a capture loop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::session::controller::CaptureController;

/// A host-environment stop signal.
pub trait EventGate {
    /// Returns `false` once a quit request has been observed. Never blocks.
    fn poll(&mut self) -> bool;
}

/// Quit flag that can be raised from any thread through a `QuitHandle`.
#[derive(Debug, Clone, Default)]
pub struct QuitFlag {
    requested: Arc<AtomicBool>,
}

/// Cloneable handle that raises a `QuitFlag`.
#[derive(Debug, Clone)]
pub struct QuitHandle {
    requested: Arc<AtomicBool>,
}

impl QuitFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle(&self) -> QuitHandle {
        QuitHandle {
            requested: Arc::clone(&self.requested),
        }
    }
}

impl QuitHandle {
    pub fn request_quit(&self) {
        self.requested.store(true, Ordering::SeqCst);
    }
}

impl EventGate for QuitFlag {
    fn poll(&mut self) -> bool {
        !self.requested.load(Ordering::SeqCst)
    }
}

/// Quits once the controller's stream source has been exhausted.
pub struct StreamEndGate<'a> {
    controller: &'a CaptureController,
}

impl<'a> StreamEndGate<'a> {
    pub fn new(controller: &'a CaptureController) -> Self {
        Self { controller }
    }
}

impl EventGate for StreamEndGate<'_> {
    fn poll(&mut self) -> bool {
        !self.controller.is_exhausted()
    }
}

/// Continues only while every gate wants to continue.
///
/// Each gate is polled on every call so none of them misses an event.
pub struct AnyQuit<A, B> {
    first: A,
    second: B,
}

impl<A: EventGate, B: EventGate> AnyQuit<A, B> {
    pub fn new(first: A, second: B) -> Self {
        Self { first, second }
    }
}

impl<A: EventGate, B: EventGate> EventGate for AnyQuit<A, B> {
    fn poll(&mut self) -> bool {
        let first = self.first.poll();
        let second = self.second.poll();
        first && second
    }
}
