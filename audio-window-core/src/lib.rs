//! # audio-window-core
//!
//! Platform-agnostic rolling audio window.
//!
//! Captures mono f32 audio from either a push-model device (driver callback
//! on a foreign thread) or a pull-model byte stream (e.g. piped stdin), and
//! keeps the most recent `window_ms` of it available to consumers on other
//! threads. Platform backends (Windows WASAPI) implement the `CaptureDevice`
//! trait and plug into the generic `CaptureController`.
//!
//! ## Architecture
//!
//! ```text
//! audio-window-core (this crate)
//! ├── traits/       ← CaptureDevice, DeviceCatalog, EventGate
//! ├── models/       ← CaptureError, CaptureState, CaptureConfiguration, AudioDevice, etc.
//! ├── processing/   ← RingBuffer, SampleWindow, raw f32 decoding
//! ├── source/       ← DeviceCallback, StreamReader (the CaptureSource variants)
//! └── session/      ← CaptureController (state machine)
//! ```
//!
//! ## Threading
//!
//! One producer per controller (the device never invokes its callback
//! concurrently with itself), any number of consumers. The window lock is
//! held only for memory copies; the running flag is a lock-free atomic.

pub mod models;
pub mod processing;
pub mod session;
pub mod source;
pub mod traits;

// Re-export key types at crate root for convenience.
pub use models::audio_models::{AudioDevice, CaptureDiagnostics, DeviceRequest, SourceKind};
pub use models::config::CaptureConfiguration;
pub use models::error::CaptureError;
pub use models::state::{CaptureAction, CaptureState};
pub use processing::ring_buffer::RingBuffer;
pub use processing::sample_window::SampleWindow;
pub use session::controller::CaptureController;
pub use source::{log_capture_devices, CaptureSource, DeviceCallback, StreamReader};
pub use traits::capture_device::{AudioBytesCallback, CaptureDevice, DeviceCatalog};
pub use traits::event_gate::{AnyQuit, EventGate, QuitFlag, QuitHandle, StreamEndGate};
