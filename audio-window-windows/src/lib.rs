//! # audio-window-windows
//!
//! Windows WASAPI backend for audio-window.
//!
//! Provides:
//! - `WasapiCaptureDevice`: shared-mode capture endpoint delivering mono Float32
//! - `DeviceEnumerator`: capture device enumeration via MMDevice API
//!
//! ## Usage
//! ```ignore
//! use audio_window_core::{CaptureConfiguration, CaptureController};
//! use audio_window_windows::WasapiCaptureDevice;
//!
//! // Opening logs the available capture endpoints from the capture thread,
//! // where COM is initialized.
//! let controller = CaptureController::new(CaptureConfiguration::default());
//! controller.init_device(Box::new(WasapiCaptureDevice::new()))?;
//! controller.resume()?;
//! let last_two_seconds = controller.get(2000)?;
//! ```
//!
//! `DeviceEnumerator` needs COM on the calling thread. Initialize it with
//! `CoInitializeEx` before `DeviceEnumerator::new` and pass the enumerator
//! to `CaptureController::init_device_from` to list devices up front.

#[cfg(target_os = "windows")]
pub mod device_enumerator;
#[cfg(target_os = "windows")]
pub mod error;
#[cfg(target_os = "windows")]
pub mod wasapi_device;

#[cfg(target_os = "windows")]
pub use device_enumerator::DeviceEnumerator;
#[cfg(target_os = "windows")]
pub use error::WasapiError;
#[cfg(target_os = "windows")]
pub use wasapi_device::WasapiCaptureDevice;
