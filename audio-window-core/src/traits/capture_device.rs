use crate::models::audio_models::{AudioDevice, DeviceRequest};
use crate::models::error::CaptureError;

/// Callback invoked by a device with raw captured bytes.
///
/// The bytes are native-endian mono f32 samples at the granted rate, in
/// chunks of arbitrary size. A device never runs its callback concurrently
/// with itself: there is exactly one producer per device.
pub type AudioBytesCallback = Box<dyn FnMut(&[u8]) + Send + 'static>;

/// Interface for a push-model audio input device.
///
/// Implemented by:
/// - `WasapiCaptureDevice` (Windows)
pub trait CaptureDevice: Send {
    /// Open the device for single-channel f32 capture.
    ///
    /// Returns the sample rate actually granted, which may differ from the
    /// requested one. The device must come up paused.
    fn open(&mut self, request: &DeviceRequest) -> Result<u32, CaptureError>;

    /// Install the callback that receives captured bytes.
    ///
    /// Called once, after `open` and before the first `resume`.
    fn set_callback(&mut self, callback: AudioBytesCallback);

    /// Start (or restart) delivering audio to the callback.
    fn resume(&mut self) -> Result<(), CaptureError>;

    /// Stop delivering audio. Already-delivered data is unaffected.
    fn pause(&mut self) -> Result<(), CaptureError>;

    fn is_open(&self) -> bool;

    /// Information about the opened device.
    fn device_info(&self) -> Option<AudioDevice>;
}

/// Enumeration of the capture devices a host exposes.
pub trait DeviceCatalog {
    /// Active capture devices, in the order `capture_id` indexes them.
    fn list_capture_devices(&self) -> Result<Vec<AudioDevice>, CaptureError>;
}
