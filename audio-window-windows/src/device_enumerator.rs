//! Windows capture device enumeration via the MMDevice API.
//!
//! Capture endpoints are indexed in `EnumAudioEndpoints` order; that index is
//! what `CaptureConfiguration::capture_id` selects.

use windows::Win32::Devices::FunctionDiscovery::*;
use windows::Win32::Media::Audio::*;
use windows::Win32::System::Com::StructuredStorage::PropVariantClear;
use windows::Win32::System::Com::*;
use windows::Win32::System::Variant::*;

use audio_window_core::{AudioDevice, CaptureError, DeviceCatalog};

use crate::error::WasapiError;

/// Audio device enumerator using the Windows MMDevice API.
pub struct DeviceEnumerator {
    enumerator: IMMDeviceEnumerator,
}

impl DeviceEnumerator {
    /// Create a new device enumerator.
    ///
    /// Requires COM to be initialized on the calling thread.
    pub fn new() -> Result<Self, WasapiError> {
        unsafe {
            let enumerator: IMMDeviceEnumerator =
                CoCreateInstance(&MMDeviceEnumerator, None, CLSCTX_ALL)?;
            Ok(Self { enumerator })
        }
    }

    /// Resolve a capture index (or the default endpoint) to a device.
    pub(crate) fn capture_device(&self, index: Option<u32>) -> Result<IMMDevice, WasapiError> {
        unsafe {
            match index {
                Some(i) => {
                    let collection = self
                        .enumerator
                        .EnumAudioEndpoints(eCapture, DEVICE_STATE_ACTIVE)?;
                    if i >= collection.GetCount()? {
                        return Err(WasapiError::NoSuchDevice(i));
                    }
                    Ok(collection.Item(i)?)
                }
                None => Ok(self.enumerator.GetDefaultAudioEndpoint(eCapture, eConsole)?),
            }
        }
    }

    fn list(&self) -> Result<Vec<AudioDevice>, WasapiError> {
        unsafe {
            let collection = self
                .enumerator
                .EnumAudioEndpoints(eCapture, DEVICE_STATE_ACTIVE)?;
            let count = collection.GetCount()?;

            // Get default device ID for comparison
            let default_id = self
                .enumerator
                .GetDefaultAudioEndpoint(eCapture, eConsole)
                .ok()
                .and_then(|d| d.GetId().ok())
                .and_then(|id| id.to_string().ok());

            let mut devices = Vec::new();
            for index in 0..count {
                let device = match collection.Item(index) {
                    Ok(d) => d,
                    Err(_) => continue,
                };
                let id = device
                    .GetId()
                    .ok()
                    .and_then(|id| id.to_string().ok());

                devices.push(AudioDevice {
                    index,
                    name: friendly_name(&device).unwrap_or_else(|| format!("Device {}", index)),
                    is_default: id.is_some() && id == default_id,
                });
            }
            Ok(devices)
        }
    }
}

impl DeviceCatalog for DeviceEnumerator {
    fn list_capture_devices(&self) -> Result<Vec<AudioDevice>, CaptureError> {
        Ok(self.list()?)
    }
}

/// Read the PKEY_Device_FriendlyName property from a device.
pub(crate) fn friendly_name(device: &IMMDevice) -> Option<String> {
    unsafe {
        let store = device.OpenPropertyStore(STGM_READ).ok()?;

        let mut prop_variant = std::mem::zeroed::<PROPVARIANT>();
        store
            .GetValue(&PKEY_Device_FriendlyName, &mut prop_variant)
            .ok()?;

        let name = if prop_variant.Anonymous.Anonymous.vt == VT_LPWSTR {
            let pwsz = prop_variant.Anonymous.Anonymous.Anonymous.pwszVal;
            if pwsz.is_null() {
                None
            } else {
                let len = (0..).take_while(|&i| *pwsz.offset(i) != 0).count();
                Some(String::from_utf16_lossy(std::slice::from_raw_parts(pwsz, len)))
            }
        } else {
            None
        };

        PropVariantClear(&mut prop_variant).ok();
        name
    }
}
