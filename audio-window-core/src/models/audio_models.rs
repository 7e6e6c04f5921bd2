use serde::{Deserialize, Serialize};

/// A capture device reported by the device collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioDevice {
    /// Position in the enumeration order; this is what `capture_id` selects.
    pub index: u32,
    pub name: String,
    pub is_default: bool,
}

/// What the controller asks of a device when opening it.
///
/// The format is always single-channel 32-bit float; only the rate may be
/// renegotiated by the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceRequest {
    pub capture_id: Option<u32>,
    pub sample_rate: u32,
    pub channels: u16,
    pub frames_per_buffer: u16,
}

impl DeviceRequest {
    pub fn mono(capture_id: Option<u32>, sample_rate: u32, frames_per_buffer: u16) -> Self {
        Self {
            capture_id,
            sample_rate,
            channels: 1,
            frames_per_buffer,
        }
    }
}

/// Which production model backs a controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Device,
    Stream,
}

/// Counters for debugging a capture session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CaptureDiagnostics {
    pub device_callbacks: u64,
    pub rejected_callbacks: u64,
    pub stream_reads: u64,
    pub samples_written: u64,
    /// Samples lost to the oversized-burst policy (prefix of an overlong write).
    pub samples_dropped: u64,
}
