//! The two production models behind one interface.

pub mod device_callback;
pub mod stream_reader;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::models::audio_models::{CaptureDiagnostics, SourceKind};
use crate::models::error::CaptureError;
use crate::processing::sample_window::SampleWindow;

pub use device_callback::{log_capture_devices, DeviceCallback, DeviceSink};
pub use stream_reader::StreamReader;

/// Producer-side event counters, updated without taking the window lock.
#[derive(Debug, Default)]
pub struct SourceCounters {
    device_callbacks: AtomicU64,
    rejected_callbacks: AtomicU64,
    stream_reads: AtomicU64,
}

impl SourceCounters {
    pub(crate) fn record_device_callback(&self) {
        self.device_callbacks.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_rejected_callback(&self) {
        self.rejected_callbacks.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_stream_read(&self) {
        self.stream_reads.fetch_add(1, Ordering::Relaxed);
    }

    /// Counter values; window totals are left at zero for the caller to fill.
    pub fn snapshot(&self) -> CaptureDiagnostics {
        CaptureDiagnostics {
            device_callbacks: self.device_callbacks.load(Ordering::Relaxed),
            rejected_callbacks: self.rejected_callbacks.load(Ordering::Relaxed),
            stream_reads: self.stream_reads.load(Ordering::Relaxed),
            ..CaptureDiagnostics::default()
        }
    }
}

/// The active producer owned by a `CaptureController`.
pub enum CaptureSource {
    Device(DeviceCallback),
    Stream(StreamReader),
}

impl CaptureSource {
    pub fn kind(&self) -> SourceKind {
        match self {
            Self::Device(_) => SourceKind::Device,
            Self::Stream(_) => SourceKind::Stream,
        }
    }

    pub fn window(&self) -> &Arc<SampleWindow> {
        match self {
            Self::Device(device) => device.window(),
            Self::Stream(stream) => stream.window(),
        }
    }

    /// Pull more data if this source is pull-based.
    ///
    /// Device sources are pushed by their driver, so there is nothing to pull
    /// and more data may always arrive.
    pub fn pump(&mut self) -> bool {
        match self {
            Self::Device(_) => true,
            Self::Stream(stream) => stream.pump(),
        }
    }

    pub fn is_exhausted(&self) -> bool {
        match self {
            Self::Device(_) => false,
            Self::Stream(stream) => stream.is_exhausted(),
        }
    }

    /// Fails with `NoDevice` if a device source has no open device.
    pub fn ensure_ready(&self) -> Result<(), CaptureError> {
        match self {
            Self::Device(device) => device.ensure_open(),
            Self::Stream(_) => Ok(()),
        }
    }

    /// Ask the device layer to start producing. A no-op for streams.
    pub fn start_producing(&mut self) -> Result<(), CaptureError> {
        match self {
            Self::Device(device) => device.resume(),
            Self::Stream(_) => Ok(()),
        }
    }

    /// Ask the device layer to stop producing. A no-op for streams.
    pub fn stop_producing(&mut self) -> Result<(), CaptureError> {
        match self {
            Self::Device(device) => device.pause(),
            Self::Stream(_) => Ok(()),
        }
    }
}
