//! Push-model source: an external driver thread delivers raw bytes.

use std::sync::Arc;

use crate::models::audio_models::{AudioDevice, DeviceRequest};
use crate::models::config::CaptureConfiguration;
use crate::models::error::CaptureError;
use crate::models::state::SharedCaptureState;
use crate::processing::sample_format;
use crate::processing::sample_window::SampleWindow;
use crate::traits::capture_device::{CaptureDevice, DeviceCatalog};

use super::SourceCounters;

/// Producer half installed as the device callback.
///
/// Runs on the driver's thread. Does nothing unless capture is running.
pub struct DeviceSink {
    state: Arc<SharedCaptureState>,
    window: Arc<SampleWindow>,
    capacity: usize,
    counters: Arc<SourceCounters>,
}

impl DeviceSink {
    pub fn new(
        state: Arc<SharedCaptureState>,
        window: Arc<SampleWindow>,
        counters: Arc<SourceCounters>,
    ) -> Self {
        let capacity = window.capacity();
        Self {
            state,
            window,
            capacity,
            counters,
        }
    }

    /// Forward one callback buffer into the window.
    ///
    /// A trailing partial sample is ignored. If the buffer holds more than the
    /// window capacity, only its last `capacity` samples are kept.
    pub fn deliver(&self, bytes: &[u8]) {
        if !self.state.is_running() {
            self.counters.record_rejected_callback();
            return;
        }
        self.counters.record_device_callback();

        let (samples, skipped) = sample_format::decode_f32_tail(bytes, self.capacity);
        self.window.record_dropped(skipped);
        self.window.write(&samples);
    }
}

/// A device-backed capture source.
pub struct DeviceCallback {
    device: Box<dyn CaptureDevice>,
    window: Arc<SampleWindow>,
}

impl DeviceCallback {
    /// Open `device`, size the window for the granted rate and install the callback.
    ///
    /// The device comes up paused; nothing is captured until `resume`.
    pub fn open(
        mut device: Box<dyn CaptureDevice>,
        config: &CaptureConfiguration,
        state: Arc<SharedCaptureState>,
        counters: Arc<SourceCounters>,
    ) -> Result<Self, CaptureError> {
        let request = DeviceRequest::mono(config.capture_id, config.sample_rate, config.frames_per_buffer);

        match config.capture_id {
            Some(id) => log::info!("attempting to open capture device #{}", id),
            None => log::info!("attempting to open default capture device"),
        }

        let granted = device.open(&request).map_err(|e| match e {
            CaptureError::InitializationFailed(_) => e,
            other => CaptureError::InitializationFailed(other.to_string()),
        })?;

        if config.capacity_at(granted) == 0 {
            return Err(CaptureError::InitializationFailed(format!(
                "device granted {} Hz, too low for a {} ms window",
                granted, config.window_ms
            )));
        }

        let name = device
            .device_info()
            .map(|d| d.name)
            .unwrap_or_else(|| "unknown".into());
        log::info!(
            "opened capture device '{}': requested {} Hz, obtained {} Hz, {} channel(s), {} frames per buffer",
            name,
            request.sample_rate,
            granted,
            request.channels,
            request.frames_per_buffer,
        );
        if granted != request.sample_rate {
            log::warn!(
                "capture device granted {} Hz instead of {} Hz; adopting the granted rate",
                granted,
                request.sample_rate
            );
        }

        let window = Arc::new(SampleWindow::new(granted, config.window_ms));
        let sink = DeviceSink::new(state, Arc::clone(&window), counters);
        device.set_callback(Box::new(move |bytes: &[u8]| sink.deliver(bytes)));

        Ok(Self { device, window })
    }

    pub fn window(&self) -> &Arc<SampleWindow> {
        &self.window
    }

    pub fn is_open(&self) -> bool {
        self.device.is_open()
    }

    pub fn device_info(&self) -> Option<AudioDevice> {
        self.device.device_info()
    }

    pub fn resume(&mut self) -> Result<(), CaptureError> {
        self.ensure_open()?;
        self.device.resume()
    }

    pub fn pause(&mut self) -> Result<(), CaptureError> {
        self.ensure_open()?;
        self.device.pause()
    }

    pub(crate) fn ensure_open(&self) -> Result<(), CaptureError> {
        if self.device.is_open() {
            Ok(())
        } else {
            Err(CaptureError::NoDevice)
        }
    }
}

/// Log the capture devices a host exposes. Returns how many were found.
pub fn log_capture_devices(catalog: &dyn DeviceCatalog) -> Result<usize, CaptureError> {
    let devices = catalog.list_capture_devices()?;
    log::info!("found {} capture devices:", devices.len());
    for device in &devices {
        log::info!(
            "   - capture device #{}: '{}'{}",
            device.index,
            device.name,
            if device.is_default { " (default)" } else { "" }
        );
    }
    Ok(devices.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::state::CaptureState;
    use crate::processing::sample_format::encode_f32;

    fn sink_with_capacity(capacity_ms: u32) -> (DeviceSink, Arc<SharedCaptureState>, Arc<SampleWindow>, Arc<SourceCounters>) {
        let state = Arc::new(SharedCaptureState::new());
        let window = Arc::new(SampleWindow::new(1000, capacity_ms));
        let counters = Arc::new(SourceCounters::default());
        let sink = DeviceSink::new(Arc::clone(&state), Arc::clone(&window), Arc::clone(&counters));
        (sink, state, window, counters)
    }

    #[test]
    fn ignores_callbacks_unless_running() {
        let (sink, state, window, counters) = sink_with_capacity(4);

        sink.deliver(&encode_f32(&[1.0, 2.0]));
        assert!(window.is_empty());
        assert_eq!(counters.snapshot().rejected_callbacks, 1);

        state.set(CaptureState::Paused);
        sink.deliver(&encode_f32(&[1.0, 2.0]));
        assert!(window.is_empty());
    }

    #[test]
    fn forwards_samples_while_running() {
        let (sink, state, window, counters) = sink_with_capacity(4);
        state.set(CaptureState::Running);

        sink.deliver(&encode_f32(&[1.0, 2.0, 3.0]));
        sink.deliver(&encode_f32(&[4.0, 5.0]));

        assert_eq!(window.read(0), vec![2.0, 3.0, 4.0, 5.0]);
        assert_eq!(counters.snapshot().device_callbacks, 2);
    }

    #[test]
    fn oversized_callback_keeps_trailing_capacity() {
        let (sink, state, window, _) = sink_with_capacity(4);
        state.set(CaptureState::Running);

        let mut bytes = encode_f32(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        bytes.extend_from_slice(&[0, 0]);
        sink.deliver(&bytes);

        assert_eq!(window.read(0), vec![3.0, 4.0, 5.0, 6.0]);
        assert_eq!(window.samples_dropped(), 2);
    }

    #[test]
    fn partial_sample_only_is_noop() {
        let (sink, state, window, _) = sink_with_capacity(4);
        state.set(CaptureState::Running);

        sink.deliver(&[1, 2, 3]);
        assert!(window.is_empty());
        assert_eq!(window.write_cursor(), 0);
    }

    struct FixedCatalog(Result<Vec<AudioDevice>, CaptureError>);

    impl DeviceCatalog for FixedCatalog {
        fn list_capture_devices(&self) -> Result<Vec<AudioDevice>, CaptureError> {
            self.0.clone()
        }
    }

    #[test]
    fn log_capture_devices_counts_listing() {
        let catalog = FixedCatalog(Ok(vec![
            AudioDevice {
                index: 0,
                name: "Microphone".into(),
                is_default: true,
            },
            AudioDevice {
                index: 1,
                name: "Line In".into(),
                is_default: false,
            },
        ]));
        assert_eq!(log_capture_devices(&catalog), Ok(2));

        let failing = FixedCatalog(Err(CaptureError::NoDevice));
        assert_eq!(log_capture_devices(&failing), Err(CaptureError::NoDevice));
    }
}
