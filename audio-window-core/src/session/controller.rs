use std::io::Read;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::models::audio_models::{AudioDevice, CaptureDiagnostics, SourceKind};
use crate::models::config::CaptureConfiguration;
use crate::models::error::CaptureError;
use crate::models::state::{CaptureAction, CaptureState, SharedCaptureState};
use crate::processing::sample_window::SampleWindow;
use crate::source::device_callback::log_capture_devices;
use crate::source::{CaptureSource, DeviceCallback, SourceCounters, StreamReader};
use crate::traits::capture_device::{CaptureDevice, DeviceCatalog};

/// A configured source together with the handles consumers use without
/// touching the producer itself.
struct ActiveSource {
    kind: SourceKind,
    window: Arc<SampleWindow>,
    exhausted: Arc<AtomicBool>,
    // Held across blocking stream reads; nothing else waits on it.
    producer: Mutex<CaptureSource>,
}

impl ActiveSource {
    fn new(source: CaptureSource) -> Self {
        let exhausted = match &source {
            CaptureSource::Stream(stream) => stream.exhausted_flag(),
            CaptureSource::Device(_) => Arc::new(AtomicBool::new(false)),
        };
        Self {
            kind: source.kind(),
            window: Arc::clone(source.window()),
            exhausted,
            producer: Mutex::new(source),
        }
    }

    fn is_exhausted(&self) -> bool {
        self.exhausted.load(Ordering::Acquire)
    }

    /// Device calls are short; stream sources never lock the producer here.
    fn ensure_ready(&self) -> Result<(), CaptureError> {
        match self.kind {
            SourceKind::Device => self.producer.lock().ensure_ready(),
            SourceKind::Stream => Ok(()),
        }
    }

    fn start_producing(&self) -> Result<(), CaptureError> {
        match self.kind {
            SourceKind::Device => self.producer.lock().start_producing(),
            SourceKind::Stream => Ok(()),
        }
    }

    fn stop_producing(&self) -> Result<(), CaptureError> {
        match self.kind {
            SourceKind::Device => self.producer.lock().stop_producing(),
            SourceKind::Stream => Ok(()),
        }
    }
}

/// Owns the rolling sample window and the active capture source, and gates
/// producer writes and consumer reads on the capture state.
///
/// Data flow:
/// ```text
/// [CaptureDevice callback] ─┐
///                           ├→ [SampleWindow] → get(ms) → caller
/// [StreamReader::pump]  ────┘
/// ```
///
/// All methods take `&self`; the controller can be shared across consumer
/// threads behind an `Arc`. The source slot lock is only held for state
/// transitions and to clone handles. A blocking stream read holds the
/// producer lock alone, so other consumers, `window`, `diagnostics` and
/// `is_exhausted` never wait on it.
pub struct CaptureController {
    config: CaptureConfiguration,
    state: Arc<SharedCaptureState>,
    counters: Arc<SourceCounters>,
    active: Mutex<Option<Arc<ActiveSource>>>,
}

impl CaptureController {
    /// Create an idle controller with no source. Call `init_device`,
    /// `init_stream` or `init_stdin` before `resume`.
    pub fn new(config: CaptureConfiguration) -> Self {
        Self {
            config,
            state: Arc::new(SharedCaptureState::new()),
            counters: Arc::new(SourceCounters::default()),
            active: Mutex::new(None),
        }
    }

    /// Open `device` and make it the active source.
    ///
    /// Returns the granted sample rate, which the window is sized for.
    pub fn init_device(&self, device: Box<dyn CaptureDevice>) -> Result<u32, CaptureError> {
        self.config.validate()?;
        let mut slot = self.active.lock();
        self.ensure_replaceable()?;

        let source = DeviceCallback::open(
            device,
            &self.config,
            Arc::clone(&self.state),
            Arc::clone(&self.counters),
        )?;
        let granted = source.window().sample_rate();

        *slot = Some(Arc::new(ActiveSource::new(CaptureSource::Device(source))));
        self.state.set(CaptureState::Idle);
        Ok(granted)
    }

    /// Log the devices `catalog` exposes, then open `device` as with `init_device`.
    ///
    /// A failed listing is only logged; it does not stop the device from opening.
    pub fn init_device_from(
        &self,
        catalog: &dyn DeviceCatalog,
        device: Box<dyn CaptureDevice>,
    ) -> Result<u32, CaptureError> {
        if let Err(e) = log_capture_devices(catalog) {
            log::warn!("failed to list capture devices: {}", e);
        }
        self.init_device(device)
    }

    /// Make a byte stream of raw native-endian f32 samples the active source.
    pub fn init_stream<R>(&self, reader: R) -> Result<(), CaptureError>
    where
        R: Read + Send + 'static,
    {
        self.config.validate()?;
        let mut slot = self.active.lock();
        self.ensure_replaceable()?;

        let window = Arc::new(SampleWindow::new(self.config.sample_rate, self.config.window_ms));
        let reader = StreamReader::new(Box::new(reader), window, Arc::clone(&self.counters));

        *slot = Some(Arc::new(ActiveSource::new(CaptureSource::Stream(reader))));
        self.state.set(CaptureState::Idle);
        Ok(())
    }

    /// Read raw samples from standard input.
    pub fn init_stdin(&self) -> Result<(), CaptureError> {
        self.init_stream(std::io::stdin())
    }

    /// Start (or restart) capture. Valid from idle or paused.
    pub fn resume(&self) -> Result<(), CaptureError> {
        let slot = self.active.lock();
        let active = slot.as_ref().ok_or(CaptureError::NoSource)?;
        active
            .ensure_ready()
            .inspect_err(|_| log::warn!("resume: no audio device to resume"))?;

        let current = self.state.current();
        if current.is_running() {
            log::warn!("resume: already running");
            return Err(CaptureError::transition(CaptureAction::Resume, current));
        }

        active.start_producing()?;
        self.state.set(CaptureState::Running);
        log::debug!("capture resumed from {}", current);
        Ok(())
    }

    /// Stop accepting audio. Valid only while running.
    ///
    /// Stream sources have no device to mute; pausing just stops `get` from
    /// pumping them.
    pub fn pause(&self) -> Result<(), CaptureError> {
        let slot = self.active.lock();
        let active = slot.as_ref().ok_or(CaptureError::NoSource)?;
        active
            .ensure_ready()
            .inspect_err(|_| log::warn!("pause: no audio device to pause"))?;

        let current = self.state.current();
        if !current.is_running() {
            log::warn!("pause: not running ({})", current);
            return Err(CaptureError::transition(CaptureAction::Pause, current));
        }

        active.stop_producing()?;
        self.state.set(CaptureState::Paused);
        log::debug!("capture paused");
        Ok(())
    }

    /// Forget all retained audio without changing the state.
    ///
    /// Device sources must be running; stream sources can be cleared at any time.
    pub fn clear(&self) -> Result<(), CaptureError> {
        let active = self.active_source()?;

        if active.kind == SourceKind::Device {
            active.ensure_ready()?;
            let current = self.state.current();
            if !current.is_running() {
                log::warn!("clear: not running ({})", current);
                return Err(CaptureError::transition(CaptureAction::Clear, current));
            }
        }

        active.window.clear();
        Ok(())
    }

    /// Copy out the most recent `ms` of audio (`ms <= 0` for the whole window).
    ///
    /// Stream sources get one best-effort pump first, skipped if another
    /// consumer is already reading the stream. The result may be shorter than
    /// requested, or empty, when less audio has been captured.
    pub fn get(&self, ms: i32) -> Result<Vec<f32>, CaptureError> {
        let active = self.active_source()?;
        active.ensure_ready()?;

        let current = self.state.current();
        if !current.is_running() {
            log::warn!("get: not running ({})", current);
            return Err(CaptureError::transition(CaptureAction::Get, current));
        }

        if active.kind == SourceKind::Stream {
            if let Some(mut producer) = active.producer.try_lock() {
                producer.pump();
            }
        }

        Ok(active.window.read(ms as i64))
    }

    /// Pull one chunk from a stream source.
    ///
    /// Returns `false` when nothing was attempted: no source, not running, or
    /// the stream is exhausted. Device sources always return `true` while running.
    pub fn pump(&self) -> bool {
        let Some(active) = self.active.lock().clone() else {
            return false;
        };
        if !self.state.is_running() || active.is_exhausted() {
            return false;
        }
        let pulled = active.producer.lock().pump();
        pulled
    }

    /// Like `pump`, but says why nothing was pulled.
    ///
    /// Fails with `StreamExhausted` once the stream has ended, so loops can
    /// stop on the error instead of polling `is_exhausted`.
    pub fn try_pump(&self) -> Result<(), CaptureError> {
        let active = self.active_source()?;
        active.ensure_ready()?;

        let current = self.state.current();
        if !current.is_running() {
            return Err(CaptureError::transition(CaptureAction::Pump, current));
        }
        if active.is_exhausted() || !active.producer.lock().pump() {
            return Err(CaptureError::StreamExhausted);
        }
        Ok(())
    }

    pub fn state(&self) -> CaptureState {
        self.state.current()
    }

    pub fn config(&self) -> &CaptureConfiguration {
        &self.config
    }

    pub fn source_kind(&self) -> Option<SourceKind> {
        self.active.lock().as_ref().map(|a| a.kind)
    }

    /// The sample rate in effect: the granted rate for devices, the
    /// configured one for streams.
    pub fn sample_rate(&self) -> Option<u32> {
        self.window().map(|w| w.sample_rate())
    }

    /// Window capacity in samples, once a source is configured.
    pub fn capacity(&self) -> Option<usize> {
        self.window().map(|w| w.capacity())
    }

    pub fn window(&self) -> Option<Arc<SampleWindow>> {
        self.active.lock().as_ref().map(|a| Arc::clone(&a.window))
    }

    pub fn device_info(&self) -> Option<AudioDevice> {
        let active = self.active.lock().clone()?;
        if active.kind != SourceKind::Device {
            return None;
        }
        let producer = active.producer.lock();
        match &*producer {
            CaptureSource::Device(device) => device.device_info(),
            CaptureSource::Stream(_) => None,
        }
    }

    /// Whether the stream source has reached end-of-stream.
    pub fn is_exhausted(&self) -> bool {
        self.active
            .lock()
            .as_ref()
            .map(|a| a.is_exhausted())
            .unwrap_or(false)
    }

    pub fn diagnostics(&self) -> CaptureDiagnostics {
        let mut diagnostics = self.counters.snapshot();
        if let Some(window) = self.window() {
            diagnostics.samples_written = window.samples_written();
            diagnostics.samples_dropped = window.samples_dropped();
        }
        diagnostics
    }

    fn active_source(&self) -> Result<Arc<ActiveSource>, CaptureError> {
        self.active.lock().clone().ok_or(CaptureError::NoSource)
    }

    fn ensure_replaceable(&self) -> Result<(), CaptureError> {
        let current = self.state.current();
        if current.is_running() {
            return Err(CaptureError::transition(CaptureAction::Init, current));
        }
        Ok(())
    }
}

impl Drop for CaptureController {
    fn drop(&mut self) {
        if !self.state.is_running() {
            return;
        }
        self.state.set(CaptureState::Paused);
        if let Some(active) = self.active.get_mut().as_ref() {
            if let Err(e) = active.stop_producing() {
                log::warn!("failed to stop capture device on drop: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::io::{self, Cursor};
    use std::thread;
    use std::time::{Duration, Instant};

    use crate::models::audio_models::DeviceRequest;
    use crate::processing::sample_format::encode_f32;
    use crate::traits::capture_device::AudioBytesCallback;

    /// Device stand-in whose callback the test drives by hand.
    #[derive(Clone, Default)]
    struct FakeDevice {
        inner: Arc<Mutex<FakeDeviceInner>>,
    }

    #[derive(Default)]
    struct FakeDeviceInner {
        open: bool,
        active: bool,
        grant: Option<u32>,
        fail_open: bool,
        resumes: u32,
        pauses: u32,
        callback: Option<AudioBytesCallback>,
    }

    impl FakeDevice {
        fn granting(rate: u32) -> Self {
            let device = Self::default();
            device.inner.lock().grant = Some(rate);
            device
        }

        fn failing() -> Self {
            let device = Self::default();
            device.inner.lock().fail_open = true;
            device
        }

        fn push(&self, samples: &[f32]) {
            let bytes = encode_f32(samples);
            let mut inner = self.inner.lock();
            if let Some(callback) = inner.callback.as_mut() {
                callback(&bytes);
            }
        }

        fn close(&self) {
            self.inner.lock().open = false;
        }
    }

    impl CaptureDevice for FakeDevice {
        fn open(&mut self, request: &DeviceRequest) -> Result<u32, CaptureError> {
            let mut inner = self.inner.lock();
            if inner.fail_open {
                return Err(CaptureError::NoDevice);
            }
            assert_eq!(request.channels, 1);
            inner.open = true;
            Ok(inner.grant.unwrap_or(request.sample_rate))
        }

        fn set_callback(&mut self, callback: AudioBytesCallback) {
            self.inner.lock().callback = Some(callback);
        }

        fn resume(&mut self) -> Result<(), CaptureError> {
            let mut inner = self.inner.lock();
            inner.active = true;
            inner.resumes += 1;
            Ok(())
        }

        fn pause(&mut self) -> Result<(), CaptureError> {
            let mut inner = self.inner.lock();
            inner.active = false;
            inner.pauses += 1;
            Ok(())
        }

        fn is_open(&self) -> bool {
            self.inner.lock().open
        }

        fn device_info(&self) -> Option<AudioDevice> {
            Some(AudioDevice {
                index: 0,
                name: "fake".into(),
                is_default: true,
            })
        }
    }

    // 1 kHz and 4 ms: a four-sample window.
    fn tiny_config() -> CaptureConfiguration {
        CaptureConfiguration::new(None, 1000, 4)
    }

    fn device_controller() -> (CaptureController, FakeDevice) {
        let device = FakeDevice::default();
        let controller = CaptureController::new(tiny_config());
        controller.init_device(Box::new(device.clone())).unwrap();
        (controller, device)
    }

    #[test]
    fn operations_without_source_fail() {
        let controller = CaptureController::new(tiny_config());

        assert_eq!(controller.resume(), Err(CaptureError::NoSource));
        assert_eq!(controller.pause(), Err(CaptureError::NoSource));
        assert_eq!(controller.clear(), Err(CaptureError::NoSource));
        assert_eq!(controller.get(0), Err(CaptureError::NoSource));
        assert!(!controller.pump());
        assert_eq!(controller.sample_rate(), None);
    }

    #[test]
    fn resume_twice_is_rejected() {
        let (controller, device) = device_controller();

        assert!(controller.resume().is_ok());
        let err = controller.resume().unwrap_err();
        assert!(err.is_already_running());
        assert_eq!(device.inner.lock().resumes, 1);
    }

    #[test]
    fn pause_before_resume_is_rejected() {
        let (controller, device) = device_controller();

        let err = controller.pause().unwrap_err();
        assert!(err.is_not_running());
        assert_eq!(
            err,
            CaptureError::InvalidStateTransition {
                action: CaptureAction::Pause,
                state: CaptureState::Idle,
            }
        );
        assert_eq!(device.inner.lock().pauses, 0);
    }

    #[test]
    fn pause_resume_cycle_drives_device() {
        let (controller, device) = device_controller();

        controller.resume().unwrap();
        controller.pause().unwrap();
        assert_eq!(controller.state(), CaptureState::Paused);
        assert!(!device.inner.lock().active);
        assert!(controller.pause().unwrap_err().is_not_running());

        controller.resume().unwrap();
        assert_eq!(controller.state(), CaptureState::Running);
        assert!(device.inner.lock().active);
    }

    #[test]
    fn writes_only_accepted_while_running() {
        let (controller, device) = device_controller();
        let window = controller.window().unwrap();

        device.push(&[1.0, 2.0]);
        assert!(window.is_empty());

        controller.resume().unwrap();
        device.push(&[1.0, 2.0, 3.0]);
        device.push(&[4.0, 5.0]);
        assert_eq!(controller.get(0).unwrap(), vec![2.0, 3.0, 4.0, 5.0]);

        controller.pause().unwrap();
        device.push(&[9.0]);
        assert_eq!(window.len(), 4);
        assert_eq!(window.write_cursor(), 1);

        let diagnostics = controller.diagnostics();
        assert_eq!(diagnostics.device_callbacks, 2);
        assert_eq!(diagnostics.rejected_callbacks, 2);
        assert_eq!(diagnostics.samples_written, 5);
    }

    #[test]
    fn get_requires_running() {
        let (controller, device) = device_controller();
        controller.resume().unwrap();
        device.push(&[1.0]);
        controller.pause().unwrap();

        let err = controller.get(0).unwrap_err();
        assert!(err.is_not_running());
    }

    #[test]
    fn clear_resets_window_but_not_state() {
        let (controller, device) = device_controller();
        assert!(controller.clear().unwrap_err().is_not_running());

        controller.resume().unwrap();
        device.push(&[1.0, 2.0, 3.0]);
        device.push(&[4.0, 5.0]);

        controller.clear().unwrap();
        assert_eq!(controller.state(), CaptureState::Running);
        assert!(controller.get(0).unwrap().is_empty());

        device.push(&[6.0]);
        assert_eq!(controller.get(0).unwrap(), vec![6.0]);
    }

    #[test]
    fn adopts_granted_sample_rate() {
        let device = FakeDevice::granting(2000);
        let controller = CaptureController::new(tiny_config());

        assert_eq!(controller.init_device(Box::new(device.clone())).unwrap(), 2000);
        assert_eq!(controller.sample_rate(), Some(2000));
        assert_eq!(controller.capacity(), Some(8));

        controller.resume().unwrap();
        device.push(&[0.1; 8]);
        // 2 ms at 2 kHz
        assert_eq!(controller.get(2).unwrap().len(), 4);
    }

    #[test]
    fn open_failure_is_initialization_failure() {
        let controller = CaptureController::new(tiny_config());
        let err = controller.init_device(Box::new(FakeDevice::failing())).unwrap_err();

        assert!(matches!(err, CaptureError::InitializationFailed(_)));
        assert_eq!(controller.source_kind(), None);
        assert_eq!(controller.resume(), Err(CaptureError::NoSource));
    }

    #[test]
    fn closed_device_reports_no_device() {
        let (controller, device) = device_controller();
        controller.resume().unwrap();
        device.close();

        assert_eq!(controller.pause(), Err(CaptureError::NoDevice));
        assert_eq!(controller.get(0), Err(CaptureError::NoDevice));
        assert_eq!(controller.clear(), Err(CaptureError::NoDevice));
    }

    #[test]
    fn cannot_replace_source_while_running() {
        let (controller, _device) = device_controller();
        controller.resume().unwrap();

        let err = controller.init_stream(Cursor::new(Vec::new())).unwrap_err();
        assert_eq!(err, CaptureError::transition(CaptureAction::Init, CaptureState::Running));
    }

    #[test]
    fn invalid_config_rejected_at_init() {
        let controller = CaptureController::new(CaptureConfiguration::new(None, 0, 100));
        let err = controller.init_stream(Cursor::new(Vec::new())).unwrap_err();
        assert!(matches!(err, CaptureError::ConfigurationFailed(_)));
    }

    #[test]
    fn drop_pauses_running_device() {
        let (controller, device) = device_controller();
        controller.resume().unwrap();
        drop(controller);

        assert!(!device.inner.lock().active);
        assert_eq!(device.inner.lock().pauses, 1);
    }

    fn stream_controller(samples: &[f32]) -> CaptureController {
        // 100 Hz, 1 s window: 10-sample pumps, 100-sample capacity
        let controller = CaptureController::new(CaptureConfiguration::new(None, 100, 1000));
        controller.init_stream(Cursor::new(encode_f32(samples))).unwrap();
        controller
    }

    #[test]
    fn stream_get_pumps_first() {
        let samples: Vec<f32> = (0..15).map(|i| i as f32).collect();
        let controller = stream_controller(&samples);
        assert_eq!(controller.source_kind(), Some(SourceKind::Stream));

        controller.resume().unwrap();
        assert_eq!(controller.get(0).unwrap(), samples[..10].to_vec());
        assert_eq!(controller.get(0).unwrap(), samples);

        // Exhausted: further gets return the retained window, not errors
        assert_eq!(controller.get(0).unwrap(), samples);
        assert!(controller.is_exhausted());
        assert!(!controller.pump());
    }

    #[test]
    fn stream_pump_gated_on_running() {
        let controller = stream_controller(&[1.0, 2.0, 3.0]);
        let window = controller.window().unwrap();

        assert!(!controller.pump());
        assert!(window.is_empty());

        controller.resume().unwrap();
        controller.pause().unwrap();
        assert!(!controller.pump());
        assert!(window.is_empty());

        controller.resume().unwrap();
        assert!(controller.pump());
        assert_eq!(window.len(), 3);
    }

    #[test]
    fn stream_clear_works_in_any_state() {
        let controller = stream_controller(&[1.0, 2.0, 3.0]);
        controller.resume().unwrap();
        controller.pump();
        controller.pause().unwrap();

        assert!(controller.clear().is_ok());
        assert!(controller.window().unwrap().is_empty());
        assert_eq!(controller.state(), CaptureState::Paused);
    }

    #[test]
    fn stream_resume_twice_is_rejected() {
        let controller = stream_controller(&[]);
        controller.resume().unwrap();
        assert!(controller.resume().unwrap_err().is_already_running());
    }

    #[test]
    fn try_pump_reports_why_nothing_was_pulled() {
        let controller = CaptureController::new(CaptureConfiguration::new(None, 100, 1000));
        assert_eq!(controller.try_pump(), Err(CaptureError::NoSource));

        controller.init_stream(Cursor::new(encode_f32(&[1.0, 2.0, 3.0]))).unwrap();
        assert_eq!(
            controller.try_pump(),
            Err(CaptureError::transition(CaptureAction::Pump, CaptureState::Idle))
        );

        controller.resume().unwrap();
        assert_eq!(controller.try_pump(), Ok(()));
        assert_eq!(controller.window().unwrap().len(), 3);

        // End of stream was seen with the data; the next pull reports it
        assert_eq!(controller.try_pump(), Err(CaptureError::StreamExhausted));
        assert!(controller.is_exhausted());
        assert_eq!(controller.try_pump(), Err(CaptureError::StreamExhausted));
    }

    #[test]
    fn try_pump_on_device_checks_the_device() {
        let (controller, device) = device_controller();
        controller.resume().unwrap();
        assert_eq!(controller.try_pump(), Ok(()));

        device.close();
        assert_eq!(controller.try_pump(), Err(CaptureError::NoDevice));
    }

    /// Reader that takes `delay` to hand back each four-byte sample.
    struct SlowReader {
        delay: Duration,
        remaining: usize,
    }

    impl Read for SlowReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.remaining == 0 {
                return Ok(0);
            }
            thread::sleep(self.delay);
            self.remaining -= 1;
            let n = buf.len().min(4);
            buf[..n].copy_from_slice(&0.5f32.to_ne_bytes()[..n]);
            Ok(n)
        }
    }

    #[test]
    fn slow_stream_does_not_block_other_callers() {
        // 100 Hz: a ten-sample chunk takes about a second to fill
        let controller = Arc::new(CaptureController::new(CaptureConfiguration::new(None, 100, 1000)));
        controller
            .init_stream(SlowReader {
                delay: Duration::from_millis(100),
                remaining: 20,
            })
            .unwrap();
        controller.resume().unwrap();

        let reader = {
            let controller = Arc::clone(&controller);
            thread::spawn(move || controller.get(0).unwrap().len())
        };
        thread::sleep(Duration::from_millis(150));

        let started = Instant::now();
        assert!(controller.window().is_some());
        assert!(!controller.is_exhausted());
        let _ = controller.diagnostics();
        assert_eq!(controller.source_kind(), Some(SourceKind::Stream));
        assert!(controller.get(0).is_ok());
        controller.pause().unwrap();
        assert!(started.elapsed() < Duration::from_millis(500));

        assert_eq!(reader.join().unwrap(), 10);
    }

    struct CountingCatalog {
        calls: Cell<u32>,
        fail: bool,
    }

    impl DeviceCatalog for CountingCatalog {
        fn list_capture_devices(&self) -> Result<Vec<AudioDevice>, CaptureError> {
            self.calls.set(self.calls.get() + 1);
            if self.fail {
                return Err(CaptureError::Io("no endpoints".into()));
            }
            Ok(vec![AudioDevice {
                index: 0,
                name: "fake".into(),
                is_default: true,
            }])
        }
    }

    #[test]
    fn init_device_from_lists_catalog_first() {
        let catalog = CountingCatalog {
            calls: Cell::new(0),
            fail: false,
        };
        let controller = CaptureController::new(tiny_config());

        assert_eq!(controller.init_device_from(&catalog, Box::new(FakeDevice::default())).unwrap(), 1000);
        assert_eq!(catalog.calls.get(), 1);
        assert_eq!(controller.source_kind(), Some(SourceKind::Device));
    }

    #[test]
    fn init_device_from_survives_listing_failure() {
        let catalog = CountingCatalog {
            calls: Cell::new(0),
            fail: true,
        };
        let controller = CaptureController::new(tiny_config());

        assert!(controller.init_device_from(&catalog, Box::new(FakeDevice::default())).is_ok());
        assert_eq!(catalog.calls.get(), 1);
    }
}
