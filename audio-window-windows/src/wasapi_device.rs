//! WASAPI capture device.
//!
//! Opens a capture endpoint in shared mode, asking the audio engine to
//! convert to mono Float32 at the requested rate, and delivers raw sample
//! bytes to the installed `AudioBytesCallback` from a dedicated thread.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use parking_lot::Mutex;
use windows::core::*;
use windows::Win32::Media::Audio::*;
use windows::Win32::Media::Multimedia::WAVE_FORMAT_IEEE_FLOAT;
use windows::Win32::System::Com::*;
use windows::Win32::System::Threading::*;

use audio_window_core::{
    log_capture_devices, AudioBytesCallback, AudioDevice, CaptureDevice, CaptureError, DeviceRequest,
};

use crate::device_enumerator::{self, DeviceEnumerator};
use crate::error::WasapiError;

type CallbackSlot = Arc<Mutex<Option<AudioBytesCallback>>>;

const BYTES_PER_FRAME: usize = 4;
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// What the capture thread reports back once the stream is initialized.
struct Opened {
    sample_rate: u32,
    name: String,
}

/// WASAPI capture device.
///
/// The COM objects live on the capture thread only. `resume`/`pause` flip a
/// flag the thread acts on with `IAudioClient::Start`/`Stop`.
pub struct WasapiCaptureDevice {
    info: Option<AudioDevice>,
    active: Arc<AtomicBool>,
    shutdown: Arc<AtomicBool>,
    callback: CallbackSlot,
    capture_handle: Option<thread::JoinHandle<()>>,
}

impl WasapiCaptureDevice {
    pub fn new() -> Self {
        Self {
            info: None,
            active: Arc::new(AtomicBool::new(false)),
            shutdown: Arc::new(AtomicBool::new(false)),
            callback: Arc::new(Mutex::new(None)),
            capture_handle: None,
        }
    }

    fn close(&mut self) {
        self.shutdown.store(true, Ordering::SeqCst);
        if let Some(handle) = self.capture_handle.take() {
            let _ = handle.join();
        }
        self.info = None;
    }
}

impl Default for WasapiCaptureDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl CaptureDevice for WasapiCaptureDevice {
    fn open(&mut self, request: &DeviceRequest) -> std::result::Result<u32, CaptureError> {
        if self.capture_handle.is_some() {
            self.close();
        }
        self.shutdown.store(false, Ordering::SeqCst);
        self.active.store(false, Ordering::SeqCst);

        let (ready_tx, ready_rx) = mpsc::sync_channel(1);
        let request = *request;
        let active = Arc::clone(&self.active);
        let shutdown = Arc::clone(&self.shutdown);
        let callback = Arc::clone(&self.callback);

        let handle = thread::Builder::new()
            .name("wasapi-capture".into())
            .spawn(move || {
                if let Err(e) = capture_thread(request, active, shutdown, callback, ready_tx) {
                    log::error!("capture thread error: {}", e);
                }
            })
            .map_err(|e| WasapiError::Spawn(e.to_string()))?;

        let opened = match ready_rx.recv() {
            Ok(Ok(opened)) => opened,
            Ok(Err(e)) => {
                let _ = handle.join();
                return Err(e.into());
            }
            Err(_) => {
                let _ = handle.join();
                return Err(WasapiError::ThreadGone.into());
            }
        };

        self.info = Some(AudioDevice {
            index: request.capture_id.unwrap_or(0),
            name: opened.name,
            is_default: request.capture_id.is_none(),
        });
        self.capture_handle = Some(handle);
        Ok(opened.sample_rate)
    }

    fn set_callback(&mut self, callback: AudioBytesCallback) {
        *self.callback.lock() = Some(callback);
    }

    fn resume(&mut self) -> std::result::Result<(), CaptureError> {
        if !self.is_open() {
            return Err(CaptureError::NoDevice);
        }
        self.active.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn pause(&mut self) -> std::result::Result<(), CaptureError> {
        if !self.is_open() {
            return Err(CaptureError::NoDevice);
        }
        self.active.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.capture_handle
            .as_ref()
            .map(|h| !h.is_finished())
            .unwrap_or(false)
    }

    fn device_info(&self) -> Option<AudioDevice> {
        self.info.clone()
    }
}

impl Drop for WasapiCaptureDevice {
    fn drop(&mut self) {
        self.close();
    }
}

/// Capture loop running on a dedicated thread.
///
/// Sequence:
/// 1. CoInitializeEx (MTA)
/// 2. Log the available endpoints, resolve the capture one (default or by index)
/// 3. Activate IAudioClient, initialize shared mode with mono f32 auto-conversion
/// 4. Get IAudioCaptureClient service, register with MMCSS
/// 5. Report the granted format, then poll for packets while not shut down,
///    starting and stopping the stream as `active` changes
fn capture_thread(
    request: DeviceRequest,
    active: Arc<AtomicBool>,
    shutdown: Arc<AtomicBool>,
    callback: CallbackSlot,
    ready: mpsc::SyncSender<std::result::Result<Opened, WasapiError>>,
) -> std::result::Result<(), WasapiError> {
    unsafe {
        // Initialize COM on this thread
        if let Err(e) = CoInitializeEx(None, COINIT_MULTITHREADED).ok() {
            let _ = ready.send(Err(e.into()));
            return Ok(());
        }
        let _com_guard = CoUninitializeGuard;

        let stream = match open_stream(&request) {
            Ok(stream) => stream,
            Err(e) => {
                let _ = ready.send(Err(e));
                return Ok(());
            }
        };

        // Register with MMCSS for real-time priority
        let mut task_index: u32 = 0;
        let task_name: Vec<u16> = "Pro Audio\0".encode_utf16().collect();
        let _mmcss_handle = AvSetMmThreadCharacteristicsW(PCWSTR(task_name.as_ptr()), &mut task_index);

        let _ = ready.send(Ok(Opened {
            sample_rate: request.sample_rate,
            name: stream.name.clone(),
        }));

        let mut started = false;
        while !shutdown.load(Ordering::SeqCst) {
            let wanted = active.load(Ordering::SeqCst);
            if wanted != started {
                if wanted {
                    stream.client.Start()?;
                } else {
                    stream.client.Stop()?;
                }
                started = wanted;
            }

            thread::sleep(POLL_INTERVAL);
            if !started {
                continue;
            }

            let mut packet_length = stream.capture.GetNextPacketSize()?;
            while packet_length > 0 {
                let mut buffer_ptr: *mut u8 = std::ptr::null_mut();
                let mut num_frames: u32 = 0;
                let mut flags: u32 = 0;

                stream
                    .capture
                    .GetBuffer(&mut buffer_ptr, &mut num_frames, &mut flags, None, None)?;

                if num_frames > 0 && !buffer_ptr.is_null() {
                    let len = num_frames as usize * BYTES_PER_FRAME;

                    if let Some(cb) = callback.lock().as_mut() {
                        // Handle silence flag
                        if flags & (AUDCLNT_BUFFERFLAGS_SILENT.0 as u32) != 0 {
                            cb(&vec![0u8; len]);
                        } else {
                            cb(std::slice::from_raw_parts(buffer_ptr, len));
                        }
                    }
                }

                stream.capture.ReleaseBuffer(num_frames)?;
                packet_length = stream.capture.GetNextPacketSize()?;
            }
        }

        if started {
            let _ = stream.client.Stop();
        }
    }

    Ok(())
}

struct CaptureStream {
    client: IAudioClient,
    capture: IAudioCaptureClient,
    name: String,
}

unsafe fn open_stream(request: &DeviceRequest) -> std::result::Result<CaptureStream, WasapiError> {
    let enumerator = DeviceEnumerator::new()?;
    if let Err(e) = log_capture_devices(&enumerator) {
        log::warn!("failed to list capture devices: {}", e);
    }
    let device = enumerator.capture_device(request.capture_id)?;
    let name = device_enumerator::friendly_name(&device).unwrap_or_else(|| "unknown".into());

    let client: IAudioClient = device.Activate(CLSCTX_ALL, None)?;

    let block_align = request.channels * BYTES_PER_FRAME as u16;
    let format = WAVEFORMATEX {
        wFormatTag: WAVE_FORMAT_IEEE_FLOAT as u16,
        nChannels: request.channels,
        nSamplesPerSec: request.sample_rate,
        nAvgBytesPerSec: request.sample_rate * block_align as u32,
        nBlockAlign: block_align,
        wBitsPerSample: 32,
        cbSize: 0,
    };

    // Buffer duration in 100-nanosecond units, at least 100ms
    let requested = request.frames_per_buffer as i64 * 10_000_000 / request.sample_rate as i64;
    let buffer_duration = requested.max(1_000_000);

    // The engine converts from the mix format to ours
    client.Initialize(
        AUDCLNT_SHAREMODE_SHARED,
        AUDCLNT_STREAMFLAGS_AUTOCONVERTPCM
            | AUDCLNT_STREAMFLAGS_SRC_DEFAULT_QUALITY
            | AUDCLNT_STREAMFLAGS_NOPERSIST,
        buffer_duration,
        0,
        &format,
        None,
    )?;

    let capture: IAudioCaptureClient = client.GetService()?;
    Ok(CaptureStream { client, capture, name })
}

/// RAII guard to call CoUninitialize when dropped.
struct CoUninitializeGuard;

impl Drop for CoUninitializeGuard {
    fn drop(&mut self) {
        unsafe {
            CoUninitialize();
        }
    }
}
