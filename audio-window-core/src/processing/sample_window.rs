use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

use super::ring_buffer::RingBuffer;

/// The most recent `window_ms` of mono audio at a fixed sample rate.
///
/// Shared between exactly one producer (device callback or stream reader)
/// and any number of consumers. Every `write`, `read` and `clear` takes the
/// same lock for the duration of its memory copies only, so a read never
/// observes a partially applied write.
#[derive(Debug)]
pub struct SampleWindow {
    sample_rate: u32,
    window_ms: u32,
    ring: Mutex<RingBuffer>,
    samples_written: AtomicU64,
    samples_dropped: AtomicU64,
}

impl SampleWindow {
    /// Allocates `sample_rate * window_ms / 1000` samples of storage.
    pub fn new(sample_rate: u32, window_ms: u32) -> Self {
        let capacity = (sample_rate as u64 * window_ms as u64 / 1000) as usize;
        Self {
            sample_rate,
            window_ms,
            ring: Mutex::new(RingBuffer::new(capacity)),
            samples_written: AtomicU64::new(0),
            samples_dropped: AtomicU64::new(0),
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn window_ms(&self) -> u32 {
        self.window_ms
    }

    pub fn capacity(&self) -> usize {
        self.ring.lock().capacity()
    }

    /// Append samples from the producer side.
    pub fn write(&self, samples: &[f32]) {
        if samples.is_empty() {
            return;
        }
        let dropped = self.ring.lock().write(samples);

        self.samples_written
            .fetch_add((samples.len() - dropped) as u64, Ordering::Relaxed);
        if dropped > 0 {
            self.samples_dropped.fetch_add(dropped as u64, Ordering::Relaxed);
        }
    }

    /// Copy out the most recent `requested_ms` of audio, oldest sample first.
    ///
    /// `requested_ms <= 0` means the whole window. The result holds at most
    /// what is currently retained, so callers must check its length rather
    /// than assume a full window.
    pub fn read(&self, requested_ms: i64) -> Vec<f32> {
        let ms = if requested_ms <= 0 {
            self.window_ms as u64
        } else {
            requested_ms as u64
        };
        let wanted = self.samples_for_ms(ms);
        self.ring.lock().read_latest(wanted)
    }

    /// Forget everything retained so far.
    pub fn clear(&self) {
        self.ring.lock().reset();
    }

    /// Number of valid samples currently retained.
    pub fn len(&self) -> usize {
        self.ring.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn write_cursor(&self) -> usize {
        self.ring.lock().write_index()
    }

    pub fn samples_written(&self) -> u64 {
        self.samples_written.load(Ordering::Relaxed)
    }

    pub fn samples_dropped(&self) -> u64 {
        self.samples_dropped.load(Ordering::Relaxed)
    }

    /// Account for samples a producer discarded before they reached `write`.
    pub(crate) fn record_dropped(&self, count: usize) {
        if count > 0 {
            self.samples_dropped.fetch_add(count as u64, Ordering::Relaxed);
        }
    }

    fn samples_for_ms(&self, ms: u64) -> usize {
        let n = ms.saturating_mul(self.sample_rate as u64) / 1000;
        usize::try_from(n).unwrap_or(usize::MAX)
    }
}
