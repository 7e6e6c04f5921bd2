//! Pull-model source: raw f32 samples polled from a byte stream.

use std::io::{ErrorKind, Read};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::processing::sample_format::{self, BYTES_PER_SAMPLE};
use crate::processing::sample_window::SampleWindow;

use super::SourceCounters;

/// Reads native-endian f32 samples from a byte stream in 100 ms chunks.
///
/// The stream has no timing of its own; the caller paces `pump`.
pub struct StreamReader {
    reader: Box<dyn Read + Send>,
    window: Arc<SampleWindow>,
    chunk: Vec<u8>,
    // Bytes of an incomplete sample left at the front of `chunk`.
    carry: usize,
    pending_end: bool,
    end_of_stream: Arc<AtomicBool>,
    counters: Arc<SourceCounters>,
}

impl StreamReader {
    pub fn new(
        reader: Box<dyn Read + Send>,
        window: Arc<SampleWindow>,
        counters: Arc<SourceCounters>,
    ) -> Self {
        let chunk_samples = (window.sample_rate() / 10).max(1) as usize;
        log::info!(
            "initialized stream audio capture, sample rate = {}, chunk = {} samples",
            window.sample_rate(),
            chunk_samples
        );
        Self {
            reader,
            window,
            chunk: vec![0; chunk_samples * BYTES_PER_SAMPLE],
            carry: 0,
            pending_end: false,
            end_of_stream: Arc::new(AtomicBool::new(false)),
            counters,
        }
    }

    pub fn window(&self) -> &Arc<SampleWindow> {
        &self.window
    }

    pub fn is_exhausted(&self) -> bool {
        self.end_of_stream.load(Ordering::Acquire)
    }

    /// Flag that flips once end-of-stream is observed, readable while a pump
    /// is blocked in the stream.
    pub fn exhausted_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.end_of_stream)
    }

    /// Try to pull one chunk from the stream into the window.
    ///
    /// Returns `false` once the stream is exhausted, and on every call after
    /// that without touching the stream again. Returns `true` when samples
    /// were forwarded or when no data is available right now.
    pub fn pump(&mut self) -> bool {
        if self.is_exhausted() {
            return false;
        }
        if self.pending_end {
            self.finish();
            return false;
        }

        let target = self.chunk.len();
        let mut filled = self.carry;
        let mut reached_end = false;

        while filled < target {
            match self.reader.read(&mut self.chunk[filled..target]) {
                Ok(0) => {
                    reached_end = true;
                    break;
                }
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) if e.kind() == ErrorKind::WouldBlock => break,
                Err(e) => {
                    log::error!("stream read failed, treating as end of stream: {}", e);
                    reached_end = true;
                    break;
                }
            }
        }
        self.counters.record_stream_read();

        let whole = filled - filled % BYTES_PER_SAMPLE;
        let samples = sample_format::decode_f32(&self.chunk[..whole]);
        self.chunk.copy_within(whole..filled, 0);
        self.carry = filled - whole;

        if samples.is_empty() {
            if reached_end {
                self.finish();
                return false;
            }
            // Nothing available yet; caller retries later
            return true;
        }

        self.window.write(&samples);
        if reached_end {
            self.pending_end = true;
        }
        true
    }

    fn finish(&mut self) {
        if self.carry > 0 {
            log::debug!("discarding {} trailing bytes of an incomplete sample", self.carry);
            self.carry = 0;
        }
        self.end_of_stream.store(true, Ordering::Release);
        log::info!("reached end of stream");
    }
}
