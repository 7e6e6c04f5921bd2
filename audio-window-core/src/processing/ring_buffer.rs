/// Fixed-capacity circular store of mono f32 samples.
///
/// Not synchronized on its own; `SampleWindow` wraps it in a
/// `parking_lot::Mutex` for cross-thread access.
///
/// Overflow behavior: overwrites the oldest samples. A single write larger
/// than the capacity keeps only its trailing `capacity` samples.
#[derive(Debug)]
pub struct RingBuffer {
    buffer: Vec<f32>,
    write_index: usize,
    filled: usize,
}

impl RingBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: vec![0.0; capacity],
            write_index: 0,
            filled: 0,
        }
    }

    /// Write samples at the cursor, wrapping to the start when the tail is reached.
    ///
    /// Returns how many leading input samples were dropped because the write
    /// was larger than the capacity.
    pub fn write(&mut self, samples: &[f32]) -> usize {
        let capacity = self.buffer.len();
        if samples.is_empty() || capacity == 0 {
            return 0;
        }

        // If more data than capacity, only keep the tail
        let dropped = samples.len().saturating_sub(capacity);
        let samples = &samples[dropped..];
        let n = samples.len();

        // Tail copy up to the end of storage, remainder at the head
        let n0 = (capacity - self.write_index).min(n);
        self.buffer[self.write_index..self.write_index + n0].copy_from_slice(&samples[..n0]);
        self.buffer[..n - n0].copy_from_slice(&samples[n0..]);

        self.write_index = (self.write_index + n) % capacity;
        self.filled = (self.filled + n).min(capacity);
        dropped
    }

    /// Copy out the most recent `count` samples, oldest first.
    ///
    /// Returns fewer samples if fewer are retained. Does not consume anything.
    pub fn read_latest(&self, count: usize) -> Vec<f32> {
        let n = count.min(self.filled);
        if n == 0 {
            return Vec::new();
        }

        let capacity = self.buffer.len();
        let start = (self.write_index + capacity - n) % capacity;
        let n0 = (capacity - start).min(n);

        let mut result = Vec::with_capacity(n);
        result.extend_from_slice(&self.buffer[start..start + n0]);
        result.extend_from_slice(&self.buffer[..n - n0]);
        result
    }

    /// Number of valid samples currently retained.
    pub fn len(&self) -> usize {
        self.filled
    }

    pub fn is_empty(&self) -> bool {
        self.filled == 0
    }

    /// Index the next write lands at.
    pub fn write_index(&self) -> usize {
        self.write_index
    }

    /// Forget all retained samples. Storage contents are left stale.
    pub fn reset(&mut self) {
        self.write_index = 0;
        self.filled = 0;
    }

    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }
}
