//! ═══════════════════════════════════════════════════════════════════════════════
//! BUFFER — Fixed-Capacity Sample Ring Buffer
//! ═══════════════════════════════════════════════════════════════════════════════
//! FIFO window over the incoming scalar signal. Capacity equals the nominal
//! sample rate, so a full buffer holds exactly one second of signal.
//! ═══════════════════════════════════════════════════════════════════════════════

use std::collections::VecDeque;

/// Fixed-capacity FIFO of scalar samples.
/// `push` evicts the oldest sample once capacity is reached; length never
/// exceeds capacity.
#[derive(Debug, Clone)]
pub struct SampleBuffer {
    samples: VecDeque<f64>,
    capacity: usize,
}

impl SampleBuffer {
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "buffer capacity must be positive");
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a sample, evicting the oldest if at capacity. Never blocks.
    pub fn push(&mut self, sample: f64) {
        if self.samples.len() >= self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    pub fn is_full(&self) -> bool {
        self.samples.len() == self.capacity
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Ordered read-only copy of the window, oldest first. Independent of
    /// any pushes that happen after the call.
    pub fn snapshot(&self) -> Vec<f64> {
        self.samples.iter().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifo_eviction() {
        let mut buf = SampleBuffer::new(3);
        for s in [1.0, 2.0, 3.0, 4.0] {
            buf.push(s);
        }
        // capacity+1 pushes: oldest evicted, length stays at capacity
        assert_eq!(buf.len(), 3);
        assert_eq!(buf.snapshot(), vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_length_never_exceeds_capacity() {
        let mut buf = SampleBuffer::new(8);
        for i in 0..100 {
            buf.push(i as f64);
            assert!(buf.len() <= buf.capacity());
        }
        assert!(buf.is_full());
    }

    #[test]
    fn test_not_full_until_capacity() {
        let mut buf = SampleBuffer::new(4);
        buf.push(1.0);
        buf.push(2.0);
        assert!(!buf.is_full());
        buf.push(3.0);
        buf.push(4.0);
        assert!(buf.is_full());
    }

    #[test]
    fn test_snapshot_is_independent() {
        let mut buf = SampleBuffer::new(2);
        buf.push(1.0);
        buf.push(2.0);
        let snap = buf.snapshot();
        buf.push(3.0);
        assert_eq!(snap, vec![1.0, 2.0]);
        assert_eq!(buf.snapshot(), vec![2.0, 3.0]);
    }
}
