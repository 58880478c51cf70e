// Sample ring buffer
// Fixed-capacity circular store for the most recent raw i16 samples

use std::iter::Copied;
use std::slice::Iter;

/// Chronological iterator over a span of the ring (oldest sample first)
pub type LatestSamples<'a> = std::iter::Chain<Copied<Iter<'a, i16>>, Copied<Iter<'a, i16>>>;

/// Fixed-size circular buffer of PCM samples. Allocated once, never grows.
///
/// Pushing past capacity overwrites the oldest samples.
#[derive(Debug, Clone)]
pub struct SampleRing {
    buffer: Box<[i16]>,

    /// Next slot to write, always in [0, capacity)
    write_pos: usize,

    /// Valid samples stored, saturates at capacity
    len: usize,
}

impl SampleRing {
    /// Create a zeroed ring holding at most `capacity` samples
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "ring capacity must be non-zero");
        SampleRing {
            buffer: vec![0i16; capacity].into_boxed_slice(),
            write_pos: 0,
            len: 0,
        }
    }

    /// Append samples in order, overwriting the oldest data once full
    #[inline]
    pub fn push(&mut self, samples: &[i16]) {
        let capacity = self.buffer.len();
        for &sample in samples {
            self.buffer[self.write_pos] = sample;
            self.write_pos = (self.write_pos + 1) % capacity;
        }
        self.len = (self.len + samples.len()).min(capacity);
    }

    /// Iterate the `n` most recently written samples, oldest first.
    /// `n` is clamped to the number of valid samples.
    pub fn latest(&self, n: usize) -> LatestSamples<'_> {
        let capacity = self.buffer.len();
        let n = n.min(self.len);
        let start = (self.write_pos + capacity - n) % capacity;

        let (head, tail) = if start + n <= capacity {
            (&self.buffer[start..start + n], &self.buffer[..0])
        } else {
            (&self.buffer[start..], &self.buffer[..start + n - capacity])
        };
        head.iter().copied().chain(tail.iter().copied())
    }

    /// Number of valid samples currently stored
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Position the next sample will be written to
    pub fn write_pos(&self) -> usize {
        self.write_pos
    }

    /// Whether every slot holds a written sample
    pub fn is_full(&self) -> bool {
        self.len == self.buffer.len()
    }

    /// Forget all samples and zero the storage
    pub fn clear(&mut self) {
        self.buffer.fill(0);
        self.write_pos = 0;
        self.len = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_tracks_len_and_cursor() {
        let mut ring = SampleRing::new(8);
        assert!(ring.is_empty());

        ring.push(&[1, 2, 3]);
        assert_eq!(ring.len(), 3);
        assert_eq!(ring.write_pos(), 3);
        assert!(!ring.is_full());
    }

    #[test]
    fn test_len_saturates_at_capacity() {
        let mut ring = SampleRing::new(8);
        for _ in 0..5 {
            ring.push(&[7, 7, 7]);
            assert!(ring.len() <= ring.capacity());
        }
        assert_eq!(ring.len(), 8);
        assert!(ring.is_full());
        assert_eq!(ring.write_pos(), 15 % 8);
    }

    #[test]
    fn test_empty_push_is_noop() {
        let mut ring = SampleRing::new(4);
        ring.push(&[]);
        assert_eq!(ring.len(), 0);
        assert_eq!(ring.write_pos(), 0);
    }

    #[test]
    fn test_latest_is_chronological_across_wrap() {
        let mut ring = SampleRing::new(5);
        ring.push(&[1, 2, 3, 4]);
        ring.push(&[5, 6, 7]);

        // Buffer now holds 3..=7 with the cursor in the middle
        let all: Vec<i16> = ring.latest(5).collect();
        assert_eq!(all, vec![3, 4, 5, 6, 7]);

        let last_two: Vec<i16> = ring.latest(2).collect();
        assert_eq!(last_two, vec![6, 7]);
    }

    #[test]
    fn test_latest_clamps_to_valid_samples() {
        let mut ring = SampleRing::new(10);
        ring.push(&[9, 8]);
        let window: Vec<i16> = ring.latest(6).collect();
        assert_eq!(window, vec![9, 8]);
    }

    #[test]
    fn test_push_more_than_capacity_keeps_most_recent() {
        let mut ring = SampleRing::new(4);
        let samples: Vec<i16> = (0..11).collect();
        ring.push(&samples);

        assert_eq!(ring.len(), 4);
        let window: Vec<i16> = ring.latest(4).collect();
        assert_eq!(window, vec![7, 8, 9, 10]);
    }

    #[test]
    fn test_clear() {
        let mut ring = SampleRing::new(4);
        ring.push(&[1, 2, 3]);
        ring.clear();
        assert!(ring.is_empty());
        assert_eq!(ring.latest(4).count(), 0);
    }
}
