//! Fixed-size chunking of a captured utterance

/// Fixed-duration slice of mono samples at a declared sample rate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AudioChunk<'a> {
    samples: &'a [f32],
    sample_rate: u32,
}

impl<'a> AudioChunk<'a> {
    /// Wrap a slice of samples
    pub fn new(samples: &'a [f32], sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// Chunk samples
    pub fn samples(&self) -> &'a [f32] {
        self.samples
    }

    /// Sample rate in Hz
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True if the chunk holds no samples
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Chunk duration in seconds
    pub fn duration_seconds(&self) -> f32 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f32 / self.sample_rate as f32
    }
}

/// In-order iterator over full chunks of an utterance
#[derive(Debug, Clone)]
pub struct Chunks<'a> {
    inner: std::slice::ChunksExact<'a, f32>,
    sample_rate: u32,
}

impl<'a> Iterator for Chunks<'a> {
    type Item = AudioChunk<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .next()
            .map(|samples| AudioChunk::new(samples, self.sample_rate))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Chunks<'_> {}

/// Split an utterance into consecutive chunks of `chunk_size` samples
///
/// A trailing partial chunk is discarded. A `chunk_size` of zero yields no chunks.
pub fn chunk_utterance(samples: &[f32], sample_rate: u32, chunk_size: usize) -> Chunks<'_> {
    // chunks_exact panics on zero; an empty slice iterator stands in
    let (data, size) = if chunk_size == 0 {
        (&samples[..0], 1)
    } else {
        (samples, chunk_size)
    };
    Chunks {
        inner: data.chunks_exact(size),
        sample_rate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_multiple_keeps_last_chunk() {
        let samples: Vec<f32> = (0..12).map(|i| i as f32).collect();
        let chunks: Vec<_> = chunk_utterance(&samples, 4, 4).collect();
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[2].samples(), &[8.0, 9.0, 10.0, 11.0]);
        assert_eq!(chunks[0].duration_seconds(), 1.0);
    }

    #[test]
    fn test_trailing_partial_dropped() {
        let samples = vec![0.0f32; 10];
        let chunks = chunk_utterance(&samples, 16000, 4);
        assert_eq!(chunks.len(), 2);
    }

    #[test]
    fn test_shorter_than_one_chunk() {
        let samples = vec![0.1f32; 3];
        assert_eq!(chunk_utterance(&samples, 16000, 4).count(), 0);
        assert_eq!(chunk_utterance(&[], 16000, 4).count(), 0);
    }

    #[test]
    fn test_zero_chunk_size_yields_nothing() {
        let samples = vec![0.1f32; 3];
        assert_eq!(chunk_utterance(&samples, 16000, 0).count(), 0);
    }

    #[test]
    fn test_chunks_preserve_order() {
        let samples: Vec<f32> = (0..9).map(|i| i as f32).collect();
        let firsts: Vec<f32> = chunk_utterance(&samples, 3, 3)
            .map(|c| c.samples()[0])
            .collect();
        assert_eq!(firsts, vec![0.0, 3.0, 6.0]);
    }
}
