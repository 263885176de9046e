use std::collections::VecDeque;

/// A single amplitude reading as reported by the backend.
pub type Amplitude = i32;

/// History length used when nothing else was configured.
pub const DEFAULT_AMPLITUDE_CAPACITY: usize = 100;

/// Bounded FIFO of recent amplitude samples, most recent last.
///
/// Used for live visualization only. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmplitudeHistory {
    samples: VecDeque<Amplitude>,
    capacity: usize,
}

impl AmplitudeHistory {
    /// Creates an empty history holding at most `capacity` samples.
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Maximum number of retained samples.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of retained samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether no samples are retained.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Iterates samples from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = Amplitude> + '_ {
        self.samples.iter().copied()
    }

    /// Most recent sample, if any.
    pub fn latest(&self) -> Option<Amplitude> {
        self.samples.back().copied()
    }

    /// Copies the samples out, oldest first.
    pub fn to_vec(&self) -> Vec<Amplitude> {
        self.samples.iter().copied().collect()
    }

    /// Appends a sample, evicting the oldest ones on overflow.
    pub fn push(&mut self, sample: Amplitude) {
        self.samples.push_back(sample);
        self.evict_overflow();
    }

    /// Replaces the history with the tail of a full backend sequence.
    pub fn replace_with(&mut self, samples: &[Amplitude]) {
        let skip = samples.len().saturating_sub(self.capacity);
        self.samples.clear();
        self.samples.extend(samples[skip..].iter().copied());
    }

    /// Changes the capacity. Shrinking drops the oldest samples right away.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity;
        self.evict_overflow();
    }

    /// Drops every sample, keeping the capacity.
    pub fn clear(&mut self) {
        self.samples.clear();
    }

    fn evict_overflow(&mut self) {
        while self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
    }
}

impl Default for AmplitudeHistory {
    fn default() -> Self {
        Self::new(DEFAULT_AMPLITUDE_CAPACITY)
    }
}
