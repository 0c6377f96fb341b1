//! Fixed-capacity time series for one fan-correction window.
//!
//! Backed by a stack-allocated `heapless::Vec` sized for the largest window
//! the config allows; the effective capacity is set per window.  Appends
//! past capacity are dropped silently, never an error.

use crate::config::MAX_WINDOW_SAMPLES;

/// One (temperature, humidity) pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub temperature_c: f32,
    pub humidity_pct: f32,
}

#[derive(Debug, Clone)]
pub struct SampleBuffer {
    samples: heapless::Vec<Sample, MAX_WINDOW_SAMPLES>,
    capacity: usize,
}

impl SampleBuffer {
    /// `capacity` is clamped to `2..=MAX_WINDOW_SAMPLES`.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            samples: heapless::Vec::new(),
            capacity: capacity.clamp(2, MAX_WINDOW_SAMPLES),
        }
    }

    /// Append a sample.  Returns `false` when the window is already full
    /// and the sample was dropped.
    pub fn push(&mut self, sample: Sample) -> bool {
        if self.samples.len() >= self.capacity {
            return false;
        }
        self.samples.push(sample).is_ok()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.samples.len() >= self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn first(&self) -> Option<&Sample> {
        self.samples.first()
    }

    pub fn last(&self) -> Option<&Sample> {
        self.samples.last()
    }

    pub fn as_slice(&self) -> &[Sample] {
        &self.samples
    }
}
