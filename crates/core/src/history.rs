use chrono::{DateTime, Utc};
use std::collections::VecDeque;

/// A timestamped reading. Never mutated after it enters a history.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample<T> {
    pub timestamp: DateTime<Utc>,
    pub value:     T,
}

/// Fixed-capacity FIFO of samples, oldest first — feeds the chart series.
#[derive(Debug, Clone)]
pub struct BoundedHistory<T> {
    samples:  VecDeque<Sample<T>>,
    capacity: usize,
}

impl<T: Clone> BoundedHistory<T> {
    /// A zero capacity is clamped to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Push a new sample, evicting the oldest if at capacity.
    pub fn push(&mut self, timestamp: DateTime<Utc>, value: T) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(Sample { timestamp, value });
    }

    /// Replace the whole history, keeping only the newest `capacity` samples.
    pub fn replace(&mut self, samples: impl IntoIterator<Item = Sample<T>>) {
        self.samples.clear();
        for sample in samples {
            if self.samples.len() == self.capacity {
                self.samples.pop_front();
            }
            self.samples.push_back(sample);
        }
    }

    /// Change the capacity, dropping the oldest samples if it shrinks.
    pub fn resize(&mut self, capacity: usize) {
        self.capacity = capacity.max(1);
        while self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Sample<T>> {
        self.samples.iter()
    }

    pub fn latest(&self) -> Option<&Sample<T>> {
        self.samples.back()
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
}
