// Copyright 2026 the Stagger Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bounded sample history.

use alloc::collections::VecDeque;

/// Bounded FIFO of `f64` samples with a `drop_oldest` overflow policy.
///
/// Once full, new pushes remove the oldest sample before inserting the newest,
/// so the mean always covers at most `capacity` of the most recent samples.
#[derive(Debug, Clone)]
pub(crate) struct SampleWindow {
    items: VecDeque<f64>,
    capacity: usize,
}

impl SampleWindow {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            items: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub(crate) fn push(&mut self, sample: f64) {
        if self.items.len() == self.capacity {
            let _ = self.items.pop_front();
        }
        self.items.push_back(sample);
    }

    /// Arithmetic mean of the retained samples, or 0 when empty.
    pub(crate) fn mean(&self) -> f64 {
        if self.items.is_empty() {
            0.0
        } else {
            let sum: f64 = self.items.iter().sum();
            sum / self.items.len() as f64
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.items.len()
    }

    pub(crate) fn is_full(&self) -> bool {
        self.items.len() == self.capacity
    }

    pub(crate) fn clear(&mut self) {
        self.items.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::SampleWindow;

    #[test]
    fn zero_capacity_is_promoted_to_one() {
        let mut window = SampleWindow::with_capacity(0);
        window.push(10.0);
        window.push(11.0);

        assert_eq!(window.len(), 1);
        assert_eq!(window.mean(), 11.0);
    }

    #[test]
    fn push_over_capacity_drops_oldest() {
        let mut window = SampleWindow::with_capacity(2);
        window.push(1.0);
        window.push(2.0);
        window.push(3.0);

        assert_eq!(window.len(), 2);
        assert!(window.is_full());
        assert_eq!(window.mean(), 2.5);
    }

    #[test]
    fn empty_window_mean_is_zero() {
        let mut window = SampleWindow::with_capacity(4);
        assert_eq!(window.mean(), 0.0);

        window.push(8.0);
        window.clear();
        assert_eq!(window.len(), 0);
        assert_eq!(window.mean(), 0.0);
    }
}
