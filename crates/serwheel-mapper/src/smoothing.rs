//! Steering moving-average filter
//!
//! A fixed-capacity ring buffer of recent steering angles. No heap
//! allocation; the window lives inline in the filter state.

use crate::STEERING_WINDOW;

/// Moving average over the last `N` steering angles.
///
/// Once full, each new sample evicts the oldest. The mean is taken over
/// however many samples are held, so the first readings are averaged over a
/// shorter window.
#[derive(Debug, Clone, Copy)]
pub struct SteeringSmoother<const N: usize = STEERING_WINDOW> {
    samples: [f64; N],
    /// Next slot to write.
    head: usize,
    len: usize,
}

impl<const N: usize> SteeringSmoother<N> {
    pub fn new() -> Self {
        const { assert!(N > 0, "smoothing window must hold at least one sample") };
        Self {
            samples: [0.0; N],
            head: 0,
            len: 0,
        }
    }

    /// Add an angle and return the truncated mean of the window.
    pub fn push(&mut self, angle: f64) -> i32 {
        if let Some(slot) = self.samples.get_mut(self.head) {
            *slot = angle;
        }
        self.head = (self.head + 1) % N;
        self.len = (self.len + 1).min(N);

        self.mean().unwrap_or(angle as i32)
    }

    /// Mean of the held samples truncated toward zero, `None` when empty.
    pub fn mean(&self) -> Option<i32> {
        if self.len == 0 {
            return None;
        }
        let sum: f64 = self.iter().sum();
        Some((sum / self.len as f64) as i32)
    }

    /// Samples from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        let start = (self.head + N - self.len) % N;
        (0..self.len).filter_map(move |i| self.samples.get((start + i) % N).copied())
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        N
    }

    pub fn reset(&mut self) {
        self.samples = [0.0; N];
        self.head = 0;
        self.len = 0;
    }
}

impl<const N: usize> Default for SteeringSmoother<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::steering_angle;

    #[test]
    fn test_running_mean_sequence() {
        let mut smoother = SteeringSmoother::<5>::new();
        let means: Vec<i32> = [0u16, 25, 50, 75, 100]
            .iter()
            .map(|&raw| smoother.push(steering_angle(raw)))
            .collect();
        assert_eq!(means, vec![-450, -337, -225, -112, 0]);
    }

    #[test]
    fn test_oldest_sample_evicted() {
        let mut smoother = SteeringSmoother::<3>::new();
        smoother.push(300.0);
        smoother.push(0.0);
        smoother.push(0.0);
        assert_eq!(smoother.mean(), Some(100));

        // 300.0 falls out of the window.
        assert_eq!(smoother.push(0.0), 0);
        assert_eq!(smoother.len(), 3);
    }

    #[test]
    fn test_iter_is_arrival_order() {
        let mut smoother = SteeringSmoother::<3>::new();
        for angle in [1.0, 2.0, 3.0, 4.0] {
            smoother.push(angle);
        }
        let held: Vec<f64> = smoother.iter().collect();
        assert_eq!(held.len(), 3);
        assert!(held.iter().zip([2.0, 3.0, 4.0]).all(|(a, b)| (a - b).abs() < f64::EPSILON));
    }

    #[test]
    fn test_negative_mean_truncates_toward_zero() {
        let mut smoother = SteeringSmoother::<2>::new();
        smoother.push(-1.0);
        assert_eq!(smoother.push(-2.0), -1);
    }

    #[test]
    fn test_empty_and_reset() {
        let mut smoother = SteeringSmoother::<5>::default();
        assert!(smoother.is_empty());
        assert_eq!(smoother.mean(), None);
        assert_eq!(smoother.capacity(), 5);

        smoother.push(10.0);
        assert!(!smoother.is_empty());

        smoother.reset();
        assert!(smoother.is_empty());
        assert_eq!(smoother.mean(), None);
    }
}
