use glam::Vec3;

/// Finite-difference velocity with a moving-average ring buffer
#[derive(Debug, Clone)]
pub struct VelocityEstimator {
    samples: Vec<Vec3>,
    capacity: usize,
    next: usize,
    max_speed: f32,
}

impl VelocityEstimator {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: Vec::with_capacity(capacity),
            capacity,
            next: 0,
            max_speed: f32::INFINITY,
        }
    }

    /// Estimator whose recorded samples are clamped to `max_speed`
    pub fn with_max_speed(capacity: usize, max_speed: f32) -> Self {
        Self {
            max_speed,
            ..Self::new(capacity)
        }
    }

    /// (current - previous) / dt, or zero when dt is not positive
    pub fn instantaneous(previous: Vec3, current: Vec3, dt: f32) -> Vec3 {
        if !(dt > 0.0) || !dt.is_finite() {
            return Vec3::ZERO;
        }
        (current - previous) / dt
    }

    /// Estimate and record this tick's velocity, clamped to the max speed.
    /// Non-positive or NaN `dt` returns zero and records nothing.
    pub fn update(&mut self, previous: Vec3, current: Vec3, dt: f32) -> Vec3 {
        if !(dt > 0.0) || !dt.is_finite() {
            return Vec3::ZERO;
        }
        let velocity = clamp_magnitude(Self::instantaneous(previous, current, dt), self.max_speed);
        self.push(velocity);
        velocity
    }

    /// Record an externally computed sample
    pub fn push(&mut self, velocity: Vec3) {
        if self.samples.len() < self.capacity {
            self.samples.push(velocity);
        } else {
            self.samples[self.next] = velocity;
        }
        self.next = (self.next + 1) % self.capacity;
    }

    /// Mean of the stored samples
    pub fn smoothed(&self) -> Vec3 {
        if self.samples.is_empty() {
            return Vec3::ZERO;
        }
        self.samples.iter().copied().sum::<Vec3>() / self.samples.len() as f32
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

    pub fn clear(&mut self) {
        self.samples.clear();
        self.next = 0;
    }
}

/// Rescale `v` to at most `max` length, keeping its direction
pub fn clamp_magnitude(v: Vec3, max: f32) -> Vec3 {
    let length = v.length();
    if length > max && length > 0.0 {
        v * (max.max(0.0) / length)
    } else {
        v
    }
}

impl Default for VelocityEstimator {
    fn default() -> Self {
        Self::new(crate::params::Params::VELOCITY_WINDOW)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instantaneous_velocity() {
        let v = VelocityEstimator::instantaneous(Vec3::ZERO, Vec3::new(0.1, 0.0, -0.2), 0.1);
        assert!((v - Vec3::new(1.0, 0.0, -2.0)).length() < 1e-5);
    }

    #[test]
    fn test_zero_dt_returns_zero_and_keeps_buffer() {
        let mut estimator = VelocityEstimator::new(5);
        let v = estimator.update(Vec3::ZERO, Vec3::ONE, 0.0);
        assert_eq!(v, Vec3::ZERO);
        assert!(estimator.is_empty());
        assert_eq!(estimator.smoothed(), Vec3::ZERO);

        let v = estimator.update(Vec3::ZERO, Vec3::ONE, -0.01);
        assert_eq!(v, Vec3::ZERO);
        assert!(!v.is_nan());
    }

    #[test]
    fn test_nan_dt_records_nothing() {
        let mut estimator = VelocityEstimator::new(5);
        let v = estimator.update(Vec3::ZERO, Vec3::ONE, f32::NAN);
        assert_eq!(v, Vec3::ZERO);
        assert!(estimator.is_empty());
    }

    #[test]
    fn test_update_clamps_recorded_speed() {
        let mut estimator = VelocityEstimator::with_max_speed(5, 8.0);
        let v = estimator.update(Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0), 0.01);
        assert!((v - Vec3::new(8.0, 0.0, 0.0)).length() < 1e-4);
        assert_eq!(estimator.smoothed(), v);
    }

    #[test]
    fn test_smoothed_is_mean_of_samples() {
        let mut estimator = VelocityEstimator::new(5);
        estimator.push(Vec3::new(1.0, 0.0, 0.0));
        estimator.push(Vec3::new(3.0, 0.0, 0.0));
        assert_eq!(estimator.smoothed(), Vec3::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn test_ring_buffer_drops_oldest() {
        let mut estimator = VelocityEstimator::new(5);
        for i in 0..5 {
            estimator.push(Vec3::new(i as f32, 0.0, 0.0));
        }
        assert_eq!(estimator.smoothed().x, 2.0);

        // Overwrites the 0.0 sample
        estimator.push(Vec3::new(10.0, 0.0, 0.0));
        assert_eq!(estimator.len(), 5);
        assert_eq!(estimator.smoothed().x, (1.0 + 2.0 + 3.0 + 4.0 + 10.0) / 5.0);
    }

    #[test]
    fn test_clamp_magnitude_preserves_direction() {
        let v = clamp_magnitude(Vec3::new(30.0, 40.0, 0.0), 5.0);
        assert!((v - Vec3::new(3.0, 4.0, 0.0)).length() < 1e-5);
        assert_eq!(clamp_magnitude(Vec3::X, 5.0), Vec3::X);
        assert_eq!(clamp_magnitude(Vec3::ZERO, 5.0), Vec3::ZERO);
    }

    #[test]
    fn test_zero_capacity_is_promoted() {
        let mut estimator = VelocityEstimator::new(0);
        assert_eq!(estimator.capacity(), 1);
        estimator.push(Vec3::X);
        estimator.push(Vec3::Y);
        assert_eq!(estimator.smoothed(), Vec3::Y);
    }
}
