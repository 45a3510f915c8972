use serde::{Deserialize, Serialize};

use crate::env::Observation;
use crate::error::{Result, TankError};

/// Index pair into the value table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DiscreteState {
    pub angle_bin: usize,
    pub distance_bin: usize,
}

impl DiscreteState {
    pub fn new(angle_bin: usize, distance_bin: usize) -> Self {
        Self {
            angle_bin,
            distance_bin,
        }
    }
}

/// Buckets a full turn into `angle_bins` equal slices and distance into
/// fixed-width bands, the last band absorbing everything farther away.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StateDiscretizer {
    angle_bins: usize,
    distance_bins: usize,
    distance_width: f64,
}

impl Default for StateDiscretizer {
    fn default() -> Self {
        Self::new(Self::ANGLE_BINS, Self::DISTANCE_BINS, Self::DISTANCE_WIDTH)
    }
}

impl StateDiscretizer {
    pub const ANGLE_BINS: usize = 36;
    pub const DISTANCE_BINS: usize = 10;
    pub const DISTANCE_WIDTH: f64 = 100.0;

    pub fn new(angle_bins: usize, distance_bins: usize, distance_width: f64) -> Self {
        assert!(angle_bins > 0 && distance_bins > 0 && distance_width > 0.0);
        Self {
            angle_bins,
            distance_bins,
            distance_width,
        }
    }

    pub fn angle_bins(&self) -> usize {
        self.angle_bins
    }

    pub fn distance_bins(&self) -> usize {
        self.distance_bins
    }

    pub fn discretize(&self, angle: f64, distance: f64) -> Result<DiscreteState> {
        if !angle.is_finite() || !distance.is_finite() || distance < 0.0 {
            return Err(TankError::InvalidObservation { angle, distance });
        }
        let angle_width = 360.0 / self.angle_bins as f64;
        // rem_euclid may round tiny negative angles up to exactly 360.0
        let angle_bin = ((angle.rem_euclid(360.0) / angle_width) as usize).min(self.angle_bins - 1);
        let distance_bin = ((distance / self.distance_width) as usize).min(self.distance_bins - 1);
        Ok(DiscreteState::new(angle_bin, distance_bin))
    }

    pub fn observe(&self, obs: &Observation) -> Result<DiscreteState> {
        self.discretize(obs.angle, obs.distance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn angle_bins_are_ten_degrees_wide() {
        let d = StateDiscretizer::default();
        assert_eq!(d.discretize(0.0, 0.0).unwrap().angle_bin, 0);
        assert_eq!(d.discretize(9.99, 0.0).unwrap().angle_bin, 0);
        assert_eq!(d.discretize(10.0, 0.0).unwrap().angle_bin, 1);
        assert_eq!(d.discretize(359.9, 0.0).unwrap().angle_bin, 35);
    }

    #[test]
    fn angle_is_periodic() {
        let d = StateDiscretizer::default();
        let mut angle = -725.0;
        while angle < 725.0 {
            let a = d.discretize(angle, 250.0).unwrap();
            let b = d.discretize(angle + 360.0, 250.0).unwrap();
            assert_eq!(a, b, "angle {}", angle);
            assert!(a.angle_bin < 36);
            angle += 2.5;
        }
    }

    #[test]
    fn negative_angles_wrap() {
        let d = StateDiscretizer::default();
        assert_eq!(d.discretize(-10.0, 0.0).unwrap().angle_bin, 35);
        assert_eq!(d.discretize(-1e-20, 0.0).unwrap().angle_bin, 35);
    }

    #[test]
    fn far_distances_clamp_to_last_bin() {
        let d = StateDiscretizer::default();
        assert_eq!(d.discretize(0.0, 899.9).unwrap().distance_bin, 8);
        for distance in [900.0, 901.0, 1500.0, 1e9] {
            assert_eq!(d.discretize(0.0, distance).unwrap().distance_bin, 9);
        }
    }

    #[test]
    fn near_distances_fall_in_first_bin() {
        let d = StateDiscretizer::default();
        for distance in [0.0, 0.5, 50.0, 99.999] {
            assert_eq!(d.discretize(0.0, distance).unwrap().distance_bin, 0);
        }
    }

    #[test]
    fn invalid_observations_are_reported() {
        let d = StateDiscretizer::default();
        assert!(matches!(
            d.discretize(0.0, -1.0),
            Err(TankError::InvalidObservation { .. })
        ));
        assert!(d.discretize(f64::NAN, 10.0).is_err());
        assert!(d.discretize(0.0, f64::INFINITY).is_err());
    }
}
