use super::{Point, TankEnv};

/// Continuous reading of the range taken once per tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    /// Tank orientation in degrees, 0 pointing up.
    pub angle: f64,
    /// Distance between the tank and the target centers.
    pub distance: f64,
}

impl Observation {
    pub fn new(angle: f64, distance: f64) -> Self {
        Self { angle, distance }
    }

    pub fn from_env(env: &dyn TankEnv) -> Self {
        Self {
            angle: env.tank_angle(),
            distance: env.tank_position().distance(&env.target_position()),
        }
    }
}

impl Point {
    pub fn distance(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}
