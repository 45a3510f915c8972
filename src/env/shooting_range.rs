use rand::distributions::Uniform;
use rand::prelude::Distribution;
use rand::rngs::SmallRng;
use rand::SeedableRng;

use super::{Bounds, Bullet, Point, TankEnv};
use crate::config::RangeConfig;

/// Headless shooting range: a fixed tank at the bottom of the field, a square
/// target dropped somewhere in the upper part, and bullets flying in straight lines.
#[derive(Debug, Clone)]
pub struct ShootingRange {
    config: RangeConfig,
    angle: f64,
    target: Point,
    bullet: Option<Bullet>,
    target_x: Uniform<f64>,
    target_y: Uniform<f64>,
    rng: SmallRng,
}

impl ShootingRange {
    pub fn new(config: RangeConfig, seed: u64) -> Self {
        let target_x = Uniform::new_inclusive(config.target_x_range.0, config.target_x_range.1);
        let target_y = Uniform::new_inclusive(config.target_y_range.0, config.target_y_range.1);
        let mut env = Self {
            config,
            angle: 0.0,
            target: Point::default(),
            bullet: None,
            target_x,
            target_y,
            rng: SmallRng::seed_from_u64(seed),
        };
        env.reset();
        env
    }

    /// Moves the target so its center sits at `center`. Used to set up fixed scenarios.
    pub fn place_target(&mut self, center: Point) {
        self.target = center;
    }

    fn place_random_target(&mut self) {
        let half = self.config.target_size / 2.0;
        self.target = Point::new(
            self.target_x.sample(&mut self.rng) + half,
            self.target_y.sample(&mut self.rng) + half,
        );
    }
}

impl Default for ShootingRange {
    fn default() -> Self {
        Self::new(RangeConfig::default(), 42)
    }
}

impl TankEnv for ShootingRange {
    fn reset(&mut self) {
        self.angle = 0.0;
        self.bullet = None;
        self.place_random_target();
    }

    fn tank_angle(&self) -> f64 {
        self.angle
    }

    fn tank_position(&self) -> Point {
        Point::new(self.config.tank_center.0, self.config.tank_center.1)
    }

    fn target_position(&self) -> Point {
        self.target
    }

    fn bullet(&self) -> Option<Bullet> {
        self.bullet
    }

    fn bounds(&self) -> Bounds {
        Bounds::new(self.config.width, self.config.height)
    }

    fn rotate_tank(&mut self, delta: f64) {
        self.angle = (self.angle + delta).rem_euclid(360.0);
    }

    fn fire_bullet(&mut self, angle: f64) {
        let radians = angle.to_radians();
        let speed = self.config.bullet_speed;
        self.bullet = Some(Bullet {
            position: Point::new(self.config.muzzle.0, self.config.muzzle.1),
            velocity: Point::new(-radians.sin() * speed, -radians.cos() * speed),
            size: Point::new(self.config.bullet_size.0, self.config.bullet_size.1),
            angle,
        });
    }

    fn advance_bullet(&mut self) {
        if let Some(bullet) = self.bullet.as_mut() {
            bullet.position.x += bullet.velocity.x;
            bullet.position.y += bullet.velocity.y;
        }
    }

    fn reload(&mut self) {
        self.bullet = None;
    }

    fn render(&self) -> String {
        let bullet = match &self.bullet {
            Some(b) => format!(
                "bullet at ({:.1}, {:.1}) heading {:.0}°",
                b.position.x, b.position.y, b.angle
            ),
            None => "gun ready".to_string(),
        };
        format!(
            "tank {:>3.0}° | target ({:.0}, {:.0}) | {}",
            self.angle, self.target.x, self.target.y, bullet
        )
    }
}
