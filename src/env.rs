mod action_space;
mod observation;
mod shooting_range;

pub use action_space::Action;
pub use observation::Observation;
pub use shooting_range::ShootingRange;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Rectangular playfield anchored at the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Edges count as inside.
    pub fn contains(&self, p: &Point) -> bool {
        p.x >= 0.0 && p.x <= self.width && p.y >= 0.0 && p.y <= self.height
    }
}

/// A projectile in flight. `position` is the sprite's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bullet {
    pub position: Point,
    pub velocity: Point,
    pub size: Point,
    pub angle: f64,
}

impl Bullet {
    pub fn center(&self) -> Point {
        Point::new(
            self.position.x + self.size.x / 2.0,
            self.position.y + self.size.y / 2.0,
        )
    }
}

/// The rendering/physics side of the game, seen from the learner.
///
/// The learner only reads positions and issues the three commands below;
/// everything about drawing and timing stays on the implementor's side.
pub trait TankEnv {
    /// Starts a new episode: tank back to 0 degrees, bullet cleared, target re-placed.
    fn reset(&mut self);
    fn tank_angle(&self) -> f64;
    fn tank_position(&self) -> Point;
    fn target_position(&self) -> Point;
    /// `None` while the gun is ready.
    fn bullet(&self) -> Option<Bullet>;
    fn bounds(&self) -> Bounds;
    fn rotate_tank(&mut self, delta: f64);
    fn fire_bullet(&mut self, angle: f64);
    fn advance_bullet(&mut self);
    /// Drops the bullet in flight, if any.
    fn reload(&mut self);
    fn render(&self) -> String;
}
