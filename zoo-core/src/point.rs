use serde::{Deserialize, Serialize};

/// Extent of the area animals may occupy. Coordinates run from `0` to
/// `width`/`height` inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    pub width: i32,
    pub height: i32,
}

impl Bounds {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    pub fn contains(&self, point: Point) -> bool {
        (0..=self.width).contains(&point.x) && (0..=self.height).contains(&point.y)
    }

    /// Pulls a point onto the nearest valid coordinate.
    pub fn clamp(&self, point: Point) -> Point {
        Point::new(
            point.x.clamp(0, self.width.max(0)),
            point.y.clamp(0, self.height.max(0)),
        )
    }

    pub fn center(&self) -> Point {
        Point::new(self.width / 2, self.height / 2)
    }
}

/// Position on the arena in whole pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn translate(self, dx: i32, dy: i32) -> Point {
        Point::new(self.x + dx, self.y + dy)
    }

    /// Euclidean distance to `other`.
    pub fn distance(self, other: Point) -> f64 {
        let dx = (self.x - other.x) as f64;
        let dy = (self.y - other.y) as f64;
        dx.hypot(dy)
    }

    pub fn is_valid(self, bounds: Bounds) -> bool {
        bounds.contains(self)
    }
}
