//! Location tracking with travelled-distance bookkeeping.

use serde::{Deserialize, Serialize};

use crate::point::{Bounds, Point};

/// A location plus the distance travelled to reach it.
///
/// The distance counter only grows, and only through [`Mobile::move_to`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Mobile {
    location: Point,
    total_distance: f64,
}

impl Mobile {
    pub fn new(location: Point) -> Self {
        Self {
            location,
            total_distance: 0.0,
        }
    }

    pub fn location(&self) -> Point {
        self.location
    }

    pub fn total_distance(&self) -> f64 {
        self.total_distance
    }

    pub fn calc_distance(&self, other: Point) -> f64 {
        self.location.distance(other)
    }

    /// Moves to `target` if it lies within `bounds`, adding the Euclidean
    /// length of the step to the travelled distance. Returns `false` and
    /// leaves everything untouched otherwise.
    pub fn move_to(&mut self, target: Point, bounds: Bounds) -> bool {
        if !target.is_valid(bounds) {
            return false;
        }
        self.total_distance += self.calc_distance(target);
        self.location = target;
        true
    }

    /// Relocates without counting distance (clamping, restoring).
    pub fn set_location(&mut self, location: Point) {
        self.location = location;
    }

    pub(crate) fn restore(location: Point, total_distance: f64) -> Self {
        Self {
            location,
            total_distance,
        }
    }
}
