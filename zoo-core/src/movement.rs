//! Single-tick movement rules: seeking food and bouncing off the walls.

use crate::animal::{AnimalState, Horizontal, Vertical};
use crate::point::{Bounds, Point};

/// What one tick of an animal's loop did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Moved toward food its diet accepts.
    Sought,
    /// Wandered, bouncing off the arena edges.
    Bounced,
    /// Position unchanged this tick.
    Held,
    Stopped,
}

/// Signed step along one axis toward `to`, never longer than `speed` and
/// never past the target. Equal coordinates give `0`.
fn axis_step(from: i32, to: i32, speed: i32) -> i32 {
    let delta = to - from;
    delta.signum() * delta.abs().min(speed)
}

impl AnimalState {
    /// Pulls the animal back inside after the arena shrank under it.
    fn clamp_into(&mut self, bounds: Bounds) {
        let location = self.mobile.location();
        if !location.is_valid(bounds) {
            self.mobile.set_location(bounds.clamp(location));
        }
    }

    pub(crate) fn seek(&mut self, target: Point, bounds: Bounds) -> Step {
        self.clamp_into(bounds);
        let location = self.mobile.location();
        let dx = axis_step(location.x, target.x, self.hor_speed);
        let dy = axis_step(location.y, target.y, self.ver_speed);

        // An axis that does not move keeps its facing.
        if dx > 0 {
            self.x_dir = Horizontal::Right;
        } else if dx < 0 {
            self.x_dir = Horizontal::Left;
        }
        if dy > 0 {
            self.y_dir = Vertical::Up;
        } else if dy < 0 {
            self.y_dir = Vertical::Down;
        }

        if (dx, dy) == (0, 0) {
            return Step::Held;
        }
        let next = bounds.clamp(location.translate(dx, dy));
        if self.mobile.move_to(next, bounds) {
            Step::Sought
        } else {
            Step::Held
        }
    }

    pub(crate) fn bounce(&mut self, bounds: Bounds) -> Step {
        self.clamp_into(bounds);
        let mut location = self.mobile.location();

        if location.x >= bounds.width || location.x <= 0 {
            if location.x == 0 {
                location.x = 1;
            }
            self.x_dir = if location.x >= bounds.width {
                Horizontal::Left
            } else {
                Horizontal::Right
            };
        }
        if location.y >= bounds.height || location.y <= 0 {
            if location.y == 0 {
                location.y = 1;
            }
            self.y_dir = if location.y >= bounds.height {
                Vertical::Down
            } else {
                Vertical::Up
            };
        }
        self.mobile.set_location(location);

        let next = bounds.clamp(location.translate(
            self.hor_speed * self.x_dir.sign(),
            self.ver_speed * self.y_dir.sign(),
        ));
        if next == location {
            return Step::Held;
        }
        if self.mobile.move_to(next, bounds) {
            Step::Bounced
        } else {
            Step::Held
        }
    }
}
