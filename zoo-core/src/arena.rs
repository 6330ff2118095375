use serde::Serialize;

use crate::food::{Edible, FoodKind, FoodType};
use crate::point::{Bounds, Point};

/// A food item currently lying on the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FoodItem {
    pub kind: FoodKind,
    pub location: Point,
}

impl Edible for FoodItem {
    fn food_type(&self) -> FoodType {
        self.kind.food_type()
    }
}

/// The surface every animal thread moves on.
///
/// Implementations are shared between all animal threads, so every method
/// must be safe to call concurrently and must never hand out a half-updated
/// food item.
pub trait Arena: Send + Sync {
    fn bounds(&self) -> Bounds;

    /// Current food, read as a single value.
    fn food(&self) -> Option<FoodItem>;

    fn request_redraw(&self);

    /// Arena-side bookkeeping after an animal moved (eating, removals).
    fn on_tick(&self);

    fn food_location(&self) -> Option<Point> {
        self.food().map(|food| food.location)
    }

    fn food_type(&self) -> Option<FoodType> {
        self.food().map(|food| food.food_type())
    }
}
