use serde::{Deserialize, Serialize};
use std::fmt;

/// What an edible thing counts as for diet purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FoodType {
    Meat,
    Vegetable,
    NotFood,
}

/// Anything a diet can be asked about.
pub trait Edible {
    fn food_type(&self) -> FoodType;
}

/// Food items the zoo keeper can place on the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FoodKind {
    Cabbage,
    Lettuce,
    Meat,
}

impl FoodKind {
    pub fn name(self) -> &'static str {
        match self {
            FoodKind::Cabbage => "Cabbage",
            FoodKind::Lettuce => "Lettuce",
            FoodKind::Meat => "Meat",
        }
    }
}

impl Edible for FoodKind {
    fn food_type(&self) -> FoodType {
        match self {
            FoodKind::Cabbage | FoodKind::Lettuce => FoodType::Vegetable,
            FoodKind::Meat => FoodType::Meat,
        }
    }
}

impl fmt::Display for FoodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
