//! The species table: diet, sound, sprite prefix and starting point per
//! kind of animal.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::diet::{Carnivore, Diet, Herbivore, Omnivore};
use crate::food::FoodType;
use crate::point::Point;

static CARNIVORE: Carnivore = Carnivore;
static HERBIVORE: Herbivore = Herbivore;
static OMNIVORE: Omnivore = Omnivore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Species {
    Lion,
    Bear,
    Elephant,
    Giraffe,
    Turtle,
}

impl Species {
    pub const ALL: [Species; 5] = [
        Species::Lion,
        Species::Bear,
        Species::Elephant,
        Species::Giraffe,
        Species::Turtle,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Species::Lion => "Lion",
            Species::Bear => "Bear",
            Species::Elephant => "Elephant",
            Species::Giraffe => "Giraffe",
            Species::Turtle => "Turtle",
        }
    }

    pub fn diet(self) -> &'static dyn Diet {
        match self {
            Species::Lion => &CARNIVORE,
            Species::Bear => &OMNIVORE,
            Species::Elephant | Species::Giraffe | Species::Turtle => &HERBIVORE,
        }
    }

    /// What this species counts as when something tries to eat it.
    pub fn food_type(self) -> FoodType {
        match self {
            Species::Lion => FoodType::NotFood,
            _ => FoodType::Meat,
        }
    }

    pub fn sound(self) -> &'static str {
        match self {
            Species::Lion => "Roars, then stretches and shakes its mane",
            Species::Bear => "Stands on its hind legs, roars and scratches its belly",
            Species::Elephant => "Trumpets with joy while flapping its ears, then chews",
            Species::Giraffe => "Bleats and Stomps its legs, then chews",
            Species::Turtle => "Retracts its head in then eats quietly",
        }
    }

    pub fn sprite_prefix(self) -> &'static str {
        match self {
            Species::Lion => "lio",
            Species::Bear => "bea",
            Species::Elephant => "elf",
            Species::Giraffe => "grf",
            Species::Turtle => "trt",
        }
    }

    pub fn start_location(self) -> Point {
        match self {
            Species::Lion => Point::new(20, 0),
            Species::Bear => Point::new(100, 5),
            Species::Elephant => Point::new(50, 90),
            Species::Giraffe => Point::new(50, 0),
            Species::Turtle => Point::new(80, 0),
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Colour variant of an animal's sprites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    #[default]
    Natural,
    Blue,
    Red,
}

impl Color {
    pub fn name(self) -> &'static str {
        match self {
            Color::Natural => "Natural",
            Color::Blue => "Blue",
            Color::Red => "Red",
        }
    }

    /// Letter used in sprite file names.
    pub fn file_code(self) -> char {
        match self {
            Color::Natural => 'n',
            Color::Blue => 'b',
            Color::Red => 'r',
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown color '{0}'")]
pub struct UnknownColor(pub String);

impl FromStr for Color {
    type Err = UnknownColor;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Natural" | "natural" => Ok(Color::Natural),
            "Blue" | "blue" => Ok(Color::Blue),
            "Red" | "red" => Ok(Color::Red),
            other => Err(UnknownColor(other.to_string())),
        }
    }
}
