//! Per-species eating rules.

use std::fmt;

use crate::food::{Edible, FoodType};

/// Weight gained by a carnivore, as a share of its own weight.
const CARNIVORE_GAIN: f64 = 0.10;
/// Weight gained by a herbivore, as a share of its own weight.
const HERBIVORE_GAIN: f64 = 0.07;

/// Decides what an animal may eat and how much weight a meal is worth.
pub trait Diet: Send + Sync + fmt::Debug {
    fn name(&self) -> &'static str;

    fn can_eat(&self, food: FoodType) -> bool;

    /// Weight gained by an eater of `eater_weight` consuming `food`.
    /// Anything `<= 0.0` means the meal was refused.
    fn eat(&self, eater_weight: f64, food: &dyn Edible) -> f64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Carnivore;

impl Diet for Carnivore {
    fn name(&self) -> &'static str {
        "Carnivore"
    }

    fn can_eat(&self, food: FoodType) -> bool {
        food == FoodType::Meat
    }

    fn eat(&self, eater_weight: f64, food: &dyn Edible) -> f64 {
        if self.can_eat(food.food_type()) {
            eater_weight * CARNIVORE_GAIN
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Herbivore;

impl Diet for Herbivore {
    fn name(&self) -> &'static str {
        "Herbivore"
    }

    fn can_eat(&self, food: FoodType) -> bool {
        food == FoodType::Vegetable
    }

    fn eat(&self, eater_weight: f64, food: &dyn Edible) -> f64 {
        if self.can_eat(food.food_type()) {
            eater_weight * HERBIVORE_GAIN
        } else {
            0.0
        }
    }
}

/// Eats whatever either of the other two diets would, at their rates.
#[derive(Debug, Clone, Copy, Default)]
pub struct Omnivore;

impl Diet for Omnivore {
    fn name(&self) -> &'static str {
        "Omnivore"
    }

    fn can_eat(&self, food: FoodType) -> bool {
        Carnivore.can_eat(food) || Herbivore.can_eat(food)
    }

    fn eat(&self, eater_weight: f64, food: &dyn Edible) -> f64 {
        match food.food_type() {
            FoodType::Meat => Carnivore.eat(eater_weight, food),
            FoodType::Vegetable => Herbivore.eat(eater_weight, food),
            FoodType::NotFood => 0.0,
        }
    }
}
