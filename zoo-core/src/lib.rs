//! Animals, their diets and the movement thread that drives each of them.

pub mod animal;
pub mod arena;
pub mod diet;
pub mod food;
pub mod lifecycle;
pub mod memento;
pub mod mobile;
pub mod movement;
pub mod observer;
pub mod point;
pub mod species;
pub mod sprite;

pub use animal::{Animal, AnimalError, AnimalSpec, AnimalState, Horizontal, Lifecycle, Vertical};
pub use arena::{Arena, FoodItem};
pub use diet::{Carnivore, Diet, Herbivore, Omnivore};
pub use food::{Edible, FoodKind, FoodType};
pub use lifecycle::{spawn, DEFAULT_TICK};
pub use memento::{Memento, RestoreError};
pub use mobile::Mobile;
pub use movement::Step;
pub use observer::{Observer, ObserverError, ObserverHub, ObserverId};
pub use point::{Bounds, Point};
pub use species::{Color, Species, UnknownColor};
pub use sprite::{NoSprites, SpriteLoader, SpritePair};
