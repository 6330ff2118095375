//! Animal state, validated setters and eating.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use thiserror::Error;

use crate::diet::Diet;
use crate::food::{Edible, FoodType};
use crate::mobile::Mobile;
use crate::observer::{Observer, ObserverError, ObserverHub, ObserverId};
use crate::point::Point;
use crate::species::{Color, Species};
use crate::sprite::{NoSprites, SpriteLoader, SpritePair};

pub const MIN_SIZE: i32 = 50;
pub const MAX_SIZE: i32 = 300;
pub const MAX_SPEED: i32 = 10;

pub(crate) fn valid_size(size: i32) -> bool {
    (MIN_SIZE..=MAX_SIZE).contains(&size)
}

pub(crate) fn valid_speed(speed: i32) -> bool {
    (0..=MAX_SPEED).contains(&speed)
}

pub(crate) fn valid_weight(weight: f64) -> bool {
    weight.is_finite() && weight > 0.0
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnimalError {
    #[error("invalid {field} for {species}: {value}")]
    InvalidField {
        species: Species,
        field: &'static str,
        value: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Horizontal {
    Left,
    Right,
}

impl Horizontal {
    pub fn sign(self) -> i32 {
        match self {
            Horizontal::Left => -1,
            Horizontal::Right => 1,
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            Horizontal::Left => Horizontal::Right,
            Horizontal::Right => Horizontal::Left,
        }
    }
}

impl TryFrom<i32> for Horizontal {
    type Error = i32;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(Horizontal::Left),
            1 => Ok(Horizontal::Right),
            other => Err(other),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Vertical {
    Down,
    Up,
}

impl Vertical {
    pub fn sign(self) -> i32 {
        match self {
            Vertical::Down => -1,
            Vertical::Up => 1,
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            Vertical::Down => Vertical::Up,
            Vertical::Up => Vertical::Down,
        }
    }
}

impl TryFrom<i32> for Vertical {
    type Error = i32;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(Vertical::Down),
            1 => Ok(Vertical::Up),
            other => Err(other),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lifecycle {
    Running,
    Suspended,
    Stopped,
}

/// Construction parameters for an animal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnimalSpec {
    pub size: i32,
    pub hor_speed: i32,
    pub ver_speed: i32,
    #[serde(default)]
    pub color: Color,
    pub weight: f64,
}

/// Everything about an animal that changes while it lives.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnimalState {
    pub(crate) size: i32,
    pub(crate) weight: f64,
    pub(crate) hor_speed: i32,
    pub(crate) ver_speed: i32,
    pub(crate) x_dir: Horizontal,
    pub(crate) y_dir: Vertical,
    pub(crate) color: Color,
    pub(crate) eat_count: u32,
    pub(crate) mobile: Mobile,
    pub(crate) lifecycle: Lifecycle,
}

impl AnimalState {
    pub fn size(&self) -> i32 {
        self.size
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn hor_speed(&self) -> i32 {
        self.hor_speed
    }

    pub fn ver_speed(&self) -> i32 {
        self.ver_speed
    }

    pub fn x_dir(&self) -> Horizontal {
        self.x_dir
    }

    pub fn y_dir(&self) -> Vertical {
        self.y_dir
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn eat_count(&self) -> u32 {
        self.eat_count
    }

    pub fn location(&self) -> Point {
        self.mobile.location()
    }

    pub fn total_distance(&self) -> f64 {
        self.mobile.total_distance()
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn set_size(&mut self, size: i32) -> bool {
        if !valid_size(size) {
            return false;
        }
        self.size = size;
        true
    }

    pub fn set_weight(&mut self, weight: f64) -> bool {
        if !valid_weight(weight) {
            return false;
        }
        self.weight = weight;
        true
    }

    pub fn set_hor_speed(&mut self, speed: i32) -> bool {
        if !valid_speed(speed) {
            return false;
        }
        self.hor_speed = speed;
        true
    }

    pub fn set_ver_speed(&mut self, speed: i32) -> bool {
        if !valid_speed(speed) {
            return false;
        }
        self.ver_speed = speed;
        true
    }
}

/// One zoo animal. Shared between its movement thread, the arena and
/// whoever drives the simulation.
pub struct Animal {
    name: String,
    species: Species,
    pub(crate) state: Mutex<AnimalState>,
    pub(crate) wake: Condvar,
    pub(crate) observers: ObserverHub,
    sprite_loader: Arc<dyn SpriteLoader>,
    sprites: Mutex<Option<SpritePair>>,
}

impl Animal {
    /// Builds an animal at its species' starting point, rejecting the first
    /// out-of-range parameter.
    pub fn new(species: Species, spec: AnimalSpec) -> Result<Self, AnimalError> {
        let invalid = |field: &'static str, value: String| AnimalError::InvalidField {
            species,
            field,
            value,
        };
        if !valid_size(spec.size) {
            return Err(invalid("size", spec.size.to_string()));
        }
        if !valid_speed(spec.hor_speed) {
            return Err(invalid("horizontal speed", spec.hor_speed.to_string()));
        }
        if !valid_speed(spec.ver_speed) {
            return Err(invalid("vertical speed", spec.ver_speed.to_string()));
        }
        if !valid_weight(spec.weight) {
            return Err(invalid("weight", spec.weight.to_string()));
        }

        let state = AnimalState {
            size: spec.size,
            weight: spec.weight,
            hor_speed: spec.hor_speed,
            ver_speed: spec.ver_speed,
            x_dir: Horizontal::Right,
            y_dir: Vertical::Up,
            color: spec.color,
            eat_count: 0,
            mobile: Mobile::new(species.start_location()),
            lifecycle: Lifecycle::Running,
        };
        debug!("{} constructed: {:?}", species, spec);

        Ok(Self {
            name: species.name().to_string(),
            species,
            state: Mutex::new(state),
            wake: Condvar::new(),
            observers: ObserverHub::new(),
            sprite_loader: Arc::new(NoSprites),
            sprites: Mutex::new(None),
        })
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_location(mut self, location: Point) -> Self {
        self.state
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .mobile
            .set_location(location);
        self
    }

    pub fn with_sprite_loader(mut self, loader: Arc<dyn SpriteLoader>) -> Self {
        let color = self.state.get_mut().unwrap_or_else(PoisonError::into_inner).color;
        self.sprite_loader = loader;
        self.reload_sprites(color);
        self
    }

    pub(crate) fn lock_state(&self) -> MutexGuard<'_, AnimalState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn species(&self) -> Species {
        self.species
    }

    pub fn diet(&self) -> &'static dyn Diet {
        self.species.diet()
    }

    /// Copy of the current state, taken under one lock.
    pub fn snapshot(&self) -> AnimalState {
        self.lock_state().clone()
    }

    pub fn location(&self) -> Point {
        self.lock_state().location()
    }

    pub fn weight(&self) -> f64 {
        self.lock_state().weight
    }

    pub fn size(&self) -> i32 {
        self.lock_state().size
    }

    pub fn eat_count(&self) -> u32 {
        self.lock_state().eat_count
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lock_state().lifecycle
    }

    pub fn register_observer(&self, observer: Arc<dyn Observer>) -> ObserverId {
        self.observers.register(observer)
    }

    pub fn unregister_observer(&self, id: ObserverId) -> Result<(), ObserverError> {
        self.observers.unregister(id)
    }

    pub fn notify_observers(&self, event: &str) {
        self.observers.notify(&self.name, event);
    }

    fn log_setter(&self, setter: &str, value: impl fmt::Display, accepted: bool) {
        if accepted {
            debug!("{}: {}({}) accepted", self.name, setter, value);
        } else {
            warn!("{}: {}({}) rejected", self.name, setter, value);
        }
    }

    pub fn set_size(&self, size: i32) -> bool {
        let accepted = self.lock_state().set_size(size);
        self.log_setter("set_size", size, accepted);
        accepted
    }

    pub fn set_weight(&self, weight: f64) -> bool {
        let accepted = self.lock_state().set_weight(weight);
        self.log_setter("set_weight", weight, accepted);
        accepted
    }

    pub fn set_hor_speed(&self, speed: i32) -> bool {
        let accepted = self.lock_state().set_hor_speed(speed);
        self.log_setter("set_hor_speed", speed, accepted);
        accepted
    }

    pub fn set_ver_speed(&self, speed: i32) -> bool {
        let accepted = self.lock_state().set_ver_speed(speed);
        self.log_setter("set_ver_speed", speed, accepted);
        accepted
    }

    /// Accepts `-1` (left) or `1` (right).
    pub fn set_x_dir(&self, dir: i32) -> bool {
        let accepted = match Horizontal::try_from(dir) {
            Ok(dir) => {
                self.lock_state().x_dir = dir;
                true
            }
            Err(_) => false,
        };
        self.log_setter("set_x_dir", dir, accepted);
        accepted
    }

    /// Accepts `-1` (down) or `1` (up).
    pub fn set_y_dir(&self, dir: i32) -> bool {
        let accepted = match Vertical::try_from(dir) {
            Ok(dir) => {
                self.lock_state().y_dir = dir;
                true
            }
            Err(_) => false,
        };
        self.log_setter("set_y_dir", dir, accepted);
        accepted
    }

    /// Switches colour variant by name and reloads the sprites for it.
    pub fn set_color(&self, name: &str) -> bool {
        let accepted = match name.parse::<Color>() {
            Ok(color) => {
                let mut state = self.lock_state();
                state.color = color;
                self.reload_sprites(color);
                true
            }
            Err(_) => false,
        };
        self.log_setter("set_color", name, accepted);
        accepted
    }

    /// Callers changing the colour hold the state lock across this call.
    pub(crate) fn reload_sprites(&self, color: Color) {
        let loaded = self.sprite_loader.load(self.species, color);
        if loaded.is_none() {
            debug!("{}: no sprites for {} variant", self.name, color);
        }
        *self.sprites.lock().unwrap_or_else(PoisonError::into_inner) = loaded;
    }

    pub fn sprites(&self) -> Option<SpritePair> {
        self.sprites
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Image matching the direction the animal currently faces.
    pub fn current_sprite(&self) -> Option<PathBuf> {
        let facing = self.lock_state().x_dir;
        self.sprites().map(|pair| match facing {
            Horizontal::Right => pair.facing_right,
            Horizontal::Left => pair.facing_left,
        })
    }

    pub fn make_sound(&self) {
        info!("{}: {}", self.name, self.species.sound());
    }

    /// Offers `food` to the animal's diet. A positive gain, rounded to two
    /// decimals, is added to the weight and counted as a meal.
    pub fn eat(&self, food: &dyn Edible) -> bool {
        let gained = {
            let mut state = self.lock_state();
            let gain = self.diet().eat(state.weight, food);
            if gain <= 0.0 {
                None
            } else {
                let rounded = (gain * 100.0).round() / 100.0;
                state.weight += rounded;
                state.eat_count += 1;
                Some(rounded)
            }
        };

        match gained {
            Some(gain) => {
                info!("{} ate and gained {:.2}", self.name, gain);
                self.make_sound();
                true
            }
            None => {
                debug!("{} refused {:?}", self.name, food.food_type());
                false
            }
        }
    }
}

impl Edible for Animal {
    fn food_type(&self) -> FoodType {
        self.species.food_type()
    }
}

impl fmt::Display for Animal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.lock_state();
        write!(
            f,
            "[!] {}: total distance: {:.2}, weight: {:.2}",
            self.name,
            state.total_distance(),
            state.weight
        )
    }
}

impl fmt::Debug for Animal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Animal")
            .field("name", &self.name)
            .field("species", &self.species)
            .field("state", &*self.lock_state())
            .finish()
    }
}
