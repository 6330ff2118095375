//! Snapshots of an animal's mutable state and restoring from them.

use serde::Serialize;
use thiserror::Error;

use crate::animal::{valid_size, valid_speed, valid_weight, Animal, Horizontal, Vertical};
use crate::mobile::Mobile;
use crate::point::Point;
use crate::species::{Color, Species};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RestoreError {
    #[error("a {found} memento cannot restore a {expected}")]
    SpeciesMismatch { expected: Species, found: Species },
    #[error("memento {field} out of range: {value}")]
    InvalidField { field: &'static str, value: String },
}

/// Full copy of one animal's mutable state. Only [`Animal::save_state`]
/// creates these, and a restore consumes one.
#[derive(Debug, PartialEq, Serialize)]
pub struct Memento {
    species: Species,
    size: i32,
    weight: f64,
    hor_speed: i32,
    ver_speed: i32,
    x_dir: Horizontal,
    y_dir: Vertical,
    color: Color,
    location: Point,
    total_distance: f64,
    eat_count: u32,
}

impl Memento {
    pub fn species(&self) -> Species {
        self.species
    }

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

    pub fn location(&self) -> Point {
        self.location
    }

    pub fn total_distance(&self) -> f64 {
        self.total_distance
    }

    pub fn eat_count(&self) -> u32 {
        self.eat_count
    }

    fn validate(&self, expected: Species) -> Result<(), RestoreError> {
        if self.species != expected {
            return Err(RestoreError::SpeciesMismatch {
                expected,
                found: self.species,
            });
        }
        let invalid = |field: &'static str, value: String| {
            Err(RestoreError::InvalidField { field, value })
        };
        if !valid_size(self.size) {
            return invalid("size", self.size.to_string());
        }
        if !valid_weight(self.weight) {
            return invalid("weight", self.weight.to_string());
        }
        if !valid_speed(self.hor_speed) {
            return invalid("horizontal speed", self.hor_speed.to_string());
        }
        if !valid_speed(self.ver_speed) {
            return invalid("vertical speed", self.ver_speed.to_string());
        }
        if !(self.total_distance.is_finite() && self.total_distance >= 0.0) {
            return invalid("total distance", self.total_distance.to_string());
        }
        Ok(())
    }
}

impl Animal {
    pub fn save_state(&self) -> Memento {
        let state = self.lock_state();
        Memento {
            species: self.species(),
            size: state.size,
            weight: state.weight,
            hor_speed: state.hor_speed,
            ver_speed: state.ver_speed,
            x_dir: state.x_dir,
            y_dir: state.y_dir,
            color: state.color,
            location: state.location(),
            total_distance: state.total_distance(),
            eat_count: state.eat_count,
        }
    }

    /// Checks `memento` against this animal without writing anything.
    pub fn can_restore(&self, memento: &Memento) -> Result<(), RestoreError> {
        memento.validate(self.species())
    }

    /// Overwrites every field captured in `memento` in one critical section,
    /// reloads the sprites for the restored colour and emits "is restored".
    /// Nothing is written if the memento is rejected.
    pub fn restore(&self, memento: Memento) -> Result<(), RestoreError> {
        memento.validate(self.species())?;
        {
            let mut state = self.lock_state();
            state.size = memento.size;
            state.weight = memento.weight;
            state.hor_speed = memento.hor_speed;
            state.ver_speed = memento.ver_speed;
            state.x_dir = memento.x_dir;
            state.y_dir = memento.y_dir;
            state.color = memento.color;
            state.mobile = Mobile::restore(memento.location, memento.total_distance);
            state.eat_count = memento.eat_count;
            // Under the state lock so a concurrent set_color cannot pair
            // one colour with the other colour's sprites.
            self.reload_sprites(state.color);
        }
        self.notify_observers("is restored");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animal::AnimalSpec;
    use crate::food::FoodKind;
    use crate::observer::Observer;
    use crate::sprite::{SpriteLoader, SpritePair};
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex};

    struct NamedSprites;

    impl SpriteLoader for NamedSprites {
        fn load(&self, species: Species, color: Color) -> Option<SpritePair> {
            let stem = format!("{}_{}", species.sprite_prefix(), color.file_code());
            Some(SpritePair {
                facing_right: PathBuf::from(format!("{stem}_1.png")),
                facing_left: PathBuf::from(format!("{stem}_2.png")),
            })
        }
    }

    #[derive(Default)]
    struct Recorder(Mutex<Vec<String>>);

    impl Observer for Recorder {
        fn notify(&self, message: &str) {
            self.0.lock().unwrap().push(message.to_string());
        }
    }

    fn giraffe() -> Animal {
        Animal::new(
            Species::Giraffe,
            AnimalSpec {
                size: 200,
                hor_speed: 4,
                ver_speed: 6,
                color: Color::Blue,
                weight: 450.0,
            },
        )
        .unwrap()
        .with_sprite_loader(Arc::new(NamedSprites))
    }

    #[test]
    fn restoring_a_fresh_capture_changes_nothing() {
        let animal = giraffe();
        animal.eat(&FoodKind::Cabbage);
        let before = animal.snapshot();

        animal.restore(animal.save_state()).unwrap();
        assert_eq!(animal.snapshot(), before);
    }

    #[test]
    fn restore_brings_back_every_field_and_notifies_once() {
        let animal = giraffe();
        let recorder = Arc::new(Recorder::default());
        animal.register_observer(recorder.clone());
        let memento = animal.save_state();
        let expected = animal.save_state();

        assert!(animal.set_hor_speed(9));
        assert!(animal.set_size(120));
        assert!(animal.set_color("Red"));
        assert!(animal.set_x_dir(-1));
        assert!(animal.eat(&FoodKind::Lettuce));
        assert_eq!(
            animal.current_sprite(),
            Some(PathBuf::from("grf_r_2.png"))
        );

        animal.restore(memento).unwrap();

        assert_eq!(animal.save_state(), expected);
        assert_eq!(animal.eat_count(), 0);
        assert_eq!(
            animal.current_sprite(),
            Some(PathBuf::from("grf_b_1.png"))
        );
        assert_eq!(*recorder.0.lock().unwrap(), vec!["Giraffe is restored"]);
    }

    #[test]
    fn foreign_memento_is_rejected_untouched() {
        let giraffe = giraffe();
        let lion = Animal::new(
            Species::Lion,
            AnimalSpec {
                size: 150,
                hor_speed: 1,
                ver_speed: 1,
                color: Color::Natural,
                weight: 408.0,
            },
        )
        .unwrap();
        let before = giraffe.snapshot();

        assert!(giraffe.can_restore(&lion.save_state()).is_err());
        let err = giraffe.restore(lion.save_state()).unwrap_err();
        assert_eq!(
            err,
            RestoreError::SpeciesMismatch {
                expected: Species::Giraffe,
                found: Species::Lion,
            }
        );
        assert_eq!(giraffe.snapshot(), before);
    }

    #[test]
    fn lifecycle_is_not_part_of_a_memento() {
        let animal = giraffe();
        let memento = animal.save_state();
        animal.suspend();
        animal.restore(memento).unwrap();
        assert_eq!(animal.lifecycle(), crate::animal::Lifecycle::Suspended);
    }

    #[test]
    fn sprites_follow_the_colour_under_concurrent_recolouring() {
        let animal = Arc::new(giraffe());
        let recolour = {
            let animal = animal.clone();
            std::thread::spawn(move || {
                for _ in 0..200 {
                    animal.set_color("Red");
                }
            })
        };
        for _ in 0..200 {
            let memento = animal.save_state();
            animal.set_color("Blue");
            animal.restore(memento).unwrap();
        }
        recolour.join().unwrap();

        let code = animal.snapshot().color().file_code();
        let pair = animal.sprites().unwrap();
        assert_eq!(pair.facing_right, PathBuf::from(format!("grf_{code}_1.png")));
        assert_eq!(pair.facing_left, PathBuf::from(format!("grf_{code}_2.png")));
    }
}
