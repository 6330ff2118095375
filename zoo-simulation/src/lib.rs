//! The running zoo: a concrete arena, the manager that owns the animal
//! threads, and the caretaker that keeps saved states.

use std::io;
use thiserror::Error;
use zoo_core::{AnimalError, RestoreError};

pub mod caretaker;
pub mod panel;
pub mod snapshot;
pub mod sprites;
pub mod zoo;

pub use caretaker::{Caretaker, ZooMemento, MAX_SAVED_STATES};
pub use panel::ZooPanel;
pub use snapshot::{AnimalView, FrameSnapshot, ZooInfo};
pub use sprites::FsSpriteLoader;
pub use zoo::Zoo;

#[derive(Error, Debug)]
pub enum ZooError {
    #[error("the zoo is full ({capacity} animals)")]
    Full { capacity: usize },
    #[error(transparent)]
    Animal(#[from] AnimalError),
    #[error("failed to start animal thread: {0}")]
    Spawn(#[from] io::Error),
    #[error("no saved state at index {0}")]
    NoSavedState(usize),
    #[error("only {0} saved states are kept")]
    TooManySavedStates(usize),
    #[error(transparent)]
    Restore(#[from] RestoreError),
}
