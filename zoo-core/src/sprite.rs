use std::path::PathBuf;

use crate::species::{Color, Species};

/// The two directional images of one colour variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpritePair {
    pub facing_right: PathBuf,
    pub facing_left: PathBuf,
}

/// Resolves an animal's visual variant. `None` means no visual is
/// available, which is never fatal.
pub trait SpriteLoader: Send + Sync {
    fn load(&self, species: Species, color: Color) -> Option<SpritePair>;
}

/// Loader for headless runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoSprites;

impl SpriteLoader for NoSprites {
    fn load(&self, _species: Species, _color: Color) -> Option<SpritePair> {
        None
    }
}
