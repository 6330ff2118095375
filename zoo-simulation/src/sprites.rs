use log::warn;
use std::path::{Path, PathBuf};
use zoo_core::{Color, Species, SpriteLoader, SpritePair};

/// Looks sprites up in a directory laid out as `<prefix>_<color>_<1|2>.png`,
/// `1` facing right and `2` facing left.
#[derive(Debug, Clone)]
pub struct FsSpriteLoader {
    directory: PathBuf,
}

impl FsSpriteLoader {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn image(&self, species: Species, color: Color, facing: u8) -> Option<PathBuf> {
        let path = self.directory.join(format!(
            "{}_{}_{}.png",
            species.sprite_prefix(),
            color.file_code(),
            facing
        ));
        if path.is_file() {
            Some(path)
        } else {
            warn!("cannot load image {}", path.display());
            None
        }
    }
}

impl SpriteLoader for FsSpriteLoader {
    fn load(&self, species: Species, color: Color) -> Option<SpritePair> {
        let facing_right = self.image(species, color, 1)?;
        let facing_left = self.image(species, color, 2)?;
        Some(SpritePair {
            facing_right,
            facing_left,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;

    #[test]
    fn finds_both_images() {
        let dir = tempfile::tempdir().unwrap();
        File::create(dir.path().join("trt_b_1.png")).unwrap();
        File::create(dir.path().join("trt_b_2.png")).unwrap();

        let loader = FsSpriteLoader::new(dir.path());
        let pair = loader.load(Species::Turtle, Color::Blue).unwrap();
        assert_eq!(pair.facing_right, dir.path().join("trt_b_1.png"));
        assert_eq!(pair.facing_left, dir.path().join("trt_b_2.png"));
    }

    #[test]
    fn missing_image_is_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        File::create(dir.path().join("lio_n_1.png")).unwrap();

        let loader = FsSpriteLoader::new(dir.path());
        assert_eq!(loader.load(Species::Lion, Color::Natural), None);
        assert_eq!(loader.load(Species::Bear, Color::Red), None);
    }
}
