use serde::Serialize;
use zoo_core::{Animal, Color, FoodItem, Horizontal, Lifecycle, Point, Species};

/// What a renderer or the info table needs to know about one animal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnimalView {
    pub name: String,
    pub species: Species,
    pub color: Color,
    pub location: Point,
    pub facing: Horizontal,
    pub size: i32,
    pub weight: f64,
    pub hor_speed: i32,
    pub ver_speed: i32,
    pub eat_count: u32,
    pub total_distance: f64,
    pub lifecycle: Lifecycle,
}

impl AnimalView {
    pub fn of(animal: &Animal) -> Self {
        let state = animal.snapshot();
        Self {
            name: animal.name().to_string(),
            species: animal.species(),
            color: state.color(),
            location: state.location(),
            facing: state.x_dir(),
            size: state.size(),
            weight: state.weight(),
            hor_speed: state.hor_speed(),
            ver_speed: state.ver_speed(),
            eat_count: state.eat_count(),
            total_distance: state.total_distance(),
            lifecycle: state.lifecycle(),
        }
    }
}

/// Everything drawn in one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameSnapshot {
    pub frame: u64,
    pub width: i32,
    pub height: i32,
    pub food: Option<FoodItem>,
    pub animals: Vec<AnimalView>,
}

/// Rows of the info table plus the zoo-wide meal count.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZooInfo {
    pub animals: Vec<AnimalView>,
    pub total_eat_count: u32,
}
