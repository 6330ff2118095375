//! The zoo manager: owns the panel, the animal threads and the saved states.

use log::{error, info, warn};
use rand::Rng;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;
use zoo_core::{
    spawn, Animal, AnimalSpec, Arena, Bounds, FoodItem, FoodKind, Lifecycle, NoSprites, Observer,
    Point, Species, SpriteLoader,
};

use crate::caretaker::{Caretaker, ZooMemento};
use crate::panel::ZooPanel;
use crate::snapshot::{AnimalView, ZooInfo};
use crate::ZooError;

struct Handle {
    animal: Arc<Animal>,
    thread: JoinHandle<()>,
}

pub struct Zoo {
    panel: Arc<ZooPanel>,
    tick: Duration,
    capacity: usize,
    sprite_loader: Arc<dyn SpriteLoader>,
    observers: Vec<Arc<dyn Observer>>,
    handles: Vec<Handle>,
    caretaker: Caretaker,
}

impl Zoo {
    pub fn new(bounds: Bounds, eat_distance: f64, tick: Duration, capacity: usize) -> Self {
        Self {
            panel: Arc::new(ZooPanel::new(bounds, eat_distance)),
            tick,
            capacity,
            sprite_loader: Arc::new(NoSprites),
            observers: Vec::new(),
            handles: Vec::new(),
            caretaker: Caretaker::new(),
        }
    }

    pub fn with_sprite_loader(mut self, loader: Arc<dyn SpriteLoader>) -> Self {
        self.sprite_loader = loader;
        self
    }

    /// Observer registered on every animal added from now on.
    pub fn with_observer(mut self, observer: Arc<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn panel(&self) -> &Arc<ZooPanel> {
        &self.panel
    }

    pub fn animals(&self) -> Vec<Arc<Animal>> {
        self.panel.animals()
    }

    /// Builds an animal, puts it on the panel and starts its thread.
    pub fn add_animal(
        &mut self,
        species: Species,
        spec: AnimalSpec,
        name: Option<&str>,
    ) -> Result<Arc<Animal>, ZooError> {
        self.reap();
        if self.panel.animal_count() >= self.capacity {
            return Err(ZooError::Full {
                capacity: self.capacity,
            });
        }

        let mut animal = Animal::new(species, spec)?.with_sprite_loader(self.sprite_loader.clone());
        if let Some(name) = name {
            animal = animal.with_name(name);
        }
        for observer in &self.observers {
            animal.register_observer(observer.clone());
        }
        let animal = Arc::new(animal);

        self.panel.add_animal(animal.clone());
        let thread = match spawn(animal.clone(), self.panel.clone(), self.tick) {
            Ok(thread) => thread,
            Err(err) => {
                self.panel.remove_animal(&animal);
                return Err(err.into());
            }
        };
        self.handles.push(Handle {
            animal: animal.clone(),
            thread,
        });
        info!("{} joined the zoo", animal.name());
        Ok(animal)
    }

    pub fn place_food(&self, kind: FoodKind, location: Option<Point>) -> FoodItem {
        self.panel.place_food(kind, location)
    }

    pub fn place_food_at_random(&self, kind: FoodKind) -> FoodItem {
        let bounds = self.panel.bounds();
        let mut rng = rand::thread_rng();
        let location = Point::new(rng.gen_range(0..=bounds.width), rng.gen_range(0..=bounds.height));
        self.panel.place_food(kind, Some(location))
    }

    pub fn remove_food(&self) -> Option<FoodItem> {
        self.panel.remove_food()
    }

    /// Suspends every running animal, returning how many changed state.
    pub fn sleep_all(&self) -> usize {
        self.panel
            .animals()
            .iter()
            .filter(|animal| animal.suspend())
            .count()
    }

    pub fn wake_all(&self) -> usize {
        self.panel
            .animals()
            .iter()
            .filter(|animal| animal.resume())
            .count()
    }

    /// Stops and joins every animal thread, then empties the panel and the
    /// saved states.
    pub fn clear_all(&mut self) {
        for animal in self.panel.clear_animals() {
            info!("{}", animal);
            animal.stop();
        }
        for handle in self.handles.drain(..) {
            handle.animal.stop();
            join(handle);
        }
        self.panel.remove_food();
        self.caretaker.clear();
        info!("zoo cleared");
    }

    /// Joins finished threads and drops stopped animals from the panel.
    pub fn reap(&mut self) -> usize {
        let (finished, running): (Vec<_>, Vec<_>) = self
            .handles
            .drain(..)
            .partition(|handle| handle.thread.is_finished());
        self.handles = running;

        let reaped = finished.len();
        for handle in finished {
            self.panel.remove_animal(&handle.animal);
            join(handle);
        }
        for animal in self.panel.animals() {
            if animal.lifecycle() == Lifecycle::Stopped {
                self.panel.remove_animal(&animal);
            }
        }
        reaped
    }

    /// Saves every animal and the food, returning the slot used.
    pub fn save_state(&mut self) -> Result<usize, ZooError> {
        let state = ZooMemento::capture(&self.panel.animals(), self.panel.food());
        let slot = self.caretaker.push(state)?;
        info!("zoo state saved in slot {}", slot);
        Ok(slot)
    }

    /// Restores and discards the saved state at `index`. Animals that left
    /// the zoo since the save stay gone. Every memento is checked first, so a
    /// rejected state changes nothing and stays saved.
    pub fn restore_state(&mut self, index: usize) -> Result<(), ZooError> {
        let present = self.panel.animals();
        let is_present = |animal: &Arc<Animal>| present.iter().any(|other| Arc::ptr_eq(other, animal));

        for (animal, memento) in &self.caretaker.get(index)?.entries {
            if is_present(animal) {
                animal.can_restore(memento)?;
            }
        }

        let state = self.caretaker.take(index)?;
        for (animal, memento) in state.entries {
            if !is_present(&animal) {
                warn!("{} is no longer in the zoo, skipping restore", animal.name());
                continue;
            }
            animal.restore(memento)?;
        }
        match state.food {
            Some(food) => {
                self.panel.place_food(food.kind, Some(food.location));
            }
            None => {
                self.panel.remove_food();
            }
        }
        info!("zoo state {} restored", index);
        Ok(())
    }

    pub fn saved_states(&self) -> usize {
        self.caretaker.len()
    }

    pub fn info(&self) -> ZooInfo {
        let animals: Vec<AnimalView> = self.panel.animals().iter().map(|a| AnimalView::of(a)).collect();
        let total_eat_count = animals.iter().map(|view| view.eat_count).sum();
        ZooInfo {
            animals,
            total_eat_count,
        }
    }
}

fn join(handle: Handle) {
    if handle.thread.join().is_err() {
        error!("thread of {} ended with a panic", handle.animal.name());
    }
}

impl Drop for Zoo {
    fn drop(&mut self) {
        if !self.handles.is_empty() {
            self.clear_all();
        }
    }
}
