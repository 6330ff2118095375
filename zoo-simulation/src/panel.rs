//! The shared arena every animal thread moves on.

use log::{debug, info};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use zoo_core::{Animal, Arena, Bounds, Edible, FoodItem, FoodKind, Lifecycle, Point};

use crate::snapshot::{AnimalView, FrameSnapshot};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Arena implementation holding the food slot and the animals on display.
///
/// Every piece of shared state sits behind its own mutex and no method holds
/// two of them, or one of them and an animal's lock, at the same time.
pub struct ZooPanel {
    bounds: Mutex<Bounds>,
    food: Mutex<Option<FoodItem>>,
    animals: Mutex<Vec<Arc<Animal>>>,
    eat_distance: f64,
    frame: AtomicU64,
}

impl ZooPanel {
    pub fn new(bounds: Bounds, eat_distance: f64) -> Self {
        Self {
            bounds: Mutex::new(bounds),
            food: Mutex::new(None),
            animals: Mutex::new(Vec::new()),
            eat_distance,
            frame: AtomicU64::new(0),
        }
    }

    pub fn eat_distance(&self) -> f64 {
        self.eat_distance
    }

    /// Changes the arena size. Food left outside is moved onto the new edge;
    /// animals pull themselves in on their next tick.
    pub fn resize(&self, bounds: Bounds) {
        *lock(&self.bounds) = bounds;
        if let Some(food) = lock(&self.food).as_mut() {
            food.location = bounds.clamp(food.location);
        }
        self.request_redraw();
    }

    /// Puts food on the arena, replacing whatever was there. Without a
    /// location it lands in the centre.
    pub fn place_food(&self, kind: FoodKind, location: Option<Point>) -> FoodItem {
        let bounds = self.bounds();
        let location = bounds.clamp(location.unwrap_or_else(|| bounds.center()));
        let item = FoodItem { kind, location };
        *lock(&self.food) = Some(item);
        info!("{} placed at ({}, {})", kind, location.x, location.y);
        self.request_redraw();
        item
    }

    pub fn remove_food(&self) -> Option<FoodItem> {
        let removed = lock(&self.food).take();
        if removed.is_some() {
            self.request_redraw();
        }
        removed
    }

    pub fn animals(&self) -> Vec<Arc<Animal>> {
        lock(&self.animals).clone()
    }

    pub fn animal_count(&self) -> usize {
        lock(&self.animals).len()
    }

    pub(crate) fn add_animal(&self, animal: Arc<Animal>) {
        lock(&self.animals).push(animal);
        self.request_redraw();
    }

    pub(crate) fn remove_animal(&self, animal: &Arc<Animal>) -> bool {
        let mut animals = lock(&self.animals);
        let before = animals.len();
        animals.retain(|other| !Arc::ptr_eq(other, animal));
        before != animals.len()
    }

    pub(crate) fn clear_animals(&self) -> Vec<Arc<Animal>> {
        std::mem::take(&mut *lock(&self.animals))
    }

    /// Redraw requests seen so far.
    pub fn frame(&self) -> u64 {
        self.frame.load(Ordering::Acquire)
    }

    pub fn snapshot(&self) -> FrameSnapshot {
        let bounds = self.bounds();
        FrameSnapshot {
            frame: self.frame(),
            width: bounds.width,
            height: bounds.height,
            food: self.food(),
            animals: self.animals().iter().map(|animal| AnimalView::of(animal)).collect(),
        }
    }

    /// Lets the first running animal close enough to the food, and whose
    /// diet accepts it, eat it.
    fn feed_animals(&self) {
        let Some(food) = self.food() else {
            return;
        };
        for animal in self.animals() {
            if animal.lifecycle() != Lifecycle::Running
                || !animal.diet().can_eat(food.food_type())
                || animal.location().distance(food.location) > self.eat_distance
            {
                continue;
            }

            // Another thread may have taken or replaced the food meanwhile.
            let claimed = {
                let mut slot = lock(&self.food);
                if *slot == Some(food) {
                    *slot = None;
                    true
                } else {
                    false
                }
            };
            if claimed && animal.eat(&food) {
                info!("{} ate the {}", animal.name(), food.kind);
                self.request_redraw();
            }
            return;
        }
    }

    /// A running predator at least twice the prey's weight, whose diet
    /// accepts the prey, eats it once it gets within the prey's size.
    fn resolve_predation(&self) {
        let animals = self.animals();
        for predator in &animals {
            let hunter = predator.snapshot();
            if hunter.lifecycle() != Lifecycle::Running {
                continue;
            }
            for prey in &animals {
                if Arc::ptr_eq(predator, prey) || !predator.diet().can_eat(prey.food_type()) {
                    continue;
                }
                let hunted = prey.snapshot();
                if hunted.lifecycle() == Lifecycle::Stopped
                    || hunter.weight() < hunted.weight() * 2.0
                    || hunter.location().distance(hunted.location()) >= hunted.size() as f64
                {
                    continue;
                }

                // Stopping the prey is the claim; losing it means another
                // thread already resolved this meal.
                if prey.stop() {
                    self.remove_animal(prey);
                    if predator.eat(prey.as_ref()) {
                        info!("{} ate {}", predator.name(), prey.name());
                    }
                    self.request_redraw();
                }
                return;
            }
        }
    }
}

impl Arena for ZooPanel {
    fn bounds(&self) -> Bounds {
        *lock(&self.bounds)
    }

    fn food(&self) -> Option<FoodItem> {
        *lock(&self.food)
    }

    fn request_redraw(&self) {
        self.frame.fetch_add(1, Ordering::AcqRel);
    }

    fn on_tick(&self) {
        self.feed_animals();
        self.resolve_predation();
        debug!("panel bookkeeping done at frame {}", self.frame());
    }
}
