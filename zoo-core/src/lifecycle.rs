//! The per-animal movement thread and its suspend/resume/stop controls.
//!
//! The lifecycle flag sits under the same mutex as the animal's position, so
//! once `suspend` or `stop` returns no further move can land. A suspended
//! thread parks on the animal's condition variable until `resume` or `stop`
//! wakes it.

use log::{error, info};
use std::any::Any;
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::animal::{Animal, Lifecycle};
use crate::arena::Arena;
use crate::food::Edible;
use crate::movement::Step;

/// Pause between two movement ticks.
pub const DEFAULT_TICK: Duration = Duration::from_millis(75);

/// Panicking ticks in a row before the animal is stopped for good.
const MAX_CONSECUTIVE_FAULTS: u32 = 3;

impl Animal {
    /// Running -> Suspended. Returns `false` from any other state.
    pub fn suspend(&self) -> bool {
        {
            let mut state = self.lock_state();
            if state.lifecycle != Lifecycle::Running {
                return false;
            }
            state.lifecycle = Lifecycle::Suspended;
        }
        info!("{} suspended", self.name());
        self.notify_observers("is asleep now");
        true
    }

    /// Suspended -> Running, waking the parked thread. A stopped animal
    /// stays stopped and this returns `false`.
    pub fn resume(&self) -> bool {
        {
            let mut state = self.lock_state();
            if state.lifecycle != Lifecycle::Suspended {
                return false;
            }
            state.lifecycle = Lifecycle::Running;
        }
        self.wake.notify_all();
        info!("{} resumed", self.name());
        self.notify_observers("is awake and hungry");
        true
    }

    /// Terminal. Also wakes a suspended thread so it can exit.
    pub fn stop(&self) -> bool {
        {
            let mut state = self.lock_state();
            if state.lifecycle == Lifecycle::Stopped {
                return false;
            }
            state.lifecycle = Lifecycle::Stopped;
        }
        self.wake.notify_all();
        info!("{} stopped", self.name());
        self.notify_observers("is no longer exists");
        true
    }

    /// Runs one tick: blocks while suspended, then either steps toward food
    /// the diet accepts or bounces around, and finally pokes the arena.
    pub fn advance(&self, arena: &dyn Arena) -> Step {
        loop {
            {
                let state = self.lock_state();
                let state = self
                    .wake
                    .wait_while(state, |state| state.lifecycle == Lifecycle::Suspended)
                    .unwrap_or_else(PoisonError::into_inner);
                if state.lifecycle == Lifecycle::Stopped {
                    return Step::Stopped;
                }
            }

            let food = arena.food();
            let bounds = arena.bounds();
            let step = {
                let mut state = self.lock_state();
                match state.lifecycle {
                    Lifecycle::Stopped => return Step::Stopped,
                    // Suspended between the wait and the move; park again.
                    Lifecycle::Suspended => continue,
                    Lifecycle::Running => {}
                }
                match food.filter(|food| self.diet().can_eat(food.food_type())) {
                    Some(food) => state.seek(food.location, bounds),
                    None => state.bounce(bounds),
                }
            };

            arena.request_redraw();
            arena.on_tick();
            return step;
        }
    }

    /// Movement loop; returns once the animal is stopped.
    pub fn run(&self, arena: &dyn Arena, tick: Duration) {
        info!("{} started moving", self.name());
        let mut faults = 0;
        loop {
            match panic::catch_unwind(AssertUnwindSafe(|| self.advance(arena))) {
                Ok(Step::Stopped) => break,
                Ok(_) => faults = 0,
                Err(cause) => {
                    faults += 1;
                    error!(
                        "{}: tick failed ({}/{}): {}",
                        self.name(),
                        faults,
                        MAX_CONSECUTIVE_FAULTS,
                        panic_message(cause.as_ref())
                    );
                    if faults >= MAX_CONSECUTIVE_FAULTS {
                        self.stop();
                        break;
                    }
                }
            }
            spin_sleep::sleep(tick);
        }
        info!("{} thread finished", self.name());
    }
}

fn panic_message(cause: &(dyn Any + Send)) -> &str {
    if let Some(message) = cause.downcast_ref::<&str>() {
        *message
    } else if let Some(message) = cause.downcast_ref::<String>() {
        message.as_str()
    } else {
        "unknown panic"
    }
}

/// Starts `animal`'s movement loop on its own named thread.
pub fn spawn(
    animal: Arc<Animal>,
    arena: Arc<dyn Arena>,
    tick: Duration,
) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name(format!("animal-{}", animal.name().to_lowercase()))
        .spawn(move || animal.run(arena.as_ref(), tick))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animal::AnimalSpec;
    use crate::arena::FoodItem;
    use crate::food::FoodKind;
    use crate::observer::Observer;
    use crate::point::{Bounds, Point};
    use crate::species::{Color, Species};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct TestArena {
        food: Mutex<Option<FoodItem>>,
        redraws: AtomicUsize,
        ticks: AtomicUsize,
        explode: AtomicUsize,
        /// 1-based tick numbers whose bookkeeping panics.
        failing_ticks: Vec<usize>,
    }

    impl Arena for TestArena {
        fn bounds(&self) -> Bounds {
            Bounds::new(800, 600)
        }

        fn food(&self) -> Option<FoodItem> {
            *self.food.lock().unwrap()
        }

        fn request_redraw(&self) {
            self.redraws.fetch_add(1, Ordering::SeqCst);
        }

        fn on_tick(&self) {
            let tick = self.ticks.fetch_add(1, Ordering::SeqCst) + 1;
            if self.explode.load(Ordering::SeqCst) > 0 || self.failing_ticks.contains(&tick) {
                panic!("bookkeeping blew up");
            }
        }
    }

    #[derive(Default)]
    struct Recorder(Mutex<Vec<String>>);

    impl Observer for Recorder {
        fn notify(&self, message: &str) {
            self.0.lock().unwrap().push(message.to_string());
        }
    }

    fn turtle() -> Arc<Animal> {
        let animal = Animal::new(
            Species::Turtle,
            AnimalSpec {
                size: 80,
                hor_speed: 3,
                ver_speed: 2,
                color: Color::Natural,
                weight: 12.0,
            },
        )
        .unwrap()
        .with_location(Point::new(400, 300));
        Arc::new(animal)
    }

    #[test]
    fn transitions_notify_observers() {
        let animal = turtle();
        let recorder = Arc::new(Recorder::default());
        animal.register_observer(recorder.clone());

        assert!(animal.suspend());
        assert!(!animal.suspend());
        assert!(animal.resume());
        assert!(!animal.resume());
        assert!(animal.stop());
        assert!(!animal.stop());

        assert_eq!(
            *recorder.0.lock().unwrap(),
            vec![
                "Turtle is asleep now",
                "Turtle is awake and hungry",
                "Turtle is no longer exists",
            ]
        );
    }

    #[test]
    fn stop_is_terminal() {
        let animal = turtle();
        let arena = TestArena::default();
        assert!(animal.suspend());
        assert!(animal.stop());
        assert!(!animal.resume());

        let before = animal.location();
        assert_eq!(animal.advance(&arena), Step::Stopped);
        assert_eq!(animal.location(), before);
        assert_eq!(animal.lifecycle(), Lifecycle::Stopped);
    }

    #[test]
    fn advance_bounces_without_food_and_seeks_edible_food() {
        let animal = turtle();
        let arena = TestArena::default();

        assert_eq!(animal.advance(&arena), Step::Bounced);
        assert_eq!(animal.location(), Point::new(403, 302));

        // Turtles ignore meat.
        *arena.food.lock().unwrap() = Some(FoodItem {
            kind: FoodKind::Meat,
            location: Point::new(0, 0),
        });
        assert_eq!(animal.advance(&arena), Step::Bounced);

        *arena.food.lock().unwrap() = Some(FoodItem {
            kind: FoodKind::Cabbage,
            location: Point::new(0, 0),
        });
        assert_eq!(animal.advance(&arena), Step::Sought);
        assert_eq!(animal.location(), Point::new(403, 302));

        assert_eq!(arena.redraws.load(Ordering::SeqCst), 3);
        assert_eq!(arena.ticks.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn suspended_thread_does_not_move_until_resumed() {
        let animal = turtle();
        let arena: Arc<dyn Arena> = Arc::new(TestArena::default());
        let handle = spawn(animal.clone(), arena, Duration::from_millis(2)).unwrap();

        thread::sleep(Duration::from_millis(20));
        assert!(animal.suspend());
        let parked_at = animal.location();
        thread::sleep(Duration::from_millis(30));
        assert_eq!(animal.location(), parked_at);

        assert!(animal.resume());
        thread::sleep(Duration::from_millis(30));
        assert_ne!(animal.location(), parked_at);

        assert!(animal.stop());
        handle.join().unwrap();
    }

    #[test]
    fn stop_wakes_a_suspended_thread() {
        let animal = turtle();
        let arena: Arc<dyn Arena> = Arc::new(TestArena::default());
        let handle = spawn(animal.clone(), arena, Duration::from_millis(2)).unwrap();

        assert!(animal.suspend());
        thread::sleep(Duration::from_millis(10));
        assert!(animal.stop());
        handle.join().unwrap();

        let final_location = animal.location();
        assert!(!animal.resume());
        thread::sleep(Duration::from_millis(10));
        assert_eq!(animal.location(), final_location);
    }

    #[test]
    fn repeated_faults_stop_the_animal() {
        let animal = turtle();
        let arena = Arc::new(TestArena::default());
        arena.explode.store(1, Ordering::SeqCst);
        let handle = spawn(animal.clone(), arena.clone(), Duration::from_millis(1)).unwrap();

        handle.join().unwrap();
        assert_eq!(animal.lifecycle(), Lifecycle::Stopped);
        assert_eq!(arena.ticks.load(Ordering::SeqCst), MAX_CONSECUTIVE_FAULTS as usize);
    }

    #[test]
    fn a_good_tick_clears_earlier_faults() {
        let animal = turtle();
        let start = animal.location();
        // Two faults, a good tick, then a third fault: never three in a row.
        let arena = Arc::new(TestArena {
            failing_ticks: vec![1, 2, 4],
            ..TestArena::default()
        });
        let handle = spawn(animal.clone(), arena.clone(), Duration::from_millis(1)).unwrap();

        let deadline = std::time::Instant::now() + Duration::from_secs(5);
        while arena.ticks.load(Ordering::SeqCst) < 10 && std::time::Instant::now() < deadline {
            thread::sleep(Duration::from_millis(2));
        }

        assert!(arena.ticks.load(Ordering::SeqCst) >= 10);
        assert_eq!(animal.lifecycle(), Lifecycle::Running);
        assert_ne!(animal.location(), start);
        assert!(animal.stop());
        handle.join().unwrap();
    }
}
