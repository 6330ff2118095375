use std::sync::{Arc, Mutex};
use std::thread::sleep;
use std::time::{Duration, Instant};
use zoo_core::{AnimalSpec, Arena, Bounds, Color, FoodKind, Lifecycle, Observer, Point, Species};
use zoo_simulation::{Zoo, ZooError};

#[derive(Default)]
struct Recorder(Mutex<Vec<String>>);

impl Observer for Recorder {
    fn notify(&self, message: &str) {
        self.0.lock().unwrap().push(message.to_string());
    }
}

fn spec(size: i32, speed: i32, weight: f64) -> AnimalSpec {
    AnimalSpec {
        size,
        hor_speed: speed,
        ver_speed: speed,
        color: Color::Natural,
        weight,
    }
}

fn zoo() -> Zoo {
    Zoo::new(Bounds::new(800, 600), 10.0, Duration::from_millis(5), 10)
}

fn wait_until(mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        sleep(Duration::from_millis(5));
    }
    condition()
}

#[test]
fn turtle_finds_and_eats_lettuce() {
    let mut zoo = zoo();
    let turtle = zoo.add_animal(Species::Turtle, spec(80, 3, 10.0), None).unwrap();
    zoo.place_food(FoodKind::Lettuce, Some(Point::new(140, 60)));

    assert!(wait_until(|| turtle.eat_count() == 1));
    assert_eq!(zoo.panel().food(), None);
    assert!((turtle.weight() - 10.7).abs() < 1e-9);
    zoo.clear_all();
}

#[test]
fn carnivore_ignores_vegetables() {
    let mut zoo = zoo();
    let lion = zoo.add_animal(Species::Lion, spec(100, 4, 200.0), None).unwrap();
    zoo.place_food(FoodKind::Cabbage, Some(Point::new(30, 10)));

    sleep(Duration::from_millis(150));
    assert_eq!(lion.eat_count(), 0);
    assert!(zoo.panel().food().is_some());
    zoo.clear_all();
}

#[test]
fn sleeping_animals_hold_still() {
    let mut zoo = zoo();
    let elephant = zoo.add_animal(Species::Elephant, spec(150, 4, 500.0), None).unwrap();
    sleep(Duration::from_millis(30));

    assert_eq!(zoo.sleep_all(), 1);
    let parked = elephant.location();
    sleep(Duration::from_millis(100));
    assert_eq!(elephant.location(), parked);
    assert_eq!(elephant.lifecycle(), Lifecycle::Suspended);

    assert_eq!(zoo.wake_all(), 1);
    assert!(wait_until(|| elephant.location() != parked));
    zoo.clear_all();
}

#[test]
fn heavy_lion_eats_nearby_giraffe() {
    let mut zoo = zoo();
    let lion = zoo.add_animal(Species::Lion, spec(120, 1, 800.0), None).unwrap();
    let giraffe = zoo.add_animal(Species::Giraffe, spec(150, 1, 300.0), None).unwrap();

    assert!(wait_until(|| giraffe.lifecycle() == Lifecycle::Stopped));
    assert!(wait_until(|| {
        zoo.reap();
        zoo.animals().len() == 1
    }));
    assert_eq!(lion.eat_count(), 1);
    assert!((lion.weight() - 880.0).abs() < 1e-9);
    zoo.clear_all();
}

#[test]
fn saved_state_comes_back() {
    let recorder = Arc::new(Recorder::default());
    let mut zoo = zoo().with_observer(recorder.clone());
    let turtle = zoo.add_animal(Species::Turtle, spec(80, 2, 10.0), Some("Shelly")).unwrap();
    zoo.sleep_all();
    zoo.place_food(FoodKind::Cabbage, None);
    assert_eq!(zoo.save_state().unwrap(), 0);

    turtle.set_size(200);
    turtle.set_color("Red");
    turtle.eat(&FoodKind::Lettuce);
    zoo.remove_food();

    zoo.restore_state(0).unwrap();
    assert_eq!(turtle.size(), 80);
    assert_eq!(turtle.eat_count(), 0);
    assert_eq!(turtle.snapshot().color(), Color::Natural);
    assert_eq!(turtle.lifecycle(), Lifecycle::Suspended);
    assert_eq!(zoo.panel().food().map(|food| food.kind), Some(FoodKind::Cabbage));
    assert_eq!(zoo.saved_states(), 0);
    assert!(matches!(zoo.restore_state(0), Err(ZooError::NoSavedState(0))));

    let messages = recorder.0.lock().unwrap().clone();
    assert!(messages.contains(&"Shelly is asleep now".to_string()));
    assert!(messages.contains(&"Shelly is restored".to_string()));
    zoo.clear_all();
}

#[test]
fn clearing_stops_every_thread() {
    let mut zoo = zoo();
    let bear = zoo.add_animal(Species::Bear, spec(120, 3, 300.0), None).unwrap();
    let turtle = zoo.add_animal(Species::Turtle, spec(60, 1, 5.0), None).unwrap();
    turtle.suspend();

    zoo.clear_all();

    assert_eq!(bear.lifecycle(), Lifecycle::Stopped);
    assert_eq!(turtle.lifecycle(), Lifecycle::Stopped);
    assert!(!turtle.resume());
    assert!(zoo.animals().is_empty());
    assert_eq!(zoo.info().total_eat_count, 0);
}
