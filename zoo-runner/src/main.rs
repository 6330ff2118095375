use clap::Parser;
use crossbeam_channel::{Receiver, Sender as ChannelSender};
use log::{error, info, warn};
use rand::seq::SliceRandom;
use std::collections::VecDeque;
use std::path::PathBuf;
use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::sleep;
use std::time::{Duration, Instant};
use thiserror::Error;
use zoo_config::{load_config, Config, ConfigError, SenderType};
use zoo_core::{Arena, FoodKind, Observer};
use zoo_simulation::{FsSpriteLoader, Zoo, ZooError, ZooInfo};
use zoo_transport::{publish, JsonSerializer, NullSender, Sender, StdioSender, TransportError};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the zoo configuration file
    #[arg(short, long, default_value = "config.json")]
    config: PathBuf,

    /// How long the scripted session runs, in seconds
    #[arg(short, long, default_value_t = 30)]
    seconds: u64,
}

#[derive(Error, Debug)]
enum RunnerError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Zoo(#[from] ZooError),
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("failed to install Ctrl+C handler: {0}")]
    Signal(#[from] ctrlc::Error),
}

const FOOD_EVERY: Duration = Duration::from_secs(4);
const NAP: Duration = Duration::from_secs(3);

/// Forwards animal notifications to the main thread.
struct ChannelObserver(ChannelSender<String>);

impl Observer for ChannelObserver {
    fn notify(&self, message: &str) {
        // The receiver only goes away at shutdown.
        let _ = self.0.send(message.to_string());
    }
}

#[derive(Debug, Clone, Copy)]
enum Action {
    PlaceFood,
    Save,
    SleepAll,
    WakeAll,
    Restore(usize),
}

/// Timeline of keeper actions for a session of the given length.
fn script(session: Duration) -> VecDeque<(Duration, Action)> {
    let mut steps = Vec::new();
    let mut at = Duration::from_secs(1);
    while at < session {
        steps.push((at, Action::PlaceFood));
        at += FOOD_EVERY;
    }
    steps.push((session / 4, Action::Save));
    steps.push((session / 2, Action::SleepAll));
    steps.push((session / 2 + NAP, Action::WakeAll));
    steps.push((session * 3 / 4, Action::Restore(0)));
    steps.sort_by_key(|(at, _)| *at);
    steps.into()
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    if let Err(e) = run(&args) {
        error!("{}", e);
        process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), RunnerError> {
    let config = load_config(&args.config)?;
    info!("Using configuration from {}", args.config.display());

    let running = Arc::new(AtomicBool::new(true));
    let flag = running.clone();
    ctrlc::set_handler(move || flag.store(false, Ordering::SeqCst))?;

    let (events_tx, events_rx) = crossbeam_channel::unbounded();
    let mut zoo = build_zoo(&config, events_tx);
    let mut sender = create_sender(&config);

    let session = Duration::from_secs(args.seconds);
    let mut steps = script(session);
    let frame_interval = config.frame_interval();
    let mut last_frame = None;
    let mut rng = rand::thread_rng();
    let start = Instant::now();

    info!("Running the zoo at {} FPS for {:?}...", config.framerate, session);
    while running.load(Ordering::SeqCst) && start.elapsed() < session {
        let frame_start = Instant::now();

        while let Some(&(at, action)) = steps.front() {
            if at > start.elapsed() {
                break;
            }
            steps.pop_front();
            let kind = *[FoodKind::Lettuce, FoodKind::Cabbage, FoodKind::Meat]
                .choose(&mut rng)
                .unwrap_or(&FoodKind::Lettuce);
            if let Err(e) = perform(&mut zoo, action, kind) {
                warn!("{:?} failed: {}", action, e);
            }
        }

        zoo.reap();
        drain_events(&events_rx);

        let frame = zoo.panel().snapshot();
        if last_frame != Some(frame.frame) {
            last_frame = Some(frame.frame);
            publish(&JsonSerializer, sender.as_mut(), &frame)?;
        }

        let elapsed = frame_start.elapsed();
        if elapsed < frame_interval {
            sleep(frame_interval - elapsed);
        }
    }

    if let (Some(location), Some(food_type)) = (zoo.panel().food_location(), zoo.panel().food_type()) {
        info!("{:?} food left uneaten at ({}, {})", food_type, location.x, location.y);
    }
    log_info(&zoo.info());
    zoo.clear_all();
    drain_events(&events_rx);
    Ok(())
}

fn build_zoo(config: &Config, events: ChannelSender<String>) -> Zoo {
    let sprites = FsSpriteLoader::new(config.sprites.directory.clone());
    info!("Loading sprites from {}", sprites.directory().display());
    let mut zoo = Zoo::new(
        config.arena.bounds(),
        config.eat_distance,
        config.tick(),
        config.max_animals,
    )
    .with_sprite_loader(Arc::new(sprites))
    .with_observer(Arc::new(ChannelObserver(events)));

    for animal in &config.animals {
        if let Err(e) = zoo.add_animal(animal.species, animal.spec, animal.name.as_deref()) {
            error!("Could not add {}: {}", animal.species, e);
        }
    }
    zoo
}

fn perform(zoo: &mut Zoo, action: Action, kind: FoodKind) -> Result<(), ZooError> {
    match action {
        Action::PlaceFood => {
            zoo.place_food_at_random(kind);
        }
        Action::Save => {
            zoo.save_state()?;
        }
        Action::SleepAll => {
            info!("{} animals went to sleep", zoo.sleep_all());
        }
        Action::WakeAll => {
            info!("{} animals woke up", zoo.wake_all());
        }
        Action::Restore(index) => zoo.restore_state(index)?,
    }
    Ok(())
}

fn drain_events(events: &Receiver<String>) {
    for message in events.try_iter() {
        info!("{}", message);
    }
}

fn create_sender(config: &Config) -> Box<dyn Sender> {
    match config.transport.sender.sender_type {
        SenderType::Stdio => Box::new(StdioSender::new()),
        SenderType::Null => Box::new(NullSender::new()),
    }
}

/// Rows of the end-of-session table, header first.
fn info_table(info: &ZooInfo) -> Vec<String> {
    let mut rows = vec![format!(
        "{:<12} {:<9} {:<8} {:>5} {:>10} {:>4} {:>4} {:>6} {:>10}",
        "Name", "Species", "Color", "Size", "Weight", "HSp", "VSp", "Meals", "Distance"
    )];
    for animal in &info.animals {
        rows.push(format!(
            "{:<12} {:<9} {:<8} {:>5} {:>10.2} {:>4} {:>4} {:>6} {:>10.2}",
            animal.name,
            animal.species.name(),
            animal.color.name(),
            animal.size,
            animal.weight,
            animal.hor_speed,
            animal.ver_speed,
            animal.eat_count,
            animal.total_distance
        ));
    }
    rows.push(format!("Total meals: {}", info.total_eat_count));
    rows
}

/// Goes through the log so stdout keeps carrying one JSON frame per line.
fn log_info(info: &ZooInfo) {
    for row in info_table(info) {
        info!("{}", row);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zoo_core::{Color, Horizontal, Lifecycle, Point, Species};
    use zoo_simulation::AnimalView;

    #[test]
    fn info_table_has_header_rows_and_total() {
        let info = ZooInfo {
            animals: vec![AnimalView {
                name: "Shelly".to_string(),
                species: Species::Turtle,
                color: Color::Blue,
                location: Point::new(80, 0),
                facing: Horizontal::Right,
                size: 80,
                hor_speed: 3,
                ver_speed: 2,
                weight: 12.5,
                eat_count: 2,
                total_distance: 41.0,
                lifecycle: Lifecycle::Running,
            }],
            total_eat_count: 2,
        };

        let rows = info_table(&info);
        assert_eq!(rows.len(), 3);
        assert!(rows[0].starts_with("Name"));
        assert!(rows[1].starts_with("Shelly       Turtle    Blue"));
        assert!(rows[1].contains("12.50"));
        assert_eq!(rows[2], "Total meals: 2");
    }

    #[test]
    fn script_is_ordered_and_covers_the_keeper_actions() {
        let steps = script(Duration::from_secs(20));
        assert!(steps.iter().zip(steps.iter().skip(1)).all(|(a, b)| a.0 <= b.0));
        assert!(steps.iter().any(|(_, action)| matches!(action, Action::Restore(0))));
        assert!(steps.iter().filter(|(_, action)| matches!(action, Action::PlaceFood)).count() >= 4);
    }
}
