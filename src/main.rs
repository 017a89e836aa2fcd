//! Pumpkin Run entry point
//!
//! The browser build is driven from JS through `platform::web::WebGame`.
//! Natively this runs a headless session with scripted steering, which is
//! handy for balancing a tuning file.
//!
//! Usage: `pumpkin-run [config.json] [--ticks N] [--seed S] [--scores FILE]`

#[cfg(not(target_arch = "wasm32"))]
use pumpkin_run::{
    GameConfig, HighScores, TickInput, World,
    sim::{GameEvent, Steer},
    tick,
};

#[cfg(not(target_arch = "wasm32"))]
const DEFAULT_TICKS: u64 = 60 * 60 * 5;

#[cfg(not(target_arch = "wasm32"))]
const DEFAULT_SCORES_FILE: &str = "pumpkin_run_scores.json";

#[cfg(not(target_arch = "wasm32"))]
struct Args {
    config: Option<String>,
    ticks: u64,
    seed: Option<u64>,
    scores: String,
}

#[cfg(not(target_arch = "wasm32"))]
fn parse_args() -> Result<Args, String> {
    let mut args = Args {
        config: None,
        ticks: DEFAULT_TICKS,
        seed: None,
        scores: DEFAULT_SCORES_FILE.to_string(),
    };
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--ticks" => {
                let value = iter.next().ok_or("--ticks needs a value")?;
                args.ticks = value
                    .parse()
                    .map_err(|_| format!("invalid tick count: {value}"))?;
            }
            "--seed" => {
                let value = iter.next().ok_or("--seed needs a value")?;
                args.seed = Some(value.parse().map_err(|_| format!("invalid seed: {value}"))?);
            }
            "--scores" => {
                args.scores = iter.next().ok_or("--scores needs a value")?;
            }
            other if other.starts_with("--") => return Err(format!("unknown option: {other}")),
            path => args.config = Some(path.to_string()),
        }
    }
    Ok(args)
}

/// Weave: hold left, coast, hold right, coast
#[cfg(not(target_arch = "wasm32"))]
fn scripted_steer(tick_index: u64) -> TickInput {
    let steer = match (tick_index / 45) % 4 {
        0 => Steer::Left,
        2 => Steer::Right,
        _ => Steer::Straight,
    };
    TickInput {
        left: steer == Steer::Left,
        right: steer == Steer::Right,
        toggle_pause: false,
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn now_ms() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Pumpkin Run (native, headless) starting...");

    let args = match parse_args() {
        Ok(args) => args,
        Err(e) => {
            log::error!("{e}");
            std::process::exit(2);
        }
    };

    let mut config = match &args.config {
        Some(path) => match GameConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("Failed to load {path}: {e}");
                std::process::exit(1);
            }
        },
        None => GameConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }

    let mut world = match World::new(config) {
        Ok(world) => world,
        Err(e) => {
            log::error!("Invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    let dt = 1.0 / world.config().frame_rate;
    let mut collected = 0u32;
    let mut ticks = 0u64;
    while ticks < args.ticks && !world.state().is_game_over() {
        tick(&mut world, &scripted_steer(ticks), dt);
        ticks += 1;

        for event in world.drain_events() {
            match event {
                GameEvent::Collected { .. } => collected += 1,
                GameEvent::HazardHit { section, category } => {
                    let name = &world.config().categories[category].name;
                    log::info!("Hit a {name} in section {section}");
                }
                _ => {}
            }
        }
        // Nothing renders them; acknowledge right away
        let ids: Vec<u32> = world.score_events().iter().map(|e| e.id).collect();
        for id in ids {
            world.clear_score_event(id);
        }

        if ticks % 600 == 0 {
            log::info!(
                "t={:>5} distance={:>8.1} speed={:>5.1} score={}",
                ticks,
                world.state().distance(),
                world.state().player_speed(),
                world.state().score()
            );
        }
    }

    let score = world.state().score();
    let distance = world.state().distance();

    let scores_path = std::path::Path::new(&args.scores);
    let rank = match HighScores::load_from(scores_path) {
        Ok(mut high_scores) => {
            let rank = high_scores.add_score(score, distance, now_ms());
            if rank.is_some() {
                if let Err(e) = high_scores.save_to(scores_path) {
                    log::warn!("Could not save high scores: {e}");
                }
            }
            rank
        }
        Err(e) => {
            log::warn!("Ignoring high score file {}: {e}", args.scores);
            None
        }
    };

    println!();
    println!("Pumpkin Run summary");
    println!("  outcome:   {}", if world.state().is_game_over() { "game over" } else { "survived" });
    println!("  ticks:     {ticks}");
    println!("  distance:  {distance:.1}");
    println!("  speed:     {:.1}", world.state().player_speed());
    println!("  tier:      {}", world.progression().tier());
    println!("  collected: {collected}");
    println!("  score:     {score}");
    match rank {
        Some(rank) => println!("  high score rank #{rank}"),
        None => println!("  no high score"),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web::start, this is just to satisfy the compiler
}
