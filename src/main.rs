use std::env;
use std::process;

use arrow_rush::catalog::difficulty_name;
use arrow_rush::{autoplay, EngineConfig, LogOutput};

/// Frames autoplay runs at most (ten minutes at 60 fps).
const MAX_FRAMES: i64 = 60 * 60 * 10;

fn usage() -> ! {
    eprintln!("Usage: arrow-rush [--config FILE] <track-definition> [difficulty]");
    process::exit(1);
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().skip(1).collect();
    let mut config_path: Option<&String> = None;
    let mut positional: Vec<&String> = Vec::new();

    // Parse flags
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg == "--config" {
            match iter.next() {
                Some(path) => config_path = Some(path),
                None => usage(),
            }
        } else {
            positional.push(arg);
        }
    }

    let track_path = match positional.first() {
        Some(path) => *path,
        None => usage(),
    };
    let difficulty = match positional.get(1) {
        Some(value) => match value.parse::<usize>() {
            Ok(d) => d,
            Err(_) => {
                eprintln!("Difficulty must be a number, got '{}'", value);
                process::exit(1);
            }
        },
        None => 0,
    };

    let config = match config_path {
        Some(path) => match EngineConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error: {}", e);
                process::exit(1);
            }
        },
        None => EngineConfig::default(),
    };

    let mut stage = match arrow_rush::open(config, LogOutput::default(), track_path, difficulty) {
        Ok(stage) => stage,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    let title = stage
        .song()
        .map(|song| format!("{} - {}", song.artist(), song.name()))
        .unwrap_or_default();
    let arrows = stage.song().map_or(0, |song| song.arrows().len());

    let report = autoplay::run(&mut stage, MAX_FRAMES);
    let output = stage.into_output();

    println!("{} [{}]", title, difficulty_name(difficulty));
    println!("  arrows:     {}", arrows);
    println!("  hits:       {}", report.tally.hits);
    println!("  missed:     {}", report.tally.missed);
    println!("  score:      {}", report.score);
    println!("  max streak: {}", report.max_streak);
    println!("  notes:      {} on / {} off", output.note_ons, output.note_offs);
    println!("  frames:     {}", report.frames);
}
