//! Hegemon -- a Warlight territory-conquest bot.
//!
//! This binary reads match engine commands from stdin and writes moves to
//! stdout. Logging goes to stderr; set `RUST_LOG` to change the level.
//!
//! Usage:
//!   hegemon [--config FILE] [--seed N]

use std::env;
use std::io::{self, BufRead};
use std::process;

use log::{error, info, warn};

use hegemon::config::EngineConfig;
use hegemon::engine::Engine;
use hegemon::protocol::parse_command;

fn print_usage() {
    eprintln!("Usage: hegemon [--config FILE] [--seed N]");
}

/// Reads the command line into a config, exiting on bad arguments.
fn parse_args() -> EngineConfig {
    let args: Vec<String> = env::args().skip(1).collect();
    let mut config_path: Option<String> = None;
    let mut seed: Option<u64> = None;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                i += 1;
                match args.get(i) {
                    Some(path) => config_path = Some(path.clone()),
                    None => {
                        print_usage();
                        process::exit(1);
                    }
                }
            }
            "--seed" => {
                i += 1;
                match args.get(i).and_then(|s| s.parse().ok()) {
                    Some(n) => seed = Some(n),
                    None => {
                        eprintln!("invalid --seed value");
                        process::exit(1);
                    }
                }
            }
            "--help" | "-h" => {
                print_usage();
                process::exit(0);
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                print_usage();
                process::exit(1);
            }
        }
        i += 1;
    }

    let mut config = match config_path {
        Some(path) => match EngineConfig::load(&path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("{}", e);
                process::exit(1);
            }
        },
        None => EngineConfig::default(),
    };
    if seed.is_some() {
        config.seed = seed;
    }
    config
}

/// Runs the protocol loop, reading commands from stdin and writing moves
/// to stdout.
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = parse_args();
    info!("starting hegemon (seed {:?})", config.seed);

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    let mut engine = Engine::new(config);

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => break,
        };

        let cmd = match parse_command(&line) {
            Ok(Some(c)) => c,
            Ok(None) => continue,
            Err(e) => {
                warn!("unable to parse line \"{}\": {}", line.trim(), e);
                continue;
            }
        };

        if let Err(e) = engine.handle(cmd, &mut out) {
            error!("output failed: {}", e);
            break;
        }
    }
}
