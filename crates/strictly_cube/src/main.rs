//! Strictly Cube - terminal front end
//!
//! Drives the engine from the command line: list the winning lines, replay a
//! scripted game, or play interactively.

#![warn(missing_docs)]

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use std::io::{BufRead, Write};
use std::path::Path;
use strum::IntoEnumIterator;
use strictly_cube::{
    Cell, Clock, CubeEngine, EngineConfig, GameEvent, ManualClock, PatternCatalog, PatternKind,
    SystemClock,
};
use tracing::{info, instrument, warn};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Patterns => list_patterns(),
        Command::Replay { moves, json } => replay(config, &moves, json),
        Command::Play => play(config),
    }
}

#[instrument]
fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    match path {
        Some(path) => EngineConfig::from_file(path)
            .with_context(|| format!("loading {}", path.display())),
        None => {
            info!("No config file given, using defaults");
            Ok(EngineConfig::default())
        }
    }
}

/// Print every winning line with its kind.
fn list_patterns() -> Result<()> {
    let catalog = PatternCatalog::global();
    for (id, pattern) in catalog.patterns().iter().enumerate() {
        println!("{:>2}  {:<12}  {:?}", id, pattern.to_string(), pattern.kind());
    }
    for kind in PatternKind::iter() {
        let count = catalog.patterns().iter().filter(|p| p.kind() == kind).count();
        println!("{:?}: {}", kind, count);
    }
    println!("{} patterns", catalog.len());
    Ok(())
}

/// Replay a scripted game on a manual clock.
#[instrument(skip(config))]
fn replay(config: EngineConfig, moves: &[usize], json: bool) -> Result<()> {
    let clock = ManualClock::new();
    let delay = config.commit_delay();
    let mut engine = CubeEngine::with_clock(config, clock.clone());
    engine.subscribe(log_event);

    for &index in moves {
        if index == engine.gated_cell().index() {
            let player = engine.current_player();
            engine
                .activate_gated_cell(player)
                .with_context(|| format!("activating cell {}", index))?;
            clock.advance(delay);
            engine.poll();
        } else {
            engine
                .claim_cell(index)
                .with_context(|| format!("claiming cell {}", index))?;
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&engine.snapshot())?);
    } else {
        print_state(&engine);
    }
    Ok(())
}

/// Interactive loop on real time.
fn play(config: EngineConfig) -> Result<()> {
    let mut engine = CubeEngine::with_clock(config, SystemClock::new());
    engine.subscribe(log_event);

    println!("Commands: <cell 0-26>, gate, wait, reset, show, quit");
    print_state(&engine);

    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("{}> ", engine.current_player());
        std::io::stdout().flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        engine.poll();

        match line.trim() {
            "" => continue,
            "quit" | "q" => break,
            "show" => {}
            "reset" => engine.reset_game(),
            "gate" | "g" => {
                let player = engine.current_player();
                if let Err(e) = engine.activate_gated_cell(player) {
                    warn!(error = %e, "Activation rejected");
                    println!("{}", e);
                }
            }
            "wait" | "w" => match engine.time_until_commit() {
                Some(left) => {
                    std::thread::sleep(left);
                    engine.poll();
                }
                None => println!("Nothing pending"),
            },
            other => match other.parse::<usize>() {
                Ok(index) => {
                    if let Err(e) = engine.claim_cell(index) {
                        println!("{}", e);
                    }
                }
                Err(_) => println!("Unknown command: {}", other),
            },
        }
        print_state(&engine);
    }
    Ok(())
}

fn print_state<C: Clock>(engine: &CubeEngine<C>) {
    println!("{}", engine.render());
    if let Some(request) = engine.pending_request() {
        println!(
            "Cell {} pending for {}",
            request.target, request.claiming_player
        );
    }
    match engine.outcome() {
        Some(outcome) => {
            println!("{}", outcome);
            if let Some(pattern) = engine.winning_pattern() {
                println!("Winning line: {}", pattern);
            }
        }
        None => println!("{} to move", engine.current_player()),
    }
    let centre_open = engine.outcome().is_none()
        && engine.pending_request().is_none()
        && engine
            .occupant_at(Cell::CENTER.index())
            .is_ok_and(|o| o.is_empty());
    if centre_open {
        println!("Centre is gated: use `gate`");
    }
}

fn log_event(event: &GameEvent) {
    info!(?event, "Game event");
}
