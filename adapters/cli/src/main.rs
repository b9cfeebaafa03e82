#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots a Tileworld session and prints its terrain.

mod ascii;
mod config;

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Parser, ValueEnum};
use tileworld_core::{Event, Orientation};
use tileworld_system_bootstrap::Bootstrap;
use tileworld_system_movement::{MoveOutcome, Movement};
use tileworld_world::{self as world, query, World};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::SessionSettings;

#[derive(Parser, Debug)]
#[command(author, version, about = "Generates a Tileworld terrain session", long_about = None)]
struct Args {
    /// Number of grid rows
    #[arg(long)]
    rows: Option<u32>,

    /// Number of grid columns
    #[arg(long)]
    columns: Option<u32>,

    /// Number of obstacles to scatter over dry land
    #[arg(long)]
    obstacles: Option<u32>,

    /// Row of the character's starting cell
    #[arg(long)]
    start_row: Option<u32>,

    /// Column of the character's starting cell
    #[arg(long)]
    start_column: Option<u32>,

    /// Seed for every random draw; drawn at random when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Forces the river orientation
    #[arg(long, value_enum)]
    river: Option<RiverArg>,

    /// Comma separated compass moves applied after the session starts, e.g. `se,se,e`
    #[arg(long, value_delimiter = ',')]
    moves: Vec<String>,

    /// TOML file providing the same session fields; flags take precedence
    #[arg(long)]
    config: Option<PathBuf>,

    /// Enables debug logging for the terrain engine
    #[arg(short, long)]
    verbose: bool,

    /// Skips printing the terrain map
    #[arg(long)]
    no_map: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum RiverArg {
    Horizontal,
    Vertical,
}

impl From<RiverArg> for Orientation {
    fn from(value: RiverArg) -> Self {
        match value {
            RiverArg::Horizontal => Orientation::Horizontal,
            RiverArg::Vertical => Orientation::Vertical,
        }
    }
}

impl Args {
    fn settings(&self) -> SessionSettings {
        SessionSettings {
            rows: self.rows,
            columns: self.columns,
            obstacles: self.obstacles,
            start_row: self.start_row,
            start_column: self.start_column,
            seed: self.seed,
            river: self.river.map(Orientation::from),
            moves: self.moves.clone(),
        }
    }
}

/// Entry point for the Tileworld command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose)?;

    let file = match &args.config {
        Some(path) => SessionSettings::load(path)?,
        None => SessionSettings::default(),
    };
    let plan = args.settings().or(file).resolve(rand::random::<u64>)?;

    let mut world = World::new();
    let bootstrap = Bootstrap::default();
    println!("{}", bootstrap.welcome_banner(&world));
    println!("seed: {}", plan.config.seed);

    let mut events = Vec::new();
    world::apply(&mut world, bootstrap.start_command(plan.config), &mut events);
    if let Some(Event::SessionRejected { reason }) = events.first() {
        bail!("session rejected: {reason}");
    }

    let mut movement = Movement::default();
    for direction in &plan.moves {
        let mut commands = Vec::new();
        let outcome = movement.handle(
            &events,
            Some(*direction),
            query::terrain(&world),
            query::character(&world),
            &mut commands,
        );
        events.clear();
        for command in commands {
            world::apply(&mut world, command, &mut events);
        }
        match outcome {
            MoveOutcome::Moved(cell) => info!(direction = direction.abbreviation(), %cell, "moved"),
            MoveOutcome::Blocked => warn!(direction = direction.abbreviation(), "move blocked"),
            MoveOutcome::Idle => warn!(direction = direction.abbreviation(), "move ignored"),
        }
    }

    let Some(terrain) = bootstrap.terrain(&world) else {
        bail!("session did not produce terrain");
    };
    if !args.no_map {
        print!("{}", ascii::render_map(terrain, query::character(&world)));
        println!();
        for line in ascii::legend() {
            println!("{line}");
        }
        println!();
    }
    for line in bootstrap.summary_lines(&world) {
        println!("{line}");
    }
    println!();
    for line in ascii::elevation_histogram(&bootstrap.band_census(&world)) {
        println!("{line}");
    }

    Ok(())
}

fn init_tracing(verbose: bool) -> Result<()> {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))?;
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
    Ok(())
}
