//! Command-line interface for strictly_cube.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Strictly Cube - 3x3x3 tic-tac-toe in the terminal
#[derive(Parser, Debug)]
#[command(name = "strictly_cube")]
#[command(about = "3x3x3 tic-tac-toe with a gated centre cell", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Engine configuration file (TOML). Defaults apply if omitted.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List every winning line
    Patterns,

    /// Play a comma-separated list of cells for alternating players
    Replay {
        /// Cells to claim in order, e.g. "0,9,1,10,2". Cell 13 goes through
        /// the gated flow and waits out the commit delay.
        #[arg(value_delimiter = ',')]
        moves: Vec<usize>,

        /// Print the final snapshot as JSON instead of the board
        #[arg(long)]
        json: bool,
    },

    /// Play interactively on stdin
    Play,
}
