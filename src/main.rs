//! Scurry CLI - run token programs and search for them with Running Max.

// Allow print in the CLI binary; allow unwrap in its tests
#![allow(clippy::print_stdout, clippy::print_stderr)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod cli;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

/// Scurry - a deterministic maze-pursuit simulator
#[derive(Parser, Debug)]
#[command(name = "scurry")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Execute one token program against a game
    Run {
        /// Token program, comma or space separated (e.g. "110,104,0,112")
        #[arg(required = true)]
        program: String,

        /// Random seed (default: random)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Resume from a snapshot JSON file instead of a fresh game
        #[arg(long)]
        snapshot: Option<std::path::PathBuf>,

        /// Subroutine library JSON file (id -> token list)
        #[arg(short, long)]
        library: Option<std::path::PathBuf>,

        /// Save the post-run snapshot to a file
        #[arg(long)]
        save: Option<std::path::PathBuf>,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,

        /// Suppress everything but the result
        #[arg(short, long)]
        quiet: bool,
    },

    /// Play a whole game with Running Max search
    Search {
        /// Random seed (default: random)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Maximum programs to apply (the game itself stops at 20)
        #[arg(short, long, default_value = "20")]
        runs: u32,

        /// Independent searches per run
        #[arg(short, long, default_value = "32")]
        pool: usize,

        /// Worker threads for batch scoring (default: global pool)
        #[arg(short = 'j', long)]
        threads: Option<usize>,

        /// Resume from a snapshot JSON file instead of a fresh game
        #[arg(long)]
        snapshot: Option<std::path::PathBuf>,

        /// Subroutine library JSON file (id -> token list)
        #[arg(short, long)]
        library: Option<std::path::PathBuf>,

        /// Save the final snapshot to a file
        #[arg(long)]
        save: Option<std::path::PathBuf>,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,

        /// Show a progress bar
        #[arg(long)]
        progress: bool,
    },
}

fn main() -> ExitCode {
    let args = Args::parse();

    let result = match args.command {
        Commands::Run {
            program,
            seed,
            snapshot,
            library,
            save,
            format,
            quiet,
        } => cli::run::execute(&program, seed, snapshot, library, save, format, quiet),

        Commands::Search {
            seed,
            runs,
            pool,
            threads,
            snapshot,
            library,
            save,
            format,
            progress,
        } => cli::search::execute(
            seed, runs, pool, threads, snapshot, library, save, format, progress,
        ),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
