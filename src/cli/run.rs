//! Run command implementation.

use super::{load_library, load_snapshot, parse_program, phase_name, save_snapshot};
use super::{CliError, OutputFormat};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use scurry::eval;
use scurry::game::{FieldCache, GameState, Level};
use serde::Serialize;
use std::path::PathBuf;

/// JSON report for a single program run.
#[derive(Debug, Serialize)]
struct JsonRunReport<'a> {
    seed: u64,
    tokens: &'a [i32],
    delta: f64,
    score: i32,
    life: i32,
    step: u32,
    run: u32,
    cheese_remaining: usize,
    phase: &'static str,
}

/// Execute the run command.
///
/// # Errors
///
/// Returns an error if the program text or any input file cannot be
/// parsed.
#[allow(clippy::too_many_arguments)]
pub(crate) fn execute(
    program: &str,
    seed: Option<u64>,
    snapshot: Option<PathBuf>,
    library: Option<PathBuf>,
    save: Option<PathBuf>,
    format: OutputFormat,
    quiet: bool,
) -> Result<(), CliError> {
    let tokens = parse_program(program)?;
    let library = load_library(library.as_deref())?;

    // Generate seed if not provided
    let seed = seed.unwrap_or_else(|| {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(42)
    });

    let mut rng = SmallRng::seed_from_u64(seed);
    let mut state = match snapshot {
        Some(path) => GameState::from_snapshot(&load_snapshot(&path)?),
        None => GameState::new(&Level::three(), &mut rng),
    };

    if !quiet {
        println!("Running {} tokens with seed {seed}...", tokens.len());
        println!();
    }

    let before = state.score;
    let mut cache = FieldCache::for_state(&state);
    let total = eval::apply(&tokens, &mut state, &library, &mut cache, &mut rng);
    let delta = total - f64::from(before);

    if let Some(save_path) = save {
        save_snapshot(&save_path, &state.snapshot())?;
        if !quiet {
            println!("Snapshot saved to: {}", save_path.display());
            println!();
        }
    }

    match format {
        OutputFormat::Text => {
            println!("Score: {total:.0} ({delta:+.0} this run)");
            println!(
                "Life: {}  Step: {}  Run: {}",
                state.life, state.step, state.run
            );
            println!("Cheese remaining: {}", state.cheese_remaining());
            println!("Phase: {}", phase_name(state.phase()));
        }
        OutputFormat::Json => {
            let report = JsonRunReport {
                seed,
                tokens: &tokens,
                delta,
                score: state.score,
                life: state.life,
                step: state.step,
                run: state.run,
                cheese_remaining: state.cheese_remaining(),
                phase: phase_name(state.phase()),
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}
