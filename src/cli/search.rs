//! Search command implementation.

use super::{load_library, load_snapshot, phase_name, save_snapshot};
use super::{CliError, OutputFormat};
use indicatif::{ProgressBar, ProgressStyle};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use scurry::eval;
use scurry::game::{FieldCache, GameState, Level};
use scurry::search::{best_of, SearchConfig};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;

/// One applied program in the JSON report.
#[derive(Debug, Serialize)]
struct JsonRunEntry {
    run: u32,
    tokens: Vec<i32>,
    delta: f64,
    score: f64,
}

/// JSON report for a whole searched game.
#[derive(Debug, Serialize)]
struct JsonSearchReport {
    seed: u64,
    pool: usize,
    runs: Vec<JsonRunEntry>,
    score: i32,
    life: i32,
    step: u32,
    run: u32,
    cheese_remaining: usize,
    phase: &'static str,
    duration_secs: f64,
}

/// Render a token program the way the run command accepts it.
fn format_tokens(tokens: &[i32]) -> String {
    tokens
        .iter()
        .map(i32::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

/// Execute the search command.
///
/// # Errors
///
/// Returns an error if an input file cannot be read or parsed.
#[allow(clippy::too_many_arguments)]
pub(crate) fn execute(
    seed: Option<u64>,
    runs: u32,
    pool: usize,
    threads: Option<usize>,
    snapshot: Option<PathBuf>,
    library: Option<PathBuf>,
    save: Option<PathBuf>,
    format: OutputFormat,
    progress: bool,
) -> Result<(), CliError> {
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
    let mut cache = FieldCache::for_state(&state);
    let config = SearchConfig {
        threads,
        ..SearchConfig::default()
    };

    let pb = if progress {
        let pb = ProgressBar::new(u64::from(runs));
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} runs")
                .expect("valid template")
                .progress_chars("=>-"),
        );
        Some(pb)
    } else {
        None
    };

    let start = Instant::now();
    let mut entries: Vec<JsonRunEntry> = Vec::new();

    while !state.is_terminal() && entries.len() < runs as usize {
        let base = state.snapshot();
        let winner = best_of(pool, &base, &library, &config, None, &mut rng);
        let before = f64::from(state.score);
        let total = eval::apply(&winner.tokens, &mut state, &library, &mut cache, &mut rng);
        entries.push(JsonRunEntry {
            run: state.run,
            tokens: winner.tokens,
            delta: total - before,
            score: total,
        });
        if let Some(pb) = &pb {
            pb.inc(1);
        }
    }

    if let Some(pb) = pb {
        pb.finish_with_message("done");
    }
    let duration = start.elapsed();

    if let Some(save_path) = save {
        save_snapshot(&save_path, &state.snapshot())?;
    }

    match format {
        OutputFormat::Text => {
            for entry in &entries {
                println!(
                    "Run {:>2}: {:<40} {:>6.0} ({:+.0})",
                    entry.run,
                    format_tokens(&entry.tokens),
                    entry.score,
                    entry.delta
                );
            }
            println!();
            println!("Seed: {seed}");
            println!(
                "Score: {}  Life: {}  Step: {}  Run: {}",
                state.score, state.life, state.step, state.run
            );
            println!("Cheese remaining: {}", state.cheese_remaining());
            println!("Phase: {}", phase_name(state.phase()));
            println!("Duration: {:.2}s", duration.as_secs_f64());
        }
        OutputFormat::Json => {
            let report = JsonSearchReport {
                seed,
                pool,
                runs: entries,
                score: state.score,
                life: state.life,
                step: state.step,
                run: state.run,
                cheese_remaining: state.cheese_remaining(),
                phase: phase_name(state.phase()),
                duration_secs: duration.as_secs_f64(),
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}
