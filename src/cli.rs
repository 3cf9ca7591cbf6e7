//! CLI command implementations for Scurry.

pub(crate) mod run;
pub(crate) mod search;

use clap::ValueEnum;
use scurry::game::{Phase, Snapshot};
use scurry::program::InMemoryLibrary;
use std::error::Error;
use std::fmt;
use std::fs;
use std::path::Path;

/// Output format shared by both commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// CLI error type.
#[derive(Debug)]
pub(crate) struct CliError {
    message: String,
}

impl CliError {
    /// Create a new CLI error.
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for CliError {}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::new(e.to_string())
    }
}

impl From<ParseProgramError> for CliError {
    fn from(e: ParseProgramError) -> Self {
        Self::new(e.to_string())
    }
}

/// Error parsing a token program from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ParseProgramError {
    /// The program text contained no tokens.
    Empty,
    /// A token was not an integer.
    InvalidToken(String),
}

impl fmt::Display for ParseProgramError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "program is empty"),
            Self::InvalidToken(text) => write!(f, "invalid token {text:?}"),
        }
    }
}

impl Error for ParseProgramError {}

/// Parse a comma or whitespace separated token program.
pub(crate) fn parse_program(text: &str) -> Result<Vec<i32>, ParseProgramError> {
    let tokens = text
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<i32>()
                .map_err(|_| ParseProgramError::InvalidToken(part.to_string()))
        })
        .collect::<Result<Vec<i32>, _>>()?;
    if tokens.is_empty() {
        return Err(ParseProgramError::Empty);
    }
    Ok(tokens)
}

/// Load a subroutine library from a JSON object mapping id to token list.
///
/// A missing path yields an empty library.
pub(crate) fn load_library(path: Option<&Path>) -> Result<InMemoryLibrary, CliError> {
    match path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .map_err(|e| CliError::new(format!("Failed to read {}: {e}", path.display())))?;
            serde_json::from_str(&text)
                .map_err(|e| CliError::new(format!("Failed to parse {}: {e}", path.display())))
        }
        None => Ok(InMemoryLibrary::new()),
    }
}

/// Load a game snapshot from a JSON file.
pub(crate) fn load_snapshot(path: &Path) -> Result<Snapshot, CliError> {
    let text = fs::read_to_string(path)
        .map_err(|e| CliError::new(format!("Failed to read {}: {e}", path.display())))?;
    serde_json::from_str(&text)
        .map_err(|e| CliError::new(format!("Failed to parse {}: {e}", path.display())))
}

/// Write a game snapshot as pretty JSON.
pub(crate) fn save_snapshot(path: &Path, snapshot: &Snapshot) -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(snapshot)?;
    fs::write(path, json)
        .map_err(|e| CliError::new(format!("Failed to write {}: {e}", path.display())))
}

/// Stable lowercase name for a game phase, for reports.
pub(crate) fn phase_name(phase: Phase) -> &'static str {
    match phase {
        Phase::Running => "running",
        Phase::Won => "won",
        Phase::Lost => "lost",
    }
}
