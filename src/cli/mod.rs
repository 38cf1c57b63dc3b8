//! CLI support for jpath
//!
//! Provides programmatic access to the `jpath` commands so other tools can
//! run them without spawning the binary.

mod optimize;
mod query;

pub use optimize::{execute_optimize, load_discriminators, OptimizeOptions};
pub use query::{execute_explain, execute_get, execute_set, GetOptions, QueryResult, SetOptions};

use std::io;

use thiserror::Error;

/// Errors that can occur during CLI operations
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Path error: {0}")]
    Path(#[from] crate::PathError),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("No input provided. Use --input or pipe JSON to stdin.")]
    NoInput,

    /// A discriminator table that is not `{ "<container>": ["field", ...] }`
    #[error("Invalid discriminator table: {0}")]
    Config(String),
}

/// Parse the document handed to a command.
fn parse_document(input: Option<&String>) -> Result<serde_json::Value, CliError> {
    let text = input.ok_or(CliError::NoInput)?;
    Ok(serde_json::from_str(text)?)
}
