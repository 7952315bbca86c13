//! Command implementations for the cubefilter CLI.
//!
//! This module contains the actual command handlers that are invoked by the CLI.

pub mod compile;
pub mod completions;
pub mod config;
pub mod fields;
pub mod index;

use std::path::PathBuf;

use cube_filter::card_index::{CardIndexError, CardIndexStore};

use crate::cli::Cli;
use config::Config;

/// Error type for command execution.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// Filter compilation error.
    #[error("filter error: {0}")]
    Filter(#[from] cube_filter::filter::FilterError),

    /// Card index storage error.
    #[error("card index error: {0}")]
    CardIndex(#[from] CardIndexError),

    /// Requested entry does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for command execution.
pub type Result<T> = std::result::Result<T, CommandError>;

/// Context for command execution, containing common dependencies.
pub struct CommandContext {
    /// Whether to output JSON.
    pub json_output: bool,
    /// Whether to use colors.
    pub use_colors: bool,
    /// Whether to be quiet (errors only).
    pub quiet: bool,
    /// Card index file chosen on the command line or in the environment.
    pub cards_override: Option<PathBuf>,
    /// Loaded configuration.
    pub config: Config,
}

impl CommandContext {
    /// Creates a new command context from CLI arguments and configuration.
    pub fn new(cli: &Cli, config: Config) -> Self {
        let color_enabled = config.output.color.unwrap_or(true);
        Self {
            json_output: cli.json,
            use_colors: color_enabled && !cli.no_color,
            quiet: cli.quiet,
            cards_override: cli.cards.clone(),
            config,
        }
    }

    /// Returns the card index store, resolving its path with priority:
    /// `--cards` flag / `CUBEFILTER_CARDS` > config `card_index` > XDG default.
    pub fn card_index_store(&self) -> Result<CardIndexStore> {
        if let Some(path) = &self.cards_override {
            return Ok(CardIndexStore::with_path(path.clone()));
        }
        if let Some(path) = &self.config.card_index {
            return Ok(CardIndexStore::with_path(path.clone()));
        }
        Ok(CardIndexStore::new()?)
    }
}
