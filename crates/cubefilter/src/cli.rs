//! CLI argument parsing using clap derive macros.
//!
//! This module defines the command-line interface for the cubefilter CLI.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// cubefilter - compile cube catalog filters
#[derive(Parser, Debug)]
#[command(name = "cubefilter")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbose output (show debug information)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Force JSON output
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable colors in output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Card index file (default: from config, then the XDG data directory)
    #[arg(long, global = true, env = "CUBEFILTER_CARDS")]
    pub cards: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compile a filter clause into a query
    #[command(alias = "c")]
    Compile {
        /// Filter clause (e.g., "decks>5", "category:Commander", "card:murder")
        clause: String,
    },

    /// List the filterable fields
    Fields,

    /// List the known cube categories
    Categories,

    /// Manage the card index used by `card:` filters
    Index {
        #[command(subcommand)]
        command: Option<IndexCommands>,
    },

    /// View and initialize configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

/// Shell types for completions
#[derive(ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    Powershell,
}

/// Card index subcommands
#[derive(Subcommand, Debug)]
pub enum IndexCommands {
    /// List indexed cards (default)
    List,

    /// Show the cubes containing a card
    Show {
        /// Card name (case-insensitive)
        card: String,
    },

    /// Record that cubes contain a card
    Add {
        /// Card name
        card: String,

        /// Cube ID(s)
        #[arg(required = true)]
        cube_ids: Vec<String>,
    },

    /// Remove cubes from a card, or the whole card when no cube is given
    Remove {
        /// Card name
        card: String,

        /// Cube ID(s) to remove
        cube_ids: Vec<String>,
    },
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration (default)
    Show,

    /// Show config file path
    Path,

    /// Write a default config file if none exists
    Init,

    /// Set a config value (card_index, output.color)
    Set {
        /// Config key
        key: String,

        /// Config value
        value: String,
    },
}
