use clap::Parser;
use log::LevelFilter;
use std::process::ExitCode;

mod cli;
mod commands;
mod output;

use cli::{Cli, Commands, ConfigCommands, IndexCommands};
use commands::config::{load_config, ConfigSetOptions};
use commands::index::IndexEditOptions;
use commands::{CommandContext, CommandError};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logger(&cli);

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // The compile command already printed the { err, filter } document.
            let reported = cli.json && matches!(e, CommandError::Filter(_));
            if reported {
                return ExitCode::from(exit_status(&e));
            }
            if cli.json {
                let error_json = serde_json::json!({
                    "error": {
                        "code": error_code(&e),
                        "message": e.to_string(),
                    }
                });
                match serde_json::to_string_pretty(&error_json) {
                    Ok(text) => eprintln!("{text}"),
                    Err(_) => eprintln!("Error: {e}"),
                }
            } else {
                eprintln!("Error: {e}");
            }
            ExitCode::from(exit_status(&e))
        }
    }
}

/// Initializes logging on stderr. `RUST_LOG` overrides the flag-derived level.
fn init_logger(cli: &Cli) {
    let level = if cli.verbose {
        LevelFilter::Debug
    } else if cli.quiet {
        LevelFilter::Error
    } else {
        LevelFilter::Warn
    };

    let _ = env_logger::Builder::new()
        .filter_level(level)
        .parse_env("RUST_LOG")
        .format_timestamp(None)
        .try_init();
}

async fn run(cli: &Cli) -> commands::Result<()> {
    let config = load_config()?;
    let ctx = CommandContext::new(cli, config);

    match &cli.command {
        Commands::Compile { clause } => commands::compile::execute(&ctx, clause).await,
        Commands::Fields => commands::fields::execute_fields(&ctx),
        Commands::Categories => commands::fields::execute_categories(&ctx),
        Commands::Index { command } => match command {
            None | Some(IndexCommands::List) => commands::index::execute_list(&ctx).await,
            Some(IndexCommands::Show { card }) => commands::index::execute_show(&ctx, card).await,
            Some(IndexCommands::Add { card, cube_ids }) => {
                let opts = IndexEditOptions {
                    card: card.clone(),
                    cube_ids: cube_ids.clone(),
                };
                commands::index::execute_add(&ctx, &opts).await
            }
            Some(IndexCommands::Remove { card, cube_ids }) => {
                let opts = IndexEditOptions {
                    card: card.clone(),
                    cube_ids: cube_ids.clone(),
                };
                commands::index::execute_remove(&ctx, &opts).await
            }
        },
        Commands::Config { command } => match command {
            None | Some(ConfigCommands::Show) => commands::config::execute_show(&ctx),
            Some(ConfigCommands::Path) => commands::config::execute_path(&ctx),
            Some(ConfigCommands::Init) => commands::config::execute_init(&ctx),
            Some(ConfigCommands::Set { key, value }) => {
                let opts = ConfigSetOptions {
                    key: key.clone(),
                    value: value.clone(),
                };
                commands::config::execute_set(&ctx, &opts)
            }
        },
        Commands::Completions { shell } => {
            commands::completions::execute(shell)?;
            Ok(())
        }
    }
}

/// Returns the error code string for JSON output.
fn error_code(e: &CommandError) -> &'static str {
    match e {
        CommandError::Filter(err) => err.code(),
        CommandError::CardIndex(_) => "CARD_INDEX_ERROR",
        CommandError::NotFound(_) => "NOT_FOUND",
        CommandError::Config(_) => "CONFIG_ERROR",
        CommandError::Io(_) => "IO_ERROR",
        CommandError::Json(_) => "JSON_ERROR",
    }
}

/// Returns the process exit status for an error.
fn exit_status(e: &CommandError) -> u8 {
    match e {
        CommandError::Filter(_) | CommandError::NotFound(_) | CommandError::Json(_) => 1,
        CommandError::Io(_) => 3,
        CommandError::CardIndex(_) | CommandError::Config(_) => 5,
    }
}
