//! Config command implementation.
//!
//! View and manage configuration settings.
//! Config file is located at ~/.config/cubefilter/config.toml.

use std::env;
use std::fs;
use std::path::PathBuf;

use directories::BaseDirs;
use serde::{Deserialize, Serialize};

use super::{CommandContext, CommandError, Result};

/// Current config file version. Increment when making breaking changes to schema.
const CONFIG_VERSION: u32 = 1;

/// Environment variable overriding the config file path.
pub const CONFIG_ENV_VAR: &str = "CUBEFILTER_CONFIG";

/// Default config file contents.
const DEFAULT_CONFIG: &str = r#"# cubefilter configuration

# Config schema version (do not modify)
version = 1

# Card index used by card: filters (can also use --cards or CUBEFILTER_CARDS)
# card_index = "/path/to/card_index.json"

# Output preferences
[output]
# color = true              # Enable colors
"#;

/// Configuration file structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Config schema version. Always the current version once loaded.
    #[serde(default = "default_version")]
    pub version: u32,

    /// Card index file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_index: Option<PathBuf>,

    /// Output settings.
    #[serde(default)]
    pub output: OutputConfig,
}

/// Returns the current config version (used by serde default).
fn default_version() -> u32 {
    CONFIG_VERSION
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            card_index: None,
            output: OutputConfig::default(),
        }
    }
}

/// Output configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Enable colors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<bool>,
}

/// Gets the config file path.
///
/// Priority: `CUBEFILTER_CONFIG`, then `$XDG_CONFIG_HOME/cubefilter/config.toml`,
/// then `~/.config/cubefilter/config.toml`.
pub fn get_config_path() -> Result<PathBuf> {
    if let Ok(path) = env::var(CONFIG_ENV_VAR) {
        return Ok(PathBuf::from(path));
    }

    if let Ok(xdg_config) = env::var("XDG_CONFIG_HOME") {
        return Ok(PathBuf::from(xdg_config)
            .join("cubefilter")
            .join("config.toml"));
    }

    BaseDirs::new()
        .map(|dirs| {
            dirs.home_dir()
                .join(".config")
                .join("cubefilter")
                .join("config.toml")
        })
        .ok_or_else(|| CommandError::Config("Could not determine config directory".to_string()))
}

/// Loads the configuration from disk. A missing file yields the defaults.
pub fn load_config() -> Result<Config> {
    let path = get_config_path()?;

    if !path.exists() {
        log::debug!("no config file at {}, using defaults", path.display());
        return Ok(Config::default());
    }

    let content = fs::read_to_string(&path)
        .map_err(|e| CommandError::Config(format!("Failed to read config: {}", e)))?;

    let mut config: Config = toml::from_str(&content)
        .map_err(|e| CommandError::Config(format!("Failed to parse config: {}", e)))?;
    config.version = CONFIG_VERSION;

    log::debug!("loaded config from {}", path.display());
    Ok(config)
}

/// Saves the configuration to disk.
fn save_config(config: &Config) -> Result<()> {
    let path = get_config_path()?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            CommandError::Config(format!("Failed to create config directory: {}", e))
        })?;
    }

    let content = toml::to_string_pretty(config)
        .map_err(|e| CommandError::Config(format!("Failed to serialize config: {}", e)))?;

    fs::write(&path, content)
        .map_err(|e| CommandError::Config(format!("Failed to write config: {}", e)))?;

    Ok(())
}

/// Executes the config show command.
pub fn execute_show(ctx: &CommandContext) -> Result<()> {
    let path = get_config_path()?;
    let config = &ctx.config;

    if ctx.json_output {
        let output = serde_json::json!({
            "path": path.display().to_string(),
            "exists": path.exists(),
            "config": config,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !ctx.quiet {
        use owo_colors::OwoColorize;

        let header = "Configuration";
        if ctx.use_colors {
            println!("{}\n", header.green().bold());
        } else {
            println!("{}\n", header);
        }

        println!("File: {}", path.display());
        println!("Exists: {}\n", path.exists());

        if path.exists() {
            println!("Settings:");
            if let Some(ref card_index) = config.card_index {
                println!("  card_index: {}", card_index.display());
            }

            println!("\n[output]");
            if let Some(color) = config.output.color {
                println!("  color: {}", color);
            }
        } else {
            println!("(No config file exists. Run 'cubefilter config init' to create one.)");
        }
    }

    Ok(())
}

/// Executes the config path command.
pub fn execute_path(ctx: &CommandContext) -> Result<()> {
    let path = get_config_path()?;

    if ctx.json_output {
        let output = serde_json::json!({
            "path": path.display().to_string(),
            "exists": path.exists(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", path.display());
    }

    Ok(())
}

/// Executes the config init command.
///
/// Writes the commented default config if no file exists yet; an existing
/// file is left untouched.
pub fn execute_init(ctx: &CommandContext) -> Result<()> {
    let path = get_config_path()?;
    let created = !path.exists();

    if created {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                CommandError::Config(format!("Failed to create config directory: {}", e))
            })?;
        }
        fs::write(&path, DEFAULT_CONFIG)
            .map_err(|e| CommandError::Config(format!("Failed to create config file: {}", e)))?;
    }

    if ctx.json_output {
        let output = serde_json::json!({
            "path": path.display().to_string(),
            "created": created,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !ctx.quiet {
        if created {
            println!("Created default config at: {}", path.display());
        } else {
            println!("Config already exists at: {}", path.display());
        }
    }

    Ok(())
}

/// Options for the config set command.
pub struct ConfigSetOptions {
    /// Configuration key.
    pub key: String,
    /// Configuration value.
    pub value: String,
}

/// Executes the config set command.
pub fn execute_set(ctx: &CommandContext, opts: &ConfigSetOptions) -> Result<()> {
    let mut config = ctx.config.clone();
    apply_setting(&mut config, opts)?;
    save_config(&config)?;

    if ctx.json_output {
        let output = serde_json::json!({
            "status": "success",
            "key": opts.key,
            "value": opts.value,
            "path": get_config_path()?.display().to_string(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !ctx.quiet {
        println!("Set {} = {}", opts.key, opts.value);
    }

    Ok(())
}

/// Applies a `key = value` setting to a config.
fn apply_setting(config: &mut Config, opts: &ConfigSetOptions) -> Result<()> {
    match opts.key.as_str() {
        "card_index" => {
            config.card_index = Some(PathBuf::from(&opts.value));
        }
        "output.color" => {
            config.output.color = Some(parse_bool(&opts.value)?);
        }
        _ => {
            return Err(CommandError::Config(format!(
                "Unknown config key '{}'. Valid keys: card_index, output.color",
                opts.key
            )));
        }
    }
    Ok(())
}

/// Parses a boolean value from string.
fn parse_bool(s: &str) -> Result<bool> {
    match s.to_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => Ok(true),
        "false" | "no" | "0" | "off" => Ok(false),
        _ => Err(CommandError::Config(format!(
            "Invalid boolean value '{}'. Use true/false, yes/no, 1/0, or on/off",
            s
        ))),
    }
}
