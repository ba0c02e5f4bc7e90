use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::engine::error::HintError;
use crate::hints::hint_model::HintConfig;

pub const DEFAULT_CONFIG_PATH: &str = "hint-engine.yaml";

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "hint-engine",
    version,
    about = "Keyboard hint engine: label, select and act on page elements"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to config file (default: hint-engine.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Append session events to this JSONL file
    #[arg(long, global = true)]
    pub trace: Option<String>,

    /// Assistant API endpoint (discuss action)
    #[arg(long, global = true)]
    pub assistant_endpoint: Option<String>,

    /// Assistant model name
    #[arg(long, global = true)]
    pub assistant_model: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Invoke a hint mode on a page snapshot and list the hints
    Scan {
        /// Page snapshot (JSON)
        #[arg(long)]
        page: String,

        /// Hint mode, see `modes`
        #[arg(long, default_value = "open-link")]
        mode: String,
    },

    /// Invoke a hint mode and replay a key script against it
    Run {
        /// Page snapshot (JSON)
        #[arg(long)]
        page: String,

        /// Hint mode, see `modes`
        #[arg(long, default_value = "open-link")]
        mode: String,

        /// Keys to type, e.g. "ab", "a<BS>c", "x<Esc>"
        #[arg(long)]
        keys: String,

        /// Backend for the discuss action: mock or ollama
        #[arg(long, default_value = "mock")]
        assistant: String,
    },

    /// List available hint modes
    Modes,
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `hint-engine.yaml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub hints: HintConfig,
    #[serde(default)]
    pub trace: TraceConfig,
    #[serde(default)]
    pub assistant: AssistantConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TraceConfig {
    pub path: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssistantConfig {
    pub endpoint: Option<String>,
    pub model: Option<String>,
}

// ============================================================================
// Config File Loading
// ============================================================================

/// Read a config file. `Ok(None)` when the file does not exist.
pub fn try_load_config(path: &str) -> Result<Option<AppConfig>, HintError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(HintError::ConfigIo {
                path: path.to_string(),
                source: e,
            });
        }
    };

    serde_yaml::from_str(&content)
        .map(Some)
        .map_err(|e| HintError::YamlParse {
            path: path.to_string(),
            source: e,
        })
}

/// Load config from a YAML file. Returns defaults if the file is missing or
/// malformed (with a warning for the latter).
pub fn load_config(path: Option<&str>) -> AppConfig {
    let config_path = path.unwrap_or(DEFAULT_CONFIG_PATH);
    match try_load_config(config_path) {
        Ok(Some(config)) => config,
        Ok(None) => AppConfig::default(),
        Err(e) => {
            eprintln!("Warning: {}; using defaults", e);
            AppConfig::default()
        }
    }
}

/// Trace file: CLI flag, then config file.
pub fn resolve_trace_path<'a>(cli: &'a Cli, config: &'a AppConfig) -> Option<&'a str> {
    cli.trace.as_deref().or(config.trace.path.as_deref())
}
