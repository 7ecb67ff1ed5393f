use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::fill::options::FillOptions;
use crate::masking::session::DEFAULT_MASKED_DOMAIN;

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "field-detection",
    version,
    about = "Find and fill email fields on rendered pages"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to config file (default: field-detection.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fill the best email field of a page snapshot
    Fill {
        /// Page snapshot (.json, or YAML otherwise)
        #[arg(long)]
        page: String,

        /// Address to write
        #[arg(long)]
        value: String,

        /// Rounds before the final one (default from config, then 10)
        #[arg(long)]
        max_retries: Option<u32>,

        /// Pause between retry rounds in milliseconds
        #[arg(long)]
        retry_delay_ms: Option<u64>,

        /// Skip nested frames
        #[arg(long)]
        no_frames: bool,

        /// Wait for a visible candidate before attempting
        #[arg(long, action = clap::ArgAction::Set)]
        wait_for_visible: Option<bool>,

        /// Output format: console, json
        #[arg(long, default_value = "console")]
        format: String,

        /// Append state transitions to this JSONL file
        #[arg(long)]
        trace: Option<String>,

        /// Hide the filled address afterwards
        #[arg(long)]
        mask: bool,
    },

    /// List scored candidates of a page snapshot
    Discover {
        #[arg(long)]
        page: String,

        #[arg(long)]
        no_frames: bool,

        /// Output format: console, json
        #[arg(long, default_value = "console")]
        format: String,
    },

    /// Check an inbox dump for senders unrelated to the website
    Leak {
        /// Website the mailbox was generated for
        #[arg(long)]
        website: String,

        /// JSON array of messages with a `headerfrom` field
        #[arg(long)]
        inbox: String,
    },

    /// Mask disposable addresses in text (stdin when no input is given)
    Mask {
        #[arg(long)]
        input: Option<String>,

        /// Masked domain (default from config, then maildrop.cc)
        #[arg(long)]
        domain: Option<String>,
    },
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `field-detection.yaml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub fill: FillOptions,
    #[serde(default)]
    pub masking: MaskingConfig,
    #[serde(default)]
    pub trace: TraceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaskingConfig {
    #[serde(default = "default_domain")]
    pub domain: String,
}

impl Default for MaskingConfig {
    fn default() -> Self {
        Self {
            domain: default_domain(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TraceConfig {
    pub path: Option<String>,
}

fn default_domain() -> String { DEFAULT_MASKED_DOMAIN.to_string() }

// ============================================================================
// Config File Loading
// ============================================================================

pub const DEFAULT_CONFIG_PATH: &str = "field-detection.yaml";

/// Load config from a YAML file. Returns defaults if file is missing or malformed.
pub fn load_config(path: Option<&str>) -> AppConfig {
    let config_path = path.unwrap_or(DEFAULT_CONFIG_PATH);
    match std::fs::read_to_string(config_path) {
        Ok(content) => match serde_yaml::from_str(&content) {
            Ok(config) => config,
            Err(e) => {
                warn!(path = config_path, error = %e, "malformed config, using defaults");
                AppConfig::default()
            }
        },
        Err(e) => {
            // Only worth mentioning when the user pointed at a file.
            if path.is_some() {
                warn!(path = config_path, error = %e, "config not readable, using defaults");
            }
            AppConfig::default()
        }
    }
}

// ============================================================================
// Config Builders (merge CLI args with config file)
// ============================================================================

/// Fill options with CLI overrides applied on top of the config file.
pub fn build_fill_options(
    config: &AppConfig,
    max_retries: Option<u32>,
    retry_delay_ms: Option<u64>,
    no_frames: bool,
    wait_for_visible: Option<bool>,
) -> FillOptions {
    let mut options = config.fill.clone();
    if let Some(n) = max_retries {
        options.max_retries = n;
    }
    if let Some(ms) = retry_delay_ms {
        options.retry_delay_ms = ms;
    }
    if no_frames {
        options.include_nested_frames = false;
    }
    if let Some(wait) = wait_for_visible {
        options.wait_for_visible = wait;
    }
    options
}
