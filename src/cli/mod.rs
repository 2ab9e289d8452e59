//! CLI argument definitions.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::config::ConfigOverrides;
use crate::logging::LogOptions;

/// trmnld - Self-hosted image rotation server for TRMNL e-ink displays.
///
/// Robot Mode: Use --robot or --format=json for machine-parseable output.
#[derive(Parser, Debug)]
#[command(name = "trmnld", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (text for humans, json for scripts)
    #[arg(
        long,
        short = 'f',
        default_value = "text",
        global = true,
        env = "TRMNLD_FORMAT"
    )]
    pub format: OutputFormat,

    /// Robot mode: JSON output and JSON log lines
    #[arg(long, global = true)]
    pub robot: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(long, short = 'v', global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(long, short = 'q', global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text with optional color
    #[default]
    Text,
    /// Pretty-printed JSON
    Json,
    /// Compact JSON (single line)
    JsonCompact,
}

impl Cli {
    /// Returns true if output should be JSON (robot mode or explicit --format=json).
    pub const fn use_json(&self) -> bool {
        self.robot || matches!(self.format, OutputFormat::Json | OutputFormat::JsonCompact)
    }

    pub const fn use_compact_json(&self) -> bool {
        matches!(self.format, OutputFormat::JsonCompact)
    }

    pub const fn log_options(&self) -> LogOptions {
        LogOptions {
            robot: self.robot,
            verbose: self.verbose,
            quiet: self.quiet,
            no_color: self.no_color,
        }
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the device API server
    Serve(ServeArgs),

    /// List the images the server would rotate through
    Images(ImagesArgs),

    /// Print the access token and friendly ID for a device
    Credential(CredentialArgs),

    /// Show version and build information
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for `serve`.
///
/// # Examples
///
/// ```bash
/// # Serve ./frames, let devices register
/// trmnld serve ./frames --setup
///
/// # Only two known devices may register
/// trmnld serve ./frames --setup --allow AA:BB:CC:DD:EE:FF --allow 11:22:33:44:55:66
///
/// # Behind a TLS proxy
/// trmnld serve --config /etc/trmnld.toml --public-url https://frames.example.com
/// ```
#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    /// Image directory (defaults to the config file value, then the current directory)
    #[arg(value_name = "IMAGE_DIR")]
    pub image_dir: Option<PathBuf>,

    /// TOML configuration file
    #[arg(long, short = 'c', env = "TRMNLD_CONFIG")]
    pub config: Option<PathBuf>,

    /// Bind address
    #[arg(long, short = 'b', env = "TRMNLD_BIND")]
    pub bind: Option<String>,

    /// Port to listen on
    #[arg(long, short = 'p', env = "TRMNLD_PORT")]
    pub port: Option<u16>,

    /// Enable device provisioning (/api/setup)
    #[arg(long)]
    pub setup: bool,

    /// Restrict provisioning to these device IDs (repeatable)
    #[arg(
        long = "allow",
        value_name = "ID",
        env = "TRMNLD_ALLOWED_DEVICES",
        value_delimiter = ','
    )]
    pub allowed_devices: Vec<String>,

    /// Public base URL for image links, e.g. https://frames.example.com
    #[arg(long, env = "TRMNLD_PUBLIC_URL")]
    pub public_url: Option<String>,
}

impl ServeArgs {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            config_file: self.config.clone(),
            bind: self.bind.clone(),
            port: self.port,
            image_dir: self.image_dir.clone(),
            setup: self.setup,
            public_url: self.public_url.clone(),
            allowed_devices: self.allowed_devices.clone(),
        }
    }
}

#[derive(Args, Debug)]
pub struct ImagesArgs {
    /// Image directory (defaults to the current directory)
    #[arg(value_name = "IMAGE_DIR")]
    pub image_dir: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct CredentialArgs {
    /// Device identifier (MAC address)
    #[arg(value_name = "ID")]
    pub device_id: String,
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
