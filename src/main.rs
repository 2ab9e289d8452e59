//! trmnld - Self-hosted image rotation server for TRMNL e-ink displays.
//!
//! Provides both human-friendly and machine-readable (robot mode) output.
#![forbid(unsafe_code)]

use std::io;

use clap::Parser;
use console::style;
use serde::Serialize;
use tracing::{info, warn};

use trmnld::app::AppState;
use trmnld::auth::{CredentialDeriver, SECRET_ENV, ServerSecret};
use trmnld::catalog::Catalog;
use trmnld::cli::{self, Cli, Commands};
use trmnld::config::ServerConfig;
use trmnld::error::{Result, ResultExt, TrmnlError};
use trmnld::logging::init_logging;
use trmnld::server;

/// Build information embedded at compile time.
mod build_info {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");

    pub fn git_sha() -> &'static str {
        option_env!("VERGEN_GIT_SHA").unwrap_or("unknown")
    }

    pub fn git_dirty() -> bool {
        option_env!("VERGEN_GIT_DIRTY") == Some("true")
    }

    pub fn build_timestamp() -> &'static str {
        option_env!("VERGEN_BUILD_TIMESTAMP").unwrap_or("unknown")
    }

    pub fn rustc_semver() -> &'static str {
        option_env!("VERGEN_RUSTC_SEMVER").unwrap_or("unknown")
    }

    pub fn target() -> &'static str {
        option_env!("VERGEN_CARGO_TARGET_TRIPLE").unwrap_or("unknown")
    }
}

fn main() {
    let cli = Cli::parse();

    if cli.no_color {
        console::set_colors_enabled(false);
        console::set_colors_enabled_stderr(false);
    }
    init_logging(cli.log_options());

    if let Err(e) = run(&cli) {
        output_error(&cli, &e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::Serve(args) => cmd_serve(args),
        Commands::Images(args) => cmd_images(cli, args),
        Commands::Credential(args) => cmd_credential(cli, args),
        Commands::Version => cmd_version(cli),
        Commands::Completions(args) => {
            cmd_completions(args);
            Ok(())
        }
    }
}

fn cmd_serve(args: &cli::ServeArgs) -> Result<()> {
    let config = ServerConfig::load(args.overrides())?;

    let secret = ServerSecret::from_env();
    if secret.is_default() {
        warn!(
            "{SECRET_ENV} is not set; using the built-in secret. \
             Anyone who knows a device's MAC address can compute its access token."
        );
    }

    let catalog = Catalog::load(config.image_dir())?;
    if catalog.is_empty() {
        warn!(root = %catalog.root().display(), "No .png or .bmp images found");
    }

    info!(
        version = build_info::VERSION,
        git = build_info::git_sha(),
        addr = %config.listen_addr(),
        images = %catalog.root().display(),
        count = catalog.len(),
        "Starting trmnld"
    );
    if config.policy.setup_enabled {
        info!(admission = %config.policy.admission, "Device provisioning enabled");
    } else {
        info!("Device provisioning disabled; start with --setup to register devices");
    }

    let state = AppState::new(
        catalog,
        CredentialDeriver::new(secret),
        config.policy.clone(),
        config.public_url.clone(),
    )
    .shared();

    let runtime = tokio::runtime::Runtime::new().with_context(|| "starting async runtime")?;
    runtime.block_on(server::serve(&config, state))
}

#[derive(Serialize)]
struct ImagesReport<'a> {
    root: String,
    count: usize,
    images: &'a [trmnld::catalog::CatalogEntry],
}

fn cmd_images(cli: &Cli, args: &cli::ImagesArgs) -> Result<()> {
    let root = match &args.image_dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir()?,
    };
    let catalog = Catalog::load(&root)?;

    if cli.use_json() {
        return output_json(
            cli,
            &ImagesReport {
                root: catalog.root().display().to_string(),
                count: catalog.len(),
                images: catalog.entries(),
            },
        );
    }

    if catalog.is_empty() {
        println!("No images in {}", catalog.root().display());
        return Ok(());
    }
    println!(
        "{} image(s) in {}",
        style(catalog.len()).bold(),
        catalog.root().display()
    );
    for entry in catalog.entries() {
        println!(
            "{:>4}  {:>6}s  {}",
            entry.ordinal,
            entry.duration_secs,
            style(&entry.path).cyan()
        );
    }
    Ok(())
}

fn cmd_credential(cli: &Cli, args: &cli::CredentialArgs) -> Result<()> {
    let secret = ServerSecret::from_env();
    let deriver = CredentialDeriver::new(secret);
    let credential = deriver.derive(&args.device_id)?;
    let friendly_id = credential.friendly_id();

    if cli.use_json() {
        return output_json(
            cli,
            &serde_json::json!({
                "device": args.device_id.trim(),
                "api_key": credential.as_str(),
                "friendly_id": friendly_id.as_str(),
                "default_secret": deriver.secret_is_default(),
            }),
        );
    }

    println!("device:      {}", args.device_id.trim());
    println!("api_key:     {}", style(&credential).green());
    println!("friendly_id: {}", style(&friendly_id).bold());
    if deriver.secret_is_default() {
        eprintln!(
            "{}: {SECRET_ENV} is not set; this token uses the built-in secret",
            style("Warning").yellow()
        );
    }
    Ok(())
}

fn cmd_version(cli: &Cli) -> Result<()> {
    if cli.use_json() {
        return output_json(
            cli,
            &serde_json::json!({
                "version": build_info::VERSION,
                "git_sha": build_info::git_sha(),
                "git_dirty": build_info::git_dirty(),
                "build_timestamp": build_info::build_timestamp(),
                "rustc_version": build_info::rustc_semver(),
                "target": build_info::target(),
            }),
        );
    }

    println!("trmnld {}", build_info::VERSION);
    println!(
        "git: {}{}",
        build_info::git_sha(),
        if build_info::git_dirty() { " (dirty)" } else { "" }
    );
    println!("built: {}", build_info::build_timestamp());
    println!("rustc: {}", build_info::rustc_semver());
    println!("target: {}", build_info::target());
    Ok(())
}

fn cmd_completions(args: &cli::CompletionsArgs) {
    use clap::CommandFactory;
    clap_complete::generate(args.shell, &mut Cli::command(), "trmnld", &mut io::stdout());
}

// === Utility Functions ===

fn output_json<T: Serialize>(cli: &Cli, data: &T) -> Result<()> {
    let json = if cli.use_compact_json() {
        serde_json::to_string(data)
    } else {
        serde_json::to_string_pretty(data)
    }
    .with_context(|| "encoding JSON output")?;
    println!("{json}");
    Ok(())
}

fn output_error(cli: &Cli, error: &TrmnlError) {
    if cli.use_json() {
        let json = serde_json::json!({
            "error": true,
            "message": error.to_string(),
            "suggestion": error.suggestion(),
            "recoverable": error.is_user_recoverable(),
        });
        eprintln!("{json}");
    } else {
        eprintln!("{}: {}", style("Error").red().bold(), error);
        if let Some(suggestion) = error.suggestion() {
            eprintln!("{}: {}", style("Hint").yellow(), suggestion);
        }
    }
}
