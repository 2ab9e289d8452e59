//! Log output for the server and CLI.
//!
//! Everything goes to stderr so stdout stays clean for command results.

use std::io::{self, IsTerminal};
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// Options that shape the log subscriber.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogOptions {
    /// JSON lines for scripts and log collectors.
    pub robot: bool,
    /// 0 = info, 1 = debug, 2+ = trace
    pub verbose: u8,
    /// Errors only.
    pub quiet: bool,
    pub no_color: bool,
}

/// Filter used when `RUST_LOG` is unset.
///
/// Request logging from the HTTP trace layer follows the same level as the
/// crate itself.
pub fn default_directive(verbose: u8, quiet: bool) -> String {
    let level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };
    format!("trmnld={level},tower_http={level}")
}

/// Install the global subscriber.
///
/// | Mode  | TTY | Output                     |
/// |-------|-----|----------------------------|
/// | Robot | any | JSON lines                 |
/// | Human | yes | Full format, colored       |
/// | Human | no  | Compact, no ANSI           |
///
/// `RUST_LOG` overrides the verbosity flags, e.g. `RUST_LOG=trmnld=debug,tower_http=warn`.
pub fn init_logging(opts: LogOptions) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(opts.verbose, opts.quiet)));

    let base = fmt::layer()
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_span_events(FmtSpan::NONE)
        .with_writer(io::stderr);

    let registry = tracing_subscriber::registry().with(filter);

    // A second init (tests, embedding) keeps the first subscriber.
    let _ = if opts.robot {
        registry.with(base.json().with_target(true)).try_init()
    } else if io::stderr().is_terminal() && !opts.no_color {
        registry.with(base.with_target(false)).try_init()
    } else {
        registry
            .with(base.with_ansi(false).with_target(false).compact())
            .try_init()
    };
}
