//! Diagnostic logging.
//!
//! Filtering follows `RUST_LOG` (e.g. `RUST_LOG=timeline=debug`). The CLI logs
//! to stderr. The TUI owns the terminal, so it logs to a daily-rotated file
//! under the configured log directory instead.

use std::io::IsTerminal;
use std::path::Path;

use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// Log to stderr. Quiet unless `RUST_LOG` says otherwise.
pub fn init_cli() {
    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .with_filter(env_filter("warn"));

    let _ = tracing_subscriber::registry().with(layer).try_init();
}

/// Log to `<dir>/tl.log.<date>`. When there is no usable directory, logging
/// is disabled rather than written over the UI.
pub fn init_tui(dir: Option<&Path>) {
    let file_layer = dir.and_then(|dir| match std::fs::create_dir_all(dir) {
        Ok(()) => {
            let appender = tracing_appender::rolling::daily(dir, "tl.log");
            Some(
                fmt::layer()
                    .with_writer(appender)
                    .with_ansi(false)
                    .with_target(true)
                    .with_line_number(true)
                    .with_filter(env_filter("info")),
            )
        }
        Err(e) => {
            eprintln!("warning: could not create log dir {}: {}", dir.display(), e);
            None
        }
    });

    let _ = tracing_subscriber::registry().with(file_layer).try_init();
}
