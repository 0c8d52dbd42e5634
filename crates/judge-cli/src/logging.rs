//! Diagnostic logging for the CLI.
//!
//! Everything goes to stderr; stdout carries command output only, so
//! `--json` results can be piped.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Default filter for a `-v` count. `RUST_LOG` overrides it.
fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "judgegate=info,judge=info,warn",
        2 => "judgegate=debug,judgegate_http=debug,judgegate_file=debug,judge=debug,info",
        _ => "trace",
    }
}

pub fn init(verbosity: u8, json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    let json_layer = json.then(|| fmt::layer().json().with_writer(std::io::stderr));
    let text_layer = (!json).then(|| {
        fmt::layer()
            .with_target(verbosity >= 2)
            .with_writer(std::io::stderr)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(text_layer)
        .init();
}
