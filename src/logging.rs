//! Tracing initialization.
//!
//! Internal events go to stderr so they never mix with report output on
//! stdout, or with the MCP transport when serving.

use std::{io, sync::Once};

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Environment variable holding the filter directives, e.g.
/// `SQLID_LOG=sqlid::core::scanner=debug`.
pub const LOG_ENV: &str = "SQLID_LOG";

static INIT: Once = Once::new();

/// Install the global subscriber.
///
/// `SQLID_LOG` wins when set and valid. Otherwise the level is `warn`, or
/// `debug` with `verbose`. Calling this more than once is a no-op.
pub fn init_tracing(verbose: bool) {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV)
            .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

        // Fails only if another subscriber is already installed.
        let _ = tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(io::stderr)
                    .with_target(true)
                    .with_thread_names(true),
            )
            .with(filter)
            .try_init();
    });
}

fn default_directive(verbose: bool) -> &'static str {
    if verbose { "sqlid=debug" } else { "sqlid=warn" }
}
