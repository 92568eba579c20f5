#![forbid(unsafe_code)]

//! `tracing` subscriber setup.
//!
//! `RUST_LOG` wins when set. Otherwise release projects log at `info` and
//! everything else at `debug`. Lines carry the thread name so background
//! work started with [`spawn_background`](crate::dispatch::spawn_background)
//! is easy to tell apart from the UI thread.

use tracing_subscriber::EnvFilter;

use crate::config::RocketConfig;

/// Level used when `RUST_LOG` is unset.
#[must_use]
pub fn default_level(release: bool) -> &'static str {
    if release { "info" } else { "debug" }
}

/// Install the global subscriber. Returns `false` if one was already set.
pub fn init(config: &RocketConfig) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level(config.release)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_thread_names(true)
        .with_target(false)
        .try_init()
        .is_ok()
}
