//! Logging setup and the crate-wide tracing prelude.
//!
//! Modules pull the macros in with `use crate::tracing::prelude::*;` so the
//! logging vocabulary stays the same everywhere.

use std::env;

use time::macros::format_description;
use tracing_subscriber::{
    EnvFilter, Layer, fmt::time::LocalTime, layer::SubscriberExt, util::SubscriberInitExt,
};

pub mod prelude {
    pub use ::tracing::{debug, error, info, trace, warn};
}

/// Filter used when `RUST_LOG` is unset or unparsable.
const DEFAULT_FILTER: &str = "info";

/// Install the global subscriber.
///
/// Logs go to the systemd journal when stderr is connected to it (systemd
/// sets `JOURNAL_STREAM` for such services), otherwise to stderr with
/// local-time timestamps. Calling this twice is harmless; the second
/// install is ignored.
pub fn init() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    if env::var_os("JOURNAL_STREAM").is_some() {
        if let Ok(journald) = tracing_journald::layer() {
            let _ = tracing_subscriber::registry()
                .with(journald.with_filter(filter))
                .try_init();
            return;
        }
    }

    let timer = LocalTime::new(format_description!(
        "[year]-[month]-[day] [hour]:[minute]:[second].[subsecond digits:3]"
    ));
    let stderr = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_timer(timer)
        .with_target(false);

    let _ = tracing_subscriber::registry()
        .with(stderr.with_filter(filter))
        .try_init();
}
