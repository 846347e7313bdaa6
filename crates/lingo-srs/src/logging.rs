//! Tracing setup for binaries and tests that embed the scheduler.

use std::sync::Once;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable holding the log filter, e.g. `LINGO_SRS_LOG=lingo_srs=debug`.
pub const LOG_ENV: &str = "LINGO_SRS_LOG";

const DEFAULT_FILTER: &str = "lingo_srs=info";

static INIT: Once = Once::new();

/// Install a global fmt subscriber filtered by [`LOG_ENV`].
///
/// Safe to call more than once. If another subscriber is already
/// installed it is left in place.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        let _ = tracing_subscriber::registry()
            .with(fmt::layer().with_target(true))
            .with(filter)
            .try_init();
    });
}
