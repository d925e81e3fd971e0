//! Diagnostic logging.
//!
//! Structured logs go through `tracing` to stderr so they never mix with
//! listing output. The filter is read from `RUST_LOG`, defaulting to `warn`.

use std::io::IsTerminal;
use tracing::Subscriber;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_FILTER: &str = "warn";

/// Install the global subscriber writing to stderr. Colours are only used
/// when stderr is a terminal. A subscriber that is already installed is left
/// in place.
pub fn init() {
    let ansi = std::io::stderr().is_terminal();
    let _ = subscriber(std::io::stderr, env_filter(), ansi).try_init();
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

fn subscriber<W>(writer: W, filter: EnvFilter, ansi: bool) -> impl Subscriber + Send + Sync + 'static
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(ansi)
        .with_target(false)
        .finish()
}
