//! Process-wide structured logging, initialized exactly once before any
//! tenant builder runs.

use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber. Safe to call once; a second call
/// is a caller bug and panics, matching `tracing`'s own global-dispatch
/// contract.
pub fn init(log_level: &str) {
    let filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(atty_is_terminal())
        .init();
}

fn atty_is_terminal() -> bool {
    std::io::IsTerminal::is_terminal(&std::io::stdout())
}
