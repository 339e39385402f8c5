//! Structured logging setup using the `tracing` ecosystem.
//!
//! Configures a `tracing-subscriber` with either JSON output or
//! pretty-printed output. Format is auto-detected from the terminal
//! (a dev proxy usually runs in one, so pretty is the common case) but
//! can be forced via `--json` or `--pretty`.

use tracing_subscriber::filter::Targets;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::LogLevel;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

#[must_use]
pub fn resolve_format(pretty: bool, json: bool) -> LogFormat {
    if json {
        LogFormat::Json
    } else if pretty || std::io::IsTerminal::is_terminal(&std::io::stdout()) {
        LogFormat::Pretty
    } else {
        LogFormat::Json
    }
}

/// Our own events at `level`; dependencies one notch quieter so
/// hyper's connection chatter stays out of `debug`.
fn targets(level: &LogLevel) -> Targets {
    let ours = level.to_tracing_level();
    let deps = match level {
        LogLevel::Trace => tracing::Level::DEBUG,
        LogLevel::Debug | LogLevel::Info => tracing::Level::INFO,
        LogLevel::Warn => tracing::Level::WARN,
        LogLevel::Error => tracing::Level::ERROR,
    };
    Targets::new()
        .with_default(deps)
        .with_target(env!("CARGO_CRATE_NAME"), ours)
        .with_target("tower_http", ours)
}

pub fn init(level: &LogLevel, format: LogFormat) {
    let filter = targets(level);

    match format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().json().with_target(false))
                .init();
        }
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().compact())
                .init();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_flag_wins() {
        assert_eq!(resolve_format(false, true), LogFormat::Json);
    }

    #[test]
    fn pretty_flag_forces_pretty() {
        assert_eq!(resolve_format(true, false), LogFormat::Pretty);
    }

    #[test]
    fn dependencies_are_quieter_at_debug() {
        let filter = targets(&LogLevel::Debug);
        assert!(filter.would_enable(env!("CARGO_CRATE_NAME"), &tracing::Level::DEBUG));
        assert!(!filter.would_enable("hyper_util", &tracing::Level::DEBUG));
        assert!(filter.would_enable("hyper_util", &tracing::Level::INFO));
    }
}
