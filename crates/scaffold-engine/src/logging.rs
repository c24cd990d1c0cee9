//! Structured logging setup
//!
//! Installs a `tracing-subscriber` registry with an `EnvFilter` and either a
//! human-readable or JSON formatter. Output goes to stderr so command output
//! on stdout stays machine-readable.
//!
//! Environment:
//! - `SCAFFOLD_LOG_LEVEL`: engine log level (trace, debug, info, warn, error)
//! - `SCAFFOLD_LOG_JSON`: `true` for JSON lines
//! - `RUST_LOG`: standard filter directives, applied on top

use std::env;
use std::sync::Once;
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const LOG_LEVEL_ENV: &str = "SCAFFOLD_LOG_LEVEL";
pub const LOG_JSON_ENV: &str = "SCAFFOLD_LOG_JSON";

static INIT: Once = Once::new();

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Minimum level for the engine and CLI targets
    pub level: Level,
    pub use_json: bool,
    pub include_target: bool,
    /// Include file and line number
    pub include_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::WARN,
            use_json: false,
            include_target: false,
            include_location: false,
        }
    }
}

impl LoggingConfig {
    pub fn with_level(level: Level) -> Self {
        Self {
            level,
            ..Default::default()
        }
    }

    /// Defaults overridden by `SCAFFOLD_LOG_LEVEL` and `SCAFFOLD_LOG_JSON`
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(level) = env::var(LOG_LEVEL_ENV) {
            config.level = parse_level(&level);
        }
        if let Some(use_json) = env::var(LOG_JSON_ENV).ok().and_then(|v| v.parse::<bool>().ok()) {
            config.use_json = use_json;
        }
        config
    }
}

/// Parse a level name (case-insensitive), falling back to WARN
pub fn parse_level(level: &str) -> Level {
    match level.trim().to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" | "warning" => Level::WARN,
        "error" => Level::ERROR,
        _ => {
            eprintln!(
                "Invalid log level '{}', defaulting to WARN. Valid levels: trace, debug, info, warn, error",
                level
            );
            Level::WARN
        }
    }
}

fn build_filter(level: Level) -> EnvFilter {
    let mut filter = EnvFilter::from_default_env();
    for target in ["scaffold_engine", "scaffold"] {
        if let Ok(directive) = format!("{}={}", target, level).parse() {
            filter = filter.add_directive(directive);
        }
    }
    filter
}

/// Install the global subscriber. Only the first call has any effect.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let filter = build_filter(config.level);
        let layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(config.include_target)
            .with_file(config.include_location)
            .with_line_number(config.include_location);

        // try_init: a subscriber installed elsewhere (tests, embedding hosts) wins
        let result = if config.use_json {
            tracing_subscriber::registry()
                .with(filter)
                .with(layer.json())
                .try_init()
        } else {
            tracing_subscriber::registry().with(filter).with(layer).try_init()
        };
        if let Err(e) = result {
            eprintln!("Logging already initialised: {}", e);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("debug"), Level::DEBUG);
        assert_eq!(parse_level(" INFO "), Level::INFO);
        assert_eq!(parse_level("warning"), Level::WARN);
        assert_eq!(parse_level("loud"), Level::WARN);
    }

    #[test]
    fn test_default_is_quiet() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, Level::WARN);
        assert!(!config.use_json);
    }
}
