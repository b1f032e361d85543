//! Structured Logging Configuration
//!
//! - JSON output for log aggregation (`LOG_FORMAT=json`)
//! - Human-readable output for development (default)
//!
//! # Usage
//!
//! ```rust,ignore
//! idm_common::logging::init_logging("idm-server");
//! tracing::info!(owner_id = %id, "Entry approved");
//! ```
//!
//! # Environment Variables
//!
//! - `LOG_FORMAT`: `json` for JSON output, anything else for text (default: text)
//! - `RUST_LOG`: level filter (default: info), e.g. `RUST_LOG=idm_core=debug`

use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Text,
}

impl LogFormat {
    /// Parse the `LOG_FORMAT` value; unknown values fall back to text.
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("json") {
            Self::Json
        } else {
            Self::Text
        }
    }

    pub fn from_env() -> Self {
        Self::parse(&std::env::var("LOG_FORMAT").unwrap_or_default())
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initialize the global subscriber for the given service.
///
/// Calling this twice in one process is harmless: the second call leaves the
/// first subscriber in place.
pub fn init_logging(service_name: &str) {
    let format = LogFormat::from_env();
    let installed = match format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(env_filter())
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_target(true)
                    .flatten_event(true)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .try_init()
            .is_ok(),
        LogFormat::Text => tracing_subscriber::registry()
            .with(env_filter())
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_ansi(true),
            )
            .try_init()
            .is_ok(),
    };

    if installed {
        tracing::debug!(service = service_name, ?format, "Logging initialized");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_parse() {
        assert_eq!(LogFormat::parse("json"), LogFormat::Json);
        assert_eq!(LogFormat::parse(" JSON "), LogFormat::Json);
        assert_eq!(LogFormat::parse("pretty"), LogFormat::Text);
        assert_eq!(LogFormat::parse(""), LogFormat::Text);
    }

    #[test]
    fn test_init_twice_does_not_panic() {
        init_logging("test");
        init_logging("test");
    }
}
