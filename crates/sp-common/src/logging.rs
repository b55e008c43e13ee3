//! Structured Logging Configuration
//!
//! Two output modes:
//! - `LogFormat::Json` for log aggregation (one JSON object per event)
//! - `LogFormat::Text` for local development (default)
//!
//! `RUST_LOG` always wins over the configured default level, so
//! `RUST_LOG=sp_identity=debug` works regardless of the config file.
//!
//! # Usage
//!
//! ```rust,ignore
//! use sp_common::logging::{init_logging, LogFormat};
//!
//! fn main() {
//!     init_logging("sp-replay", LogFormat::Text, "info");
//!     tracing::info!(root_id = %id, "Replayed end user");
//! }
//! ```

use std::str::FromStr;

use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "text" | "" => Ok(Self::Text),
            other => Err(format!("unknown log format '{}'", other)),
        }
    }
}

/// Build the level filter: `RUST_LOG` if set, otherwise `default_level`.
pub fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Initialize the global subscriber.
///
/// Returns `false` when a subscriber was already installed (tests and
/// embedding binaries may call this more than once).
pub fn init_logging(service_name: &str, format: LogFormat, default_level: &str) -> bool {
    let filter = env_filter(default_level);

    let installed = match format {
        LogFormat::Json => init_json_logging(filter),
        LogFormat::Text => init_text_logging(filter),
    };

    if installed {
        tracing::debug!(service = service_name, ?format, "Logging initialized");
    }
    installed
}

fn init_json_logging(env_filter: EnvFilter) -> bool {
    tracing_subscriber::registry()
        .with(env_filter)
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
        .is_ok()
}

fn init_text_logging(env_filter: EnvFilter) -> bool {
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .with_ansi(true),
        )
        .try_init()
        .is_ok()
}
