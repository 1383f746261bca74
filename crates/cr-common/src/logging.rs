//! Structured Logging Configuration
//!
//! - JSON output when `LOG_FORMAT=json`
//! - Human-readable output otherwise
//! - `RUST_LOG` filter, defaulting to `info`
//! - Both formats write to stderr; stdout is reserved for command output
//!
//! # Usage
//!
//! ```rust,ignore
//! use cr_common::logging::init_logging;
//!
//! fn main() {
//!     init_logging("cr-roles");
//!     tracing::info!(region = "us-east-1", "Creating IAM client");
//! }
//! ```
//!
//! Library components never install a subscriber. Each one owns a span and
//! logs inside it, so whatever subscriber the caller installed (or a scoped
//! one in tests) receives the events with the component's context attached.

use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// Initialize logging for the given service.
///
/// Reads `LOG_FORMAT` ("json" or text) and `RUST_LOG` (defaults to INFO).
pub fn init_logging(service_name: &str) {
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_default();

    let env_filter = default_env_filter();

    if log_format.eq_ignore_ascii_case("json") {
        init_json_logging(env_filter);
    } else {
        init_text_logging(env_filter);
    }

    tracing::debug!(service = service_name, "Logging initialized");
}

fn default_env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// JSON logging for log aggregation.
fn init_json_logging(env_filter: EnvFilter) {
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_current_span(true)
                .with_span_list(true)
                .with_file(true)
                .with_line_number(true)
                .with_target(true)
                .flatten_event(true)
                .with_span_events(FmtSpan::CLOSE),
        )
        .init();
}

/// Text logging for terminals.
fn init_text_logging(env_filter: EnvFilter) {
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .with_ansi(true),
        )
        .init();
}
