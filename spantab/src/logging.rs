//! Diagnostic output setup.
//!
//! Diagnostics always go to stderr so that stdout carries nothing but the
//! rendered document.

use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Filter directives used when `RUST_LOG` is unset.
pub const DEFAULT_DIRECTIVES: &str = "info,spantab=debug";

/// Installs the global subscriber, pretty-printed or as JSON lines.
///
/// `directives` is used unless `RUST_LOG` holds a valid filter.
pub fn setup_logging(directives: &str, pretty: bool) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives));

    if pretty {
        let main_layer = tracing_subscriber::fmt::layer()
            .pretty()
            .with_writer(std::io::stderr)
            .with_timer(UtcTime::rfc_3339());

        tracing_subscriber::registry()
            .with(env_filter)
            .with(main_layer)
            .init()
    } else {
        let main_layer = tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_target(false)
            .with_current_span(true)
            .with_span_list(true)
            .with_line_number(true)
            .with_file(true)
            .with_writer(std::io::stderr)
            .with_timer(UtcTime::rfc_3339());

        tracing_subscriber::registry()
            .with(env_filter)
            .with(main_layer)
            .init()
    }
}
