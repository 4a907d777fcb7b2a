//! Opt-in log output for applications that have no subscriber of their own.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Environment variable read by [`init_tracing`].
pub const LOG_ENV: &str = "MERIDIAN_LOG";

const LOG_TARGETS: [&str; 2] = ["meridian_sdk", "meridian_core"];

/// Install a stderr subscriber for the client's `tracing` events.
///
/// `MERIDIAN_LOG` is either a plain level ("trace", "debug", "info", "warn",
/// "error") applied to the client crates, or a full filter spec such as
/// `meridian_sdk=debug,reqwest=warn`. Calling this twice, or after another
/// subscriber was installed, only prints a warning.
pub fn init_tracing() {
    let filter = filter_spec(std::env::var(LOG_ENV).ok().as_deref());

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .with_file(true)
        .with_filter(EnvFilter::new(filter));

    if tracing_subscriber::registry()
        .with(fmt_layer)
        .try_init()
        .is_err()
    {
        eprintln!("Warning: tracing subscriber already initialized");
    }
}

fn filter_spec(value: Option<&str>) -> String {
    match value {
        Some(level) if is_plain_level(level) => directives(&level.to_ascii_lowercase()),
        Some(spec) if !spec.trim().is_empty() => spec.to_string(),
        _ => directives("info"),
    }
}

fn directives(level: &str) -> String {
    LOG_TARGETS
        .iter()
        .map(|target| format!("{target}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

fn is_plain_level(s: &str) -> bool {
    matches!(
        s.to_ascii_lowercase().as_str(),
        "trace" | "debug" | "info" | "warn" | "error"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_level_targets_client_crates() {
        assert_eq!(
            filter_spec(Some("DEBUG")),
            "meridian_sdk=debug,meridian_core=debug"
        );
    }

    #[test]
    fn test_full_spec_passes_through() {
        assert_eq!(
            filter_spec(Some("meridian_sdk=trace,reqwest=warn")),
            "meridian_sdk=trace,reqwest=warn"
        );
    }

    #[test]
    fn test_default_is_info() {
        assert_eq!(filter_spec(None), "meridian_sdk=info,meridian_core=info");
        assert_eq!(filter_spec(Some("  ")), "meridian_sdk=info,meridian_core=info");
    }

    #[test]
    fn test_repeated_init_does_not_fail() {
        init_tracing();
        init_tracing();
    }
}
