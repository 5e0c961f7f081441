//! Tracing/logging initialization.

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use crate::config::{LOG_LEVEL_ENV, LogFormat, ObservabilityConfig};

/// Initialize tracing/logging for the process.
///
/// Safe to call multiple times (subsequent calls are no-ops). A filter that
/// does not parse falls back to `info` rather than leaving logging off.
pub fn init(config: &ObservabilityConfig) {
    let _ = try_init(config);
}

/// Like [`init`], but reports why installation failed (usually because a
/// subscriber is already installed).
///
/// Rejected filter directives are reported as warnings once the subscriber
/// is up.
pub fn try_init(config: &ObservabilityConfig) -> anyhow::Result<()> {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let (filter, rejected) = select_filter(rust_log.as_deref(), &config.default_filter);

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(tracing_subscriber::fmt::time::SystemTime);

    // JSON logs + timestamps by default; RUST_LOG overrides the filter.
    match config.format {
        LogFormat::Json => builder
            .json()
            .with_target(false)
            .try_init()
            .map_err(|e| anyhow::anyhow!("{e}"))
            .context("installing json subscriber")?,
        LogFormat::Pretty => builder
            .pretty()
            .try_init()
            .map_err(|e| anyhow::anyhow!("{e}"))
            .context("installing pretty subscriber")?,
    }

    for RejectedFilter { source, directives, error } in rejected {
        ::tracing::warn!(
            source,
            directives = %directives,
            %error,
            "ignoring invalid log filter"
        );
    }
    Ok(())
}

/// A filter string that failed to parse.
#[derive(Debug)]
struct RejectedFilter {
    source: &'static str,
    directives: String,
    error: String,
}

/// `RUST_LOG` first, then the configured default, then plain `info`.
fn select_filter(
    rust_log: Option<&str>,
    default_filter: &str,
) -> (EnvFilter, Vec<RejectedFilter>) {
    let mut rejected = Vec::new();
    let candidates = rust_log
        .map(|d| (EnvFilter::DEFAULT_ENV, d))
        .into_iter()
        .chain(std::iter::once((LOG_LEVEL_ENV, default_filter)));

    for (source, directives) in candidates {
        match EnvFilter::try_new(directives) {
            Ok(filter) => return (filter, rejected),
            Err(e) => rejected.push(RejectedFilter {
                source,
                directives: directives.to_string(),
                error: e.to_string(),
            }),
        }
    }
    (EnvFilter::new(FALLBACK_FILTER), rejected)
}

const FALLBACK_FILTER: &str = "info";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_init_is_harmless() {
        let config = ObservabilityConfig::default();
        init(&config);
        init(&config);
        // A second install always reports the existing subscriber.
        assert!(try_init(&config).is_err());
    }

    #[test]
    fn bad_default_filter_falls_back_to_info() {
        let (filter, rejected) = select_filter(None, "learnhub_auth=notalevel");
        assert_eq!(filter.to_string(), "info");
        assert_eq!(rejected.len(), 1);
        assert_eq!(rejected[0].source, LOG_LEVEL_ENV);
        assert_eq!(rejected[0].directives, "learnhub_auth=notalevel");
    }

    #[test]
    fn bad_rust_log_falls_back_to_configured_default() {
        let (filter, rejected) = select_filter(Some("learnhub_core=bogus"), "learnhub_auth=debug");
        assert_eq!(filter.to_string(), "learnhub_auth=debug");
        assert_eq!(rejected.len(), 1);
        assert_eq!(rejected[0].source, "RUST_LOG");
    }

    #[test]
    fn valid_rust_log_wins() {
        let (filter, rejected) = select_filter(Some("warn"), "learnhub_auth=notalevel");
        assert_eq!(filter.to_string(), "warn");
        assert!(rejected.is_empty());
    }

    #[test]
    fn init_with_bad_filter_still_installs_a_subscriber() {
        let config = ObservabilityConfig {
            default_filter: "learnhub_auth=notalevel".to_string(),
            ..ObservabilityConfig::default()
        };
        init(&config);
        // Whichever test installed first, a subscriber is now in place.
        assert!(try_init(&ObservabilityConfig::default()).is_err());
    }
}
