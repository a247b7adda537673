//! Dependency and exception telemetry.
//!
//! Events are plain `tracing` events under the `telemetry` target, so any
//! subscriber (JSON logs, an exporter layer) can pick them up. Nothing here
//! affects control flow.

use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};

/// Record one outbound call.
pub fn record_dependency(operation: &str, target: &str, started_at: DateTime<Utc>, elapsed: Duration, success: bool) {
    tracing::info!(
        target: "telemetry",
        kind = "dependency",
        operation,
        dependency_target = target,
        started_at = %started_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        duration_ms = elapsed.as_millis() as u64,
        success,
        "dependency call"
    );
}

/// Record a failure swallowed during resolution.
pub fn record_exception(operation: &str, error: &dyn std::error::Error) {
    tracing::warn!(
        target: "telemetry",
        kind = "exception",
        operation,
        error = %error,
        "resolution failed"
    );
}
