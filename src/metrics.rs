//! Lightweight render metrics aggregation
//!
//! Recording is a no-op until [`enable`] is called, so library users pay
//! nothing unless they opt in.

use crate::config::MetricsFormat;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::sync::{Mutex, OnceLock};
use std::time::{Duration, Instant};
use tracing::info;

static METRICS: OnceLock<Mutex<MetricsState>> = OnceLock::new();

/// Start aggregating render metrics for this process.
pub fn enable() {
    METRICS.get_or_init(|| Mutex::new(MetricsState::new()));
}

/// Whether [`enable`] has been called.
pub fn is_enabled() -> bool {
    METRICS.get().is_some()
}

/// Record the outcome of one render; `error_kind` labels failures.
pub fn record(duration: Duration, success: bool, error_kind: Option<&str>) {
    if let Some(state) = METRICS.get() {
        let mut state = state.lock().expect("metrics mutex poisoned");
        state.record(duration, success, error_kind);
    }
}

/// Record whether a rendered artifact scanned back to its payload.
pub fn record_verification(passed: bool) {
    if let Some(state) = METRICS.get() {
        let mut state = state.lock().expect("metrics mutex poisoned");
        if passed {
            state.verified += 1;
        } else {
            state.unverified += 1;
        }
    }
}

/// Current totals, or `None` when metrics are disabled.
pub fn snapshot() -> Option<Snapshot> {
    METRICS
        .get()
        .map(|state| state.lock().expect("metrics mutex poisoned").snapshot())
}

struct MetricsState {
    renders: u64,
    successes: u64,
    failures: u64,
    success_duration: Duration,
    max_duration: Duration,
    failures_by_kind: BTreeMap<String, u64>,
    verified: u64,
    unverified: u64,
    started: Instant,
}

impl MetricsState {
    fn new() -> Self {
        Self {
            renders: 0,
            successes: 0,
            failures: 0,
            success_duration: Duration::ZERO,
            max_duration: Duration::ZERO,
            failures_by_kind: BTreeMap::new(),
            verified: 0,
            unverified: 0,
            started: Instant::now(),
        }
    }

    fn record(&mut self, duration: Duration, success: bool, error_kind: Option<&str>) {
        self.renders += 1;
        if duration > self.max_duration {
            self.max_duration = duration;
        }
        if success {
            self.successes += 1;
            self.success_duration += duration;
        } else {
            self.failures += 1;
            let kind = error_kind.unwrap_or("unknown");
            *self.failures_by_kind.entry(kind.to_string()).or_default() += 1;
        }
    }

    fn snapshot(&self) -> Snapshot {
        let avg_render_ms = if self.successes == 0 {
            0.0
        } else {
            self.success_duration.as_secs_f64() * 1_000.0 / self.successes as f64
        };

        Snapshot {
            renders: self.renders,
            successes: self.successes,
            failures: self.failures,
            avg_render_ms,
            max_render_ms: self.max_duration.as_secs_f64() * 1_000.0,
            failures_by_kind: self.failures_by_kind.clone(),
            verified: self.verified,
            unverified: self.unverified,
            uptime_secs: self.started.elapsed().as_secs(),
        }
    }
}

/// Point-in-time copy of the aggregated metrics
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    /// Render attempts
    pub renders: u64,
    /// Successful renders
    pub successes: u64,
    /// Failed renders
    pub failures: u64,
    /// Mean duration of successful renders in milliseconds
    pub avg_render_ms: f64,
    /// Slowest render in milliseconds
    pub max_render_ms: f64,
    /// Failure counts keyed by error kind
    pub failures_by_kind: BTreeMap<String, u64>,
    /// Artifacts that scanned back to their payload
    pub verified: u64,
    /// Artifacts that did not
    pub unverified: u64,
    /// Seconds since metrics were enabled
    pub uptime_secs: u64,
}

impl Snapshot {
    /// Percentage of successful renders.
    pub fn success_rate(&self) -> f64 {
        if self.renders == 0 {
            0.0
        } else {
            self.successes as f64 / self.renders as f64 * 100.0
        }
    }
}

/// Emit the snapshot through `tracing`.
pub fn log_snapshot(snapshot: &Snapshot) {
    let success_rate = snapshot.success_rate();
    info!(
        target: "qrlogo::metrics",
        renders = snapshot.renders,
        success_count = snapshot.successes,
        failure_count = snapshot.failures,
        avg_render_ms = snapshot.avg_render_ms,
        max_render_ms = snapshot.max_render_ms,
        success_rate = format_args!("{success_rate:.1}%"),
        verified = snapshot.verified,
        unverified = snapshot.unverified,
        "Render metrics"
    );

    if !snapshot.failures_by_kind.is_empty() {
        let breakdown = snapshot
            .failures_by_kind
            .iter()
            .map(|(kind, count)| format!("{kind}: {count}"))
            .collect::<Vec<_>>()
            .join(", ");
        info!(target: "qrlogo::metrics", breakdown, "Failures by kind");
    }
}

/// Serialize a snapshot in the requested format.
pub fn render(snapshot: &Snapshot, format: MetricsFormat) -> String {
    match format {
        MetricsFormat::Json => serde_json::to_string_pretty(snapshot).unwrap_or_else(|_| "{}".into()),
        MetricsFormat::Prometheus => render_prometheus(snapshot),
    }
}

fn render_prometheus(snapshot: &Snapshot) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "# HELP qrlogo_renders_total Render attempts");
    let _ = writeln!(out, "# TYPE qrlogo_renders_total counter");
    let _ = writeln!(out, "qrlogo_renders_total {}", snapshot.renders);

    let _ = writeln!(out, "# HELP qrlogo_render_successes_total Successful renders");
    let _ = writeln!(out, "# TYPE qrlogo_render_successes_total counter");
    let _ = writeln!(out, "qrlogo_render_successes_total {}", snapshot.successes);

    let _ = writeln!(out, "# HELP qrlogo_render_failures_total Failed renders by error kind");
    let _ = writeln!(out, "# TYPE qrlogo_render_failures_total counter");
    if snapshot.failures_by_kind.is_empty() {
        let _ = writeln!(out, "qrlogo_render_failures_total 0");
    }
    for (kind, count) in &snapshot.failures_by_kind {
        let _ = writeln!(out, "qrlogo_render_failures_total{{kind=\"{kind}\"}} {count}");
    }

    let _ = writeln!(out, "# HELP qrlogo_render_avg_ms Mean successful render time");
    let _ = writeln!(out, "# TYPE qrlogo_render_avg_ms gauge");
    let _ = writeln!(out, "qrlogo_render_avg_ms {:.3}", snapshot.avg_render_ms);

    let _ = writeln!(out, "# HELP qrlogo_render_max_ms Slowest render");
    let _ = writeln!(out, "# TYPE qrlogo_render_max_ms gauge");
    let _ = writeln!(out, "qrlogo_render_max_ms {:.3}", snapshot.max_render_ms);

    let _ = writeln!(out, "# HELP qrlogo_verifications_total Scan-back checks by result");
    let _ = writeln!(out, "# TYPE qrlogo_verifications_total counter");
    let _ = writeln!(out, "qrlogo_verifications_total{{result=\"pass\"}} {}", snapshot.verified);
    let _ = writeln!(out, "qrlogo_verifications_total{{result=\"fail\"}} {}", snapshot.unverified);

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_counts_failures_by_kind() {
        let mut state = MetricsState::new();
        state.record(Duration::from_millis(10), true, None);
        state.record(Duration::from_millis(30), true, None);
        state.record(Duration::from_millis(1), false, Some("encoding"));

        let snapshot = state.snapshot();
        assert_eq!(snapshot.renders, 3);
        assert_eq!(snapshot.successes, 2);
        assert_eq!(snapshot.failures_by_kind.get("encoding"), Some(&1));
        assert!((snapshot.avg_render_ms - 20.0).abs() < 0.5);
        assert!((snapshot.max_render_ms - 30.0).abs() < 0.5);
    }

    #[test]
    fn test_success_rate_without_renders() {
        assert_eq!(MetricsState::new().snapshot().success_rate(), 0.0);
    }
}
