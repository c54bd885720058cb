//! Helpers for rendering batch results for terminals and downstream tools

use crate::batch::{BatchReport, ItemOutcome};
use crate::metrics::Snapshot;
use serde_json::{Value, json};

/// Combined structured and human-readable representation of a batch
#[derive(Debug, Clone)]
pub struct RenderedReport {
    /// Structured JSON representation suitable for downstream consumers
    pub json: Value,
    /// Human-readable lines for terminal presentation
    pub human: Vec<String>,
}

/// Render a batch report into both JSON and human-readable forms.
pub fn render_batch_report(report: &BatchReport, metrics: Option<&Snapshot>) -> RenderedReport {
    let mut json = json!({
        "summary": report.summary(),
        "succeeded": report.succeeded(),
        "failed": report.failed(),
        "elapsed_ms": report.elapsed.as_secs_f64() * 1_000.0,
        "items": report.items,
    });

    if let (Some(snapshot), Some(root)) = (metrics, json.as_object_mut()) {
        root.insert(
            "metrics".to_string(),
            serde_json::to_value(snapshot).unwrap_or(Value::Null),
        );
    }

    let mut human = Vec::with_capacity(report.items.len() + 1);
    for item in &report.items {
        human.push(match &item.outcome {
            ItemOutcome::Delivered {
                file_name,
                png_bytes,
                verified,
            } => format!(
                "  [{}] {} -> {} ({} bytes){}",
                item.index,
                item.url,
                file_name,
                png_bytes,
                verification_label(*verified)
            ),
            ItemOutcome::Skipped { error, .. } => {
                format!("  [{}] {} skipped: {}", item.index, item.url, error)
            }
        });
    }
    human.push(report.summary());

    RenderedReport { json, human }
}

fn verification_label(verified: Option<bool>) -> &'static str {
    match verified {
        Some(true) => ", scan verified",
        Some(false) => ", did not scan back",
        None => "",
    }
}
