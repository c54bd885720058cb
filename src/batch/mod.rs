//! Sequential batch generation
//!
//! A batch renders one artifact per non-blank URL with a shared logo and
//! hands each to an [`ArtifactSink`] before starting the next. Encoding
//! problems with a single URL are recorded and skipped; anything that would
//! fail every URL the same way aborts the batch.

mod sink;
mod urls;

pub use sink::{ArtifactSink, DirectorySink, MemorySink};
pub use urls::{MAX_URLS, UrlEntry, UrlList};

use crate::compositor::Compositor;
use crate::error::{Error, Result};
use crate::logo::Logo;
use crate::metrics;
use crate::qr::QrDecoder;
use bytes::Bytes;
use serde::Serialize;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// What happened to one URL of a batch
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ItemOutcome {
    /// Rendered and handed to the sink
    Delivered {
        /// Name the artifact was delivered under
        file_name: String,
        /// Size of the PNG encoding
        png_bytes: usize,
        /// Whether the artifact decoded back to its URL; `None` when not checked
        verified: Option<bool>,
    },
    /// Skipped after a per-URL error
    Skipped {
        /// Error category
        error_kind: &'static str,
        /// Error message
        error: String,
    },
}

/// One URL and its outcome
#[derive(Debug, Clone, Serialize)]
pub struct BatchItem {
    /// 1-based position among the non-blank URLs
    pub index: usize,
    /// URL as encoded
    pub url: String,
    /// Outcome
    #[serde(flatten)]
    pub outcome: ItemOutcome,
}

impl BatchItem {
    /// Whether the item was delivered.
    pub fn is_delivered(&self) -> bool {
        matches!(self.outcome, ItemOutcome::Delivered { .. })
    }
}

/// Aggregate result of a batch
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    /// Per-URL outcomes in batch order
    pub items: Vec<BatchItem>,
    /// Wall time for the whole batch
    #[serde(serialize_with = "serialize_millis")]
    pub elapsed: Duration,
}

impl BatchReport {
    /// Number of delivered artifacts
    pub fn succeeded(&self) -> usize {
        self.items.iter().filter(|item| item.is_delivered()).count()
    }

    /// Number of skipped URLs
    pub fn failed(&self) -> usize {
        self.items.len() - self.succeeded()
    }

    /// One-line outcome naming how many codes were generated.
    pub fn summary(&self) -> String {
        let succeeded = self.succeeded();
        let noun = if succeeded == 1 { "QR code" } else { "QR codes" };
        match self.failed() {
            0 => format!("{succeeded} {noun} generated"),
            failed => format!("{succeeded} {noun} generated, {failed} skipped"),
        }
    }
}

fn serialize_millis<S>(duration: &Duration, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_f64(duration.as_secs_f64() * 1_000.0)
}

/// Drives a compositor over a URL list.
#[derive(Debug, Clone, Default)]
pub struct BatchRunner {
    compositor: Compositor,
    verify: bool,
}

impl BatchRunner {
    /// Runner rendering with `compositor`
    pub fn new(compositor: Compositor) -> Self {
        Self {
            compositor,
            verify: false,
        }
    }

    /// Decode every artifact after rendering and report whether it scans.
    pub fn with_verification(mut self, verify: bool) -> Self {
        self.verify = verify;
        self
    }

    /// Compositor used for every item
    pub fn compositor(&self) -> &Compositor {
        &self.compositor
    }

    /// Decode `logo_bytes` once, then run the batch.
    pub async fn run_with_logo_bytes(
        &self,
        logo_bytes: Bytes,
        urls: &UrlList,
        sink: &dyn ArtifactSink,
    ) -> Result<BatchReport> {
        let logo = Logo::decode_async(logo_bytes).await?;
        self.run(&logo, urls, sink).await
    }

    /// Render and deliver one artifact per non-blank URL, strictly in order.
    pub async fn run(
        &self,
        logo: &Logo,
        urls: &UrlList,
        sink: &dyn ArtifactSink,
    ) -> Result<BatchReport> {
        let valid = urls.valid_urls();
        if valid.is_empty() {
            return Err(Error::NoValidUrls);
        }

        let started = Instant::now();
        info!(count = valid.len(), verify = self.verify, "Starting QR batch");

        let mut items = Vec::with_capacity(valid.len());
        for (position, url) in valid.into_iter().enumerate() {
            let index = position + 1;
            let item_started = Instant::now();

            let artifact = match self.compositor.render_async(&url, logo).await {
                Ok(artifact) => artifact.numbered(index),
                Err(err) if !err.is_fatal_for_batch() => {
                    metrics::record(item_started.elapsed(), false, Some(err.kind()));
                    warn!(index, url = %url, error = %err, "Skipping URL");
                    items.push(BatchItem {
                        index,
                        url,
                        outcome: ItemOutcome::Skipped {
                            error_kind: err.kind(),
                            error: err.to_string(),
                        },
                    });
                    continue;
                }
                Err(err) => {
                    metrics::record(item_started.elapsed(), false, Some(err.kind()));
                    return Err(err);
                }
            };

            let verified = if self.verify {
                Some(verify_artifact(&artifact).await)
            } else {
                None
            };

            sink.deliver(&artifact, &artifact.suggested_name).await?;
            metrics::record(item_started.elapsed(), true, None);

            items.push(BatchItem {
                index,
                url,
                outcome: ItemOutcome::Delivered {
                    file_name: artifact.suggested_name.clone(),
                    png_bytes: artifact.png.len(),
                    verified,
                },
            });
        }

        let report = BatchReport {
            items,
            elapsed: started.elapsed(),
        };

        info!(
            succeeded = report.succeeded(),
            failed = report.failed(),
            elapsed_ms = report.elapsed.as_secs_f64() * 1_000.0,
            "{}",
            report.summary()
        );

        Ok(report)
    }
}

async fn verify_artifact(artifact: &crate::artifact::RenderedArtifact) -> bool {
    let gray = image::imageops::grayscale(&artifact.image);
    let expected = artifact.payload.clone();

    let outcome = tokio::task::spawn_blocking(move || {
        QrDecoder::new()
            .decode_gray(gray)
            .map(|decoded| decoded.as_str() == Some(expected.as_str()))
    })
    .await;

    let verified = match outcome {
        Ok(Ok(matches)) => {
            if !matches {
                warn!(file = %artifact.suggested_name, "QR code decodes to a different payload");
            }
            matches
        }
        Ok(Err(err)) => {
            warn!(file = %artifact.suggested_name, error = %err, "QR code did not scan back");
            false
        }
        Err(err) => {
            warn!(error = %err, "Verification task failed");
            false
        }
    };

    metrics::record_verification(verified);
    verified
}
