//! qrlogo - QR codes with a logo in the middle
//!
//! Generates one PNG QR code per URL with a shared logo composited at the
//! center of every symbol.
//!
//! # Features
//!
//! - **Compositing**: fixed, centered logo placement on an opaque backdrop
//! - **Batching**: up to ten URLs per run, one bad URL never stops the rest
//! - **Verification**: optional scan-back of every artifact with `rqrr`
//! - **Async-first**: CPU work runs on Tokio's blocking pool
//!
//! # Example
//!
//! ```no_run
//! use qrlogo::{BatchRunner, DirectorySink, Logo, UrlList};
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let logo = Logo::load(Path::new("logo.png")).await?;
//!     let urls = UrlList::from_urls(["https://example.com", "https://example.org"])?;
//!
//!     let report = BatchRunner::default()
//!         .run(&logo, &urls, &DirectorySink::new("out"))
//!         .await?;
//!
//!     println!("{}", report.summary());
//!     Ok(())
//! }
//! ```

#![warn(missing_docs, rust_2024_compatibility)]

pub mod artifact;
pub mod batch;
pub mod compositor;
pub mod config;
pub mod error;
pub mod logging;
pub mod logo;
pub mod metrics;
pub mod output;
pub mod qr;

// Re-exports for convenience
pub use error::{Error, Result};

pub use artifact::{RenderedArtifact, artifact_file_name};
pub use batch::{
    ArtifactSink, BatchItem, BatchReport, BatchRunner, DirectorySink, ItemOutcome, MAX_URLS,
    MemorySink, UrlEntry, UrlList,
};
pub use compositor::{Compositor, LogoPlacement, RenderOptions};
pub use config::{LogRotation, LoggingOptions, MetricsFormat, OutputOptions, QrLogoConfig};
pub use logo::Logo;
pub use qr::{QrDecoder, QrEncoder, QrPayload};
pub use qrcode::EcLevel;

/// Render a single QR code with `logo` at its center using `options`.
///
/// Shorthand for building a [`Compositor`] and calling
/// [`Compositor::render_async`].
pub async fn render_qr_with_logo(
    payload: &str,
    logo: &Logo,
    options: Option<RenderOptions>,
) -> Result<RenderedArtifact> {
    let compositor = Compositor::new(options.unwrap_or_default())?;
    compositor.render_async(payload, logo).await
}
