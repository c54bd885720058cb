//! Logo loading
//!
//! The logo is decoded once and shared by every render of a batch, so a
//! corrupt file is reported a single time before any QR code is produced.

use crate::error::{Error, Result};
use bytes::Bytes;
use image::DynamicImage;
use std::path::Path;
use std::sync::Arc;

/// Decoded logo bitmap, cheap to clone.
#[derive(Debug, Clone)]
pub struct Logo {
    image: Arc<DynamicImage>,
}

impl Logo {
    /// Decode logo bytes in any format the `image` crate recognises.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        if bytes.is_empty() {
            return Err(Error::ImageDecode("logo file is empty".to_string()));
        }

        let image = image::load_from_memory(bytes).map_err(|e| Error::ImageDecode(e.to_string()))?;

        if image.width() == 0 || image.height() == 0 {
            return Err(Error::ImageDecode("logo has no pixels".to_string()));
        }

        tracing::debug!(
            width = image.width(),
            height = image.height(),
            color = ?image.color(),
            "Decoded logo"
        );

        Ok(Self::from_image(image))
    }

    /// Decode logo bytes on the blocking pool.
    pub async fn decode_async(bytes: Bytes) -> Result<Self> {
        tokio::task::spawn_blocking(move || Self::decode(&bytes)).await?
    }

    /// Read and decode a logo file.
    pub async fn load(path: &Path) -> Result<Self> {
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            Error::ImageDecode(format!("Failed to read logo {}: {e}", path.display()))
        })?;

        tracing::info!(path = %path.display(), bytes = bytes.len(), "Loading logo");
        Self::decode_async(Bytes::from(bytes)).await
    }

    /// Wrap an already decoded bitmap.
    pub fn from_image(image: DynamicImage) -> Self {
        Self {
            image: Arc::new(image),
        }
    }

    /// Borrow the decoded bitmap.
    pub fn image(&self) -> &DynamicImage {
        &self.image
    }

    /// Source dimensions `(width, height)`.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.image.width(), self.image.height())
    }
}
