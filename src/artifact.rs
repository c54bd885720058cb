//! Rendered QR artifacts handed from the compositor to delivery

use bytes::Bytes;
use image::RgbaImage;

/// Name used for an artifact that has not been numbered by a batch.
pub const DEFAULT_ARTIFACT_NAME: &str = "qr-code.png";

/// Suggested file name for the `index`-th (1-based) artifact of a batch.
pub fn artifact_file_name(index: usize) -> String {
    format!("qr-code-{index}.png")
}

/// One composited QR code: the raster, its PNG encoding and a file name.
#[derive(Debug, Clone)]
pub struct RenderedArtifact {
    /// Text encoded in the symbol
    pub payload: String,
    /// Composited RGBA raster
    pub image: RgbaImage,
    /// PNG encoding of `image`
    pub png: Bytes,
    /// Suggested file name for delivery
    pub suggested_name: String,
}

impl RenderedArtifact {
    /// Rename the artifact for its position in a batch.
    pub fn numbered(mut self, index: usize) -> Self {
        self.suggested_name = artifact_file_name(index);
        self
    }
}
