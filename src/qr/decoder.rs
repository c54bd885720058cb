//! QR code decoder using rqrr, used to verify rendered artifacts

use crate::error::{Error, Result};
use crate::qr::QrPayload;
use image::{DynamicImage, GrayImage};

/// QR code decoder
#[derive(Debug, Default, Clone, Copy)]
pub struct QrDecoder;

impl QrDecoder {
    /// Create a new QR decoder with default settings
    pub fn new() -> Self {
        Self
    }

    /// Decode a QR code from an image
    pub fn decode(&self, img: &DynamicImage) -> Result<QrPayload> {
        self.decode_gray(img.to_luma8())
    }

    /// Decode a QR code from a grayscale image
    pub fn decode_gray(&self, img: GrayImage) -> Result<QrPayload> {
        let mut prepared = rqrr::PreparedImage::prepare(img);
        let grids = prepared.detect_grids();

        // Take the first grid that decodes
        let mut last_error = None;
        for grid in grids {
            match grid.decode() {
                Ok((meta, content)) => {
                    tracing::debug!(
                        "Decoded QR: version={:?}, ecc_level={:?}, length={}",
                        meta.version,
                        meta.ecc_level,
                        content.len()
                    );
                    return Ok(QrPayload::from_string(content));
                }
                Err(e) => last_error = Some(e),
            }
        }

        match last_error {
            Some(e) => Err(Error::QrDecode(format!("Decode failed: {:?}", e))),
            None => Err(Error::NoQrCodeFound),
        }
    }

    /// Check that `img` decodes to exactly `expected`.
    pub fn verify(&self, img: &DynamicImage, expected: &str) -> Result<bool> {
        let payload = self.decode(img)?;
        Ok(payload.as_str() == Some(expected))
    }
}
