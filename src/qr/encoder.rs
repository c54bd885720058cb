//! QR matrix encoder

use crate::error::{Error, Result};
use qrcode::types::{Color, QrError};
use qrcode::{EcLevel, QrCode, Version};

/// Module grid of an encoded QR symbol, without quiet zone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrMatrix {
    width: usize,
    modules: Vec<bool>,
    version: Option<i16>,
}

impl QrMatrix {
    /// Number of modules per side.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Whether the module at column `x`, row `y` is dark.
    pub fn is_dark(&self, x: usize, y: usize) -> bool {
        self.modules[y * self.width + x]
    }

    /// Standard QR version number (1-40), if the symbol is a normal QR code.
    pub fn version(&self) -> Option<i16> {
        self.version
    }
}

/// QR code encoder
#[derive(Debug, Clone, Copy)]
pub struct QrEncoder {
    /// Error correction level
    ecc_level: EcLevel,
}

impl QrEncoder {
    /// Create a new QR encoder with the library default level (Medium ECC)
    pub fn new() -> Self {
        Self {
            ecc_level: EcLevel::M,
        }
    }

    /// Create a new QR encoder with a specific error correction level
    pub fn with_ecc_level(ecc_level: EcLevel) -> Self {
        Self { ecc_level }
    }

    /// Error correction level used for every symbol.
    pub fn ecc_level(&self) -> EcLevel {
        self.ecc_level
    }

    /// Encode a text payload into a module matrix.
    ///
    /// The smallest version that fits is chosen. Payloads beyond the capacity
    /// of version 40 at this level fail instead of being truncated.
    pub fn encode(&self, payload: &str) -> Result<QrMatrix> {
        let code = QrCode::with_error_correction_level(payload.as_bytes(), self.ecc_level)
            .map_err(|e| match e {
                QrError::DataTooLong => Error::Encoding(format!(
                    "payload of {} bytes exceeds QR capacity at level {:?}",
                    payload.len(),
                    self.ecc_level
                )),
                other => Error::Encoding(format!("Failed to create QR code: {}", other)),
            })?;

        let version = match code.version() {
            Version::Normal(v) => Some(v),
            Version::Micro(_) => None,
        };

        let matrix = QrMatrix {
            width: code.width(),
            modules: code
                .to_colors()
                .into_iter()
                .map(|c| c == Color::Dark)
                .collect(),
            version,
        };

        tracing::trace!(
            version = ?matrix.version,
            width = matrix.width,
            ecc_level = ?self.ecc_level,
            "Encoded QR matrix"
        );

        Ok(matrix)
    }
}

impl Default for QrEncoder {
    fn default() -> Self {
        Self::new()
    }
}
