//! Error types for qrlogo operations

use thiserror::Error;

/// Result type alias using qrlogo's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for qrlogo operations
#[derive(Error, Debug)]
pub enum Error {
    /// Payload cannot be encoded as a QR symbol (capacity exceeded, canvas too small)
    #[error("Failed to encode QR code: {0}")]
    Encoding(String),

    /// Logo bytes could not be decoded into a bitmap
    #[error("Failed to decode logo image: {0}")]
    ImageDecode(String),

    /// Drawing surface could not be allocated
    #[error("Drawing surface unavailable: {0}")]
    SurfaceUnavailable(String),

    /// Render request violates its invariants (empty payload, zero canvas, ...)
    #[error("Invalid render request: {0}")]
    InvalidRequest(String),

    /// More URLs were supplied than a batch accepts
    #[error("Too many URLs: at most {max} are supported")]
    TooManyUrls {
        /// Batch capacity
        max: usize,
    },

    /// Every supplied URL was blank
    #[error("At least one non-blank URL is required")]
    NoValidUrls,

    /// QR code decoding failed
    #[error("Failed to decode QR code: {0}")]
    QrDecode(String),

    /// No QR code found in image
    #[error("No QR code found in image")]
    NoQrCodeFound,

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Image processing error
    #[error("Image processing error: {0}")]
    Image(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Whether this error must abort a whole batch rather than skip one URL.
    pub fn is_fatal_for_batch(&self) -> bool {
        !matches!(self, Error::Encoding(_) | Error::InvalidRequest(_))
    }

    /// Short machine-friendly label, used for metrics and JSON reports.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Encoding(_) => "encoding",
            Error::ImageDecode(_) => "image_decode",
            Error::SurfaceUnavailable(_) => "surface_unavailable",
            Error::InvalidRequest(_) => "invalid_request",
            Error::TooManyUrls { .. } => "too_many_urls",
            Error::NoValidUrls => "no_valid_urls",
            Error::QrDecode(_) => "qr_decode",
            Error::NoQrCodeFound => "no_qr_code",
            Error::Io(_) => "io",
            Error::Image(_) => "image",
            Error::Config(_) => "config",
            Error::Other(_) => "other",
        }
    }
}

impl From<image::ImageError> for Error {
    fn from(e: image::ImageError) -> Self {
        Error::Image(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Other(format!("JSON error: {}", e))
    }
}

impl From<tokio::task::JoinError> for Error {
    fn from(e: tokio::task::JoinError) -> Self {
        Error::Other(format!("Background task failed: {}", e))
    }
}
