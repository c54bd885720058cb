//! Render options honored by the compositor

use crate::error::{Error, Result};
use image::Rgba;
use qrcode::EcLevel;

/// Default canvas side in pixels
pub const DEFAULT_CANVAS_SIZE: u32 = 400;
/// Default quiet zone in modules
pub const DEFAULT_MARGIN: u32 = 2;
/// Default logo side as a fraction of the canvas side
pub const DEFAULT_LOGO_SCALE: f64 = 0.20;
/// Default light border painted around the logo, in pixels
pub const DEFAULT_PADDING_PX: u32 = 8;
/// Largest canvas side a surface will be allocated for
pub const MAX_CANVAS_SIZE: u32 = 16_384;

/// Pure black
pub const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);
/// Pure white
pub const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Fully resolved compositing options
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderOptions {
    /// Side of the square output canvas in pixels
    pub canvas_size: u32,
    /// Quiet zone around the symbol, in modules
    pub margin: u32,
    /// Color of dark modules
    pub dark_color: Rgba<u8>,
    /// Color of light modules, the quiet zone and the logo backdrop
    pub light_color: Rgba<u8>,
    /// Logo side as a fraction of `canvas_size`, in `(0, 1]`
    pub logo_scale: f64,
    /// Backdrop border around the logo in pixels
    pub padding_px: u32,
    /// Error correction level of every generated symbol
    pub ecc_level: EcLevel,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            canvas_size: DEFAULT_CANVAS_SIZE,
            margin: DEFAULT_MARGIN,
            dark_color: BLACK,
            light_color: WHITE,
            logo_scale: DEFAULT_LOGO_SCALE,
            padding_px: DEFAULT_PADDING_PX,
            ecc_level: EcLevel::M,
        }
    }
}

impl RenderOptions {
    /// Check the invariants a render request relies on.
    pub fn validate(&self) -> Result<()> {
        if self.canvas_size == 0 {
            return Err(Error::InvalidRequest(
                "canvas size must be greater than zero".to_string(),
            ));
        }
        if !(self.logo_scale > 0.0 && self.logo_scale <= 1.0) {
            return Err(Error::InvalidRequest(format!(
                "logo scale {} is outside (0, 1]",
                self.logo_scale
            )));
        }
        if self.canvas_size > MAX_CANVAS_SIZE {
            return Err(Error::SurfaceUnavailable(format!(
                "canvas of {0}x{0} px exceeds the {1}x{1} px limit",
                self.canvas_size, MAX_CANVAS_SIZE
            )));
        }
        Ok(())
    }
}

/// Parse a `#RRGGBB` or `#RRGGBBAA` hex color (leading `#` optional).
pub fn parse_color(value: &str) -> Result<Rgba<u8>> {
    let hex = value.trim();
    let hex = hex.strip_prefix('#').unwrap_or(hex);

    if !(hex.len() == 6 || hex.len() == 8) || !hex.is_ascii() {
        return Err(Error::Config(format!(
            "Invalid color '{value}', expected #RRGGBB or #RRGGBBAA"
        )));
    }

    let channel = |i: usize| {
        u8::from_str_radix(&hex[i..i + 2], 16)
            .map_err(|e| Error::Config(format!("Invalid color '{value}': {e}")))
    };

    let alpha = if hex.len() == 8 { channel(6)? } else { 255 };
    Ok(Rgba([channel(0)?, channel(2)?, channel(4)?, alpha]))
}

/// Parse an error correction level name (`L`, `M`, `Q`, `H`, case-insensitive).
pub fn parse_ecc_level(value: &str) -> Result<EcLevel> {
    match value.trim().to_ascii_uppercase().as_str() {
        "L" | "LOW" => Ok(EcLevel::L),
        "M" | "MEDIUM" => Ok(EcLevel::M),
        "Q" | "QUARTILE" => Ok(EcLevel::Q),
        "H" | "HIGH" => Ok(EcLevel::H),
        _ => Err(Error::Config(format!(
            "Unknown error correction level '{value}'. Use L, M, Q, or H"
        ))),
    }
}
