//! RGBA drawing surface used for one render

use crate::compositor::placement::PixelRect;
use crate::error::{Error, Result};
use crate::qr::QrMatrix;
use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use std::io::Cursor;

/// Square RGBA surface owned by a single render call.
pub(crate) struct Canvas {
    pixels: RgbaImage,
}

impl Canvas {
    /// Allocate a `side x side` surface filled with `background`.
    pub(crate) fn new(side: u32, background: Rgba<u8>) -> Result<Self> {
        let bytes = (side as usize)
            .checked_mul(side as usize)
            .and_then(|n| n.checked_mul(4))
            .ok_or_else(|| {
                Error::SurfaceUnavailable(format!("{side}x{side} px surface overflows memory"))
            })?;

        let mut buffer = Vec::new();
        buffer.try_reserve_exact(bytes).map_err(|e| {
            Error::SurfaceUnavailable(format!("cannot allocate {side}x{side} px surface: {e}"))
        })?;
        buffer.resize(bytes, 0);

        let mut pixels = RgbaImage::from_raw(side, side, buffer).ok_or_else(|| {
            Error::SurfaceUnavailable(format!("{side}x{side} px buffer has the wrong length"))
        })?;
        for pixel in pixels.pixels_mut() {
            *pixel = background;
        }

        Ok(Self { pixels })
    }

    /// Paint the symbol across the whole canvas with a quiet zone of `margin` modules.
    ///
    /// Module pitch is fractional (`side / (modules + 2 * margin)`) so the
    /// symbol always fills the canvas exactly.
    pub(crate) fn paint_symbol(
        &mut self,
        matrix: &QrMatrix,
        margin: u32,
        dark: Rgba<u8>,
        light: Rgba<u8>,
    ) -> Result<()> {
        let side = self.pixels.width();
        let modules = matrix.width();
        let total = modules + 2 * margin as usize;

        if (side as usize) < total {
            return Err(Error::Encoding(format!(
                "{total} modules (including quiet zone) do not fit a {side} px canvas"
            )));
        }

        let scale = side as f64 / total as f64;
        let quiet = margin as f64 * scale;
        let symbol_end = side as f64 - quiet;

        let module_at = |p: u32| -> Option<usize> {
            let p = p as f64;
            if p < quiet || p >= symbol_end {
                return None;
            }
            Some((((p - quiet) / scale).floor() as usize).min(modules - 1))
        };

        let columns: Vec<Option<usize>> = (0..side).map(module_at).collect();

        for y in 0..side {
            let row = columns[y as usize];
            for x in 0..side {
                let color = match (columns[x as usize], row) {
                    (Some(mx), Some(my)) if matrix.is_dark(mx, my) => dark,
                    _ => light,
                };
                self.pixels.put_pixel(x, y, color);
            }
        }

        Ok(())
    }

    /// Overwrite `rect` with an opaque `color`, ignoring any existing content.
    pub(crate) fn fill_rect(&mut self, rect: PixelRect, color: Rgba<u8>) {
        for y in rect.top..rect.bottom.min(self.pixels.height()) {
            for x in rect.left..rect.right.min(self.pixels.width()) {
                self.pixels.put_pixel(x, y, color);
            }
        }
    }

    /// Stretch `logo` to `size x size` and alpha-composite it at `(x, y)`.
    pub(crate) fn draw_logo(&mut self, logo: &DynamicImage, x: u32, y: u32, size: u32) {
        if size == 0 {
            return;
        }
        let scaled = imageops::resize(&logo.to_rgba8(), size, size, FilterType::Triangle);
        imageops::overlay(&mut self.pixels, &scaled, x as i64, y as i64);
    }

    /// Encode the surface as PNG.
    pub(crate) fn encode_png(&self) -> Result<Vec<u8>> {
        let mut cursor = Cursor::new(Vec::new());
        self.pixels
            .write_to(&mut cursor, ImageFormat::Png)
            .map_err(|e| Error::Image(format!("PNG encoding failed: {e}")))?;
        Ok(cursor.into_inner())
    }

    /// Release the surface as a plain image.
    pub(crate) fn into_image(self) -> RgbaImage {
        self.pixels
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compositor::options::{BLACK, WHITE};
    use crate::qr::QrEncoder;

    #[test]
    fn test_new_fills_background() {
        let canvas = Canvas::new(16, WHITE).unwrap();
        let img = canvas.into_image();
        assert_eq!(img.dimensions(), (16, 16));
        assert!(img.pixels().all(|p| *p == WHITE));
    }

    #[test]
    fn test_symbol_fills_canvas_exactly() {
        let matrix = QrEncoder::new().encode("https://example.com").unwrap();
        let mut canvas = Canvas::new(400, WHITE).unwrap();
        canvas.paint_symbol(&matrix, 2, BLACK, WHITE).unwrap();
        let img = canvas.into_image();

        // 25 modules + 4 quiet = 29 modules over 400 px
        let pitch = 400.0 / 29.0;
        let quiet = (2.0 * pitch) as u32;
        assert_eq!(*img.get_pixel(quiet - 1, quiet - 1), WHITE);
        // first symbol pixel sits on the dark finder pattern corner
        assert_eq!(*img.get_pixel(quiet + 1, quiet + 1), BLACK);
        // bottom-right quiet zone
        assert_eq!(*img.get_pixel(399, 399), WHITE);
    }

    #[test]
    fn test_canvas_smaller_than_symbol_rejected() {
        let matrix = QrEncoder::new().encode("https://example.com").unwrap();
        let mut canvas = Canvas::new(20, WHITE).unwrap();
        let err = canvas.paint_symbol(&matrix, 2, BLACK, WHITE).unwrap_err();
        assert!(matches!(err, Error::Encoding(_)));
    }

    #[test]
    fn test_fill_rect_is_opaque() {
        let mut canvas = Canvas::new(10, BLACK).unwrap();
        canvas.fill_rect(
            PixelRect {
                left: 2,
                top: 2,
                right: 5,
                bottom: 5,
            },
            WHITE,
        );
        let img = canvas.into_image();
        assert_eq!(*img.get_pixel(2, 2), WHITE);
        assert_eq!(*img.get_pixel(4, 4), WHITE);
        assert_eq!(*img.get_pixel(5, 5), BLACK);
    }
}
