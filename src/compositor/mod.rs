//! QR-with-logo compositing
//!
//! A render draws the QR symbol across a square canvas, clears an opaque
//! backdrop in the middle, stretches the logo over it and encodes the result
//! as PNG. Every call owns its surface; nothing is shared between renders.

mod canvas;
pub mod options;
pub mod placement;

pub use options::{RenderOptions, parse_color, parse_ecc_level};
pub use placement::{LogoPlacement, PixelRect};

use crate::artifact::{DEFAULT_ARTIFACT_NAME, RenderedArtifact};
use crate::error::{Error, Result};
use crate::logo::Logo;
use crate::qr::QrEncoder;
use bytes::Bytes;
use canvas::Canvas;
use std::time::Instant;

/// Renders QR codes with a centered logo.
#[derive(Debug, Clone)]
pub struct Compositor {
    options: RenderOptions,
    encoder: QrEncoder,
}

impl Compositor {
    /// Create a compositor; fails if `options` break a render invariant.
    pub fn new(options: RenderOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            encoder: QrEncoder::with_ecc_level(options.ecc_level),
            options,
        })
    }

    /// Options every render uses.
    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Placement of the logo on this compositor's canvas.
    pub fn placement(&self) -> LogoPlacement {
        LogoPlacement::compute(
            self.options.canvas_size,
            self.options.logo_scale,
            self.options.padding_px,
        )
    }

    /// Render `payload` as a QR code with `logo` at its center.
    pub fn render(&self, payload: &str, logo: &Logo) -> Result<RenderedArtifact> {
        if payload.is_empty() {
            return Err(Error::InvalidRequest("payload is empty".to_string()));
        }

        let started = Instant::now();
        let options = &self.options;

        let matrix = self.encoder.encode(payload)?;

        let mut canvas = Canvas::new(options.canvas_size, options.light_color)?;
        canvas.paint_symbol(
            &matrix,
            options.margin,
            options.dark_color,
            options.light_color,
        )?;

        let placement = self.placement();
        canvas.fill_rect(placement.backdrop_rect(), options.light_color);
        canvas.draw_logo(logo.image(), placement.x, placement.y, placement.size);

        let png = canvas.encode_png()?;
        let image = canvas.into_image();

        tracing::debug!(
            payload_len = payload.len(),
            version = ?matrix.version(),
            modules = matrix.width(),
            logo_size = placement.size,
            png_bytes = png.len(),
            elapsed_ms = started.elapsed().as_secs_f64() * 1_000.0,
            "Rendered QR code with logo"
        );

        Ok(RenderedArtifact {
            payload: payload.to_string(),
            image,
            png: Bytes::from(png),
            suggested_name: DEFAULT_ARTIFACT_NAME.to_string(),
        })
    }

    /// Run [`Compositor::render`] on the blocking pool.
    pub async fn render_async(&self, payload: &str, logo: &Logo) -> Result<RenderedArtifact> {
        let compositor = self.clone();
        let payload = payload.to_string();
        let logo = logo.clone();
        tokio::task::spawn_blocking(move || compositor.render(&payload, &logo)).await?
    }
}

impl Default for Compositor {
    fn default() -> Self {
        Self {
            options: RenderOptions::default(),
            encoder: QrEncoder::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compositor::options::{BLACK, WHITE};
    use image::{DynamicImage, Rgba, RgbaImage};

    fn red_logo() -> Logo {
        Logo::from_image(DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            50,
            50,
            Rgba([255, 0, 0, 255]),
        )))
    }

    #[test]
    fn test_output_is_canvas_sized() {
        let artifact = Compositor::default()
            .render("https://example.com", &red_logo())
            .unwrap();
        assert_eq!(artifact.image.dimensions(), (400, 400));
        assert_eq!(artifact.suggested_name, "qr-code.png");
        assert_eq!(&artifact.png[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn test_red_logo_scenario() {
        let compositor = Compositor::default();
        let artifact = compositor.render("https://example.com", &red_logo()).unwrap();
        let img = &artifact.image;

        let center = img.get_pixel(200, 200);
        assert!(center[0] >= 250 && center[1] <= 5 && center[2] <= 5, "{center:?}");
        assert_eq!(*img.get_pixel(158, 158), WHITE);

        let backdrop = compositor.placement().backdrop_rect();
        for (x, y, pixel) in img.enumerate_pixels() {
            if !backdrop.contains(x, y) {
                assert!(*pixel == BLACK || *pixel == WHITE, "({x},{y}) = {pixel:?}");
            }
        }
    }

    #[test]
    fn test_transparent_logo_leaves_opaque_backdrop() {
        let clear = Logo::from_image(DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            64,
            16,
            Rgba([0, 0, 0, 0]),
        )));
        let compositor = Compositor::default();
        let artifact = compositor.render("https://example.com", &clear).unwrap();
        let backdrop = compositor.placement().backdrop_rect();
        for y in backdrop.top..backdrop.bottom {
            for x in backdrop.left..backdrop.right {
                assert_eq!(*artifact.image.get_pixel(x, y), WHITE);
            }
        }
    }

    #[test]
    fn test_custom_palette() {
        let options = RenderOptions {
            dark_color: Rgba([0, 0, 128, 255]),
            light_color: Rgba([255, 255, 224, 255]),
            ..RenderOptions::default()
        };
        let artifact = Compositor::new(options)
            .unwrap()
            .render("https://example.com", &red_logo())
            .unwrap();
        assert_eq!(*artifact.image.get_pixel(0, 0), options.light_color);
        assert_eq!(*artifact.image.get_pixel(158, 158), options.light_color);
    }

    #[test]
    fn test_empty_payload_rejected() {
        let err = Compositor::default().render("", &red_logo()).unwrap_err();
        assert!(matches!(err, Error::InvalidRequest(_)));
    }

    #[test]
    fn test_over_capacity_fails_without_artifact() {
        let payload = format!("https://example.com/{}", "a".repeat(3000));
        let err = Compositor::default().render(&payload, &red_logo()).unwrap_err();
        assert!(matches!(err, Error::Encoding(_)));
    }

    #[test]
    fn test_render_is_deterministic() {
        let compositor = Compositor::default();
        let logo = red_logo();
        let first = compositor.render("https://example.com/a", &logo).unwrap();
        let second = compositor.render("https://example.com/a", &logo).unwrap();
        assert_eq!(first.png, second.png);
    }

    #[tokio::test]
    async fn test_render_async_matches_sync() {
        let compositor = Compositor::default();
        let logo = red_logo();
        let sync = compositor.render("https://example.com", &logo).unwrap();
        let awaited = compositor
            .render_async("https://example.com", &logo)
            .await
            .unwrap();
        assert_eq!(sync.png, awaited.png);
    }
}
