//! Logo placement geometry

/// Axis-aligned pixel rectangle, right/bottom exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    /// Left edge
    pub left: u32,
    /// Top edge
    pub top: u32,
    /// One past the right edge
    pub right: u32,
    /// One past the bottom edge
    pub bottom: u32,
}

impl PixelRect {
    /// Whether pixel `(x, y)` lies inside the rectangle.
    pub fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.left && x < self.right && y >= self.top && y < self.bottom
    }

    /// Whether `other` lies entirely inside this rectangle.
    pub fn contains_rect(&self, other: &PixelRect) -> bool {
        other.left >= self.left
            && other.top >= self.top
            && other.right <= self.right
            && other.bottom <= self.bottom
    }

    /// Width in pixels
    pub fn width(&self) -> u32 {
        self.right - self.left
    }

    /// Height in pixels
    pub fn height(&self) -> u32 {
        self.bottom - self.top
    }
}

/// Centered square slot the logo is drawn into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogoPlacement {
    /// Logo side in pixels
    pub size: u32,
    /// Left edge of the logo
    pub x: u32,
    /// Top edge of the logo
    pub y: u32,
    /// Backdrop border around the logo
    pub padding_px: u32,
    canvas_size: u32,
}

impl LogoPlacement {
    /// Derive the placement for a canvas; `size = floor(canvas_size * logo_scale)`.
    pub fn compute(canvas_size: u32, logo_scale: f64, padding_px: u32) -> Self {
        let size = ((canvas_size as f64 * logo_scale).floor() as u32).min(canvas_size);
        let offset = (canvas_size - size) / 2;
        Self {
            size,
            x: offset,
            y: offset,
            padding_px,
            canvas_size,
        }
    }

    /// Pixels covered by the logo bitmap.
    pub fn logo_rect(&self) -> PixelRect {
        PixelRect {
            left: self.x,
            top: self.y,
            right: self.x + self.size,
            bottom: self.y + self.size,
        }
    }

    /// Pixels covered by the opaque backdrop, clipped to the canvas.
    pub fn backdrop_rect(&self) -> PixelRect {
        PixelRect {
            left: self.x.saturating_sub(self.padding_px),
            top: self.y.saturating_sub(self.padding_px),
            right: (self.x + self.size)
                .saturating_add(self.padding_px)
                .min(self.canvas_size),
            bottom: (self.y + self.size)
                .saturating_add(self.padding_px)
                .min(self.canvas_size),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_placement_is_centered() {
        let placement = LogoPlacement::compute(400, 0.20, 8);
        assert_eq!(placement.size, 80);
        assert_eq!((placement.x, placement.y), (160, 160));
        assert_eq!(
            placement.logo_rect(),
            PixelRect {
                left: 160,
                top: 160,
                right: 240,
                bottom: 240
            }
        );
        assert_eq!(
            placement.backdrop_rect(),
            PixelRect {
                left: 152,
                top: 152,
                right: 248,
                bottom: 248
            }
        );
    }

    #[test]
    fn test_backdrop_contains_logo() {
        for canvas in [1, 37, 128, 400, 1023] {
            let placement = LogoPlacement::compute(canvas, 0.2, 8);
            assert!(placement.backdrop_rect().contains_rect(&placement.logo_rect()));
        }
    }

    #[test]
    fn test_size_floors() {
        // 0.2 * 333 = 66.6
        let placement = LogoPlacement::compute(333, 0.2, 0);
        assert_eq!(placement.size, 66);
        assert_eq!(placement.x, 133);
    }

    #[test]
    fn test_exact_products_are_not_rounded_down() {
        assert_eq!(LogoPlacement::compute(10, 0.7, 8).size, 7);
    }

    #[test]
    fn test_backdrop_clipped_to_canvas() {
        let placement = LogoPlacement::compute(100, 1.0, 8);
        let backdrop = placement.backdrop_rect();
        assert_eq!((backdrop.left, backdrop.top), (0, 0));
        assert_eq!((backdrop.width(), backdrop.height()), (100, 100));
    }
}
