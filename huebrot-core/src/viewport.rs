use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::complex::Complex;
use crate::error::CoreError;

/// A pointer position in canvas pixels.
///
/// `(0, 0)` is the top-left corner and `y` grows downward, as delivered by
/// the windowing layer.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PixelPos {
    pub x: f64,
    pub y: f64,
}

impl PixelPos {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Reject zero-sized canvases before they reach a division.
pub fn check_canvas(width: u32, height: u32) -> crate::Result<()> {
    if width == 0 || height == 0 {
        return Err(CoreError::InvalidCanvas { width, height });
    }
    Ok(())
}

/// The rectangle of the complex plane mapped onto a canvas.
///
/// Bounds are private so the ranges can never go stale or inverted: every
/// mutation goes through [`Viewport::new`]'s validation.
///
/// Two pixel spaces are involved. The iteration grid has row 0 at the
/// bottom (`y_min`), while pointer coordinates have row 0 at the top
/// (`y_max`). [`pixel_to_point`](Self::pixel_to_point) works in grid space,
/// [`screen_to_point`](Self::screen_to_point) in pointer space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Viewport {
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
}

impl<'de> Deserialize<'de> for Viewport {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Raw {
            x_min: f64,
            x_max: f64,
            y_min: f64,
            y_max: f64,
        }
        let raw = Raw::deserialize(deserializer)?;
        Self::new(raw.x_min, raw.x_max, raw.y_min, raw.y_max).map_err(serde::de::Error::custom)
    }
}

impl Viewport {
    /// Half-width of the default square `[-2, 2] × [-2, 2]`.
    pub const DEFAULT_HALF_EXTENT: f64 = 2.0;

    pub fn new(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> crate::Result<Self> {
        if ![x_min, x_max, y_min, y_max].iter().all(|v| v.is_finite()) {
            return Err(CoreError::InvalidViewport {
                reason: format!("bounds must be finite, got [{x_min}, {x_max}]×[{y_min}, {y_max}]"),
            });
        }
        if x_max <= x_min {
            return Err(CoreError::InvalidViewport {
                reason: format!("x range must be positive, got [{x_min}, {x_max}]"),
            });
        }
        if y_max <= y_min {
            return Err(CoreError::InvalidViewport {
                reason: format!("y range must be positive, got [{y_min}, {y_max}]"),
            });
        }
        Ok(Self {
            x_min,
            x_max,
            y_min,
            y_max,
        })
    }

    pub fn x_min(&self) -> f64 {
        self.x_min
    }

    pub fn x_max(&self) -> f64 {
        self.x_max
    }

    pub fn y_min(&self) -> f64 {
        self.y_min
    }

    pub fn y_max(&self) -> f64 {
        self.y_max
    }

    #[inline]
    pub fn x_range(&self) -> f64 {
        self.x_max - self.x_min
    }

    #[inline]
    pub fn y_range(&self) -> f64 {
        self.y_max - self.y_min
    }

    /// Restore the default square.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Map grid-space pixel coordinates to the complex plane.
    ///
    /// `(0, 0)` maps to `(x_min, y_min)` and `(width, height)` to
    /// `(x_max, y_max)`. Pass `x + 0.5` to sample a pixel centre.
    #[inline]
    pub fn pixel_to_point(&self, px: f64, py: f64, width: u32, height: u32) -> Complex {
        Complex::new(
            self.x_min + px / width as f64 * self.x_range(),
            self.y_min + py / height as f64 * self.y_range(),
        )
    }

    /// Map a pointer position to the complex plane, flipping the vertical
    /// axis so that the top edge of the canvas is `y_max`.
    #[inline]
    pub fn screen_to_point(&self, pos: PixelPos, width: u32, height: u32) -> Complex {
        self.pixel_to_point(pos.x, height as f64 - pos.y, width, height)
    }

    /// Zoom to the rectangle spanned by two pointer positions.
    ///
    /// Corner order does not matter. Fails without modifying the viewport
    /// if the canvas is empty or the rectangle is degenerate on an axis.
    pub fn zoom_to(
        &mut self,
        origin: PixelPos,
        destination: PixelPos,
        width: u32,
        height: u32,
    ) -> crate::Result<()> {
        check_canvas(width, height)?;
        let (w, h) = (width as f64, height as f64);
        let (left, right) = (origin.x.min(destination.x), origin.x.max(destination.x));
        let (top, bottom) = (origin.y.min(destination.y), origin.y.max(destination.y));

        let x_min = self.x_min + left / w * self.x_range();
        let x_max = self.x_min + right / w * self.x_range();
        let y_min = self.y_max - bottom / h * self.y_range();
        let y_max = self.y_max - top / h * self.y_range();

        *self = Self::new(x_min, x_max, y_min, y_max).inspect_err(|e| {
            debug!(?origin, ?destination, "zoom rejected: {e}");
        })?;
        Ok(())
    }
}

impl Default for Viewport {
    fn default() -> Self {
        let e = Self::DEFAULT_HALF_EXTENT;
        Self {
            x_min: -e,
            x_max: e,
            y_min: -e,
            y_max: e,
        }
    }
}
