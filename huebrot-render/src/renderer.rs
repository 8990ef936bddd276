use tracing::trace;

use crate::palette::Rgb;
use crate::RenderError;

/// A drawing backend that rasterises one point per pixel.
///
/// `vertices[i]` is the centre of a pixel in grid space (origin at the
/// bottom-left) and `colors[i]` is its color. Both slices have the same
/// length.
pub trait GridRenderer {
    fn draw_grid(&mut self, vertices: &[[f32; 2]], colors: &[Rgb]) -> crate::Result<()>;
}

impl<R: GridRenderer + ?Sized> GridRenderer for Box<R> {
    fn draw_grid(&mut self, vertices: &[[f32; 2]], colors: &[Rgb]) -> crate::Result<()> {
        (**self).draw_grid(vertices, colors)
    }
}

/// Pixel centres `(x + 0.5, y + 0.5)` in the same column-major order as the
/// iteration grid.
pub fn grid_vertices(width: u32, height: u32) -> Vec<[f32; 2]> {
    let mut vertices = Vec::with_capacity(width as usize * height as usize);
    for x in 0..width {
        for y in 0..height {
            vertices.push([x as f32 + 0.5, y as f32 + 0.5]);
        }
    }
    vertices
}

/// A canvas: a backend plus the vertex list it is always drawn with.
///
/// The vertex list is generated once and reused for every draw.
pub struct GridSurface<R> {
    renderer: R,
    width: u32,
    height: u32,
    vertices: Vec<[f32; 2]>,
    draws: u64,
}

impl<R: GridRenderer> GridSurface<R> {
    pub fn new(renderer: R, width: u32, height: u32) -> Self {
        Self {
            renderer,
            width,
            height,
            vertices: grid_vertices(width, height),
            draws: 0,
        }
    }

    /// Hand a full frame of colors to the backend.
    pub fn present(&mut self, colors: &[Rgb]) -> crate::Result<()> {
        if colors.len() != self.vertices.len() {
            return Err(RenderError::ColorCountMismatch {
                vertices: self.vertices.len(),
                colors: colors.len(),
            });
        }
        self.renderer.draw_grid(&self.vertices, colors)?;
        self.draws += 1;
        trace!(draws = self.draws, "presented {}×{} grid", self.width, self.height);
        Ok(())
    }

    /// Number of successful draw calls so far.
    pub fn draws(&self) -> u64 {
        self.draws
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }
}
