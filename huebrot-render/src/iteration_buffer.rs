use huebrot_core::{check_canvas, EscapeTime, Fractal, Viewport};

/// Per-pixel escape times for a full canvas.
///
/// Stored column-major: cell `(x, y)` lives at `x * height + y`, with row 0
/// at the bottom of the complex-plane rectangle. Keeping iteration data
/// apart from colors lets the palette change without recomputing.
#[derive(Debug, Clone, PartialEq)]
pub struct IterationGrid {
    pub width: u32,
    pub height: u32,
    pub max_iterations: u32,
    pub data: Vec<EscapeTime>,
}

impl IterationGrid {
    /// A grid where nothing has been iterated yet.
    pub fn empty(width: u32, height: u32, max_iterations: u32) -> Self {
        Self {
            width,
            height,
            max_iterations,
            data: vec![EscapeTime::NoEscape; width as usize * height as usize],
        }
    }

    /// Iterate the centre of every pixel of a `width × height` canvas.
    pub fn compute<F: Fractal>(
        fractal: &F,
        viewport: &Viewport,
        width: u32,
        height: u32,
    ) -> crate::Result<Self> {
        check_canvas(width, height)?;
        let mut data = Vec::with_capacity(width as usize * height as usize);
        for x in 0..width {
            for y in 0..height {
                let point = viewport.pixel_to_point(x as f64 + 0.5, y as f64 + 0.5, width, height);
                data.push(fractal.iterate(point));
            }
        }
        Ok(Self {
            width,
            height,
            max_iterations: fractal.max_iterations(),
            data,
        })
    }

    #[inline]
    pub fn index(&self, x: u32, y: u32) -> usize {
        x as usize * self.height as usize + y as usize
    }

    pub fn get(&self, x: u32, y: u32) -> Option<EscapeTime> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data.get(self.index(x, y)).copied()
    }

    /// `(escaped, bounded)` cell counts.
    pub fn counts(&self) -> (usize, usize) {
        let escaped = self.data.iter().filter(|c| c.escaped()).count();
        (escaped, self.data.len() - escaped)
    }
}
