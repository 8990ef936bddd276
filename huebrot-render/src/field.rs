use std::borrow::Cow;
use std::time::{Duration, Instant};

use tracing::{debug, trace};

use huebrot_core::{
    check_canvas, check_max_iterations, Complex, Julia, Mandelbrot, PixelPos, Viewport,
};

use crate::buffer::{ColorBuffer, Selection};
use crate::iteration_buffer::IterationGrid;
use crate::palette::{apply, build_palette, HuePalette};

// ---------------------------------------------------------------------------
// Kind and phase
// ---------------------------------------------------------------------------

/// Which recurrence a field draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FractalKind {
    Mandelbrot,
    Julia,
}

impl FractalKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Mandelbrot => "Mandelbrot",
            Self::Julia => "Julia",
        }
    }
}

/// Where a field is in its compute → color cycle.
///
/// Internal bookkeeping. Work runs synchronously, so a caller only ever
/// observes `Idle`; `Computing` and `Coloring` show up in the trace log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldPhase {
    Idle,
    Computing,
    Coloring,
}

/// Counters for diagnostics and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FieldStats {
    pub recomputes: u64,
    pub recolors: u64,
    pub last_compute: Duration,
    pub escaped: usize,
    pub bounded: usize,
}

// ---------------------------------------------------------------------------
// Field
// ---------------------------------------------------------------------------

/// One fractal image: its viewport, iteration grid, palette and colors.
///
/// The color buffer is always derived from the current grid and palette;
/// every operation either completes fully or leaves the field as it was.
#[derive(Debug, Clone)]
pub struct FractalField {
    kind: FractalKind,
    width: u32,
    height: u32,
    viewport: Viewport,
    max_iterations: u32,
    offset: u32,
    grid: IterationGrid,
    palette: HuePalette,
    colors: ColorBuffer,
    phase: FieldPhase,
    stats: FieldStats,
}

impl FractalField {
    /// A field with a blank (black) image. Call [`recompute`](Self::recompute)
    /// to fill it.
    pub fn new(
        kind: FractalKind,
        width: u32,
        height: u32,
        viewport: Viewport,
        max_iterations: u32,
    ) -> crate::Result<Self> {
        check_canvas(width, height)?;
        let max_iterations = check_max_iterations(max_iterations)?;
        Ok(Self {
            kind,
            width,
            height,
            viewport,
            max_iterations,
            offset: 0,
            grid: IterationGrid::empty(width, height, max_iterations),
            palette: build_palette(max_iterations, 0),
            colors: ColorBuffer::new(width, height),
            phase: FieldPhase::Idle,
            stats: FieldStats::default(),
        })
    }

    pub fn kind(&self) -> FractalKind {
        self.kind
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn max_iterations(&self) -> u32 {
        self.max_iterations
    }

    /// Palette hue offset in degrees, `[0, 360)`.
    pub fn offset(&self) -> u32 {
        self.offset
    }

    pub fn grid(&self) -> &IterationGrid {
        &self.grid
    }

    pub fn palette(&self) -> &HuePalette {
        &self.palette
    }

    pub fn colors(&self) -> &ColorBuffer {
        &self.colors
    }

    /// Always `Idle` once a call has returned.
    pub fn phase(&self) -> FieldPhase {
        self.phase
    }

    pub fn stats(&self) -> FieldStats {
        self.stats
    }

    /// Replace the viewport. Takes effect on the next recompute.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Zoom the viewport to a rectangle given in pointer coordinates.
    pub fn zoom_to(&mut self, origin: PixelPos, destination: PixelPos) -> crate::Result<()> {
        self.viewport
            .zoom_to(origin, destination, self.width, self.height)?;
        Ok(())
    }

    /// Change the iteration budget. Takes effect on the next recompute.
    pub fn set_max_iterations(&mut self, max_iterations: u32) -> crate::Result<()> {
        self.max_iterations = check_max_iterations(max_iterations)?;
        Ok(())
    }

    /// Advance the palette offset by `step` degrees, wrapping at 360.
    pub fn advance_offset(&mut self, step: u32) {
        self.offset = (self.offset + step % 360) % 360;
    }

    /// The complex-plane point under a pointer position.
    pub fn point_at(&self, pos: PixelPos) -> Complex {
        self.viewport.screen_to_point(pos, self.width, self.height)
    }

    /// Re-iterate every pixel, then recolor.
    ///
    /// `julia_seed` is the recurrence constant for a Julia field and is
    /// ignored by a Mandelbrot field.
    pub fn recompute(&mut self, julia_seed: Complex) -> crate::Result<()> {
        self.enter(FieldPhase::Computing);
        let result = self.compute_grid(julia_seed).and_then(|(grid, elapsed)| {
            self.enter(FieldPhase::Coloring);
            let palette = self.fresh_palette();
            let colors = apply(&grid, &palette)?;
            Ok((grid, palette, colors, elapsed))
        });
        self.enter(FieldPhase::Idle);
        let (grid, palette, colors, elapsed) = result?;

        let (escaped, bounded) = grid.counts();
        self.grid = grid;
        self.palette = palette;
        self.colors = colors;
        self.stats.recomputes += 1;
        self.stats.recolors += 1;
        self.stats.last_compute = elapsed;
        self.stats.escaped = escaped;
        self.stats.bounded = bounded;
        debug!(
            kind = self.kind.label(),
            escaped,
            bounded,
            "recomputed {}×{} at {} iterations in {:.1?}",
            self.width,
            self.height,
            self.max_iterations,
            elapsed
        );
        Ok(())
    }

    /// Reapply the palette to the existing grid, rebuilding the palette if
    /// the offset or iteration budget changed since it was built.
    pub fn recolor(&mut self) -> crate::Result<()> {
        self.enter(FieldPhase::Coloring);
        let palette = self.fresh_palette();
        let result = apply(&self.grid, &palette);
        self.enter(FieldPhase::Idle);
        self.colors = result?;
        self.palette = palette;
        self.stats.recolors += 1;
        Ok(())
    }

    /// The image to draw: the color buffer, or a copy with the selection
    /// darkened while a drag is in progress.
    pub fn renderable(&self, selection: Option<&Selection>) -> Cow<'_, ColorBuffer> {
        match selection {
            Some(sel) => Cow::Owned(self.colors.with_selection(sel)),
            None => Cow::Borrowed(&self.colors),
        }
    }

    fn enter(&mut self, phase: FieldPhase) {
        trace!(kind = self.kind.label(), from = ?self.phase, to = ?phase, "field phase");
        self.phase = phase;
    }

    fn compute_grid(&self, julia_seed: Complex) -> crate::Result<(IterationGrid, Duration)> {
        let start = Instant::now();
        let grid = match self.kind {
            FractalKind::Mandelbrot => {
                let fractal = Mandelbrot::new(self.max_iterations)?;
                IterationGrid::compute(&fractal, &self.viewport, self.width, self.height)?
            }
            FractalKind::Julia => {
                let fractal = Julia::new(julia_seed, self.max_iterations)?;
                IterationGrid::compute(&fractal, &self.viewport, self.width, self.height)?
            }
        };
        Ok((grid, start.elapsed()))
    }

    fn fresh_palette(&self) -> HuePalette {
        if self.palette.matches(self.max_iterations, self.offset) {
            self.palette.clone()
        } else {
            build_palette(self.max_iterations, self.offset)
        }
    }
}
