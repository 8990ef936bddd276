use crate::buffer::ColorBuffer;
use crate::iteration_buffer::IterationGrid;
use crate::RenderError;

/// Linear RGB triple with channels in `[0, 1]`.
pub type Rgb = [f32; 3];

pub const BLACK: Rgb = [0.0, 0.0, 0.0];

/// Degrees of hue advanced per iteration step. One full turn every 45 steps.
pub const HUE_STRIDE: u64 = 8;

// ---------------------------------------------------------------------------
// Palette
// ---------------------------------------------------------------------------

/// One color per iteration count, cycling through the hue wheel.
///
/// The palette remembers the (normalised) offset it was built with so the
/// owning field can tell whether a rebuild is needed.
#[derive(Debug, Clone, PartialEq)]
pub struct HuePalette {
    offset: u32,
    colors: Vec<Rgb>,
}

impl HuePalette {
    /// Hue offset in degrees, always in `[0, 360)`.
    pub fn offset(&self) -> u32 {
        self.offset
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn get(&self, iteration: u32) -> Option<Rgb> {
        self.colors.get(iteration as usize).copied()
    }

    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }

    /// Whether this palette is the one [`build_palette`] would produce.
    pub fn matches(&self, max_iterations: u32, offset: u32) -> bool {
        self.colors.len() == max_iterations as usize && self.offset == offset % 360
    }
}

/// Build the hue gradient for `max_iterations` entries.
///
/// Entry `i` has hue `(i * 8 + offset) mod 360` at full saturation and
/// value. Offsets that differ by a multiple of 360 give identical palettes.
pub fn build_palette(max_iterations: u32, offset: u32) -> HuePalette {
    let offset = offset % 360;
    let colors = (0..max_iterations as u64)
        .map(|i| {
            let hue = ((i * HUE_STRIDE + offset as u64) % 360) as u32;
            hsv_to_rgb(hue, 1.0, 1.0)
        })
        .collect();
    HuePalette { offset, colors }
}

/// Classical six-sector HSV → RGB for integer hue degrees.
fn hsv_to_rgb(hue: u32, s: f32, v: f32) -> Rgb {
    let hue = hue % 360;
    let sector = hue / 60;
    let f = hue as f32 / 60.0 - sector as f32;
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));
    match sector {
        0 => [v, t, p],
        1 => [q, v, p],
        2 => [p, v, t],
        3 => [p, q, v],
        4 => [t, p, v],
        _ => [v, p, q],
    }
}

// ---------------------------------------------------------------------------
// Application
// ---------------------------------------------------------------------------

/// Color an iteration grid: bounded cells are black, escaped cells take
/// `palette[n]` exactly.
pub fn apply(grid: &IterationGrid, palette: &HuePalette) -> crate::Result<ColorBuffer> {
    if palette.len() < grid.max_iterations as usize {
        return Err(RenderError::PaletteTooShort {
            palette: palette.len(),
            required: grid.max_iterations,
        });
    }
    let data = grid
        .data
        .iter()
        .map(|cell| match cell.iterations() {
            Some(n) => palette.colors[n as usize],
            None => BLACK,
        })
        .collect();
    Ok(ColorBuffer {
        width: grid.width,
        height: grid.height,
        data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use huebrot_core::EscapeTime;

    const EPSILON: f32 = 1e-6;

    fn close(a: Rgb, b: Rgb) -> bool {
        a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() < EPSILON)
    }

    #[test]
    fn length_matches_budget() {
        for n in [0, 1, 45, 100, 1000] {
            assert_eq!(build_palette(n, 0).len(), n as usize);
        }
        assert!(build_palette(0, 90).is_empty());
    }

    #[test]
    fn periodic_in_offset() {
        for offset in [0, 4, 150, 356] {
            assert_eq!(build_palette(64, offset), build_palette(64, offset + 360));
        }
    }

    #[test]
    fn offset_is_normalised() {
        let p = build_palette(3, 725);
        assert_eq!(p.offset(), 5);
        assert!(p.matches(3, 5));
        assert!(p.matches(3, 365));
        assert!(!p.matches(4, 5));
    }

    #[test]
    fn primary_hues() {
        assert!(close(hsv_to_rgb(0, 1.0, 1.0), [1.0, 0.0, 0.0]));
        assert!(close(hsv_to_rgb(120, 1.0, 1.0), [0.0, 1.0, 0.0]));
        assert!(close(hsv_to_rgb(240, 1.0, 1.0), [0.0, 0.0, 1.0]));
        assert!(close(hsv_to_rgb(60, 1.0, 1.0), [1.0, 1.0, 0.0]));
        assert!(close(hsv_to_rgb(30, 1.0, 1.0), [1.0, 0.5, 0.0]));
        assert!(close(hsv_to_rgb(330, 1.0, 1.0), [1.0, 0.0, 0.5]));
    }

    #[test]
    fn entries_step_eight_degrees() {
        let p = build_palette(46, 0);
        // i = 15 → 120°, i = 45 → 360° ≡ 0°.
        assert!(close(p.get(15).unwrap(), [0.0, 1.0, 0.0]));
        assert!(close(p.get(45).unwrap(), p.get(0).unwrap()));
        assert_eq!(p.get(46), None);
    }

    #[test]
    fn offset_shifts_hue() {
        let shifted = build_palette(10, 120);
        assert!(close(shifted.get(0).unwrap(), [0.0, 1.0, 0.0]));
    }

    #[test]
    fn apply_is_exact_lookup() {
        let grid = IterationGrid {
            width: 2,
            height: 2,
            max_iterations: 10,
            data: vec![
                EscapeTime::Escaped(0),
                EscapeTime::NoEscape,
                EscapeTime::Escaped(9),
                EscapeTime::Escaped(3),
            ],
        };
        let palette = build_palette(10, 42);
        let colors = apply(&grid, &palette).unwrap();
        assert_eq!(colors.data.len(), 4);
        assert_eq!(colors.data[0], palette.get(0).unwrap());
        assert_eq!(colors.data[1], BLACK);
        assert_eq!(colors.data[2], palette.get(9).unwrap());
        assert_eq!(colors.data[3], palette.get(3).unwrap());
    }

    #[test]
    fn apply_rejects_short_palette() {
        let grid = IterationGrid {
            width: 1,
            height: 1,
            max_iterations: 20,
            data: vec![EscapeTime::Escaped(15)],
        };
        assert!(matches!(
            apply(&grid, &build_palette(10, 0)),
            Err(RenderError::PaletteTooShort { palette: 10, required: 20 })
        ));
    }
}
