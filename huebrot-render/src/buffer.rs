use huebrot_core::PixelPos;

use crate::palette::Rgb;

/// A rectangle dragged out on a canvas, in pointer coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Selection {
    pub origin: PixelPos,
    pub destination: PixelPos,
}

impl Selection {
    pub fn new(origin: PixelPos, destination: PixelPos) -> Self {
        Self {
            origin,
            destination,
        }
    }

    /// Top-left corner (per-axis minimum).
    pub fn min(&self) -> PixelPos {
        PixelPos::new(
            self.origin.x.min(self.destination.x),
            self.origin.y.min(self.destination.y),
        )
    }

    /// Bottom-right corner (per-axis maximum).
    pub fn max(&self) -> PixelPos {
        PixelPos::new(
            self.origin.x.max(self.destination.x),
            self.origin.y.max(self.destination.y),
        )
    }
}

/// Colors for every pixel of a canvas, laid out like the iteration grid.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorBuffer {
    pub width: u32,
    pub height: u32,
    pub data: Vec<Rgb>,
}

impl ColorBuffer {
    /// A black buffer.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![[0.0; 3]; width as usize * height as usize],
        }
    }

    pub fn get(&self, x: u32, y: u32) -> Option<Rgb> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data
            .get(x as usize * self.height as usize + y as usize)
            .copied()
    }

    /// Copy of the buffer with the selection's interior at half brightness.
    ///
    /// Columns run from the left to the right edge of the selection; rows are
    /// flipped from pointer space into grid space (`row = height - y`). Both
    /// ranges are inclusive and clipped to the canvas.
    pub fn with_selection(&self, selection: &Selection) -> Self {
        let mut out = self.clone();
        let (w, h) = (self.width as i64, self.height as i64);
        if w == 0 || h == 0 {
            return out;
        }
        let (lo, hi) = (selection.min(), selection.max());

        let col_start = (lo.x.floor() as i64).max(0);
        let col_end = (hi.x.floor() as i64).min(w - 1);
        let row_start = (h - hi.y.floor() as i64).max(0);
        let row_end = (h - lo.y.floor() as i64).min(h - 1);

        for col in col_start..=col_end {
            for row in row_start..=row_end {
                let px = &mut out.data[(col * h + row) as usize];
                for channel in px.iter_mut() {
                    *channel /= 2.0;
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn white(width: u32, height: u32) -> ColorBuffer {
        ColorBuffer {
            width,
            height,
            data: vec![[1.0, 0.5, 0.25]; (width * height) as usize],
        }
    }

    #[test]
    fn new_buffer_is_black() {
        let buf = ColorBuffer::new(3, 2);
        assert_eq!(buf.data.len(), 6);
        assert!(buf.data.iter().all(|px| *px == [0.0, 0.0, 0.0]));
    }

    #[test]
    fn selection_corners_are_order_independent() {
        let s = Selection::new(PixelPos::new(20.0, 5.0), PixelPos::new(5.0, 12.0));
        assert_eq!(s.min(), PixelPos::new(5.0, 5.0));
        assert_eq!(s.max(), PixelPos::new(20.0, 12.0));
    }

    #[test]
    fn darkens_flipped_interior_only() {
        let buf = white(10, 10);
        // Pointer rows 2..=4 map to grid rows 6..=8.
        let sel = Selection::new(PixelPos::new(3.0, 4.0), PixelPos::new(1.0, 2.0));
        let out = buf.with_selection(&sel);

        for x in 0..10 {
            for y in 0..10 {
                let inside = (1..=3).contains(&x) && (6..=8).contains(&y);
                let expected = if inside { [0.5, 0.25, 0.125] } else { [1.0, 0.5, 0.25] };
                assert_eq!(out.get(x, y), Some(expected), "pixel ({x}, {y})");
            }
        }
        assert_eq!(buf, white(10, 10), "source buffer must not change");
    }

    #[test]
    fn selection_touching_top_edge_is_clipped() {
        let buf = white(4, 4);
        let sel = Selection::new(PixelPos::new(0.0, 0.0), PixelPos::new(10.0, 1.0));
        let out = buf.with_selection(&sel);
        // Grid rows 3..=4 clipped to row 3, all columns.
        for x in 0..4 {
            assert_eq!(out.get(x, 3), Some([0.5, 0.25, 0.125]));
            assert_eq!(out.get(x, 2), Some([1.0, 0.5, 0.25]));
        }
    }

    #[test]
    fn selection_outside_canvas_changes_nothing() {
        let buf = white(4, 4);
        let sel = Selection::new(PixelPos::new(8.0, 8.0), PixelPos::new(12.0, 12.0));
        assert_eq!(buf.with_selection(&sel), buf);
    }
}
