use huebrot_core::{Complex, EscapeTime, PixelPos, Viewport};
use huebrot_render::{
    apply, build_palette, FractalField, FractalKind, GridRenderer, GridSurface, Rgb, Selection,
    BLACK,
};

#[derive(Default)]
struct FrameLog {
    frames: Vec<Vec<Rgb>>,
}

impl GridRenderer for FrameLog {
    fn draw_grid(&mut self, vertices: &[[f32; 2]], colors: &[Rgb]) -> huebrot_render::Result<()> {
        assert_eq!(vertices.len(), colors.len());
        self.frames.push(colors.to_vec());
        Ok(())
    }
}

#[test]
fn end_to_end_mandelbrot_frame() {
    let mut field =
        FractalField::new(FractalKind::Mandelbrot, 120, 120, Viewport::default(), 100).unwrap();
    field.recompute(Complex::ZERO).unwrap();

    let mut surface = GridSurface::new(FrameLog::default(), 120, 120);
    surface.present(&field.renderable(None).data).unwrap();

    let frame = &surface.renderer().frames[0];
    assert_eq!(frame.len(), 120 * 120);
    assert!(frame.iter().any(|px| *px != BLACK), "image should not be all black");
    assert!(frame.iter().any(|px| *px == BLACK), "set interior should be black");
}

#[test]
fn end_to_end_julia_frame() {
    let mut field =
        FractalField::new(FractalKind::Julia, 64, 48, Viewport::default(), 80).unwrap();
    field.recompute(Complex::new(-1.0, 0.0)).unwrap();
    assert_eq!(field.grid().data.len(), 64 * 48);
    assert!(field.stats().escaped > 0);
    assert!(field.stats().bounded > 0);
}

#[test]
fn recompute_is_deterministic() {
    let mut a =
        FractalField::new(FractalKind::Mandelbrot, 50, 40, Viewport::default(), 60).unwrap();
    let mut b = a.clone();
    a.recompute(Complex::ZERO).unwrap();
    b.recompute(Complex::ZERO).unwrap();
    assert_eq!(a.grid(), b.grid());
    assert_eq!(a.colors(), b.colors());
}

#[test]
fn colors_follow_grid_exactly() {
    let mut field =
        FractalField::new(FractalKind::Mandelbrot, 32, 32, Viewport::default(), 50).unwrap();
    field.advance_offset(212);
    field.recompute(Complex::ZERO).unwrap();

    let palette = build_palette(50, 212);
    assert_eq!(field.palette(), &palette);
    assert_eq!(field.colors(), &apply(field.grid(), &palette).unwrap());
    for (cell, px) in field.grid().data.iter().zip(field.colors().data.iter()) {
        match cell {
            EscapeTime::NoEscape => assert_eq!(*px, BLACK),
            EscapeTime::Escaped(n) => assert_eq!(Some(*px), palette.get(*n)),
        }
    }
}

#[test]
fn palette_cycle_without_recompute() {
    let mut field =
        FractalField::new(FractalKind::Mandelbrot, 64, 64, Viewport::default(), 100).unwrap();
    field.recompute(Complex::ZERO).unwrap();
    let grid = field.grid().clone();
    let first = field.colors().clone();

    for _ in 0..90 {
        field.advance_offset(4);
        field.recolor().unwrap();
    }

    // A full turn brings the colors back.
    assert_eq!(field.offset(), 0);
    assert_eq!(field.colors(), &first);
    assert_eq!(field.grid(), &grid);
    assert_eq!(field.stats().recomputes, 1);
    assert_eq!(field.stats().recolors, 91);
}

#[test]
fn selection_overlay_does_not_touch_field() {
    let mut field =
        FractalField::new(FractalKind::Mandelbrot, 40, 40, Viewport::default(), 30).unwrap();
    field.recompute(Complex::ZERO).unwrap();
    let before = field.colors().clone();

    let sel = Selection::new(PixelPos::new(5.0, 5.0), PixelPos::new(20.0, 20.0));
    let shaded = field.renderable(Some(&sel)).into_owned();

    assert_eq!(field.colors(), &before);
    assert_ne!(shaded, before);
    // Column 10, grid row 40 - 10 = 30 is inside; row 10 is not.
    let inside = before.get(10, 30).unwrap();
    assert_eq!(shaded.get(10, 30), Some([inside[0] / 2.0, inside[1] / 2.0, inside[2] / 2.0]));
    assert_eq!(shaded.get(10, 10), before.get(10, 10));
}
