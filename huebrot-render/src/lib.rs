pub mod buffer;
pub mod error;
pub mod field;
pub mod iteration_buffer;
pub mod palette;
pub mod renderer;

pub use buffer::{ColorBuffer, Selection};
pub use error::RenderError;
pub use field::{FieldPhase, FieldStats, FractalField, FractalKind};
pub use iteration_buffer::IterationGrid;
pub use palette::{apply, build_palette, HuePalette, Rgb, BLACK, HUE_STRIDE};
pub use renderer::{grid_vertices, GridRenderer, GridSurface};

/// Convenience result type for the render crate.
pub type Result<T> = std::result::Result<T, RenderError>;
