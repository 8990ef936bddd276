use thiserror::Error;

/// Errors originating from the coloring and drawing pipeline.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The drawing backend could not be acquired. Fatal to the session.
    #[error("rendering backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error("draw call has {vertices} vertices but {colors} colors")]
    ColorCountMismatch { vertices: usize, colors: usize },

    #[error("palette has {palette} entries but the grid needs {required}")]
    PaletteTooShort { palette: usize, required: u32 },

    #[error(transparent)]
    Core(#[from] huebrot_core::CoreError),
}
