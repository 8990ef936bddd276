use thiserror::Error;

/// Configuration errors: parameters the core refuses to work with.
///
/// The outer layer is expected to validate user input first; these are
/// raised when a precondition still slips through, and the operation that
/// hit them leaves prior state untouched.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    #[error("invalid max iterations: {0} (must be >= 1)")]
    InvalidMaxIterations(u32),

    #[error("invalid viewport: {reason}")]
    InvalidViewport { reason: String },

    #[error("invalid Julia seed: {re} + {im}i (must be finite)")]
    InvalidSeed { re: f64, im: f64 },

    #[error("invalid canvas dimensions: {width}×{height}")]
    InvalidCanvas { width: u32, height: u32 },
}
