//! Error type shared by the grid generators.

/// Errors returned by height-field generation and grid combinators.
///
/// Generation is pure arithmetic over validated inputs, so the only failure
/// mode is a rejected argument. Nothing is clamped or retried internally.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationError {
    /// A dimension, octave count, exponent or grid pairing was rejected.
    InvalidArgument(String),
}

impl std::fmt::Display for GenerationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenerationError::InvalidArgument(e) => write!(f, "Invalid argument: {}", e),
        }
    }
}

impl std::error::Error for GenerationError {}

/// Reject zero-sized grids.
pub(crate) fn check_dimensions(width: usize, height: usize) -> Result<(), GenerationError> {
    if width == 0 || height == 0 {
        return Err(GenerationError::InvalidArgument(format!(
            "grid dimensions must be positive, got {}x{}",
            width, height
        )));
    }
    Ok(())
}
