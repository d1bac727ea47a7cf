/// Alias for `Result<T, CoreError>`.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised when constructing geometry primitives.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The grid cell size is zero, negative, or not finite.
    #[error("invalid grid size: {0} (must be positive and finite)")]
    InvalidGridSize(f64),

    /// A shape dimension is zero, negative, or not finite.
    #[error("invalid shape: {0}")]
    InvalidShape(String),
}
