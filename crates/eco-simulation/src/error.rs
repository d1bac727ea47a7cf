use eco_core::CoreError;

use crate::agent::EntityId;

/// Alias for `Result<T, SimError>`.
pub type SimResult<T> = Result<T, SimError>;

/// Errors raised by the simulation engine.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// Geometry construction failed (bad grid size or shape).
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The handle does not name a registered agent.
    #[error("entity not found in simulation: {0}")]
    EntityNotFound(EntityId),

    /// An agent with the same handle is already registered.
    #[error("entity already registered: {0}")]
    DuplicateEntity(EntityId),

    /// The frame rate passed to a tick is zero, negative, or not finite.
    #[error("invalid frame rate: {0} (must be positive and finite)")]
    InvalidFrameRate(f64),

    /// A configuration value is out of range.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// A registered system failed.
    #[error("system error: {0}")]
    SystemError(String),
}
