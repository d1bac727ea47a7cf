//! Geometry primitives for the ecosystem simulation.
//!
//! This crate knows nothing about agents: it provides positions with eased
//! steering, the closed [`Shape`] variant, the uniform-cell [`SpatialGrid`]
//! used as the broad phase, and the narrow-phase tests in [`collision`].
//! The simulation crate layers agent kinds and lifecycle rules on top.

/// Narrow-phase collision tests and shape-pair dispatch.
pub mod collision;
/// Error types used throughout the crate.
pub mod error;
/// Uniform-cell spatial hash used for broad-phase lookups.
pub mod grid;
/// 2D positions and eased steering.
pub mod position;
/// Circle and rectangle shape variants.
pub mod shape;

/// Re-export collision dispatch types.
pub use collision::{Body, CollisionTest};
/// Re-export error types.
pub use error::{CoreError, CoreResult};
/// Re-export grid types.
pub use grid::{CellKey, SpatialGrid};
/// Re-export the position type.
pub use position::Position;
/// Re-export shape types.
pub use shape::{Circle, Rectangle, Shape};
