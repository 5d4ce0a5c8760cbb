//! Shared primitives: geometry, colors, randomness and the error taxonomy.

/// RGB colors and shading.
pub mod color;
/// Geometry re-exports, time spans and transforms.
pub mod core;
/// Error taxonomy.
pub mod error;
/// PRNG and curve helpers.
pub mod math;
