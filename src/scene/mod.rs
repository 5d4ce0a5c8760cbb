//! Part trees and the drawing collaborator they are attached to.

/// A part tree attached to a surface, mirroring every mutation.
pub mod live;
/// The avatar's tree of shape primitives.
pub mod model;
/// In-memory scene graph implementation.
pub mod retained;
/// The scene-graph interface.
pub mod surface;
