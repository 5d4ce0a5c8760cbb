//! The part compositor: customization in, part tree out.

/// Torso, legs, paws, tail and effect parts; the `compose` entry point.
pub mod compositor;
/// Head sub-tree: ears, eyes, muzzle, nose, mouth, whiskers, accessories, speech bubble.
pub mod head;
