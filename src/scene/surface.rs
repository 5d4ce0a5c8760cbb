use crate::{
    foundation::core::{Size, Transform2D},
    scene::model::PartNode,
};

/// Opaque handle to a primitive created on a [`SceneSurface`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SceneHandle(pub u64);

/// The drawing collaborator an avatar is attached to.
///
/// The avatar core never touches pixels; it only creates primitives, arranges them into a
/// hierarchy and updates their transform, z-order and visibility through this interface.
pub trait SceneSurface {
    /// The surface's top-level container.
    fn stage(&self) -> SceneHandle;

    /// Current viewport size in pixels.
    fn viewport(&self) -> Size;

    /// Create a detached primitive from `node`'s shape and paint.
    fn create(&mut self, node: &PartNode) -> SceneHandle;

    /// Replace the shape and paint of an existing primitive.
    fn redraw(&mut self, handle: SceneHandle, node: &PartNode);

    fn add_child(&mut self, parent: SceneHandle, child: SceneHandle);

    fn remove_child(&mut self, parent: SceneHandle, child: SceneHandle);

    fn set_transform(&mut self, handle: SceneHandle, transform: &Transform2D);

    fn set_z_order(&mut self, handle: SceneHandle, z: i32);

    fn set_visible(&mut self, handle: SceneHandle, visible: bool);

    /// Destroy a primitive. Children must be destroyed separately.
    fn destroy(&mut self, handle: SceneHandle);
}
