use std::{cell::RefCell, rc::Rc};

use crate::{
    foundation::core::{Point, Transform2D, Vec2},
    scene::{
        model::{NodeId, PartNode, PartTree, Rig},
        surface::{SceneHandle, SceneSurface},
    },
};

/// Scene collaborator shared between the controller and the live avatar.
pub type SharedSurface = Rc<RefCell<dyn SceneSurface>>;

/// A part tree attached to a scene surface.
///
/// Keeps the tree as the source of truth and mirrors every mutation onto the surface
/// handle created for the node. After [`LiveAvatar::destroy`] all mutators are no-ops.
pub struct LiveAvatar {
    tree: PartTree,
    surface: SharedSurface,
    // Indexed by `NodeId`.
    handles: Vec<SceneHandle>,
    attached: bool,
}

impl std::fmt::Debug for LiveAvatar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LiveAvatar")
            .field("parts", &self.tree.len())
            .field("attached", &self.attached)
            .finish()
    }
}

impl LiveAvatar {
    /// Create one primitive per node, rebuild the hierarchy and hang the root on the stage.
    #[tracing::instrument(skip_all, fields(parts = tree.len()))]
    pub fn attach(tree: PartTree, surface: SharedSurface) -> Self {
        let handles = {
            let mut scene = surface.borrow_mut();
            let handles: Vec<SceneHandle> = tree.iter().map(|(_, node)| scene.create(node)).collect();
            for (id, node) in tree.iter() {
                let handle = handles[id.0];
                scene.set_transform(handle, &node.transform);
                scene.set_z_order(handle, node.z);
                scene.set_visible(handle, node.visible);
                for child in &node.children {
                    scene.add_child(handle, handles[child.0]);
                }
            }
            let stage = scene.stage();
            scene.add_child(stage, handles[tree.root().0]);
            handles
        };
        Self {
            tree,
            surface,
            handles,
            attached: true,
        }
    }

    pub fn tree(&self) -> &PartTree {
        &self.tree
    }

    pub fn rig(&self) -> Option<&Rig> {
        self.tree.rig()
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn handle(&self, id: NodeId) -> Option<SceneHandle> {
        self.handles.get(id.0).copied()
    }

    pub fn root_handle(&self) -> SceneHandle {
        self.handles[self.tree.root().0]
    }

    /// Number of scene primitives this avatar owns.
    pub fn handle_count(&self) -> usize {
        self.handles.len()
    }

    /// Edit a node's local transform and push it to the surface.
    pub fn update_transform(&mut self, id: NodeId, edit: impl FnOnce(&mut Transform2D)) {
        if !self.attached || self.tree.get(id).is_none() {
            return;
        }
        let node = self.tree.node_mut(id);
        edit(&mut node.transform);
        let transform = node.transform;
        self.surface
            .borrow_mut()
            .set_transform(self.handles[id.0], &transform);
    }

    pub fn set_visible(&mut self, id: NodeId, visible: bool) {
        if !self.attached || self.tree.get(id).is_none() {
            return;
        }
        self.tree.node_mut(id).visible = visible;
        self.surface
            .borrow_mut()
            .set_visible(self.handles[id.0], visible);
    }

    /// Edit a node's primitive or paint and redraw it.
    pub fn redraw(&mut self, id: NodeId, edit: impl FnOnce(&mut PartNode)) {
        if !self.attached || self.tree.get(id).is_none() {
            return;
        }
        let node = self.tree.node_mut(id);
        edit(node);
        self.surface.borrow_mut().redraw(self.handles[id.0], node);
    }

    /// Move the avatar root to `center` in stage coordinates.
    pub fn place_at(&mut self, center: Point) {
        let root = self.tree.root();
        self.update_transform(root, |t| t.translate = Vec2::new(center.x, center.y));
    }

    /// Detach the root from the stage and destroy every primitive. Idempotent.
    pub fn destroy(&mut self) {
        if !self.attached {
            return;
        }
        self.attached = false;
        let mut scene = self.surface.borrow_mut();
        let stage = scene.stage();
        scene.remove_child(stage, self.handles[self.tree.root().0]);
        // Children first, so no primitive outlives its parent.
        for &handle in self.handles.iter().rev() {
            scene.destroy(handle);
        }
        tracing::debug!(destroyed = self.handles.len(), "avatar detached");
    }
}

impl Drop for LiveAvatar {
    fn drop(&mut self) {
        self.destroy();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/live.rs"]
mod tests;
