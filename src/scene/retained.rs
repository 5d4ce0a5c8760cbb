use std::collections::BTreeMap;

use crate::{
    foundation::{
        color::Rgb,
        core::{Affine, Size, Transform2D},
    },
    scene::{
        model::{PartNode, Primitive},
        surface::{SceneHandle, SceneSurface},
    },
};

#[derive(Clone, Debug)]
struct RetainedEntry {
    name: String,
    primitive: Primitive,
    fill: Option<Rgb>,
    stroke: Option<Rgb>,
    transform: Transform2D,
    z: i32,
    visible: bool,
    parent: Option<SceneHandle>,
    children: Vec<SceneHandle>,
}

/// One primitive resolved for painting.
#[derive(Clone, Debug, PartialEq)]
pub struct DrawItem {
    pub name: String,
    pub primitive: Primitive,
    pub fill: Option<Rgb>,
    pub stroke: Option<Rgb>,
    /// Local-to-viewport transform.
    pub transform: Affine,
}

/// In-memory [`SceneSurface`] keeping the whole scene graph.
///
/// Used for offline rendering, the CLI and tests. It tracks how many primitives are alive
/// so tests can assert that teardown releases everything.
#[derive(Clone, Debug)]
pub struct RetainedScene {
    entries: BTreeMap<SceneHandle, RetainedEntry>,
    stage: SceneHandle,
    viewport: Size,
    next_handle: u64,
    created: u64,
    destroyed: u64,
}

impl RetainedScene {
    pub fn new(viewport: Size) -> Self {
        let stage = SceneHandle(0);
        let mut entries = BTreeMap::new();
        entries.insert(
            stage,
            RetainedEntry {
                name: "stage".to_owned(),
                primitive: Primitive::Group,
                fill: None,
                stroke: None,
                transform: Transform2D::default(),
                z: 0,
                visible: true,
                parent: None,
                children: Vec::new(),
            },
        );
        Self {
            entries,
            stage,
            viewport,
            next_handle: 1,
            created: 0,
            destroyed: 0,
        }
    }

    /// Change the viewport size (host window resize).
    pub fn resize(&mut self, viewport: Size) {
        self.viewport = viewport;
    }

    /// Number of live primitives, excluding the stage.
    pub fn live_count(&self) -> usize {
        self.entries.len() - 1
    }

    pub fn created_count(&self) -> u64 {
        self.created
    }

    pub fn destroyed_count(&self) -> u64 {
        self.destroyed
    }

    /// Direct children of the stage.
    pub fn stage_children(&self) -> &[SceneHandle] {
        self.entries
            .get(&self.stage)
            .map(|e| e.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn transform_of(&self, handle: SceneHandle) -> Option<Transform2D> {
        self.entries.get(&handle).map(|e| e.transform)
    }

    pub fn is_visible(&self, handle: SceneHandle) -> Option<bool> {
        self.entries.get(&handle).map(|e| e.visible)
    }

    /// Visible primitives in painter's order with resolved transforms.
    pub fn draw_list(&self) -> Vec<DrawItem> {
        let mut out = Vec::new();
        self.collect(self.stage, Affine::IDENTITY, &mut out);
        out
    }

    fn collect(&self, handle: SceneHandle, parent: Affine, out: &mut Vec<DrawItem>) {
        let Some(entry) = self.entries.get(&handle) else {
            return;
        };
        if !entry.visible {
            return;
        }
        let transform = parent * entry.transform.to_affine();
        if !matches!(entry.primitive, Primitive::Group) {
            out.push(DrawItem {
                name: entry.name.clone(),
                primitive: entry.primitive.clone(),
                fill: entry.fill,
                stroke: entry.stroke,
                transform,
            });
        }

        let mut children = entry.children.clone();
        children.sort_by_key(|c| self.entries.get(c).map_or(0, |e| e.z));
        for child in children {
            self.collect(child, transform, out);
        }
    }
}

impl SceneSurface for RetainedScene {
    fn stage(&self) -> SceneHandle {
        self.stage
    }

    fn viewport(&self) -> Size {
        self.viewport
    }

    fn create(&mut self, node: &PartNode) -> SceneHandle {
        let handle = SceneHandle(self.next_handle);
        self.next_handle += 1;
        self.created += 1;
        self.entries.insert(
            handle,
            RetainedEntry {
                name: node.name.clone(),
                primitive: node.primitive.clone(),
                fill: node.fill,
                stroke: node.stroke,
                transform: Transform2D::default(),
                z: 0,
                visible: true,
                parent: None,
                children: Vec::new(),
            },
        );
        handle
    }

    fn redraw(&mut self, handle: SceneHandle, node: &PartNode) {
        if let Some(entry) = self.entries.get_mut(&handle) {
            entry.primitive = node.primitive.clone();
            entry.fill = node.fill;
            entry.stroke = node.stroke;
        }
    }

    fn add_child(&mut self, parent: SceneHandle, child: SceneHandle) {
        if !self.entries.contains_key(&parent) || !self.entries.contains_key(&child) {
            return;
        }
        self.remove_from_parent(child);
        if let Some(p) = self.entries.get_mut(&parent) {
            p.children.push(child);
        }
        if let Some(c) = self.entries.get_mut(&child) {
            c.parent = Some(parent);
        }
    }

    fn remove_child(&mut self, parent: SceneHandle, child: SceneHandle) {
        if let Some(p) = self.entries.get_mut(&parent) {
            p.children.retain(|&c| c != child);
        }
        if let Some(c) = self.entries.get_mut(&child)
            && c.parent == Some(parent)
        {
            c.parent = None;
        }
    }

    fn set_transform(&mut self, handle: SceneHandle, transform: &Transform2D) {
        if let Some(entry) = self.entries.get_mut(&handle) {
            entry.transform = *transform;
        }
    }

    fn set_z_order(&mut self, handle: SceneHandle, z: i32) {
        if let Some(entry) = self.entries.get_mut(&handle) {
            entry.z = z;
        }
    }

    fn set_visible(&mut self, handle: SceneHandle, visible: bool) {
        if let Some(entry) = self.entries.get_mut(&handle) {
            entry.visible = visible;
        }
    }

    fn destroy(&mut self, handle: SceneHandle) {
        if handle == self.stage {
            return;
        }
        self.remove_from_parent(handle);
        if let Some(entry) = self.entries.remove(&handle) {
            self.destroyed += 1;
            for child in entry.children {
                if let Some(c) = self.entries.get_mut(&child) {
                    c.parent = None;
                }
            }
        }
    }
}

impl RetainedScene {
    fn remove_from_parent(&mut self, child: SceneHandle) {
        let parent = self.entries.get(&child).and_then(|e| e.parent);
        if let Some(parent) = parent {
            self.remove_child(parent, child);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/retained.rs"]
mod tests;
