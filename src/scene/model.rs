use serde::Serialize;

use crate::foundation::{
    color::Rgb,
    core::{Affine, Point, Rect, Transform2D, Vec2},
};

/// Index of a node inside its [`PartTree`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct NodeId(pub usize);

/// Shape primitive carried by a part. Geometry is in the node's local space.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Primitive {
    /// Pure container; draws nothing itself.
    Group,
    /// Ellipse centered on the local origin.
    Ellipse { rx: f64, ry: f64 },
    /// Circle centered on the local origin.
    Circle { radius: f64 },
    /// Axis-aligned rectangle.
    Rect { rect: Rect },
    /// Axis-aligned rectangle with rounded corners.
    RoundedRect { rect: Rect, radius: f64 },
    /// Closed filled polygon.
    Polygon { points: Vec<Point> },
    /// Filled circular wedge centered on the local origin (angles in radians, y down).
    Arc {
        radius: f64,
        start_angle: f64,
        sweep_angle: f64,
    },
    /// Unfilled line segments drawn with the node's stroke color.
    Segments { lines: Vec<[Point; 2]>, width: f64 },
    /// Text centered on the local origin.
    Text {
        content: String,
        size_px: f64,
        bold: bool,
    },
}

/// One drawable part: primitive, paint, placement relative to the parent, draw-order override.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PartNode {
    pub name: String,
    pub primitive: Primitive,
    pub transform: Transform2D,
    pub fill: Option<Rgb>,
    pub stroke: Option<Rgb>,
    /// Draw order among siblings; ties keep insertion order.
    pub z: i32,
    pub visible: bool,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

impl PartNode {
    pub fn new(name: impl Into<String>, primitive: Primitive) -> Self {
        Self {
            name: name.into(),
            primitive,
            transform: Transform2D::default(),
            fill: None,
            stroke: None,
            z: 0,
            visible: true,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn group(name: impl Into<String>) -> Self {
        Self::new(name, Primitive::Group)
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.transform.translate = Vec2::new(x, y);
        self
    }

    pub fn fill(mut self, color: Rgb) -> Self {
        self.fill = Some(color);
        self
    }

    pub fn stroke(mut self, color: Rgb) -> Self {
        self.stroke = Some(color);
        self
    }

    pub fn z(mut self, z: i32) -> Self {
        self.z = z;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }
}

/// Node handles the animation chains drive.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Rig {
    pub head: NodeId,
    pub eyes: [NodeId; 2],
    pub eye_shades: [NodeId; 2],
    pub pupils: [NodeId; 2],
    pub ears: [NodeId; 2],
    pub whiskers: NodeId,
    pub tail_tip: NodeId,
    pub whack_paw: NodeId,
    pub whack_fx: NodeId,
    pub bubble: NodeId,
    pub bubble_connector: NodeId,
    /// Where the bubble connector starts, in head space.
    pub mouth_anchor: Point,
}

/// Rooted tree of shape primitives composing one avatar.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PartTree {
    nodes: Vec<PartNode>,
    root: NodeId,
    rig: Option<Rig>,
}

impl PartTree {
    pub fn new(root: PartNode) -> Self {
        Self {
            nodes: vec![PartNode {
                parent: None,
                children: Vec::new(),
                ..root
            }],
            root: NodeId(0),
            rig: None,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Append `node` as the last child of `parent`.
    pub fn add(&mut self, parent: NodeId, node: PartNode) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(PartNode {
            parent: Some(parent),
            children: Vec::new(),
            ..node
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    pub fn node(&self, id: NodeId) -> &PartNode {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut PartNode {
        &mut self.nodes[id.0]
    }

    pub fn get(&self, id: NodeId) -> Option<&PartNode> {
        self.nodes.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn rig(&self) -> Option<&Rig> {
        self.rig.as_ref()
    }

    pub fn set_rig(&mut self, rig: Rig) {
        self.rig = Some(rig);
    }

    /// First node (in insertion order) with the given name.
    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.nodes.iter().position(|n| n.name == name).map(NodeId)
    }

    /// All nodes whose name starts with `prefix`, in insertion order.
    pub fn find_all<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = NodeId> + 'a {
        self.nodes
            .iter()
            .enumerate()
            .filter(move |(_, n)| n.name.starts_with(prefix))
            .map(|(i, _)| NodeId(i))
    }

    /// Children of `id` in painter's order: ascending z, ties by insertion.
    pub fn children_in_draw_order(&self, id: NodeId) -> Vec<NodeId> {
        let mut children = self.nodes[id.0].children.clone();
        // Stable sort keeps insertion order for equal z.
        children.sort_by_key(|c| self.nodes[c.0].z);
        children
    }

    /// Every node in painter's order, parents before children.
    pub fn draw_order(&self) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            out.push(id);
            let children = self.children_in_draw_order(id);
            stack.extend(children.into_iter().rev());
        }
        out
    }

    /// Transform from `id`'s local space into the tree root's parent space.
    pub fn world_transform(&self, id: NodeId) -> Affine {
        let mut affine = Affine::IDENTITY;
        let mut cursor = Some(id);
        while let Some(c) = cursor {
            let node = &self.nodes[c.0];
            affine = node.transform.to_affine() * affine;
            cursor = node.parent;
        }
        affine
    }

    /// Whether `id` and all of its ancestors are visible.
    pub fn is_effectively_visible(&self, id: NodeId) -> bool {
        let mut cursor = Some(id);
        while let Some(c) = cursor {
            let node = &self.nodes[c.0];
            if !node.visible {
                return false;
            }
            cursor = node.parent;
        }
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &PartNode)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/model.rs"]
mod tests;
