use crate::{
    compose::head::{HeadParts, build_head},
    customization::{
        palette::{Accessory, TailStyle},
        state::CatColors,
    },
    foundation::{
        color::Rgb,
        core::{Point, Rect},
    },
    scene::model::{NodeId, PartNode, PartTree, Primitive, Rig},
};

pub const TAIL_ORIGIN: Point = Point::new(38.0, 22.0);
pub const TAIL_LENGTH: f64 = 64.0;
pub const TAIL_THICKNESS: f64 = 12.0;
pub const STRIPE_SPACING: f64 = 12.0;
pub const STRIPE_WIDTH: f64 = 4.0;

pub const ORANGE_TAIL: Rgb = Rgb::new(0xff9933);
pub const ORANGE_STRIPE: Rgb = Rgb::new(0x000000);
pub const GREY_TAIL: Rgb = Rgb::new(0x9a9a9a);
pub const GREY_STRIPE: Rgb = Rgb::new(0x404040);

const TOE_PAD: Rgb = Rgb::new(0xffb3c6);
const WHACK_BURST: Rgb = Rgb::new(0xffdd00);
const WHACK_TEXT: Rgb = Rgb::new(0xcc0000);

/// Offset of the whack effect from the paw it is attached to.
pub const WHACK_FX_OFFSET: (f64, f64) = (26.0, -18.0);

/// Number of stripe rectangles a striped tail gets.
pub fn stripe_count() -> usize {
    (TAIL_LENGTH / STRIPE_SPACING).floor() as usize
}

/// Build the avatar's part tree from its customization.
///
/// Pure and deterministic: equal inputs produce equal trees. The root sits at the torso
/// center; the host places it on screen.
#[tracing::instrument(skip(colors))]
pub fn compose(colors: &CatColors, accessory: Accessory) -> PartTree {
    let mut tree = PartTree::new(PartNode::group("avatar"));
    let root = tree.root();

    build_torso(&mut tree, root, colors);
    build_rear_paws(&mut tree, root, colors);
    build_front_legs(&mut tree, root, colors);
    let front_paws = build_front_paws(&mut tree, root, colors);
    build_tail(&mut tree, root, colors.tail);
    let tail_tip = tree.add(
        root,
        PartNode::new(
            "tail_tip",
            Primitive::RoundedRect {
                rect: Rect::new(0.0, -7.0, 18.0, 7.0),
                radius: 7.0,
            },
        )
        .at(TAIL_ORIGIN.x + TAIL_LENGTH - 4.0, TAIL_ORIGIN.y)
        .fill(colors.tail_tip)
        .z(-1),
    );

    let head: HeadParts = build_head(&mut tree, root, colors, accessory);
    let whack_fx = build_whack_fx(&mut tree, root);

    tree.set_rig(Rig {
        head: head.head,
        eyes: head.eyes,
        eye_shades: head.eye_shades,
        pupils: head.pupils,
        ears: head.ears,
        whiskers: head.whiskers,
        tail_tip,
        whack_paw: front_paws[1],
        whack_fx,
        bubble: head.bubble,
        bubble_connector: head.bubble_connector,
        mouth_anchor: head.mouth_anchor,
    });

    tracing::debug!(parts = tree.len(), "composed avatar");
    tree
}

fn build_torso(tree: &mut PartTree, root: NodeId, colors: &CatColors) {
    // Narrow chest over a wider hip segment.
    tree.add(
        root,
        PartNode::new("chest", Primitive::Ellipse { rx: 36.0, ry: 32.0 })
            .at(0.0, -8.0)
            .fill(colors.body),
    );
    tree.add(
        root,
        PartNode::new("hips", Primitive::Ellipse { rx: 46.0, ry: 36.0 })
            .at(0.0, 26.0)
            .fill(colors.body),
    );
    tree.add(
        root,
        PartNode::new("belly", Primitive::Ellipse { rx: 26.0, ry: 30.0 })
            .at(0.0, 16.0)
            .fill(colors.belly),
    );
}

fn add_toe_pads(tree: &mut PartTree, paw: NodeId, pads: [(f64, f64); 3], radius: f64) {
    for (i, (x, y)) in pads.into_iter().enumerate() {
        tree.add(
            paw,
            PartNode::new(format!("toe_pad_{i}"), Primitive::Circle { radius })
                .at(x, y)
                .fill(TOE_PAD),
        );
    }
}

fn build_rear_paws(tree: &mut PartTree, root: NodeId, colors: &CatColors) {
    for (side, label) in [(-1.0, "left"), (1.0, "right")] {
        let paw = tree.add(
            root,
            PartNode::new(
                format!("rear_paw_{label}"),
                Primitive::Ellipse { rx: 15.0, ry: 8.0 },
            )
            .at(side * 40.0, 56.0)
            .fill(colors.paws),
        );
        add_toe_pads(tree, paw, [(-6.0, -1.0), (0.0, -3.0), (6.0, -1.0)], 2.2);
    }
}

fn build_front_legs(tree: &mut PartTree, root: NodeId, colors: &CatColors) {
    // Legs taper toward the paws and lean inward.
    const TOP_Y: f64 = 4.0;
    const BOTTOM_Y: f64 = 56.0;
    for (side, label) in [(-1.0, "left"), (1.0, "right")] {
        let top_x = side * 22.0;
        let bottom_x = side * 17.0;
        tree.add(
            root,
            PartNode::new(
                format!("front_leg_{label}"),
                Primitive::Polygon {
                    points: vec![
                        Point::new(top_x - 8.0, TOP_Y),
                        Point::new(top_x + 8.0, TOP_Y),
                        Point::new(bottom_x + 6.0, BOTTOM_Y),
                        Point::new(bottom_x - 6.0, BOTTOM_Y),
                    ],
                },
            )
            .fill(colors.body),
        );
    }
}

fn build_front_paws(tree: &mut PartTree, root: NodeId, colors: &CatColors) -> [NodeId; 2] {
    let mut paws = [root; 2];
    for (i, (side, label)) in [(-1.0, "left"), (1.0, "right")].into_iter().enumerate() {
        let mut node = PartNode::new(
            format!("front_paw_{label}"),
            Primitive::Ellipse { rx: 11.0, ry: 7.0 },
        )
        .at(side * 20.0, 58.0)
        .fill(colors.paws);
        // Toes point away from the body.
        node.transform.rotation_rad = side * 0.2;
        let paw = tree.add(root, node);
        add_toe_pads(tree, paw, [(-4.0, -3.0), (0.0, -4.0), (4.0, -3.0)], 1.8);
        paws[i] = paw;
    }
    paws
}

fn tail_rect() -> Rect {
    Rect::new(
        0.0,
        -TAIL_THICKNESS / 2.0,
        TAIL_LENGTH,
        TAIL_THICKNESS / 2.0,
    )
}

fn build_tail(tree: &mut PartTree, root: NodeId, style: TailStyle) -> NodeId {
    let (base, stripe) = match style {
        TailStyle::Solid(color) => {
            return tree.add(
                root,
                PartNode::new(
                    "tail",
                    Primitive::RoundedRect {
                        rect: tail_rect(),
                        radius: TAIL_THICKNESS / 2.0,
                    },
                )
                .at(TAIL_ORIGIN.x, TAIL_ORIGIN.y)
                .fill(color)
                .z(-1),
            );
        }
        TailStyle::OrangeStripes => (ORANGE_TAIL, ORANGE_STRIPE),
        TailStyle::GreyStripes => (GREY_TAIL, GREY_STRIPE),
    };

    let tail = tree.add(
        root,
        PartNode::new("tail", Primitive::Rect { rect: tail_rect() })
            .at(TAIL_ORIGIN.x, TAIL_ORIGIN.y)
            .fill(base)
            .z(-1),
    );
    let inset = (STRIPE_SPACING - STRIPE_WIDTH) / 2.0;
    for i in 0..stripe_count() {
        let x = i as f64 * STRIPE_SPACING + inset;
        tree.add(
            tail,
            PartNode::new(
                format!("tail_stripe_{i}"),
                Primitive::Rect {
                    rect: Rect::new(
                        x,
                        -TAIL_THICKNESS / 2.0,
                        x + STRIPE_WIDTH,
                        TAIL_THICKNESS / 2.0,
                    ),
                },
            )
            .fill(stripe),
        );
    }
    tail
}

/// Starburst plus "WHACK!" label, hidden until the paw-whack chain shows it.
fn build_whack_fx(tree: &mut PartTree, root: NodeId) -> NodeId {
    const SPIKES: usize = 8;
    let fx = tree.add(root, PartNode::group("whack_fx").z(10).hidden());

    let points = (0..SPIKES * 2)
        .map(|i| {
            let angle = std::f64::consts::PI * i as f64 / SPIKES as f64;
            let r = if i % 2 == 0 { 24.0 } else { 11.0 };
            Point::new(r * angle.cos(), r * angle.sin())
        })
        .collect();
    tree.add(
        fx,
        PartNode::new("whack_burst", Primitive::Polygon { points }).fill(WHACK_BURST),
    );
    tree.add(
        fx,
        PartNode::new(
            "whack_text",
            Primitive::Text {
                content: "WHACK!".to_owned(),
                size_px: 12.0,
                bold: true,
            },
        )
        .fill(WHACK_TEXT),
    );
    fx
}

#[cfg(test)]
#[path = "../../tests/unit/compose/compositor.rs"]
mod tests;
