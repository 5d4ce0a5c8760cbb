use std::f64::consts::{FRAC_PI_2, PI};

use crate::{
    customization::{
        palette::{Accessory, EyeStyle, NoseStyle},
        state::CatColors,
    },
    foundation::{
        color::{Rgb, shade},
        core::{Point, Rect},
        math::catenary_y,
    },
    scene::model::{NodeId, PartNode, PartTree, Primitive},
};

/// Head origin relative to the torso center.
pub const HEAD_OFFSET: (f64, f64) = (0.0, -62.0);
pub const HEAD_RADIUS: f64 = 34.0;

pub const SPLIT_EYE_LEFT: Rgb = Rgb::new(0x00c040);
pub const SPLIT_EYE_RIGHT: Rgb = Rgb::new(0x80d0ff);
pub const NOSE_LEFT_HALF: Rgb = Rgb::new(0x000000);
pub const NOSE_RIGHT_HALF: Rgb = Rgb::new(0x808080);

const PUPIL: Rgb = Rgb::new(0x000000);
const LINE: Rgb = Rgb::new(0x222222);
const WHISKER: Rgb = Rgb::new(0x333333);
const HAT: Rgb = Rgb::new(0x1a1a1a);
const BEAD: Rgb = Rgb::new(0xf5f5f5);
const BUBBLE: Rgb = Rgb::new(0xffffff);

/// Necklace curve: beads hang from `NECK_Y` with catenary parameter `CHAIN_A`.
pub const NECK_Y: f64 = 30.0;
pub const CHAIN_A: f64 = 30.0;
pub const BEAD_SPACING: f64 = 6.0;
pub const BEAD_HALF_SPAN: f64 = 24.0;

pub(crate) struct HeadParts {
    pub(crate) head: NodeId,
    pub(crate) ears: [NodeId; 2],
    pub(crate) eye_shades: [NodeId; 2],
    pub(crate) eyes: [NodeId; 2],
    pub(crate) pupils: [NodeId; 2],
    pub(crate) whiskers: NodeId,
    pub(crate) bubble: NodeId,
    pub(crate) bubble_connector: NodeId,
    pub(crate) mouth_anchor: Point,
}

const SIDES: [(f64, &str); 2] = [(-1.0, "left"), (1.0, "right")];

pub(crate) fn build_head(
    tree: &mut PartTree,
    parent: NodeId,
    colors: &CatColors,
    accessory: Accessory,
) -> HeadParts {
    let head = tree.add(
        parent,
        PartNode::group("head").at(HEAD_OFFSET.0, HEAD_OFFSET.1),
    );
    tree.add(
        head,
        PartNode::new("head_disc", Primitive::Circle { radius: HEAD_RADIUS }).fill(colors.body),
    );

    let ears = build_ears(tree, head, colors.ears);
    let (eye_shades, eyes, pupils) = build_eyes(tree, head, colors);

    tree.add(
        head,
        PartNode::new("muzzle", Primitive::Ellipse { rx: 15.0, ry: 10.0 })
            .at(0.0, 12.0)
            .fill(colors.muzzle),
    );
    build_nose(tree, head, colors.nose);
    let mouth_anchor = build_mouth(tree, head);
    let whiskers = build_whiskers(tree, head);

    match accessory {
        Accessory::None => {}
        Accessory::TopHat => build_top_hat(tree, head),
        Accessory::Necklace => build_necklace(tree, head),
    }

    let bubble_connector = tree.add(
        head,
        PartNode::new(
            "bubble_connector",
            Primitive::Segments {
                lines: vec![[mouth_anchor, mouth_anchor]],
                width: 1.5,
            },
        )
        .stroke(LINE)
        .z(4)
        .hidden(),
    );
    let bubble = build_bubble(tree, head);

    HeadParts {
        head,
        ears,
        eye_shades,
        eyes,
        pupils,
        whiskers,
        bubble,
        bubble_connector,
        mouth_anchor,
    }
}

fn build_ears(tree: &mut PartTree, head: NodeId, color: Rgb) -> [NodeId; 2] {
    let mut ears = [head; 2];
    for (i, (side, label)) in SIDES.into_iter().enumerate() {
        // Ear groups sit on the ear base so twitches pivot there.
        let ear = tree.add(
            head,
            PartNode::group(format!("ear_{label}"))
                .at(side * 20.0, -24.0)
                .z(-1),
        );
        tree.add(
            ear,
            PartNode::new(
                format!("ear_{label}_outer"),
                Primitive::Polygon {
                    points: vec![
                        Point::new(-11.0, 2.0),
                        Point::new(11.0, 2.0),
                        Point::new(side * 4.0, -24.0),
                    ],
                },
            )
            .fill(color),
        );
        tree.add(
            ear,
            PartNode::new(
                format!("ear_{label}_inner"),
                Primitive::Polygon {
                    points: vec![
                        Point::new(-6.0, 0.0),
                        Point::new(6.0, 0.0),
                        Point::new(side * 3.0, -16.0),
                    ],
                },
            )
            .fill(shade(color, 0.3)),
        );
        ears[i] = ear;
    }
    ears
}

type EyeNodes = ([NodeId; 2], [NodeId; 2], [NodeId; 2]);

fn build_eyes(tree: &mut PartTree, head: NodeId, colors: &CatColors) -> EyeNodes {
    let iris = match colors.eyes {
        EyeStyle::Solid(c) => [c, c],
        EyeStyle::GreenBlueSplit => [SPLIT_EYE_LEFT, SPLIT_EYE_RIGHT],
    };

    let mut shades = [head; 2];
    let mut eyes = [head; 2];
    let mut pupils = [head; 2];
    for (i, (side, label)) in SIDES.into_iter().enumerate() {
        let (x, y) = (side * 13.0, -6.0);
        shades[i] = tree.add(
            head,
            PartNode::new(format!("eye_shade_{label}"), Primitive::Circle { radius: 10.0 })
                .at(x, y)
                .fill(colors.eye_base),
        );
        eyes[i] = tree.add(
            head,
            PartNode::new(format!("eye_{label}"), Primitive::Ellipse { rx: 7.0, ry: 8.0 })
                .at(x, y)
                .fill(iris[i]),
        );
        pupils[i] = tree.add(
            head,
            PartNode::new(
                format!("pupil_{label}"),
                Primitive::Rect {
                    rect: Rect::new(-1.5, -6.0, 1.5, 6.0),
                },
            )
            .at(x, y)
            .fill(PUPIL),
        );
    }
    (shades, eyes, pupils)
}

fn build_nose(tree: &mut PartTree, head: NodeId, style: NoseStyle) {
    let (x, y) = (0.0, 6.0);
    match style {
        NoseStyle::Solid(color) => {
            tree.add(
                head,
                PartNode::new("nose", Primitive::Circle { radius: 4.0 })
                    .at(x, y)
                    .fill(color),
            );
        }
        NoseStyle::HalfBlackGrey => {
            let nose = tree.add(head, PartNode::group("nose").at(x, y));
            // y points down: the left half runs from straight down through 180° to straight up.
            tree.add(
                nose,
                PartNode::new(
                    "nose_left",
                    Primitive::Arc {
                        radius: 4.0,
                        start_angle: FRAC_PI_2,
                        sweep_angle: PI,
                    },
                )
                .fill(NOSE_LEFT_HALF),
            );
            tree.add(
                nose,
                PartNode::new(
                    "nose_right",
                    Primitive::Arc {
                        radius: 4.0,
                        start_angle: -FRAC_PI_2,
                        sweep_angle: PI,
                    },
                )
                .fill(NOSE_RIGHT_HALF),
            );
        }
    }
}

/// Mouth below the nose; returns the anchor the speech-bubble connector starts from.
fn build_mouth(tree: &mut PartTree, head: NodeId) -> Point {
    let top = Point::new(0.0, 10.0);
    let split = Point::new(0.0, 14.0);
    let left = Point::new(-5.0, 18.0);
    let right = Point::new(5.0, 18.0);
    tree.add(
        head,
        PartNode::new(
            "mouth",
            Primitive::Segments {
                lines: vec![[top, split], [split, left], [split, right]],
                width: 1.5,
            },
        )
        .stroke(LINE)
        .z(1),
    );
    Point::new(0.0, 18.0)
}

fn build_whiskers(tree: &mut PartTree, head: NodeId) -> NodeId {
    let group = tree.add(head, PartNode::group("whiskers").at(0.0, 12.0).z(2));
    for (side, label) in SIDES {
        for i in 0..3 {
            let fi = f64::from(i);
            let from = Point::new(side * 10.0, -2.0 + fi * 3.0);
            let to = Point::new(side * 36.0, -8.0 + fi * 6.0);
            tree.add(
                group,
                PartNode::new(
                    format!("whisker_{label}_{i}"),
                    Primitive::Segments {
                        lines: vec![[from, to]],
                        width: 1.0,
                    },
                )
                .stroke(WHISKER),
            );
        }
    }
    group
}

fn build_top_hat(tree: &mut PartTree, head: NodeId) {
    let hat = tree.add(head, PartNode::group("top_hat").at(0.0, -30.0).z(3));
    tree.add(
        hat,
        PartNode::new(
            "hat_brim",
            Primitive::Polygon {
                points: vec![
                    Point::new(-26.0, 0.0),
                    Point::new(26.0, 0.0),
                    Point::new(22.0, -5.0),
                    Point::new(-22.0, -5.0),
                ],
            },
        )
        .fill(HAT),
    );
    tree.add(
        hat,
        PartNode::new(
            "hat_crown",
            Primitive::Polygon {
                points: vec![
                    Point::new(-16.0, -5.0),
                    Point::new(16.0, -5.0),
                    Point::new(13.0, -34.0),
                    Point::new(-13.0, -34.0),
                ],
            },
        )
        .fill(HAT),
    );
}

/// Beads positioned on a hanging-chain curve across the neck.
pub fn necklace_bead_positions() -> Vec<Point> {
    let count = (2.0 * BEAD_HALF_SPAN / BEAD_SPACING).round() as usize + 1;
    (0..count)
        .map(|i| {
            let x = -BEAD_HALF_SPAN + i as f64 * BEAD_SPACING;
            Point::new(x, catenary_y(x, NECK_Y, CHAIN_A))
        })
        .collect()
}

fn build_necklace(tree: &mut PartTree, head: NodeId) {
    let necklace = tree.add(head, PartNode::group("necklace").z(3));
    for (i, p) in necklace_bead_positions().into_iter().enumerate() {
        tree.add(
            necklace,
            PartNode::new(format!("bead_{i}"), Primitive::Circle { radius: 2.5 })
                .at(p.x, p.y)
                .fill(BEAD),
        );
    }
}

fn build_bubble(tree: &mut PartTree, head: NodeId) -> NodeId {
    let bubble = tree.add(head, PartNode::group("speech_bubble").z(5).hidden());
    tree.add(
        bubble,
        PartNode::new(
            "bubble_body",
            Primitive::RoundedRect {
                rect: Rect::new(-32.0, -14.0, 32.0, 14.0),
                radius: 8.0,
            },
        )
        .fill(BUBBLE)
        .stroke(LINE),
    );
    tree.add(
        bubble,
        PartNode::new(
            "bubble_text",
            Primitive::Text {
                content: "meow!".to_owned(),
                size_px: 14.0,
                bold: false,
            },
        )
        .fill(LINE),
    );
    bubble
}
