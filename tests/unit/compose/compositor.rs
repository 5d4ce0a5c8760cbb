use super::*;
use crate::{
    compose::head::{
        BEAD_SPACING, NOSE_LEFT_HALF, NOSE_RIGHT_HALF, SPLIT_EYE_LEFT, SPLIT_EYE_RIGHT,
        necklace_bead_positions,
    },
    customization::palette::{EyeStyle, NoseStyle},
    foundation::color::shade,
};

// Torso 24 (root, 3 torso ellipses, 2 rear paws + 6 pads, 2 legs, 2 front paws + 6 pads,
// tail, tail tip), head 28, whack effect 3.
const DEFAULT_PART_COUNT: usize = 55;

fn fill_of(tree: &PartTree, name: &str) -> Option<Rgb> {
    tree.find(name).and_then(|id| tree.node(id).fill)
}

#[test]
fn default_state_composes_expected_parts() {
    let tree = compose(&CatColors::default(), Accessory::None);
    assert_eq!(tree.len(), DEFAULT_PART_COUNT);
    assert_eq!(fill_of(&tree, "eye_left"), Some(Rgb::new(0x00ff00)));
    assert_eq!(fill_of(&tree, "eye_right"), Some(Rgb::new(0x00ff00)));
    assert!(tree.find("top_hat").is_none());
    assert!(tree.find("necklace").is_none());
    assert!(tree.rig().is_some());
}

#[test]
fn compose_is_deterministic() {
    let colors = CatColors::default();
    assert_eq!(
        compose(&colors, Accessory::Necklace),
        compose(&colors, Accessory::Necklace)
    );
}

#[test]
fn part_colors_follow_customization() {
    let colors = CatColors {
        body: Rgb::new(0x111111),
        belly: Rgb::new(0x222222),
        paws: Rgb::new(0x333333),
        ears: Rgb::new(0x444444),
        muzzle: Rgb::new(0x555555),
        eye_base: Rgb::new(0x666666),
        tail_tip: Rgb::new(0x777777),
        ..CatColors::default()
    };
    let tree = compose(&colors, Accessory::None);
    for name in ["chest", "hips", "front_leg_left", "front_leg_right", "head_disc"] {
        assert_eq!(fill_of(&tree, name), Some(colors.body), "{name}");
    }
    assert_eq!(fill_of(&tree, "belly"), Some(colors.belly));
    assert_eq!(fill_of(&tree, "front_paw_right"), Some(colors.paws));
    assert_eq!(fill_of(&tree, "rear_paw_left"), Some(colors.paws));
    assert_eq!(fill_of(&tree, "ear_left_outer"), Some(colors.ears));
    assert_eq!(fill_of(&tree, "muzzle"), Some(colors.muzzle));
    assert_eq!(fill_of(&tree, "eye_shade_right"), Some(colors.eye_base));
    assert_eq!(fill_of(&tree, "tail_tip"), Some(colors.tail_tip));
}

#[test]
fn front_legs_are_tapered_polygons() {
    let tree = compose(&CatColors::default(), Accessory::None);
    let leg = tree.node(tree.find("front_leg_left").unwrap());
    let Primitive::Polygon { points } = &leg.primitive else {
        panic!("front leg should be a polygon");
    };
    let top_width = (points[1].x - points[0].x).abs();
    let bottom_width = (points[2].x - points[3].x).abs();
    assert!(bottom_width < top_width);
}

#[test]
fn solid_tail_is_a_single_rounded_rect_behind_the_torso() {
    let tree = compose(&CatColors::default(), Accessory::None);
    let tail = tree.node(tree.find("tail").unwrap());
    assert!(matches!(tail.primitive, Primitive::RoundedRect { .. }));
    assert!(tail.children.is_empty());
    assert!(tail.z < 0);
    assert!(tree.node(tree.find("tail_tip").unwrap()).z < 0);
}

#[test]
fn orange_stripes_are_evenly_spaced_and_counted() {
    let colors = CatColors {
        tail: TailStyle::OrangeStripes,
        ..CatColors::default()
    };
    let tree = compose(&colors, Accessory::None);
    let tail_id = tree.find("tail").unwrap();
    let tail = tree.node(tail_id);
    assert!(matches!(tail.primitive, Primitive::Rect { .. }));
    assert_eq!(tail.fill, Some(ORANGE_TAIL));

    let stripes: Vec<_> = tree.find_all("tail_stripe_").collect();
    assert_eq!(
        stripes.len(),
        (TAIL_LENGTH / STRIPE_SPACING).floor() as usize
    );
    assert_eq!(stripes.len(), stripe_count());
    assert_eq!(tree.len(), DEFAULT_PART_COUNT + stripes.len());

    let xs: Vec<f64> = stripes
        .iter()
        .map(|&id| {
            let node = tree.node(id);
            assert_eq!(node.parent, Some(tail_id));
            assert_eq!(node.fill, Some(ORANGE_STRIPE));
            match node.primitive {
                Primitive::Rect { rect } => rect.x0,
                ref other => panic!("unexpected stripe primitive {other:?}"),
            }
        })
        .collect();
    for pair in xs.windows(2) {
        assert!((pair[1] - pair[0] - STRIPE_SPACING).abs() < 1e-9);
    }
}

#[test]
fn grey_stripes_use_dark_grey() {
    let colors = CatColors {
        tail: TailStyle::GreyStripes,
        ..CatColors::default()
    };
    let tree = compose(&colors, Accessory::None);
    assert_eq!(fill_of(&tree, "tail"), Some(GREY_TAIL));
    assert_eq!(fill_of(&tree, "tail_stripe_0"), Some(GREY_STRIPE));
}

#[test]
fn split_eyes_use_fixed_colors() {
    let colors = CatColors {
        eyes: EyeStyle::GreenBlueSplit,
        ..CatColors::default()
    };
    let tree = compose(&colors, Accessory::None);
    assert_eq!(fill_of(&tree, "eye_left"), Some(SPLIT_EYE_LEFT));
    assert_eq!(fill_of(&tree, "eye_right"), Some(SPLIT_EYE_RIGHT));
    assert!(tree.find("pupil_left").is_some());
    assert!(tree.find("pupil_right").is_some());
}

#[test]
fn half_nose_is_two_half_arcs() {
    let colors = CatColors {
        nose: NoseStyle::HalfBlackGrey,
        ..CatColors::default()
    };
    let tree = compose(&colors, Accessory::None);
    let nose = tree.node(tree.find("nose").unwrap());
    assert_eq!(nose.children.len(), 2);
    for (name, color) in [("nose_left", NOSE_LEFT_HALF), ("nose_right", NOSE_RIGHT_HALF)] {
        let half = tree.node(tree.find(name).unwrap());
        assert_eq!(half.fill, Some(color));
        match half.primitive {
            Primitive::Arc { sweep_angle, .. } => {
                assert!((sweep_angle - std::f64::consts::PI).abs() < 1e-12);
            }
            ref other => panic!("unexpected nose primitive {other:?}"),
        }
    }
}

#[test]
fn head_features_live_under_the_head_origin() {
    let tree = compose(&CatColors::default(), Accessory::TopHat);
    let head = tree.find("head").unwrap();
    for name in [
        "ear_left", "eye_left", "muzzle", "nose", "mouth", "whiskers", "top_hat", "speech_bubble",
    ] {
        let id = tree.find(name).unwrap();
        assert_eq!(tree.node(id).parent, Some(head), "{name}");
    }
    assert_eq!(tree.len(), DEFAULT_PART_COUNT + 3);
}

#[test]
fn mouth_and_whiskers_are_stroked_segments() {
    let tree = compose(&CatColors::default(), Accessory::None);
    let mouth = tree.node(tree.find("mouth").unwrap());
    match &mouth.primitive {
        Primitive::Segments { lines, .. } => assert_eq!(lines.len(), 3),
        other => panic!("unexpected mouth primitive {other:?}"),
    }
    assert!(mouth.stroke.is_some());
    assert_eq!(tree.find_all("whisker_").count(), 6);
}

#[test]
fn necklace_beads_follow_the_hanging_chain() {
    let tree = compose(&CatColors::default(), Accessory::Necklace);
    let positions = necklace_bead_positions();
    let beads: Vec<_> = tree.find_all("bead_").collect();
    assert_eq!(beads.len(), positions.len());
    assert_eq!(tree.len(), DEFAULT_PART_COUNT + 1 + beads.len());

    let center = positions.len() / 2;
    assert!(positions[center].x.abs() < 1e-9);
    for (i, p) in positions.iter().enumerate() {
        if i != center {
            assert!(p.y < positions[center].y);
        }
        let node = tree.node(beads[i]);
        assert_eq!(node.transform.translate.x, p.x);
        assert_eq!(node.transform.translate.y, p.y);
    }
    assert!((positions[1].x - positions[0].x - BEAD_SPACING).abs() < 1e-9);
}

#[test]
fn bubble_connector_and_whack_effect_start_hidden() {
    let tree = compose(&CatColors::default(), Accessory::None);
    let rig = tree.rig().unwrap();
    assert!(!tree.node(rig.bubble).visible);
    assert!(!tree.node(rig.bubble_connector).visible);
    assert!(!tree.node(rig.whack_fx).visible);
    assert_eq!(tree.node(rig.whack_paw).name, "front_paw_right");

    let texts: Vec<String> = tree
        .iter()
        .filter_map(|(_, n)| match &n.primitive {
            Primitive::Text { content, .. } => Some(content.clone()),
            _ => None,
        })
        .collect();
    assert!(texts.contains(&"meow!".to_owned()));
    assert!(texts.contains(&"WHACK!".to_owned()));
}

#[test]
fn inner_ears_are_a_lighter_shade_of_the_ears() {
    let colors = CatColors {
        ears: Rgb::new(0x804020),
        ..CatColors::default()
    };
    let tree = compose(&colors, Accessory::None);
    for label in ["left", "right"] {
        assert_eq!(fill_of(&tree, &format!("ear_{label}_outer")), Some(colors.ears));
        assert_eq!(
            fill_of(&tree, &format!("ear_{label}_inner")),
            Some(shade(colors.ears, 0.3))
        );
    }
}
