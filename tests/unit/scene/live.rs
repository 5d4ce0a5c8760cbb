use super::*;
use crate::{
    compose::compositor::compose,
    customization::{palette::Accessory, state::CatColors},
    foundation::core::Size,
    scene::retained::RetainedScene,
};

fn attached() -> (Rc<RefCell<RetainedScene>>, LiveAvatar) {
    let scene = Rc::new(RefCell::new(RetainedScene::new(Size::new(400.0, 300.0))));
    let surface: SharedSurface = scene.clone();
    let live = LiveAvatar::attach(compose(&CatColors::default(), Accessory::None), surface);
    (scene, live)
}

#[test]
fn attach_creates_one_primitive_per_part_under_the_stage() {
    let (scene, live) = attached();
    let scene = scene.borrow();
    assert_eq!(scene.live_count(), live.tree().len());
    assert_eq!(live.handle_count(), live.tree().len());
    assert_eq!(scene.stage_children(), &[live.root_handle()]);
}

#[test]
fn hidden_parts_start_hidden_on_the_surface() {
    let (scene, live) = attached();
    let rig = live.rig().cloned().unwrap();
    let bubble = live.handle(rig.bubble).unwrap();
    assert_eq!(scene.borrow().is_visible(bubble), Some(false));
}

#[test]
fn mutations_are_mirrored_to_the_surface() {
    let (scene, mut live) = attached();
    let rig = live.rig().cloned().unwrap();

    live.update_transform(rig.whiskers, |t| t.rotation_rad = 0.15);
    live.set_visible(rig.whack_fx, true);
    live.place_at(Point::new(200.0, 150.0));

    let scene = scene.borrow();
    let whiskers = live.handle(rig.whiskers).unwrap();
    assert_eq!(scene.transform_of(whiskers).unwrap().rotation_rad, 0.15);
    assert_eq!(live.tree().node(rig.whiskers).transform.rotation_rad, 0.15);
    assert_eq!(scene.is_visible(live.handle(rig.whack_fx).unwrap()), Some(true));
    let root = scene.transform_of(live.root_handle()).unwrap();
    assert_eq!(root.translate, Vec2::new(200.0, 150.0));
}

#[test]
fn destroy_releases_every_primitive_and_is_idempotent() {
    let (scene, mut live) = attached();
    let count = live.tree().len() as u64;
    live.destroy();
    live.destroy();
    assert!(!live.is_attached());
    assert_eq!(scene.borrow().live_count(), 0);
    assert_eq!(scene.borrow().destroyed_count(), count);
    assert!(scene.borrow().stage_children().is_empty());

    // Mutating a destroyed avatar touches nothing.
    let rig = live.rig().cloned().unwrap();
    live.set_visible(rig.bubble, true);
    assert!(!live.tree().node(rig.bubble).visible);
}

#[test]
fn dropping_a_live_avatar_detaches_it() {
    let (scene, live) = attached();
    drop(live);
    assert_eq!(scene.borrow().live_count(), 0);
}
