use super::*;

fn dot(name: &str) -> PartNode {
    PartNode::new(name, Primitive::Circle { radius: 2.0 }).fill(Rgb::WHITE)
}

#[test]
fn create_attach_and_destroy_track_live_count() {
    let mut scene = RetainedScene::new(Size::new(100.0, 100.0));
    let stage = scene.stage();
    let a = scene.create(&dot("a"));
    let b = scene.create(&dot("b"));
    scene.add_child(stage, a);
    scene.add_child(a, b);
    assert_eq!(scene.live_count(), 2);
    assert_eq!(scene.stage_children(), &[a]);

    scene.remove_child(stage, a);
    scene.destroy(b);
    scene.destroy(a);
    assert_eq!(scene.live_count(), 0);
    assert_eq!(scene.created_count(), 2);
    assert_eq!(scene.destroyed_count(), 2);
    assert!(scene.stage_children().is_empty());
}

#[test]
fn draw_list_skips_hidden_subtrees_and_orders_by_z() {
    let mut scene = RetainedScene::new(Size::new(100.0, 100.0));
    let stage = scene.stage();
    let front = scene.create(&dot("front"));
    let back = scene.create(&dot("back"));
    let hidden = scene.create(&dot("hidden"));
    for h in [front, back, hidden] {
        scene.add_child(stage, h);
    }
    scene.set_z_order(back, -1);
    scene.set_visible(hidden, false);

    let names: Vec<String> = scene.draw_list().into_iter().map(|d| d.name).collect();
    assert_eq!(names, vec!["back".to_owned(), "front".to_owned()]);
}

#[test]
fn draw_list_composes_parent_transforms() {
    let mut scene = RetainedScene::new(Size::new(100.0, 100.0));
    let stage = scene.stage();
    let group = scene.create(&PartNode::group("g"));
    let leaf = scene.create(&dot("leaf"));
    scene.add_child(stage, group);
    scene.add_child(group, leaf);
    scene.set_transform(group, &Transform2D::at(50.0, 50.0));
    scene.set_transform(leaf, &Transform2D::at(5.0, 0.0));

    let items = scene.draw_list();
    assert_eq!(items.len(), 1);
    assert_eq!(
        items[0].transform,
        Affine::translate((55.0, 50.0))
    );
}

#[test]
fn stage_cannot_be_destroyed() {
    let mut scene = RetainedScene::new(Size::new(10.0, 10.0));
    let stage = scene.stage();
    scene.destroy(stage);
    assert_eq!(scene.stage(), stage);
    assert_eq!(scene.destroyed_count(), 0);
}
