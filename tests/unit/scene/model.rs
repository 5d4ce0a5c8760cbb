use super::*;

fn dot(name: &str) -> PartNode {
    PartNode::new(name, Primitive::Circle { radius: 1.0 })
}

#[test]
fn z_override_reorders_siblings_and_ties_keep_insertion_order() {
    let mut tree = PartTree::new(PartNode::group("root"));
    let root = tree.root();
    let a = tree.add(root, dot("a"));
    let b = tree.add(root, dot("b").z(-1));
    let c = tree.add(root, dot("c"));
    let d = tree.add(root, dot("d").z(2));

    assert_eq!(tree.children_in_draw_order(root), vec![b, a, c, d]);
}

#[test]
fn draw_order_visits_parents_before_children() {
    let mut tree = PartTree::new(PartNode::group("root"));
    let root = tree.root();
    let head = tree.add(root, PartNode::group("head"));
    let eye = tree.add(head, dot("eye"));
    let tail = tree.add(root, dot("tail").z(-1));

    assert_eq!(tree.draw_order(), vec![root, tail, head, eye]);
}

#[test]
fn world_transform_composes_offsets() {
    let mut tree = PartTree::new(PartNode::group("root").at(100.0, 100.0));
    let head = tree.add(tree.root(), PartNode::group("head").at(0.0, -60.0));
    let eye = tree.add(head, dot("eye").at(-13.0, -6.0));

    let p = tree.world_transform(eye) * Point::ZERO;
    assert!((p.x - 87.0).abs() < 1e-9);
    assert!((p.y - 34.0).abs() < 1e-9);
}

#[test]
fn hidden_ancestor_hides_descendants() {
    let mut tree = PartTree::new(PartNode::group("root"));
    let bubble = tree.add(tree.root(), PartNode::group("bubble").hidden());
    let text = tree.add(bubble, dot("text"));
    assert!(!tree.is_effectively_visible(text));
    tree.node_mut(bubble).visible = true;
    assert!(tree.is_effectively_visible(text));
}

#[test]
fn find_by_name_and_prefix() {
    let mut tree = PartTree::new(PartNode::group("root"));
    let root = tree.root();
    tree.add(root, dot("stripe_0"));
    tree.add(root, dot("stripe_1"));
    let tip = tree.add(root, dot("tail_tip"));
    assert_eq!(tree.find("tail_tip"), Some(tip));
    assert_eq!(tree.find_all("stripe_").count(), 2);
    assert_eq!(tree.find("missing"), None);
}
