//! Create, anchor, edit, delete, detach

use super::support::{link, main_anchor, shadow, system};
use menugraft::tree::node::LinkUpdate;

#[test]
fn test_group_menu_lifecycle() {
    let system = system();
    let menus = system.menus();
    let links = system.links();

    let g1 = menus.create("G1", None, None).unwrap();
    menus.add_link(g1.id, link("A")).unwrap();
    menus.add_link(g1.id, link("B").with_parent("A")).unwrap();
    assert!(shadow(&system, "A").is_none());
    assert!(shadow(&system, "B").is_none());

    menus.set_anchor(g1.id, Some(main_anchor())).unwrap();
    let a = shadow(&system, "A").unwrap();
    assert_eq!(a.parent.as_deref(), Some("node-42"));
    assert_eq!(a.menu_name, "main");
    let b = shadow(&system, "B").unwrap();
    assert_eq!(b.parent.as_deref(), Some("gcm:A"));
    assert_eq!(b.menu_name, "main");

    links
        .update_definition("A", &LinkUpdate::title("Alpha"))
        .unwrap();
    let a = shadow(&system, "A").unwrap();
    assert_eq!(a.title, "Alpha");
    assert_eq!(a.parent.as_deref(), Some("node-42"));

    links.remove_definition("B").unwrap();
    assert!(shadow(&system, "B").is_none());
    assert!(shadow(&system, "A").is_some());

    menus.set_anchor(g1.id, None).unwrap();
    assert!(shadow(&system, "A").is_none());
}

#[test]
fn test_rendered_main_menu_contains_group_subtree() {
    let system = system();
    let menus = system.menus();
    let g1 = menus.create("G1", None, Some(main_anchor())).unwrap();
    menus
        .add_link(g1.id, link("A").with_url("/g1/a"))
        .unwrap();
    menus.add_link(g1.id, link("B").with_parent("A")).unwrap();

    let tree = system
        .resolver()
        .resolve("main", &Default::default())
        .unwrap();
    let community = tree.iter().find(|l| l.id == "node-42").unwrap();
    let a = &community.children[0];
    assert_eq!(a.id, "gcm:A");
    assert_eq!(a.url.as_deref(), Some("/g1/a"));
    assert_eq!(a.shadow_of.as_deref(), Some("A"));
    assert_eq!(a.children[0].id, "gcm:B");
    assert_eq!(a.children[0].depth, 3);
}
