//! Anchor changes on group menus

use super::support::{link, main_anchor, shadow, shadows_of, system};
use menugraft::menu::group_menu::Anchor;
use menugraft::tree::node::LinkDefinition;
use menugraft::ApiError;

#[test]
fn test_clearing_anchor_removes_every_shadow() {
    let system = system();
    let menus = system.menus();
    let menu = menus.create("Team", None, Some(main_anchor())).unwrap();
    menus.add_link(menu.id, link("a")).unwrap();
    for (id, parent) in [("b", "a"), ("c", "b"), ("d", "a"), ("e", "c")] {
        menus.add_link(menu.id, link(id).with_parent(parent)).unwrap();
    }
    assert_eq!(shadows_of(&system, &menu).len(), 5);

    let menu = menus.set_anchor(menu.id, None).unwrap();
    assert!(shadows_of(&system, &menu).is_empty());
    assert_eq!(system.storage().count_menu_links(Some("main")).unwrap(), 2);
}

#[test]
fn test_moving_anchor_to_another_menu() {
    let system = system();
    system
        .links()
        .add_definition(LinkDefinition::new("f1", "footer", "Footer"))
        .unwrap();
    let menus = system.menus();
    let menu = menus.create("Team", None, Some(main_anchor())).unwrap();
    menus.add_link(menu.id, link("a")).unwrap();
    menus.add_link(menu.id, link("b").with_parent("a")).unwrap();

    menus
        .set_anchor(menu.id, Some(Anchor::new("footer", "f1")))
        .unwrap();
    let a = shadow(&system, "a").unwrap();
    let b = shadow(&system, "b").unwrap();
    assert_eq!((a.menu_name.as_str(), a.parent.as_deref()), ("footer", Some("f1")));
    assert_eq!((b.menu_name.as_str(), b.parent.as_deref()), ("footer", Some("gcm:a")));
    assert_eq!(system.storage().count_menu_links(Some("main")).unwrap(), 2);
}

#[test]
fn test_moving_anchor_within_menu_keeps_structure() {
    let system = system();
    let menus = system.menus();
    let menu = menus.create("Team", None, Some(main_anchor())).unwrap();
    menus.add_link(menu.id, link("a")).unwrap();
    menus.add_link(menu.id, link("b").with_parent("a")).unwrap();

    menus
        .set_anchor(menu.id, Some(Anchor::new("main", "node-7")))
        .unwrap();
    assert_eq!(
        system.storage().get_root_path_ids("gcm:b").unwrap(),
        vec!["gcm:b", "gcm:a", "node-7"]
    );
}

#[test]
fn test_saving_same_anchor_twice_is_stable() {
    let system = system();
    let menus = system.menus();
    let menu = menus.create("Team", None, None).unwrap();
    menus.add_link(menu.id, link("a")).unwrap();
    menus.add_link(menu.id, link("b").with_parent("a")).unwrap();

    let anchored = menus.set_anchor(menu.id, Some(main_anchor())).unwrap();
    let first = (shadow(&system, "a"), shadow(&system, "b"));
    menus.save(anchored).unwrap();
    assert_eq!((shadow(&system, "a"), shadow(&system, "b")), first);
}

#[test]
fn test_anchor_to_missing_link_rejected() {
    let system = system();
    let err = system
        .menus()
        .create("Team", None, Some(Anchor::new("main", "nope")))
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidAnchor(_)));
}

#[test]
fn test_anchor_into_grafted_group_menu() {
    let system = system();
    let menus = system.menus();
    let outer = menus.create("Outer", None, Some(main_anchor())).unwrap();
    menus.add_link(outer.id, link("x")).unwrap();

    let inner = menus
        .create(
            "Inner",
            None,
            Some(Anchor::new(menus.menu_name(outer.id), "x")),
        )
        .unwrap();
    menus.add_link(inner.id, link("a")).unwrap();

    let outer_shadow = system.storage().load("gcm:gcm:a").unwrap().unwrap();
    assert_eq!(outer_shadow.menu_name, "main");
    assert_eq!(
        system.storage().get_root_path_ids("gcm:gcm:a").unwrap(),
        vec!["gcm:gcm:a", "gcm:x", "node-42"]
    );

    menus.set_anchor(inner.id, None).unwrap();
    assert!(system.storage().load("gcm:a").unwrap().is_none());
    assert!(system.storage().load("gcm:gcm:a").unwrap().is_none());
}

#[test]
fn test_anchor_too_deep_leaves_no_shadows() {
    let system = system();
    let menus = system.menus();
    let menu = menus.create("Team", None, None).unwrap();
    menus.add_link(menu.id, link("n0")).unwrap();
    for i in 1..9 {
        menus
            .add_link(menu.id, link(&format!("n{}", i)).with_parent(format!("n{}", i - 1)))
            .unwrap();
    }

    for _ in 0..2 {
        let err = menus.set_anchor(menu.id, Some(main_anchor())).unwrap_err();
        assert!(matches!(err, ApiError::InvalidAnchor(_)));
        assert!(menus.require(menu.id).unwrap().anchor.is_none());
        assert!(shadows_of(&system, &menu).is_empty());
    }

    system.links().remove_definition("n8").unwrap();
    menus.set_anchor(menu.id, Some(main_anchor())).unwrap();
    assert_eq!(shadows_of(&system, &menu).len(), 8);
}

#[test]
fn test_deleting_anchor_menu_clears_dependent_anchor() {
    let system = system();
    let menus = system.menus();
    let one = menus.create("One", None, Some(main_anchor())).unwrap();
    menus.add_link(one.id, link("x")).unwrap();
    let two = menus
        .create("Two", None, Some(Anchor::new(menus.menu_name(one.id), "x")))
        .unwrap();
    menus.add_link(two.id, link("y")).unwrap();
    assert!(system.storage().load("gcm:gcm:y").unwrap().is_some());

    menus.delete(one.id).unwrap();
    let two = menus.require(two.id).unwrap();
    assert!(two.anchor.is_none());
    assert!(shadows_of(&system, &two).is_empty());
    assert!(system.storage().load("gcm:gcm:y").unwrap().is_none());

    menus.add_link(two.id, link("z")).unwrap();
    assert!(shadow(&system, "z").is_none());
}
