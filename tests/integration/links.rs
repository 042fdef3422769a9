//! Link edits routed through the shadow-aware manager

use super::support::{link, main_anchor, shadow, system};
use menugraft::link::MenuLink;
use menugraft::tree::node::{LinkDefinition, LinkKind, LinkUpdate};
use menugraft::types::SHADOW_OF_KEY;
use menugraft::{ApiError, LinkError};

#[test]
fn test_deletion_cascade_is_idempotent() {
    let system = system();
    let menu = system.menus().create("Team", None, Some(main_anchor())).unwrap();
    system.menus().add_link(menu.id, link("a")).unwrap();
    assert!(shadow(&system, "a").is_some());

    system.links().remove_definition("a").unwrap();
    assert!(shadow(&system, "a").is_none());
    system.links().remove_definition("a").unwrap();
    system.synchronizer().on_real_node_removed("a").unwrap();
}

#[test]
fn test_moving_link_updates_only_its_shadow() {
    let system = system();
    let menus = system.menus();
    let menu = menus.create("Team", None, Some(main_anchor())).unwrap();
    menus.add_link(menu.id, link("a")).unwrap();
    menus.add_link(menu.id, link("b")).unwrap();
    menus.add_link(menu.id, link("c").with_parent("a")).unwrap();
    let before_a = shadow(&system, "a");
    let before_c = shadow(&system, "c");

    system
        .links()
        .update_definition("b", &LinkUpdate::parent(Some("a".to_string())))
        .unwrap();
    assert_eq!(shadow(&system, "b").unwrap().parent.as_deref(), Some("gcm:a"));
    assert_eq!(shadow(&system, "a"), before_a);
    assert_eq!(shadow(&system, "c"), before_c);
}

#[test]
fn test_moving_link_out_of_group_menu_drops_shadows() {
    let system = system();
    let menus = system.menus();
    let menu = menus.create("Team", None, Some(main_anchor())).unwrap();
    menus.add_link(menu.id, link("a")).unwrap();
    menus.add_link(menu.id, link("b").with_parent("a")).unwrap();

    let update = LinkUpdate {
        menu_name: Some("footer".to_string()),
        ..LinkUpdate::default()
    };
    system.links().update_definition("a", &update).unwrap();
    assert_eq!(
        system.storage().load("b").unwrap().unwrap().menu_name,
        "footer"
    );
    assert!(shadow(&system, "a").is_none());
    assert!(shadow(&system, "b").is_none());
}

#[test]
fn test_proxy_forwards_to_real_link() {
    let system = system();
    let menu = system.menus().create("Team", None, Some(main_anchor())).unwrap();
    let mut def = link("a").with_url("/team");
    def.description = "Team pages".to_string();
    system.menus().add_link(menu.id, def).unwrap();

    let proxy = system.factory().create_instance("gcm:a").unwrap();
    assert_eq!(proxy.id(), "gcm:a");
    assert_eq!(proxy.menu_name(), "main");
    assert_eq!(proxy.parent(), Some("node-42"));
    assert_eq!(proxy.description(), "Team pages");
    assert_eq!(proxy.url().as_deref(), Some("/team"));
    assert_eq!(proxy.provider(), "group_menu");
    assert!(proxy.is_deletable());
    assert_eq!(proxy.edit_route().as_deref(), Some("/menu-link/a/edit"));

    proxy.update_link(&LinkUpdate::title("Our team")).unwrap();
    assert_eq!(shadow(&system, "a").unwrap().title, "Our team");

    proxy.delete_link().unwrap();
    assert!(!system.links().has_definition("a").unwrap());
    assert!(shadow(&system, "a").is_none());
}

#[test]
fn test_render_fails_on_dangling_shadow() {
    let system = system();
    let menu = system.menus().create("Team", None, Some(main_anchor())).unwrap();
    system.menus().add_link(menu.id, link("a")).unwrap();

    // Drop the real link behind the synchronizer's back.
    system.storage().delete("a").unwrap();

    let err = system
        .resolver()
        .resolve("main", &Default::default())
        .unwrap_err();
    assert!(matches!(err, LinkError::MissingTarget { ref target, .. } if target == "a"));
}

#[test]
fn test_rebuild_keeps_shadows() {
    let system = system();
    let menu = system.menus().create("Team", None, Some(main_anchor())).unwrap();
    system.menus().add_link(menu.id, link("a")).unwrap();

    system
        .links()
        .rebuild(vec![LinkDefinition::new("user.page", "account", "Account")])
        .unwrap();
    let pruned = system.links().rebuild(Vec::new()).unwrap();

    assert_eq!(pruned, vec!["user.page".to_string()]);
    let kept = shadow(&system, "a").unwrap();
    assert_eq!(kept.kind, LinkKind::Proxy);
    assert_eq!(kept.metadata.get(SHADOW_OF_KEY).map(String::as_str), Some("a"));
}

#[test]
fn test_deleting_group_menu_cascades() {
    let system = system();
    let menus = system.menus();
    let menu = menus.create("Team", None, Some(main_anchor())).unwrap();
    menus.add_link(menu.id, link("a")).unwrap();
    menus.add_link(menu.id, link("b").with_parent("a")).unwrap();

    menus.delete(menu.id).unwrap();
    assert!(shadow(&system, "a").is_none());
    assert!(shadow(&system, "b").is_none());
    assert!(matches!(
        menus.delete(menu.id).unwrap_err(),
        ApiError::GroupMenuNotFound(_)
    ));
}
