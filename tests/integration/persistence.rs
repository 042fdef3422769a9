//! Sled-backed menu system across reopen

use super::support::{link, main_anchor, seed_main};
use menugraft::config::MenugraftConfig;
use menugraft::MenuSystem;
use tempfile::TempDir;

#[test]
fn test_shadows_survive_reopen() {
    let dir = TempDir::new().unwrap();
    let config = MenugraftConfig::default();

    let menu_id = {
        let system = MenuSystem::open_at(dir.path(), &config).unwrap();
        seed_main(&system);
        let menu = system
            .menus()
            .create("Team", Some(12), Some(main_anchor()))
            .unwrap();
        system.menus().add_link(menu.id, link("a")).unwrap();
        system
            .menus()
            .add_link(menu.id, link("b").with_parent("a"))
            .unwrap();
        system.flush().unwrap();
        menu.id
    };

    let system = MenuSystem::open_at(dir.path(), &config).unwrap();
    let menu = system.menus().require(menu_id).unwrap();
    assert_eq!(menu.anchor, Some(main_anchor()));
    assert_eq!(menu.group_id, Some(12));
    assert_eq!(
        system.storage().get_root_path_ids("gcm:b").unwrap(),
        vec!["gcm:b", "gcm:a", "node-42"]
    );

    // Edits after reopen still reach the shadows.
    system.menus().set_anchor(menu_id, None).unwrap();
    assert!(system.storage().load("gcm:a").unwrap().is_none());
    assert!(system.storage().load("gcm:b").unwrap().is_none());
}

#[test]
fn test_group_menu_ids_continue_after_reopen() {
    let dir = TempDir::new().unwrap();
    let config = MenugraftConfig::default();
    {
        let system = MenuSystem::open_at(dir.path(), &config).unwrap();
        system.menus().create("One", None, None).unwrap();
        system.menus().create("Two", None, None).unwrap();
        system.flush().unwrap();
    }
    let system = MenuSystem::open_at(dir.path(), &config).unwrap();
    assert_eq!(system.menus().create("Three", None, None).unwrap().id, 3);
    assert_eq!(system.menus().list().unwrap().len(), 3);
}
