//! Shared fixtures

use menugraft::config::MenugraftConfig;
use menugraft::menu::group_menu::Anchor;
use menugraft::menu::GroupMenu;
use menugraft::tree::node::{LinkDefinition, LinkKind};
use menugraft::tree::params::{flatten, TreeParameters};
use menugraft::MenuSystem;

pub fn system() -> MenuSystem {
    let system = MenuSystem::in_memory(&MenugraftConfig::default()).unwrap();
    seed_main(&system);
    system
}

/// `main` menu with `node-42` and a sibling `node-7`.
pub fn seed_main(system: &MenuSystem) {
    let links = system.links();
    if !links.has_definition("node-42").unwrap() {
        links
            .add_definition(LinkDefinition::new("node-42", "main", "Community"))
            .unwrap();
        links
            .add_definition(LinkDefinition::new("node-7", "main", "About"))
            .unwrap();
    }
}

pub fn main_anchor() -> Anchor {
    Anchor::new("main", "node-42")
}

pub fn link(id: &str) -> LinkDefinition {
    LinkDefinition::new(id, "", id)
}

pub fn shadow(system: &MenuSystem, real: &str) -> Option<LinkDefinition> {
    system.storage().load(&format!("gcm:{}", real)).unwrap()
}

/// Ids of every shadow currently stored for `menu`'s links.
pub fn shadows_of(system: &MenuSystem, menu: &GroupMenu) -> Vec<String> {
    let name = system.menus().menu_name(menu.id);
    let tree = system
        .storage()
        .load_tree_data(&name, &TreeParameters::all())
        .unwrap();
    flatten(&tree)
        .into_iter()
        .filter(|d| d.kind != LinkKind::Proxy)
        .filter_map(|d| shadow(system, &d.id).map(|s| s.id))
        .collect()
}
