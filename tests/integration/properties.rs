//! Invariants over random group menu trees

use super::support::{main_anchor, shadow, system};
use menugraft::menu::group_menu::Anchor;
use menugraft::tree::node::LinkDefinition;
use menugraft::MenuSystem;
use proptest::prelude::*;

/// Parent index for each link; `None` or an index at or past the link's own
/// position makes it a root.
fn forest() -> impl Strategy<Value = Vec<Option<usize>>> {
    prop::collection::vec(prop::option::of(0usize..8), 1..8)
}

fn build(system: &MenuSystem, menu_id: u64, parents: &[Option<usize>]) -> Vec<LinkDefinition> {
    let mut added = Vec::new();
    for (i, parent) in parents.iter().enumerate() {
        let mut def = LinkDefinition::new(format!("n{}", i), "", format!("Link {}", i));
        def.parent = parent.filter(|p| *p < i).map(|p| format!("n{}", p));
        let depth_ok = def
            .parent
            .as_ref()
            .map(|p| system.storage().get_root_path_ids(p).unwrap().len() < 7)
            .unwrap_or(true);
        if !depth_ok {
            def.parent = None;
        }
        added.push(system.menus().add_link(menu_id, def).unwrap());
    }
    added
}

fn check_mirroring(system: &MenuSystem, links: &[LinkDefinition], anchor: Option<&Anchor>) {
    for real in links {
        let current = system.storage().load(&real.id).unwrap().unwrap();
        match (anchor, shadow(system, &real.id)) {
            (None, None) => {}
            (None, Some(s)) => panic!("stale shadow {}", s.id),
            (Some(_), None) => panic!("missing shadow for {}", real.id),
            (Some(anchor), Some(s)) => {
                assert_eq!(s.menu_name, anchor.menu_name);
                let expected = match &current.parent {
                    Some(p) => format!("gcm:{}", p),
                    None => anchor.link_id.clone(),
                };
                assert_eq!(s.parent.as_deref(), Some(expected.as_str()));
                assert_eq!(s.title, current.title);
            }
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_shadows_exist_iff_anchored(parents in forest(), toggles in prop::collection::vec(any::<bool>(), 1..6)) {
        let system = system();
        let menu = system.menus().create("Team", None, None).unwrap();
        let links = build(&system, menu.id, &parents);
        check_mirroring(&system, &links, None);

        for anchored in toggles {
            let anchor = anchored.then(main_anchor);
            system.menus().set_anchor(menu.id, anchor.clone()).unwrap();
            check_mirroring(&system, &links, anchor.as_ref());
        }
    }

    #[test]
    fn prop_reanchoring_converges(parents in forest(), to_seven in any::<bool>()) {
        let system = system();
        let menu = system.menus().create("Team", None, Some(main_anchor())).unwrap();
        let links = build(&system, menu.id, &parents);

        let target = if to_seven { Anchor::new("main", "node-7") } else { main_anchor() };
        let moved = system.menus().set_anchor(menu.id, Some(target.clone())).unwrap();
        let once: Vec<_> = links.iter().map(|l| shadow(&system, &l.id)).collect();

        system
            .synchronizer()
            .on_parent_anchor_changed(&moved, Some(&main_anchor()), Some(&target))
            .unwrap();
        let twice: Vec<_> = links.iter().map(|l| shadow(&system, &l.id)).collect();
        prop_assert_eq!(once, twice);
        check_mirroring(&system, &links, Some(&target));
    }
}
