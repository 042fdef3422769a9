//! Shadow link definition derivation

use crate::menu::group_menu::Anchor;
use crate::shadow::id::ShadowScheme;
use crate::tree::node::{LinkDefinition, LinkKind};
use crate::types::SHADOW_OF_KEY;

/// Derive the shadow of `real` for a group menu grafted at `anchor`.
///
/// The shadow lives in the anchor's menu. A root link hangs off the anchor
/// link; any other link hangs off its real parent's shadow. Everything not
/// overridden here is copied from the real definition.
pub fn compute_shadow_definition(
    scheme: &ShadowScheme,
    real: &LinkDefinition,
    anchor: &Anchor,
) -> LinkDefinition {
    let mut shadow = real.clone();
    shadow.id = scheme.shadow_id(&real.id);
    shadow.menu_name = anchor.menu_name.clone();
    shadow.parent = Some(match &real.parent {
        Some(parent) => scheme.shadow_id(parent),
        None => anchor.link_id.clone(),
    });
    // Undiscovered links survive discovery rebuilds.
    shadow.discovered = false;
    shadow.provider = scheme.provider().to_string();
    shadow.kind = LinkKind::Proxy;
    shadow
        .metadata
        .insert(SHADOW_OF_KEY.to_string(), real.id.clone());
    shadow
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn anchor() -> Anchor {
        Anchor::new("main", "node-42")
    }

    #[test]
    fn test_root_hangs_off_anchor() {
        let scheme = ShadowScheme::default();
        let real = LinkDefinition::new("A", "group_menu_link_content-1", "Alpha")
            .with_weight(4)
            .with_url("/alpha");
        let shadow = compute_shadow_definition(&scheme, &real, &anchor());
        assert_eq!(shadow.id, "gcm:A");
        assert_eq!(shadow.menu_name, "main");
        assert_eq!(shadow.parent.as_deref(), Some("node-42"));
        assert!(!shadow.discovered);
        assert_eq!(shadow.kind, LinkKind::Proxy);
        assert_eq!(shadow.metadata.get(SHADOW_OF_KEY).map(String::as_str), Some("A"));
        assert_eq!(shadow.title, "Alpha");
        assert_eq!(shadow.weight, 4);
        assert_eq!(shadow.url.as_deref(), Some("/alpha"));
    }

    #[test]
    fn test_child_hangs_off_parent_shadow() {
        let scheme = ShadowScheme::default();
        let real = LinkDefinition::new("B", "group_menu_link_content-1", "Beta").with_parent("A");
        let shadow = compute_shadow_definition(&scheme, &real, &anchor());
        assert_eq!(shadow.parent.as_deref(), Some("gcm:A"));
    }

    #[test]
    fn test_discovered_real_still_yields_undiscovered_shadow() {
        let scheme = ShadowScheme::default();
        let mut real = LinkDefinition::new("S", "group_menu_link_content-1", "Static");
        real.discovered = true;
        real.kind = LinkKind::Static;
        let shadow = compute_shadow_definition(&scheme, &real, &anchor());
        assert!(!shadow.discovered);
        assert_eq!(shadow.kind, LinkKind::Proxy);
    }

    proptest! {
        #[test]
        fn prop_derivation_is_deterministic(
            id in "[a-z]{1,8}",
            parent in proptest::option::of("[a-z]{1,8}"),
            weight in -50i32..50,
            title in ".{0,16}",
        ) {
            let scheme = ShadowScheme::default();
            let mut real = LinkDefinition::new(id, "group_menu_link_content-9", title).with_weight(weight);
            real.parent = parent.clone();
            let first = compute_shadow_definition(&scheme, &real, &anchor());
            let second = compute_shadow_definition(&scheme, &real, &anchor());
            prop_assert_eq!(
                bincode::serialize(&first).unwrap(),
                bincode::serialize(&second).unwrap()
            );
            match parent {
                Some(p) => prop_assert_eq!(first.parent, Some(scheme.shadow_id(&p))),
                None => prop_assert_eq!(first.parent.as_deref(), Some("node-42")),
            }
        }
    }
}
