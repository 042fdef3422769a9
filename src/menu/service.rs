//! Group menu lifecycle
//!
//! Saving a group menu whose anchor changed re-derives its shadow links
//! before the new anchor is persisted. Deleting a group menu removes its
//! links through the shadow-aware manager so their shadows go too.

use crate::concurrency::MenuLockManager;
use crate::error::{ApiError, StorageError};
use crate::manager::LinkManager;
use crate::menu::group_menu::{Anchor, GroupMenu, GroupMenuNaming};
use crate::menu::repository::GroupMenuRepository;
use crate::shadow::sync::{ShadowSynchronizer, MAX_GRAFT_HOPS};
use crate::store::TreeStorage;
use crate::tree::node::{LinkDefinition, LinkKind};
use crate::types::{GroupMenuId, GROUP_MENU_PROVIDER, SHADOW_OF_KEY};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{info, warn};

pub struct GroupMenuService {
    repository: Arc<dyn GroupMenuRepository>,
    storage: Arc<dyn TreeStorage>,
    manager: Arc<dyn LinkManager>,
    sync: Arc<ShadowSynchronizer>,
    locks: MenuLockManager,
    create_lock: Mutex<()>,
}

impl GroupMenuService {
    pub fn new(
        repository: Arc<dyn GroupMenuRepository>,
        storage: Arc<dyn TreeStorage>,
        manager: Arc<dyn LinkManager>,
        sync: Arc<ShadowSynchronizer>,
    ) -> Self {
        Self {
            repository,
            storage,
            manager,
            sync,
            locks: MenuLockManager::new(),
            create_lock: Mutex::new(()),
        }
    }

    pub fn naming(&self) -> &GroupMenuNaming {
        self.sync.naming()
    }

    pub fn menu_name(&self, id: GroupMenuId) -> String {
        self.naming().menu_name(id)
    }

    pub fn load(&self, id: GroupMenuId) -> Result<Option<GroupMenu>, ApiError> {
        Ok(self.repository.load(id)?)
    }

    pub fn require(&self, id: GroupMenuId) -> Result<GroupMenu, ApiError> {
        self.load(id)?.ok_or(ApiError::GroupMenuNotFound(id))
    }

    pub fn list(&self) -> Result<Vec<GroupMenu>, ApiError> {
        Ok(self.repository.list()?)
    }

    pub fn create(
        &self,
        label: impl Into<String>,
        group_id: Option<u64>,
        anchor: Option<Anchor>,
    ) -> Result<GroupMenu, ApiError> {
        let _guard = self.create_lock.lock();
        let menu = GroupMenu {
            id: self.repository.next_id()?,
            label: label.into(),
            group_id,
            anchor,
        };
        self.save(menu)
    }

    /// Persist `menu`. When its anchor differs from the stored one, every
    /// shadow is re-derived first. If that fails, the shadows of the stored
    /// anchor are restored and the menu is left as it was.
    pub fn save(&self, menu: GroupMenu) -> Result<GroupMenu, ApiError> {
        let lock = self.locks.get_lock(menu.id);
        let _guard = lock.lock();

        let old_anchor = self.repository.load(menu.id)?.and_then(|m| m.anchor);
        if old_anchor != menu.anchor {
            if let Some(anchor) = &menu.anchor {
                self.validate_anchor(&menu, anchor)?;
            }
            if let Err(err) = self.sync.on_parent_anchor_changed(
                &menu,
                old_anchor.as_ref(),
                menu.anchor.as_ref(),
            ) {
                warn!(id = menu.id, error = %err, "anchor change failed, restoring shadow links");
                if let Err(restore) = self.sync.on_parent_anchor_changed(
                    &menu,
                    menu.anchor.as_ref(),
                    old_anchor.as_ref(),
                ) {
                    warn!(id = menu.id, error = %restore, "could not restore shadow links");
                }
                return Err(err.into());
            }
        }
        self.repository.save(&menu)?;
        info!(id = menu.id, label = %menu.label, anchor = ?menu.anchor.as_ref().map(ToString::to_string), "group menu saved");
        Ok(menu)
    }

    /// Change or clear the anchor of an existing group menu.
    pub fn set_anchor(
        &self,
        id: GroupMenuId,
        anchor: Option<Anchor>,
    ) -> Result<GroupMenu, ApiError> {
        let mut menu = self.require(id)?;
        menu.anchor = anchor;
        self.save(menu)
    }

    pub fn delete(&self, id: GroupMenuId) -> Result<(), ApiError> {
        let lock = self.locks.get_lock(id);
        {
            let _guard = lock.lock();
            let menu = self.require(id)?;
            let menu_name = self.menu_name(id);

            // Menus hanging under this one lose their anchor first.
            for mut other in self.repository.list()? {
                if other.id == id {
                    continue;
                }
                let Some(anchor) = &other.anchor else {
                    continue;
                };
                if self.anchored_into(anchor, &menu_name)? {
                    info!(id = other.id, deleted = %menu_name, "clearing anchor into deleted group menu");
                    other.anchor = None;
                    self.save(other)?;
                }
            }

            self.manager.delete_links_in_menu(&menu_name)?;
            self.repository.delete(id)?;
            info!(id, label = %menu.label, "group menu deleted");
        }
        self.locks.forget(id);
        Ok(())
    }

    /// Add a link to a group menu through the shadow-aware manager.
    pub fn add_link(
        &self,
        id: GroupMenuId,
        mut definition: LinkDefinition,
    ) -> Result<LinkDefinition, ApiError> {
        self.require(id)?;
        definition.menu_name = self.menu_name(id);
        definition.provider = GROUP_MENU_PROVIDER.to_string();
        definition.discovered = false;
        definition.kind = LinkKind::Content;
        Ok(self.manager.add_definition(definition)?)
    }

    fn validate_anchor(&self, menu: &GroupMenu, anchor: &Anchor) -> Result<(), ApiError> {
        let own = self.menu_name(menu.id);
        if anchor.menu_name == own {
            return Err(ApiError::InvalidAnchor(format!(
                "group menu {} cannot be anchored inside itself",
                menu.id
            )));
        }

        let link = self.storage.load(&anchor.link_id)?.ok_or_else(|| {
            ApiError::InvalidAnchor(format!("menu link {} does not exist", anchor.link_id))
        })?;
        if link.menu_name != anchor.menu_name {
            return Err(ApiError::InvalidAnchor(format!(
                "menu link {} is in menu {}, not {}",
                anchor.link_id, link.menu_name, anchor.menu_name
            )));
        }

        if self.mirrors_menu(link, &own)? {
            return Err(ApiError::InvalidAnchor(format!(
                "menu link {} mirrors a link of group menu {}",
                anchor.link_id, menu.id
            )));
        }

        // The anchor chain must not lead back here.
        let mut target = anchor.menu_name.clone();
        for _ in 0..MAX_GRAFT_HOPS {
            let Some(id) = self.naming().parse(&target) else {
                break;
            };
            if id == menu.id {
                return Err(ApiError::InvalidAnchor(format!(
                    "anchoring group menu {} under {} would form a loop",
                    menu.id, anchor
                )));
            }
            match self.repository.load(id)?.and_then(|m| m.anchor) {
                Some(next) => target = next.menu_name,
                None => break,
            }
        }

        match self.sync.ensure_graft_fits(menu, anchor) {
            Err(StorageError::DepthExceeded { depth, max, .. }) => {
                Err(ApiError::InvalidAnchor(format!(
                    "group menu {} under {} would reach depth {}, maximum is {}",
                    menu.id, anchor, depth, max
                )))
            }
            other => Ok(other?),
        }
    }

    /// Whether `anchor` points into `menu_name`, directly or through one of
    /// its shadow links.
    fn anchored_into(&self, anchor: &Anchor, menu_name: &str) -> Result<bool, ApiError> {
        if anchor.menu_name == menu_name {
            return Ok(true);
        }
        match self.storage.load(&anchor.link_id)? {
            Some(link) => self.mirrors_menu(link, menu_name),
            None => Ok(false),
        }
    }

    /// Whether `link` is a shadow of a link in `menu_name`, following
    /// shadows of shadows.
    fn mirrors_menu(&self, link: LinkDefinition, menu_name: &str) -> Result<bool, ApiError> {
        let mut current = link;
        for _ in 0..MAX_GRAFT_HOPS {
            if current.kind != LinkKind::Proxy {
                break;
            }
            let Some(next) = current
                .metadata
                .get(SHADOW_OF_KEY)
                .map(|id| self.storage.load(id))
                .transpose()?
                .flatten()
            else {
                break;
            };
            if next.menu_name == menu_name {
                return Ok(true);
            }
            current = next;
        }
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manager::{ShadowLinkManager, StandardLinkManager};
    use crate::menu::repository::{GroupMenuDirectory, MemoryGroupMenuRepository};
    use crate::shadow::id::ShadowScheme;
    use crate::shadow::sync::SyncContext;
    use crate::store::{MemoryNodeStore, MenuTreeStorage};

    fn service() -> (Arc<dyn TreeStorage>, GroupMenuService) {
        let storage: Arc<dyn TreeStorage> =
            Arc::new(MenuTreeStorage::new(MemoryNodeStore::new()));
        let repo: Arc<dyn GroupMenuRepository> = Arc::new(MemoryGroupMenuRepository::new());
        let naming = GroupMenuNaming::default();
        let sync = Arc::new(ShadowSynchronizer::new(SyncContext {
            storage: storage.clone(),
            menus: Arc::new(GroupMenuDirectory::new(repo.clone(), naming.clone())),
            scheme: ShadowScheme::default(),
            naming,
        }));
        let manager: Arc<dyn LinkManager> = Arc::new(ShadowLinkManager::new(
            StandardLinkManager::new(storage.clone()),
            sync.clone(),
        ));
        storage.save(LinkDefinition::new("home", "main", "Home")).unwrap();
        let service = GroupMenuService::new(repo, storage.clone(), manager, sync);
        (storage, service)
    }

    #[test]
    fn test_add_link_forces_group_fields() {
        let (storage, service) = service();
        let menu = service.create("Team", Some(5), None).unwrap();
        let mut def = LinkDefinition::new("A", "elsewhere", "About");
        def.discovered = true;
        service.add_link(menu.id, def).unwrap();

        let stored = storage.load("A").unwrap().unwrap();
        assert_eq!(stored.menu_name, "group_menu_link_content-1");
        assert_eq!(stored.provider, GROUP_MENU_PROVIDER);
        assert!(!stored.discovered);
    }

    #[test]
    fn test_add_link_to_missing_menu() {
        let (_, service) = service();
        let err = service
            .add_link(7, LinkDefinition::new("A", "x", "A"))
            .unwrap_err();
        assert!(matches!(err, ApiError::GroupMenuNotFound(7)));
    }

    #[test]
    fn test_anchor_must_exist_in_target_menu() {
        let (_, service) = service();
        let err = service
            .create("Team", None, Some(Anchor::new("main", "missing")))
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidAnchor(_)));

        let err = service
            .create("Team", None, Some(Anchor::new("footer", "home")))
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidAnchor(_)));
    }

    #[test]
    fn test_anchor_into_itself_rejected() {
        let (_, service) = service();
        let menu = service.create("Team", None, None).unwrap();
        service
            .add_link(menu.id, LinkDefinition::new("A", "", "A"))
            .unwrap();
        let err = service
            .set_anchor(menu.id, Some(Anchor::new("group_menu_link_content-1", "A")))
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidAnchor(_)));
    }

    #[test]
    fn test_anchor_loop_rejected() {
        let (_, service) = service();
        let one = service.create("One", None, None).unwrap();
        let two = service.create("Two", None, None).unwrap();
        service.add_link(one.id, LinkDefinition::new("A", "", "A")).unwrap();
        service.add_link(two.id, LinkDefinition::new("X", "", "X")).unwrap();

        service
            .set_anchor(two.id, Some(Anchor::new(service.menu_name(one.id), "A")))
            .unwrap();
        let err = service
            .set_anchor(one.id, Some(Anchor::new(service.menu_name(two.id), "X")))
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidAnchor(_)));
    }

    #[test]
    fn test_set_anchor_creates_shadows() {
        let (storage, service) = service();
        let menu = service.create("Team", None, None).unwrap();
        service.add_link(menu.id, LinkDefinition::new("A", "", "A")).unwrap();
        assert!(storage.load("gcm:A").unwrap().is_none());

        service
            .set_anchor(menu.id, Some(Anchor::new("main", "home")))
            .unwrap();
        assert_eq!(
            storage.load("gcm:A").unwrap().unwrap().parent.as_deref(),
            Some("home")
        );

        service.set_anchor(menu.id, None).unwrap();
        assert!(storage.load("gcm:A").unwrap().is_none());
    }

    #[test]
    fn test_delete_removes_links_and_shadows() {
        let (storage, service) = service();
        let menu = service
            .create("Team", None, Some(Anchor::new("main", "home")))
            .unwrap();
        service.add_link(menu.id, LinkDefinition::new("A", "", "A")).unwrap();

        service.delete(menu.id).unwrap();
        assert!(storage.load("A").unwrap().is_none());
        assert!(storage.load("gcm:A").unwrap().is_none());
        assert!(service.load(menu.id).unwrap().is_none());
    }

    #[test]
    fn test_anchor_too_deep_rejected_without_shadows() {
        let (storage, service) = service();
        let menu = service.create("Team", None, None).unwrap();
        for i in 0..9 {
            let mut link = LinkDefinition::new(format!("n{}", i), "", "n");
            if i > 0 {
                link = link.with_parent(format!("n{}", i - 1));
            }
            service.add_link(menu.id, link).unwrap();
        }

        let err = service
            .set_anchor(menu.id, Some(Anchor::new("main", "home")))
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidAnchor(_)));
        assert!(service.require(menu.id).unwrap().anchor.is_none());
        for i in 0..9 {
            assert!(storage.load(&format!("gcm:n{}", i)).unwrap().is_none());
        }
    }

    #[test]
    fn test_delete_clears_dependent_anchors() {
        let (storage, service) = service();
        let one = service.create("One", None, None).unwrap();
        service.add_link(one.id, LinkDefinition::new("X", "", "X")).unwrap();
        let two = service
            .create("Two", None, Some(Anchor::new(service.menu_name(one.id), "X")))
            .unwrap();
        service.add_link(two.id, LinkDefinition::new("Y", "", "Y")).unwrap();
        assert!(storage.load("gcm:Y").unwrap().is_some());

        service.delete(one.id).unwrap();
        assert!(service.require(two.id).unwrap().anchor.is_none());
        assert!(storage.load("gcm:Y").unwrap().is_none());

        service.add_link(two.id, LinkDefinition::new("Z", "", "Z")).unwrap();
        assert!(storage.load("Z").unwrap().is_some());
        assert!(storage.load("gcm:Z").unwrap().is_none());
    }

    #[test]
    fn test_delete_clears_anchor_on_shadow_of_deleted_menu() {
        let (storage, service) = service();
        let one = service
            .create("One", None, Some(Anchor::new("main", "home")))
            .unwrap();
        service.add_link(one.id, LinkDefinition::new("X", "", "X")).unwrap();
        let three = service
            .create("Three", None, Some(Anchor::new("main", "gcm:X")))
            .unwrap();
        service.add_link(three.id, LinkDefinition::new("W", "", "W")).unwrap();
        assert_eq!(
            storage.load("gcm:W").unwrap().unwrap().parent.as_deref(),
            Some("gcm:X")
        );

        service.delete(one.id).unwrap();
        assert!(service.require(three.id).unwrap().anchor.is_none());
        assert!(storage.load("gcm:W").unwrap().is_none());
        assert!(storage.load("W").unwrap().is_some());
    }
}
