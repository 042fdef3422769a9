//! Group menu persistence and menu-name lookup

use crate::error::StorageError;
use crate::menu::group_menu::{GroupMenu, GroupMenuNaming};
use crate::types::GroupMenuId;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;

const GROUP_MENUS_TREE: &str = "group_menus";

/// Group menu entity storage
pub trait GroupMenuRepository: Send + Sync {
    fn next_id(&self) -> Result<GroupMenuId, StorageError>;
    fn load(&self, id: GroupMenuId) -> Result<Option<GroupMenu>, StorageError>;
    fn save(&self, menu: &GroupMenu) -> Result<(), StorageError>;
    fn delete(&self, id: GroupMenuId) -> Result<(), StorageError>;
    fn list(&self) -> Result<Vec<GroupMenu>, StorageError>;
}

/// Finds the group menu owning a menu name.
pub trait GroupMenuLookup: Send + Sync {
    fn group_menu_for(&self, menu_name: &str) -> Result<Option<GroupMenu>, StorageError>;
}

#[derive(Default)]
pub struct MemoryGroupMenuRepository {
    menus: RwLock<BTreeMap<GroupMenuId, GroupMenu>>,
}

impl MemoryGroupMenuRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl GroupMenuRepository for MemoryGroupMenuRepository {
    fn next_id(&self) -> Result<GroupMenuId, StorageError> {
        Ok(self
            .menus
            .read()
            .keys()
            .next_back()
            .map_or(1, |last| last + 1))
    }

    fn load(&self, id: GroupMenuId) -> Result<Option<GroupMenu>, StorageError> {
        Ok(self.menus.read().get(&id).cloned())
    }

    fn save(&self, menu: &GroupMenu) -> Result<(), StorageError> {
        self.menus.write().insert(menu.id, menu.clone());
        Ok(())
    }

    fn delete(&self, id: GroupMenuId) -> Result<(), StorageError> {
        self.menus.write().remove(&id);
        Ok(())
    }

    fn list(&self) -> Result<Vec<GroupMenu>, StorageError> {
        Ok(self.menus.read().values().cloned().collect())
    }
}

/// Group menus persisted in a sled tree keyed by big-endian id
pub struct SledGroupMenuRepository {
    tree: sled::Tree,
}

impl SledGroupMenuRepository {
    pub fn from_db(db: &sled::Db) -> Result<Self, StorageError> {
        Ok(Self {
            tree: db.open_tree(GROUP_MENUS_TREE)?,
        })
    }

    pub fn flush(&self) -> Result<(), StorageError> {
        self.tree.flush()?;
        Ok(())
    }
}

impl GroupMenuRepository for SledGroupMenuRepository {
    fn next_id(&self) -> Result<GroupMenuId, StorageError> {
        match self.tree.last()? {
            Some((key, _)) => {
                let mut bytes = [0u8; 8];
                bytes.copy_from_slice(&key[..8]);
                Ok(u64::from_be_bytes(bytes) + 1)
            }
            None => Ok(1),
        }
    }

    fn load(&self, id: GroupMenuId) -> Result<Option<GroupMenu>, StorageError> {
        match self.tree.get(id.to_be_bytes())? {
            Some(bytes) => Ok(Some(bincode::deserialize(&bytes)?)),
            None => Ok(None),
        }
    }

    fn save(&self, menu: &GroupMenu) -> Result<(), StorageError> {
        self.tree
            .insert(menu.id.to_be_bytes(), bincode::serialize(menu)?)?;
        Ok(())
    }

    fn delete(&self, id: GroupMenuId) -> Result<(), StorageError> {
        self.tree.remove(id.to_be_bytes())?;
        Ok(())
    }

    fn list(&self) -> Result<Vec<GroupMenu>, StorageError> {
        let mut out = Vec::new();
        for entry in self.tree.iter() {
            let (_, bytes) = entry?;
            out.push(bincode::deserialize(&bytes)?);
        }
        Ok(out)
    }
}

/// Menu-name lookup over a repository
pub struct GroupMenuDirectory {
    repository: Arc<dyn GroupMenuRepository>,
    naming: GroupMenuNaming,
}

impl GroupMenuDirectory {
    pub fn new(repository: Arc<dyn GroupMenuRepository>, naming: GroupMenuNaming) -> Self {
        Self { repository, naming }
    }
}

impl GroupMenuLookup for GroupMenuDirectory {
    fn group_menu_for(&self, menu_name: &str) -> Result<Option<GroupMenu>, StorageError> {
        match self.naming.parse(menu_name) {
            Some(id) => self.repository.load(id),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::menu::group_menu::Anchor;
    use tempfile::TempDir;

    #[test]
    fn test_memory_ids_increase() {
        let repo = MemoryGroupMenuRepository::new();
        assert_eq!(repo.next_id().unwrap(), 1);
        repo.save(&GroupMenu::new(1, "One")).unwrap();
        assert_eq!(repo.next_id().unwrap(), 2);
    }

    #[test]
    fn test_sled_round_trip() {
        let temp = TempDir::new().unwrap();
        let db = sled::open(temp.path().join("db")).unwrap();
        let repo = SledGroupMenuRepository::from_db(&db).unwrap();
        assert_eq!(repo.next_id().unwrap(), 1);
        let menu = GroupMenu::new(1, "Team").with_anchor(Anchor::new("main", "home"));
        repo.save(&menu).unwrap();
        assert_eq!(repo.load(1).unwrap(), Some(menu));
        assert_eq!(repo.next_id().unwrap(), 2);
        repo.delete(1).unwrap();
        assert!(repo.list().unwrap().is_empty());
    }

    #[test]
    fn test_directory_lookup() {
        let repo = Arc::new(MemoryGroupMenuRepository::new());
        repo.save(&GroupMenu::new(3, "Three")).unwrap();
        let directory = GroupMenuDirectory::new(repo, GroupMenuNaming::default());
        assert!(directory
            .group_menu_for("group_menu_link_content-3")
            .unwrap()
            .is_some());
        assert!(directory.group_menu_for("main").unwrap().is_none());
        assert!(directory
            .group_menu_for("group_menu_link_content-4")
            .unwrap()
            .is_none());
    }
}
