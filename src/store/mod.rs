//! Menu Tree Storage
//!
//! Holds every menu link of every menu in one flat namespace of ids with
//! parent references. `NodeStore` is the raw record backend; `TreeStorage` is
//! the validated tree contract the rest of the crate consumes.

pub mod filtered;
pub mod memory;
pub mod persistence;
pub mod tree_storage;

use crate::error::StorageError;
use crate::tree::node::LinkDefinition;
use crate::tree::params::{TreeElement, TreeParameters};
use crate::types::LinkId;
use std::collections::BTreeSet;

pub use filtered::ShadowFilteredStorage;
pub use memory::MemoryNodeStore;
pub use persistence::SledNodeStore;
pub use tree_storage::MenuTreeStorage;

/// Depth limit of the host tree engine
pub const DEFAULT_MAX_DEPTH: usize = 9;

/// Raw link record backend
pub trait NodeStore: Send + Sync {
    fn get(&self, id: &str) -> Result<Option<LinkDefinition>, StorageError>;
    fn put(&self, definition: &LinkDefinition) -> Result<(), StorageError>;
    fn remove(&self, id: &str) -> Result<(), StorageError>;
    fn all(&self) -> Result<Vec<LinkDefinition>, StorageError>;

    /// Write several records together. Backends that can apply a batch
    /// atomically should override this.
    fn put_batch(&self, definitions: &[LinkDefinition]) -> Result<(), StorageError> {
        for definition in definitions {
            self.put(definition)?;
        }
        Ok(())
    }

    fn in_menu(&self, menu_name: &str) -> Result<Vec<LinkDefinition>, StorageError> {
        Ok(self
            .all()?
            .into_iter()
            .filter(|d| d.menu_name == menu_name)
            .collect())
    }
}

/// Tree storage contract
pub trait TreeStorage: Send + Sync {
    fn max_depth(&self) -> usize;

    fn load(&self, id: &str) -> Result<Option<LinkDefinition>, StorageError>;

    fn load_multiple(&self, ids: &[LinkId]) -> Result<Vec<LinkDefinition>, StorageError>;

    /// Insert or update a link, enforcing parent, cycle and depth invariants.
    fn save(&self, definition: LinkDefinition) -> Result<(), StorageError>;

    /// Delete a link, re-parenting its children to its parent. Deleting a
    /// missing link is a no-op.
    fn delete(&self, id: &str) -> Result<(), StorageError>;

    /// Load a menu as a nested tree, parent before children.
    fn load_tree_data(
        &self,
        menu_name: &str,
        params: &TreeParameters,
    ) -> Result<Vec<TreeElement>, StorageError>;

    fn load_subtree_data(
        &self,
        id: &str,
        max_relative_depth: Option<usize>,
    ) -> Result<Option<TreeElement>, StorageError>;

    /// Ids from `id` up to its menu root, `id` first.
    fn get_root_path_ids(&self, id: &str) -> Result<Vec<LinkId>, StorageError>;

    fn get_all_child_ids(&self, id: &str) -> Result<Vec<LinkId>, StorageError>;

    fn get_subtree_height(&self, id: &str) -> Result<usize, StorageError>;

    fn ids_in_menu(&self, menu_name: &str) -> Result<Vec<LinkId>, StorageError>;

    fn count_menu_links(&self, menu_name: Option<&str>) -> Result<usize, StorageError>;

    fn menu_name_in_use(&self, menu_name: &str) -> Result<bool, StorageError> {
        Ok(self.count_menu_links(Some(menu_name))? > 0)
    }

    fn get_menu_names(&self) -> Result<BTreeSet<String>, StorageError>;

    fn load_by_route(
        &self,
        route_name: &str,
        menu_name: Option<&str>,
    ) -> Result<Vec<LinkDefinition>, StorageError>;

    /// Store the discovered definitions and prune discovered links that are
    /// no longer among them. Returns the pruned ids.
    fn rebuild(&self, definitions: &[LinkDefinition]) -> Result<Vec<LinkId>, StorageError>;
}
