//! Tree storage decorator hiding shadow links from ordinary tree loads

use crate::error::StorageError;
use crate::store::TreeStorage;
use crate::tree::node::LinkDefinition;
use crate::tree::params::{TreeElement, TreeParameters};
use crate::types::LinkId;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Passes every call through, except that `load_tree_data` leaves out
/// shadow links unless the parameters ask for them.
pub struct ShadowFilteredStorage {
    inner: Arc<dyn TreeStorage>,
    shadow_provider: String,
}

impl ShadowFilteredStorage {
    pub fn new(inner: Arc<dyn TreeStorage>, shadow_provider: impl Into<String>) -> Self {
        Self {
            inner,
            shadow_provider: shadow_provider.into(),
        }
    }
}

impl TreeStorage for ShadowFilteredStorage {
    fn max_depth(&self) -> usize {
        self.inner.max_depth()
    }

    fn load(&self, id: &str) -> Result<Option<LinkDefinition>, StorageError> {
        self.inner.load(id)
    }

    fn load_multiple(&self, ids: &[LinkId]) -> Result<Vec<LinkDefinition>, StorageError> {
        self.inner.load_multiple(ids)
    }

    fn save(&self, definition: LinkDefinition) -> Result<(), StorageError> {
        self.inner.save(definition)
    }

    fn delete(&self, id: &str) -> Result<(), StorageError> {
        self.inner.delete(id)
    }

    fn load_tree_data(
        &self,
        menu_name: &str,
        params: &TreeParameters,
    ) -> Result<Vec<TreeElement>, StorageError> {
        if params.include_shadows {
            return self.inner.load_tree_data(menu_name, params);
        }
        let filtered = params
            .clone()
            .exclude_provider_prefix(self.shadow_provider.clone());
        self.inner.load_tree_data(menu_name, &filtered)
    }

    fn load_subtree_data(
        &self,
        id: &str,
        max_relative_depth: Option<usize>,
    ) -> Result<Option<TreeElement>, StorageError> {
        self.inner.load_subtree_data(id, max_relative_depth)
    }

    fn get_root_path_ids(&self, id: &str) -> Result<Vec<LinkId>, StorageError> {
        self.inner.get_root_path_ids(id)
    }

    fn get_all_child_ids(&self, id: &str) -> Result<Vec<LinkId>, StorageError> {
        self.inner.get_all_child_ids(id)
    }

    fn get_subtree_height(&self, id: &str) -> Result<usize, StorageError> {
        self.inner.get_subtree_height(id)
    }

    fn ids_in_menu(&self, menu_name: &str) -> Result<Vec<LinkId>, StorageError> {
        self.inner.ids_in_menu(menu_name)
    }

    fn count_menu_links(&self, menu_name: Option<&str>) -> Result<usize, StorageError> {
        self.inner.count_menu_links(menu_name)
    }

    fn menu_name_in_use(&self, menu_name: &str) -> Result<bool, StorageError> {
        self.inner.menu_name_in_use(menu_name)
    }

    fn get_menu_names(&self) -> Result<BTreeSet<String>, StorageError> {
        self.inner.get_menu_names()
    }

    fn load_by_route(
        &self,
        route_name: &str,
        menu_name: Option<&str>,
    ) -> Result<Vec<LinkDefinition>, StorageError> {
        self.inner.load_by_route(route_name, menu_name)
    }

    fn rebuild(&self, definitions: &[LinkDefinition]) -> Result<Vec<LinkId>, StorageError> {
        self.inner.rebuild(definitions)
    }
}
