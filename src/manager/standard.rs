//! Link manager backed directly by tree storage

use crate::error::LinkError;
use crate::manager::LinkManager;
use crate::store::TreeStorage;
use crate::tree::node::{LinkDefinition, LinkKind, LinkUpdate};
use crate::types::LinkId;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

pub struct StandardLinkManager {
    storage: Arc<dyn TreeStorage>,
    /// Discovered values of static links, used by `reset_link`
    defaults: RwLock<HashMap<LinkId, LinkDefinition>>,
}

impl StandardLinkManager {
    pub fn new(storage: Arc<dyn TreeStorage>) -> Self {
        Self {
            storage,
            defaults: RwLock::new(HashMap::new()),
        }
    }

    pub fn storage(&self) -> &Arc<dyn TreeStorage> {
        &self.storage
    }

    fn require(&self, id: &str) -> Result<LinkDefinition, LinkError> {
        self.storage
            .load(id)?
            .ok_or_else(|| LinkError::NotFound(id.to_string()))
    }
}

impl LinkManager for StandardLinkManager {
    fn add_definition(&self, definition: LinkDefinition) -> Result<LinkDefinition, LinkError> {
        if self.storage.load(&definition.id)?.is_some() {
            return Err(LinkError::AlreadyExists(definition.id));
        }
        debug!(id = %definition.id, menu = %definition.menu_name, "adding menu link");
        self.storage.save(definition.clone())?;
        Ok(definition)
    }

    fn update_definition(
        &self,
        id: &str,
        values: &LinkUpdate,
    ) -> Result<LinkDefinition, LinkError> {
        let current = self.require(id)?;
        let merged = values.apply(&current);
        if merged != current {
            debug!(id, "updating menu link");
            self.storage.save(merged.clone())?;
        }
        Ok(merged)
    }

    fn remove_definition(&self, id: &str) -> Result<(), LinkError> {
        self.storage.delete(id)?;
        Ok(())
    }

    fn reset_link(&self, id: &str) -> Result<LinkDefinition, LinkError> {
        let current = self.require(id)?;
        if current.kind != LinkKind::Static {
            return Err(LinkError::NotResettable(id.to_string()));
        }
        let default = self
            .defaults
            .read()
            .get(id)
            .cloned()
            .ok_or_else(|| LinkError::NotResettable(id.to_string()))?;
        if default != current {
            debug!(id, "resetting menu link");
            self.storage.save(default.clone())?;
        }
        Ok(default)
    }

    fn get_definition(&self, id: &str) -> Result<Option<LinkDefinition>, LinkError> {
        Ok(self.storage.load(id)?)
    }

    fn get_definitions(&self) -> Result<Vec<LinkDefinition>, LinkError> {
        let mut definitions = Vec::new();
        for menu_name in self.storage.get_menu_names()? {
            let ids = self.storage.ids_in_menu(&menu_name)?;
            definitions.extend(self.storage.load_multiple(&ids)?);
        }
        Ok(definitions)
    }

    fn menu_link_ids(&self, menu_name: &str) -> Result<Vec<LinkId>, LinkError> {
        Ok(self.storage.ids_in_menu(menu_name)?)
    }

    fn count_menu_links(&self, menu_name: Option<&str>) -> Result<usize, LinkError> {
        Ok(self.storage.count_menu_links(menu_name)?)
    }

    fn delete_links_in_menu(&self, menu_name: &str) -> Result<(), LinkError> {
        for id in self.storage.ids_in_menu(menu_name)? {
            self.storage.delete(&id)?;
        }
        Ok(())
    }

    fn get_parent_ids(&self, id: &str) -> Result<Vec<LinkId>, LinkError> {
        Ok(self.storage.get_root_path_ids(id)?)
    }

    fn get_child_ids(&self, id: &str) -> Result<Vec<LinkId>, LinkError> {
        Ok(self.storage.get_all_child_ids(id)?)
    }

    fn menu_name_in_use(&self, menu_name: &str) -> Result<bool, LinkError> {
        Ok(self.storage.menu_name_in_use(menu_name)?)
    }

    fn load_links_by_route(
        &self,
        route_name: &str,
        menu_name: Option<&str>,
    ) -> Result<Vec<LinkDefinition>, LinkError> {
        Ok(self.storage.load_by_route(route_name, menu_name)?)
    }

    fn rebuild(&self, discovered: Vec<LinkDefinition>) -> Result<Vec<LinkId>, LinkError> {
        let discovered: Vec<LinkDefinition> = discovered
            .into_iter()
            .map(|mut definition| {
                definition.discovered = true;
                definition.kind = LinkKind::Static;
                definition
            })
            .collect();

        let pruned = self.storage.rebuild(&discovered)?;

        let mut defaults = self.defaults.write();
        defaults.clear();
        for definition in &discovered {
            defaults.insert(definition.id.clone(), definition.clone());
        }
        info!(
            discovered = discovered.len(),
            pruned = pruned.len(),
            "menu links rebuilt"
        );
        Ok(pruned)
    }
}
