//! Shadow-aware link manager decorator

use crate::error::LinkError;
use crate::manager::LinkManager;
use crate::shadow::sync::{ShadowSynchronizer, MAX_GRAFT_HOPS};
use crate::tree::node::{LinkDefinition, LinkKind, LinkUpdate};
use crate::types::{LinkId, SHADOW_OF_KEY};
use std::sync::Arc;
use tracing::debug;

/// Wraps a link manager and mirrors every link mutation onto shadow links.
///
/// Update, remove and reset addressed at a shadow act on the real link it
/// mirrors; the shadow is then re-derived. Adds and updates whose shadow
/// would not fit are refused before the real link is written.
pub struct ShadowLinkManager<M> {
    inner: M,
    sync: Arc<ShadowSynchronizer>,
}

impl<M: LinkManager> ShadowLinkManager<M> {
    pub fn new(inner: M, sync: Arc<ShadowSynchronizer>) -> Self {
        Self { inner, sync }
    }

    pub fn inner(&self) -> &M {
        &self.inner
    }

    pub fn synchronizer(&self) -> &Arc<ShadowSynchronizer> {
        &self.sync
    }

    /// Follow shadow links down to the real link they mirror.
    fn real_target(&self, id: &str) -> Result<LinkId, LinkError> {
        let mut current = id.to_string();
        for _ in 0..=MAX_GRAFT_HOPS {
            let Some(definition) = self.inner.get_definition(&current)? else {
                if current == id {
                    return Ok(current);
                }
                return Err(LinkError::MissingTarget {
                    shadow: id.to_string(),
                    target: current,
                });
            };
            if definition.kind != LinkKind::Proxy {
                return Ok(current);
            }
            match definition.metadata.get(SHADOW_OF_KEY) {
                Some(target) => current = target.clone(),
                None => {
                    return Err(LinkError::MissingTarget {
                        shadow: id.to_string(),
                        target: String::new(),
                    })
                }
            }
        }
        Ok(current)
    }
}

impl<M: LinkManager> LinkManager for ShadowLinkManager<M> {
    fn add_definition(&self, definition: LinkDefinition) -> Result<LinkDefinition, LinkError> {
        self.sync.ensure_shadow_fits(&definition)?;
        let created = self.inner.add_definition(definition)?;
        self.sync.on_real_node_created(&created)?;
        Ok(created)
    }

    fn update_definition(
        &self,
        id: &str,
        values: &LinkUpdate,
    ) -> Result<LinkDefinition, LinkError> {
        let target = self.real_target(id)?;
        if target != id {
            debug!(shadow = id, real = %target, "redirecting update to real link");
        }
        let previous = self.inner.get_definition(&target)?;
        if let Some(current) = &previous {
            self.sync.ensure_shadow_fits(&values.apply(current))?;
        }
        let updated = self.inner.update_definition(&target, values)?;
        self.sync.on_real_node_updated(previous.as_ref(), &updated)?;
        Ok(updated)
    }

    fn remove_definition(&self, id: &str) -> Result<(), LinkError> {
        let target = self.real_target(id)?;
        self.inner.remove_definition(&target)?;
        self.sync.on_real_node_removed(&target)?;
        Ok(())
    }

    fn reset_link(&self, id: &str) -> Result<LinkDefinition, LinkError> {
        let target = self.real_target(id)?;
        let previous = self.inner.get_definition(&target)?;
        let reset = self.inner.reset_link(&target)?;
        self.sync.on_real_node_updated(previous.as_ref(), &reset)?;
        Ok(reset)
    }

    fn get_definition(&self, id: &str) -> Result<Option<LinkDefinition>, LinkError> {
        self.inner.get_definition(id)
    }

    fn get_definitions(&self) -> Result<Vec<LinkDefinition>, LinkError> {
        self.inner.get_definitions()
    }

    fn menu_link_ids(&self, menu_name: &str) -> Result<Vec<LinkId>, LinkError> {
        self.inner.menu_link_ids(menu_name)
    }

    fn count_menu_links(&self, menu_name: Option<&str>) -> Result<usize, LinkError> {
        self.inner.count_menu_links(menu_name)
    }

    /// Links are removed one at a time so each one's shadow goes with it.
    /// Shadows living in the menu are removed themselves, never their real
    /// links.
    fn delete_links_in_menu(&self, menu_name: &str) -> Result<(), LinkError> {
        for id in self.inner.menu_link_ids(menu_name)? {
            self.inner.remove_definition(&id)?;
            self.sync.on_real_node_removed(&id)?;
        }
        Ok(())
    }

    fn get_parent_ids(&self, id: &str) -> Result<Vec<LinkId>, LinkError> {
        self.inner.get_parent_ids(id)
    }

    fn get_child_ids(&self, id: &str) -> Result<Vec<LinkId>, LinkError> {
        self.inner.get_child_ids(id)
    }

    fn menu_name_in_use(&self, menu_name: &str) -> Result<bool, LinkError> {
        self.inner.menu_name_in_use(menu_name)
    }

    fn load_links_by_route(
        &self,
        route_name: &str,
        menu_name: Option<&str>,
    ) -> Result<Vec<LinkDefinition>, LinkError> {
        self.inner.load_links_by_route(route_name, menu_name)
    }

    fn rebuild(&self, discovered: Vec<LinkDefinition>) -> Result<Vec<LinkId>, LinkError> {
        let ids: Vec<LinkId> = discovered.iter().map(|d| d.id.clone()).collect();
        let pruned = self.inner.rebuild(discovered)?;
        for id in &pruned {
            self.sync.on_real_node_removed(id)?;
        }
        for definition in self.inner_definitions(&ids)? {
            self.sync.on_real_node_updated(None, &definition)?;
        }
        Ok(pruned)
    }
}

impl<M: LinkManager> ShadowLinkManager<M> {
    fn inner_definitions(&self, ids: &[LinkId]) -> Result<Vec<LinkDefinition>, LinkError> {
        let mut definitions = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(definition) = self.inner.get_definition(id)? {
                definitions.push(definition);
            }
        }
        Ok(definitions)
    }
}
