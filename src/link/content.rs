//! Definition-backed menu link

use crate::error::LinkError;
use crate::link::MenuLink;
use crate::manager::LinkManager;
use crate::tree::node::{LinkDefinition, LinkKind, LinkUpdate};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Menu link answering from its stored definition.
///
/// Mutations go back through the link manager it was created by, so a
/// shadowing manager sees them.
pub struct ContentLink {
    definition: LinkDefinition,
    manager: Arc<dyn LinkManager>,
}

impl ContentLink {
    pub fn new(definition: LinkDefinition, manager: Arc<dyn LinkManager>) -> Self {
        Self {
            definition,
            manager,
        }
    }

    fn is_content(&self) -> bool {
        self.definition.kind == LinkKind::Content
    }
}

impl MenuLink for ContentLink {
    fn id(&self) -> &str {
        &self.definition.id
    }

    fn menu_name(&self) -> &str {
        &self.definition.menu_name
    }

    fn parent(&self) -> Option<&str> {
        self.definition.parent.as_deref()
    }

    fn definition(&self) -> &LinkDefinition {
        &self.definition
    }

    fn weight(&self) -> i32 {
        self.definition.weight
    }

    fn title(&self) -> &str {
        &self.definition.title
    }

    fn description(&self) -> &str {
        &self.definition.description
    }

    fn provider(&self) -> &str {
        &self.definition.provider
    }

    fn is_enabled(&self) -> bool {
        self.definition.enabled
    }

    fn is_expanded(&self) -> bool {
        self.definition.expanded
    }

    fn is_resettable(&self) -> bool {
        self.definition.kind == LinkKind::Static && self.definition.discovered
    }

    fn is_translatable(&self) -> bool {
        self.is_content()
    }

    fn is_deletable(&self) -> bool {
        self.is_content()
    }

    fn route_name(&self) -> Option<&str> {
        self.definition.route_name.as_deref()
    }

    fn route_parameters(&self) -> &BTreeMap<String, String> {
        &self.definition.route_parameters
    }

    fn url(&self) -> Option<String> {
        self.definition.url.clone().or_else(|| {
            self.definition
                .route_name
                .as_ref()
                .map(|route| format!("route:{}", route))
        })
    }

    fn options(&self) -> &BTreeMap<String, String> {
        &self.definition.options
    }

    fn metadata(&self) -> &BTreeMap<String, String> {
        &self.definition.metadata
    }

    fn cache_tags(&self) -> Vec<String> {
        let mut tags = vec![format!("menu:{}", self.definition.menu_name)];
        if self.is_content() {
            tags.push(format!("menu_link:{}", self.definition.id));
        }
        tags
    }

    fn cache_contexts(&self) -> Vec<String> {
        Vec::new()
    }

    fn cache_max_age(&self) -> Option<u64> {
        None
    }

    fn edit_route(&self) -> Option<String> {
        match self.definition.kind {
            LinkKind::Content => Some(format!("/menu-link/{}/edit", self.definition.id)),
            LinkKind::Static => Some(format!("/menu/link/{}/edit", self.definition.id)),
            LinkKind::Proxy => None,
        }
    }

    fn delete_route(&self) -> Option<String> {
        self.is_content()
            .then(|| format!("/menu-link/{}/delete", self.definition.id))
    }

    fn translate_route(&self) -> Option<String> {
        self.is_content()
            .then(|| format!("/menu-link/{}/translations", self.definition.id))
    }

    fn update_link(&self, values: &LinkUpdate) -> Result<LinkDefinition, LinkError> {
        self.manager.update_definition(&self.definition.id, values)
    }

    fn delete_link(&self) -> Result<(), LinkError> {
        if !self.is_deletable() {
            return Err(LinkError::NotDeletable(self.definition.id.clone()));
        }
        self.manager.remove_definition(&self.definition.id)
    }
}
