//! Link instantiation by definition kind

use crate::error::LinkError;
use crate::link::{ContentLink, MenuLink, ProxyMenuLink};
use crate::manager::LinkManager;
use crate::shadow::id::ShadowScheme;
use crate::tree::node::{LinkDefinition, LinkKind};
use std::sync::Arc;

/// Creates link instances from stored definitions.
#[derive(Clone)]
pub struct LinkFactory {
    manager: Arc<dyn LinkManager>,
    scheme: ShadowScheme,
}

impl LinkFactory {
    pub fn new(manager: Arc<dyn LinkManager>, scheme: ShadowScheme) -> Self {
        Self { manager, scheme }
    }

    pub fn scheme(&self) -> &ShadowScheme {
        &self.scheme
    }

    pub fn create_instance(&self, id: &str) -> Result<Box<dyn MenuLink>, LinkError> {
        let definition = self
            .manager
            .get_definition(id)?
            .ok_or_else(|| LinkError::NotFound(id.to_string()))?;
        self.instantiate(definition)
    }

    pub fn instantiate(&self, definition: LinkDefinition) -> Result<Box<dyn MenuLink>, LinkError> {
        match definition.kind {
            LinkKind::Proxy => Ok(Box::new(ProxyMenuLink::new(definition, self)?)),
            LinkKind::Content | LinkKind::Static => {
                Ok(Box::new(ContentLink::new(definition, self.manager.clone())))
            }
        }
    }
}
