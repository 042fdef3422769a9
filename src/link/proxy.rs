//! Proxy link standing in for a real link inside another menu

use crate::error::LinkError;
use crate::link::{LinkFactory, MenuLink};
use crate::tree::node::{LinkDefinition, LinkUpdate};
use crate::types::SHADOW_OF_KEY;
use std::collections::BTreeMap;

/// Shadow link instance.
///
/// Identity (`id`, `menu_name`, `parent`, `definition`) comes from the shadow
/// definition; everything else is answered by the real link, resolved once
/// at construction.
pub struct ProxyMenuLink {
    shadow: LinkDefinition,
    real: Box<dyn MenuLink>,
}

impl std::fmt::Debug for ProxyMenuLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProxyMenuLink")
            .field("shadow", &self.shadow.id)
            .field("real", &self.real.id())
            .finish()
    }
}

impl ProxyMenuLink {
    /// Resolve the real link named by the shadow definition.
    pub fn new(shadow: LinkDefinition, factory: &LinkFactory) -> Result<Self, LinkError> {
        let target = match shadow.metadata.get(SHADOW_OF_KEY) {
            Some(target) => target.clone(),
            None => factory
                .scheme()
                .real_id(&shadow.id)
                .map(str::to_string)
                .ok_or_else(|| LinkError::MissingTarget {
                    shadow: shadow.id.clone(),
                    target: String::new(),
                })?,
        };
        let real = factory.create_instance(&target).map_err(|err| match err {
            LinkError::NotFound(_) => LinkError::MissingTarget {
                shadow: shadow.id.clone(),
                target: target.clone(),
            },
            other => other,
        })?;
        Ok(Self { shadow, real })
    }

    /// The real link this shadow forwards to.
    pub fn real(&self) -> &dyn MenuLink {
        self.real.as_ref()
    }
}

impl MenuLink for ProxyMenuLink {
    fn id(&self) -> &str {
        &self.shadow.id
    }

    fn menu_name(&self) -> &str {
        &self.shadow.menu_name
    }

    fn parent(&self) -> Option<&str> {
        self.shadow.parent.as_deref()
    }

    fn definition(&self) -> &LinkDefinition {
        &self.shadow
    }

    fn weight(&self) -> i32 {
        self.real.weight()
    }

    fn title(&self) -> &str {
        self.real.title()
    }

    fn description(&self) -> &str {
        self.real.description()
    }

    fn provider(&self) -> &str {
        self.real.provider()
    }

    fn is_enabled(&self) -> bool {
        self.real.is_enabled()
    }

    fn is_expanded(&self) -> bool {
        self.real.is_expanded()
    }

    fn is_resettable(&self) -> bool {
        self.real.is_resettable()
    }

    fn is_translatable(&self) -> bool {
        self.real.is_translatable()
    }

    fn is_deletable(&self) -> bool {
        self.real.is_deletable()
    }

    fn route_name(&self) -> Option<&str> {
        self.real.route_name()
    }

    fn route_parameters(&self) -> &BTreeMap<String, String> {
        self.real.route_parameters()
    }

    fn url(&self) -> Option<String> {
        self.real.url()
    }

    fn options(&self) -> &BTreeMap<String, String> {
        self.real.options()
    }

    fn metadata(&self) -> &BTreeMap<String, String> {
        self.real.metadata()
    }

    fn cache_tags(&self) -> Vec<String> {
        self.real.cache_tags()
    }

    fn cache_contexts(&self) -> Vec<String> {
        self.real.cache_contexts()
    }

    fn cache_max_age(&self) -> Option<u64> {
        self.real.cache_max_age()
    }

    fn edit_route(&self) -> Option<String> {
        self.real.edit_route()
    }

    fn delete_route(&self) -> Option<String> {
        self.real.delete_route()
    }

    fn translate_route(&self) -> Option<String> {
        self.real.translate_route()
    }

    fn update_link(&self, values: &LinkUpdate) -> Result<LinkDefinition, LinkError> {
        self.real.update_link(values)
    }

    fn delete_link(&self) -> Result<(), LinkError> {
        self.real.delete_link()
    }
}
