//! Render-time resolution of a menu tree into link instances

use crate::error::LinkError;
use crate::link::{LinkFactory, MenuLink};
use crate::store::TreeStorage;
use crate::tree::node::LinkKind;
use crate::tree::params::{TreeElement, TreeParameters};
use crate::types::{LinkId, SHADOW_OF_KEY};
use serde::Serialize;
use std::sync::Arc;

/// One rendered link. Shadow links render with their own id and position
/// and the real link's content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedLink {
    pub id: LinkId,
    pub title: String,
    pub url: Option<String>,
    pub weight: i32,
    pub depth: usize,
    pub enabled: bool,
    pub provider: String,
    /// Real link id when this entry is a shadow
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shadow_of: Option<LinkId>,
    pub children: Vec<ResolvedLink>,
}

pub struct MenuTreeResolver {
    storage: Arc<dyn TreeStorage>,
    factory: LinkFactory,
}

impl MenuTreeResolver {
    pub fn new(storage: Arc<dyn TreeStorage>, factory: LinkFactory) -> Self {
        Self { storage, factory }
    }

    /// Load `menu_name` and instantiate every link in it. Shadows are always
    /// included. A shadow whose real link is gone fails the whole render.
    pub fn resolve(
        &self,
        menu_name: &str,
        params: &TreeParameters,
    ) -> Result<Vec<ResolvedLink>, LinkError> {
        let params = params.clone().with_shadows();
        let tree = self.storage.load_tree_data(menu_name, &params)?;
        tree.iter().map(|element| self.resolve_element(element)).collect()
    }

    fn resolve_element(&self, element: &TreeElement) -> Result<ResolvedLink, LinkError> {
        let link = self.factory.instantiate(element.definition.clone())?;
        let shadow_of = match element.definition.kind {
            LinkKind::Proxy => element.definition.metadata.get(SHADOW_OF_KEY).cloned(),
            _ => None,
        };
        let children = element
            .children
            .iter()
            .map(|child| self.resolve_element(child))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ResolvedLink {
            id: link.id().to_string(),
            title: link.title().to_string(),
            url: link.url(),
            weight: link.weight(),
            depth: element.depth,
            enabled: link.is_enabled(),
            provider: link.provider().to_string(),
            shadow_of,
            children,
        })
    }
}
