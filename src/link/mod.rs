//! Menu link plugins
//!
//! `MenuLink` is the capability interface every link instance offers to tree
//! rendering and editing code. Definition-backed links answer from their own
//! definition; shadow links forward to the real link they mirror.

pub mod content;
pub mod factory;
pub mod proxy;

use crate::error::LinkError;
use crate::tree::node::{LinkDefinition, LinkUpdate};
use std::collections::BTreeMap;

pub use content::ContentLink;
pub use factory::LinkFactory;
pub use proxy::ProxyMenuLink;

/// Behaviour of an instantiated menu link
pub trait MenuLink: Send + Sync {
    fn id(&self) -> &str;
    fn menu_name(&self) -> &str;
    fn parent(&self) -> Option<&str>;
    fn definition(&self) -> &LinkDefinition;

    fn weight(&self) -> i32;
    fn title(&self) -> &str;
    fn description(&self) -> &str;
    fn provider(&self) -> &str;
    fn is_enabled(&self) -> bool;
    fn is_expanded(&self) -> bool;
    fn is_resettable(&self) -> bool;
    fn is_translatable(&self) -> bool;
    fn is_deletable(&self) -> bool;
    fn route_name(&self) -> Option<&str>;
    fn route_parameters(&self) -> &BTreeMap<String, String>;
    /// Target URL; routed links render as `route:<name>`
    fn url(&self) -> Option<String>;
    fn options(&self) -> &BTreeMap<String, String>;
    fn metadata(&self) -> &BTreeMap<String, String>;

    fn cache_tags(&self) -> Vec<String>;
    fn cache_contexts(&self) -> Vec<String>;
    /// `None` means cacheable forever
    fn cache_max_age(&self) -> Option<u64>;

    fn edit_route(&self) -> Option<String>;
    fn delete_route(&self) -> Option<String>;
    fn translate_route(&self) -> Option<String>;

    /// Apply `values` to the link and persist it, returning the merged
    /// definition.
    fn update_link(&self, values: &LinkUpdate) -> Result<LinkDefinition, LinkError>;

    fn delete_link(&self) -> Result<(), LinkError>;
}
