//! Menu link managers
//!
//! `LinkManager` is the write path for menu links. `StandardLinkManager`
//! talks to tree storage; `ShadowLinkManager` wraps any manager and keeps
//! shadow links in step with every mutation it forwards.

pub mod shadowing;
pub mod standard;

use crate::error::LinkError;
use crate::tree::node::{LinkDefinition, LinkUpdate};
use crate::types::LinkId;

pub use shadowing::ShadowLinkManager;
pub use standard::StandardLinkManager;

pub trait LinkManager: Send + Sync {
    /// Store a new link. Fails with `AlreadyExists` if the id is taken.
    fn add_definition(&self, definition: LinkDefinition) -> Result<LinkDefinition, LinkError>;

    /// Merge `values` into the stored link and return the result.
    fn update_definition(&self, id: &str, values: &LinkUpdate)
        -> Result<LinkDefinition, LinkError>;

    /// Remove a link; children move up to its parent. Removing a missing
    /// link is a no-op.
    fn remove_definition(&self, id: &str) -> Result<(), LinkError>;

    /// Restore a discovered link to its discovered values.
    fn reset_link(&self, id: &str) -> Result<LinkDefinition, LinkError>;

    fn get_definition(&self, id: &str) -> Result<Option<LinkDefinition>, LinkError>;

    fn has_definition(&self, id: &str) -> Result<bool, LinkError> {
        Ok(self.get_definition(id)?.is_some())
    }

    fn get_definitions(&self) -> Result<Vec<LinkDefinition>, LinkError>;

    fn menu_link_ids(&self, menu_name: &str) -> Result<Vec<LinkId>, LinkError>;

    fn count_menu_links(&self, menu_name: Option<&str>) -> Result<usize, LinkError>;

    fn delete_links_in_menu(&self, menu_name: &str) -> Result<(), LinkError>;

    /// Ids from `id` up to its menu root, `id` first.
    fn get_parent_ids(&self, id: &str) -> Result<Vec<LinkId>, LinkError>;

    /// All descendants of `id`.
    fn get_child_ids(&self, id: &str) -> Result<Vec<LinkId>, LinkError>;

    fn menu_name_in_use(&self, menu_name: &str) -> Result<bool, LinkError>;

    fn load_links_by_route(
        &self,
        route_name: &str,
        menu_name: Option<&str>,
    ) -> Result<Vec<LinkDefinition>, LinkError>;

    /// Replace the discovered link set. Returns the ids of discovered links
    /// that disappeared.
    fn rebuild(&self, discovered: Vec<LinkDefinition>) -> Result<Vec<LinkId>, LinkError>;
}
