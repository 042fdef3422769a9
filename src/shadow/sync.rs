//! Shadow Link Synchronizer
//!
//! Keeps exactly one shadow link per real link of an anchored group menu, and
//! none for a group menu without an anchor. Fired by link mutations (through
//! the shadowing link manager) and by anchor changes on the group menu.

use crate::error::StorageError;
use crate::menu::group_menu::{Anchor, GroupMenu, GroupMenuNaming};
use crate::menu::repository::GroupMenuLookup;
use crate::shadow::definition::compute_shadow_definition;
use crate::shadow::id::ShadowScheme;
use crate::store::TreeStorage;
use crate::tree::node::LinkDefinition;
use crate::tree::params::{TreeElement, TreeParameters};
use crate::types::LinkId;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Longest chain of group menus grafted into one another that is followed
pub const MAX_GRAFT_HOPS: usize = 16;

/// Collaborators the synchronizer works against
pub struct SyncContext {
    pub storage: Arc<dyn TreeStorage>,
    pub menus: Arc<dyn GroupMenuLookup>,
    pub scheme: ShadowScheme,
    pub naming: GroupMenuNaming,
}

/// What happened to one shadow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    Unchanged,
    Created,
    Updated,
    Removed,
}

/// Totals of an anchor-change walk
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnchorChangeReport {
    pub visited: usize,
    pub created: usize,
    pub updated: usize,
    pub removed: usize,
}

impl AnchorChangeReport {
    fn record(&mut self, outcome: SyncOutcome) {
        self.visited += 1;
        match outcome {
            SyncOutcome::Unchanged => {}
            SyncOutcome::Created => self.created += 1,
            SyncOutcome::Updated => self.updated += 1,
            SyncOutcome::Removed => self.removed += 1,
        }
    }
}

pub struct ShadowSynchronizer {
    storage: Arc<dyn TreeStorage>,
    menus: Arc<dyn GroupMenuLookup>,
    scheme: ShadowScheme,
    naming: GroupMenuNaming,
}

impl ShadowSynchronizer {
    pub fn new(context: SyncContext) -> Self {
        Self {
            storage: context.storage,
            menus: context.menus,
            scheme: context.scheme,
            naming: context.naming,
        }
    }

    pub fn scheme(&self) -> &ShadowScheme {
        &self.scheme
    }

    pub fn naming(&self) -> &GroupMenuNaming {
        &self.naming
    }

    pub fn derive_shadow_id(&self, real_id: &str) -> LinkId {
        self.scheme.shadow_id(real_id)
    }

    /// Anchor of the group menu owning `menu_name`, if it has one.
    fn anchor_for(&self, menu_name: &str) -> Result<Option<Anchor>, StorageError> {
        Ok(self
            .menus
            .group_menu_for(menu_name)?
            .and_then(|menu| menu.anchor))
    }

    pub fn on_real_node_created(&self, real: &LinkDefinition) -> Result<SyncOutcome, StorageError> {
        match self.anchor_for(&real.menu_name)? {
            Some(anchor) => self.sync_with(real, Some(&anchor), 0),
            None => Ok(SyncOutcome::Unchanged),
        }
    }

    /// Refresh the shadow of an updated link. `previous` is the definition
    /// before the update; when the link changed menu, its descendants moved
    /// with it and their shadows are refreshed too.
    pub fn on_real_node_updated(
        &self,
        previous: Option<&LinkDefinition>,
        real: &LinkDefinition,
    ) -> Result<SyncOutcome, StorageError> {
        let anchor = self.anchor_for(&real.menu_name)?;
        let outcome = self.sync_with(real, anchor.as_ref(), 0)?;

        let moved = previous.map_or(false, |p| p.menu_name != real.menu_name);
        if moved {
            let descendants = self.storage.get_all_child_ids(&real.id)?;
            debug!(id = %real.id, descendants = descendants.len(), "menu link changed menu");
            for child in self.storage.load_multiple(&descendants)? {
                self.sync_with(&child, anchor.as_ref(), 0)?;
            }
        }
        Ok(outcome)
    }

    /// Remove the shadow of a removed link. Removing an absent shadow is a
    /// no-op.
    pub fn on_real_node_removed(&self, real_id: &str) -> Result<SyncOutcome, StorageError> {
        let mut outcome = SyncOutcome::Unchanged;
        let mut current = self.scheme.shadow_id(real_id);
        // Follow shadows of shadows when group menus are grafted into each other.
        for _ in 0..MAX_GRAFT_HOPS {
            if self.storage.load(&current)?.is_none() {
                break;
            }
            debug!(shadow = %current, "removing shadow link");
            self.storage.delete(&current)?;
            outcome = SyncOutcome::Removed;
            current = self.scheme.shadow_id(&current);
        }
        Ok(outcome)
    }

    /// Check that `real`, about to be written, leaves room for its shadow in
    /// every menu it is grafted into. Nothing is written.
    pub fn ensure_shadow_fits(&self, real: &LinkDefinition) -> Result<(), StorageError> {
        let height = self.storage.get_subtree_height(&real.id)?.max(1);
        let mut current = real.clone();
        for _ in 0..MAX_GRAFT_HOPS {
            let Some(anchor) = self.anchor_for(&current.menu_name)? else {
                break;
            };
            let shadow = compute_shadow_definition(&self.scheme, &current, &anchor);
            let Some(parent) = shadow.parent.clone() else {
                break;
            };
            let parent_depth = self.storage.get_root_path_ids(&parent)?.len();
            if parent_depth == 0 {
                return Err(StorageError::ParentNotFound {
                    id: shadow.id,
                    parent,
                });
            }
            let reach = parent_depth + height;
            if reach > self.storage.max_depth() {
                return Err(StorageError::DepthExceeded {
                    id: shadow.id,
                    depth: reach,
                    max: self.storage.max_depth(),
                });
            }
            current = shadow;
        }
        Ok(())
    }

    /// Check that every link of `menu`, grafted under `anchor`, stays within
    /// the depth limit in the anchor menu and in every menu that one is
    /// grafted into.
    pub fn ensure_graft_fits(&self, menu: &GroupMenu, anchor: &Anchor) -> Result<(), StorageError> {
        let menu_name = self.naming.menu_name(menu.id);
        let tree = self
            .storage
            .load_tree_data(&menu_name, &TreeParameters::all())?;
        let height = tree.iter().map(tree_height).max().unwrap_or(0);
        if height == 0 {
            return Ok(());
        }

        let mut target = anchor.link_id.clone();
        for _ in 0..MAX_GRAFT_HOPS {
            let Some(link) = self.storage.load(&target)? else {
                break;
            };
            let reach = self.storage.get_root_path_ids(&target)?.len() + height;
            if reach > self.storage.max_depth() {
                return Err(StorageError::DepthExceeded {
                    id: target,
                    depth: reach,
                    max: self.storage.max_depth(),
                });
            }
            if self.anchor_for(&link.menu_name)?.is_none() {
                break;
            }
            target = self.scheme.shadow_id(&target);
        }
        Ok(())
    }

    /// Bring the shadow of one real link in line with `menu`'s anchor.
    pub fn sync_node(
        &self,
        real: &LinkDefinition,
        menu: &GroupMenu,
    ) -> Result<SyncOutcome, StorageError> {
        self.sync_with(real, menu.anchor.as_ref(), 0)
    }

    /// Re-derive every shadow of `menu` after its anchor changed from `old`
    /// to `new`. Runs before the group menu itself is persisted.
    ///
    /// Links are visited parent before children. A move within the same
    /// target menu visits only the root links. Shadows whose derived
    /// definition did not change are not rewritten, so re-running the walk
    /// converges.
    pub fn on_parent_anchor_changed(
        &self,
        menu: &GroupMenu,
        old: Option<&Anchor>,
        new: Option<&Anchor>,
    ) -> Result<AnchorChangeReport, StorageError> {
        let mut report = AnchorChangeReport::default();
        if old == new {
            return Ok(report);
        }
        let menu_name = self.naming.menu_name(menu.id);
        let tree = self
            .storage
            .load_tree_data(&menu_name, &TreeParameters::all())?;
        info!(
            menu = %menu_name,
            old = ?old.map(ToString::to_string),
            new = ?new.map(ToString::to_string),
            "parent anchor changed"
        );
        // Within one target menu only the roots' shadow parent depends on
        // the anchor.
        let roots_only = matches!((old, new), (Some(o), Some(n)) if o.menu_name == n.menu_name);
        for element in &tree {
            if roots_only {
                report.record(self.sync_with(&element.definition, new, 0)?);
            } else {
                self.walk(element, new, &mut report)?;
            }
        }
        info!(
            menu = %menu_name,
            visited = report.visited,
            created = report.created,
            updated = report.updated,
            removed = report.removed,
            "shadow links synchronized"
        );
        Ok(report)
    }

    fn walk(
        &self,
        element: &TreeElement,
        anchor: Option<&Anchor>,
        report: &mut AnchorChangeReport,
    ) -> Result<(), StorageError> {
        report.record(self.sync_with(&element.definition, anchor, 0)?);
        for child in &element.children {
            self.walk(child, anchor, report)?;
        }
        Ok(())
    }

    fn sync_with(
        &self,
        real: &LinkDefinition,
        anchor: Option<&Anchor>,
        hops: usize,
    ) -> Result<SyncOutcome, StorageError> {
        let shadow_id = self.scheme.shadow_id(&real.id);
        let existing = self.storage.load(&shadow_id)?;

        let Some(anchor) = anchor else {
            if existing.is_none() {
                return Ok(SyncOutcome::Unchanged);
            }
            warn!(shadow = %shadow_id, "removing shadow link of unanchored menu");
            self.on_real_node_removed(&real.id)?;
            return Ok(SyncOutcome::Removed);
        };

        let shadow = compute_shadow_definition(&self.scheme, real, anchor);
        if existing.as_ref() == Some(&shadow) {
            return Ok(SyncOutcome::Unchanged);
        }
        let outcome = if existing.is_some() {
            SyncOutcome::Updated
        } else {
            SyncOutcome::Created
        };
        debug!(shadow = %shadow.id, parent = ?shadow.parent, menu = %shadow.menu_name, ?outcome, "writing shadow link");
        self.storage.save(shadow.clone())?;

        // The anchor menu may itself be a grafted group menu.
        if hops < MAX_GRAFT_HOPS {
            if let Some(next) = self.anchor_for(&shadow.menu_name)? {
                self.sync_with(&shadow, Some(&next), hops + 1)?;
            }
        }
        Ok(outcome)
    }
}

fn tree_height(element: &TreeElement) -> usize {
    1 + element.children.iter().map(tree_height).max().unwrap_or(0)
}
