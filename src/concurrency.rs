//! Per-group-menu write serialisation
//!
//! Anchor changes for one group menu rewrite every shadow of that menu, so two
//! saves of the same group menu must not interleave. Different group menus
//! proceed in parallel.

use crate::types::GroupMenuId;
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Default)]
pub struct MenuLockManager {
    locks: RwLock<HashMap<GroupMenuId, Arc<Mutex<()>>>>,
}

impl MenuLockManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock guarding writes to one group menu, created on first use.
    pub fn get_lock(&self, menu_id: GroupMenuId) -> Arc<Mutex<()>> {
        if let Some(lock) = self.locks.read().get(&menu_id) {
            return lock.clone();
        }
        // Another thread may have inserted it between the two locks.
        self.locks
            .write()
            .entry(menu_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Drop the lock of a deleted group menu.
    pub fn forget(&self, menu_id: GroupMenuId) {
        self.locks.write().remove(&menu_id);
    }
}
