//! In-memory node store

use crate::error::StorageError;
use crate::store::NodeStore;
use crate::tree::node::LinkDefinition;
use crate::types::LinkId;
use parking_lot::RwLock;
use std::collections::BTreeMap;

/// Node store backed by an ordered map
#[derive(Default)]
pub struct MemoryNodeStore {
    records: RwLock<BTreeMap<LinkId, LinkDefinition>>,
}

impl MemoryNodeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

impl NodeStore for MemoryNodeStore {
    fn get(&self, id: &str) -> Result<Option<LinkDefinition>, StorageError> {
        Ok(self.records.read().get(id).cloned())
    }

    fn put(&self, definition: &LinkDefinition) -> Result<(), StorageError> {
        self.records
            .write()
            .insert(definition.id.clone(), definition.clone());
        Ok(())
    }

    fn remove(&self, id: &str) -> Result<(), StorageError> {
        self.records.write().remove(id);
        Ok(())
    }

    fn all(&self) -> Result<Vec<LinkDefinition>, StorageError> {
        Ok(self.records.read().values().cloned().collect())
    }

    fn put_batch(&self, definitions: &[LinkDefinition]) -> Result<(), StorageError> {
        let mut records = self.records.write();
        for definition in definitions {
            records.insert(definition.id.clone(), definition.clone());
        }
        Ok(())
    }
}
