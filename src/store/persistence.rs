//! Sled-backed node store

use crate::error::StorageError;
use crate::store::NodeStore;
use crate::tree::node::LinkDefinition;

const LINKS_TREE: &str = "menu_links";

/// Node store persisting link definitions as bincode records in sled
pub struct SledNodeStore {
    tree: sled::Tree,
}

impl SledNodeStore {
    /// Open (or create) the store at `path`.
    pub fn open(path: &std::path::Path) -> Result<Self, StorageError> {
        let db = sled::open(path)?;
        Self::from_db(&db)
    }

    pub fn from_db(db: &sled::Db) -> Result<Self, StorageError> {
        Ok(Self {
            tree: db.open_tree(LINKS_TREE)?,
        })
    }

    pub fn flush(&self) -> Result<(), StorageError> {
        self.tree.flush()?;
        Ok(())
    }

    fn decode(bytes: &[u8]) -> Result<LinkDefinition, StorageError> {
        Ok(bincode::deserialize(bytes)?)
    }
}

impl NodeStore for SledNodeStore {
    fn get(&self, id: &str) -> Result<Option<LinkDefinition>, StorageError> {
        match self.tree.get(id.as_bytes())? {
            Some(bytes) => Ok(Some(Self::decode(&bytes)?)),
            None => Ok(None),
        }
    }

    fn put(&self, definition: &LinkDefinition) -> Result<(), StorageError> {
        let bytes = bincode::serialize(definition)?;
        self.tree.insert(definition.id.as_bytes(), bytes)?;
        Ok(())
    }

    fn remove(&self, id: &str) -> Result<(), StorageError> {
        self.tree.remove(id.as_bytes())?;
        Ok(())
    }

    fn all(&self) -> Result<Vec<LinkDefinition>, StorageError> {
        let mut out = Vec::new();
        for entry in self.tree.iter() {
            let (_, bytes) = entry?;
            out.push(Self::decode(&bytes)?);
        }
        Ok(out)
    }

    fn put_batch(&self, definitions: &[LinkDefinition]) -> Result<(), StorageError> {
        let mut batch = sled::Batch::default();
        for definition in definitions {
            batch.insert(definition.id.as_bytes(), bincode::serialize(definition)?);
        }
        self.tree.apply_batch(batch)?;
        Ok(())
    }
}
