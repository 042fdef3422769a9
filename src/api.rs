//! Assembled menu system
//!
//! Wires tree storage, the group menu repository, the shadow synchronizer,
//! the shadow-aware link manager and the group menu service together, over
//! either in-memory or sled-backed storage.

use crate::config::MenugraftConfig;
use crate::error::{ApiError, StorageError};
use crate::link::LinkFactory;
use crate::manager::{LinkManager, ShadowLinkManager, StandardLinkManager};
use crate::menu::repository::{
    GroupMenuDirectory, GroupMenuRepository, MemoryGroupMenuRepository, SledGroupMenuRepository,
};
use crate::menu::service::GroupMenuService;
use crate::shadow::sync::{ShadowSynchronizer, SyncContext};
use crate::store::{
    MemoryNodeStore, MenuTreeStorage, ShadowFilteredStorage, SledNodeStore, TreeStorage,
};
use crate::tree::resolve::MenuTreeResolver;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

pub struct MenuSystem {
    storage: Arc<dyn TreeStorage>,
    manager: Arc<dyn LinkManager>,
    sync: Arc<ShadowSynchronizer>,
    factory: LinkFactory,
    resolver: MenuTreeResolver,
    service: GroupMenuService,
    db: Option<sled::Db>,
}

impl MenuSystem {
    pub fn in_memory(config: &MenugraftConfig) -> Result<Self, ApiError> {
        let storage: Arc<dyn TreeStorage> = Arc::new(MenuTreeStorage::with_max_depth(
            MemoryNodeStore::new(),
            config.menus.max_depth,
        ));
        Self::assemble(config, storage, Arc::new(MemoryGroupMenuRepository::new()), None)
    }

    /// Open the sled store named by the configuration.
    pub fn open(config: &MenugraftConfig) -> Result<Self, ApiError> {
        let path = config.storage.resolved_path()?;
        Self::open_at(&path, config)
    }

    pub fn open_at(path: &Path, config: &MenugraftConfig) -> Result<Self, ApiError> {
        std::fs::create_dir_all(path).map_err(StorageError::from)?;
        let db = sled::open(path).map_err(StorageError::from)?;
        info!(path = %path.display(), "opened menu store");
        let storage: Arc<dyn TreeStorage> = Arc::new(MenuTreeStorage::with_max_depth(
            SledNodeStore::from_db(&db)?,
            config.menus.max_depth,
        ));
        let repository = Arc::new(SledGroupMenuRepository::from_db(&db)?);
        Self::assemble(config, storage, repository, Some(db))
    }

    fn assemble(
        config: &MenugraftConfig,
        base: Arc<dyn TreeStorage>,
        repository: Arc<dyn GroupMenuRepository>,
        db: Option<sled::Db>,
    ) -> Result<Self, ApiError> {
        config.validate()?;
        let scheme = config.shadow_scheme()?;
        let naming = config.naming();
        let storage: Arc<dyn TreeStorage> =
            Arc::new(ShadowFilteredStorage::new(base, scheme.provider()));

        let sync = Arc::new(ShadowSynchronizer::new(SyncContext {
            storage: storage.clone(),
            menus: Arc::new(GroupMenuDirectory::new(repository.clone(), naming)),
            scheme: scheme.clone(),
            naming: config.naming(),
        }));
        let manager: Arc<dyn LinkManager> = Arc::new(ShadowLinkManager::new(
            StandardLinkManager::new(storage.clone()),
            sync.clone(),
        ));
        let factory = LinkFactory::new(manager.clone(), scheme);
        let resolver = MenuTreeResolver::new(storage.clone(), factory.clone());
        let service =
            GroupMenuService::new(repository, storage.clone(), manager.clone(), sync.clone());

        Ok(Self {
            storage,
            manager,
            sync,
            factory,
            resolver,
            service,
            db,
        })
    }

    /// Tree storage; ordinary tree loads leave shadows out.
    pub fn storage(&self) -> &Arc<dyn TreeStorage> {
        &self.storage
    }

    /// The shadow-aware link manager.
    pub fn links(&self) -> &Arc<dyn LinkManager> {
        &self.manager
    }

    pub fn synchronizer(&self) -> &Arc<ShadowSynchronizer> {
        &self.sync
    }

    pub fn factory(&self) -> &LinkFactory {
        &self.factory
    }

    pub fn resolver(&self) -> &MenuTreeResolver {
        &self.resolver
    }

    pub fn menus(&self) -> &GroupMenuService {
        &self.service
    }

    /// Flush sled to disk; a no-op in memory.
    pub fn flush(&self) -> Result<(), ApiError> {
        if let Some(db) = &self.db {
            db.flush().map_err(StorageError::from)?;
        }
        Ok(())
    }
}
