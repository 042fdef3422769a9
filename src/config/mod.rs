//! Configuration
//!
//! Layered with the `config` crate: built-in defaults, the global file
//! (`$XDG_CONFIG_HOME/menugraft/config.toml`), an explicit file, then
//! `MENUGRAFT__*` environment variables (`__` separates nested keys).

pub mod loader;
pub mod paths;
pub mod sources;

use crate::error::ApiError;
use crate::logging::LoggingConfig;
use crate::menu::group_menu::{GroupMenuNaming, DEFAULT_MENU_PREFIX};
use crate::shadow::id::{ShadowScheme, DEFAULT_SHADOW_PREFIX, DEFAULT_SHADOW_PROVIDER};
use crate::store::DEFAULT_MAX_DEPTH;
use crate::types::GROUP_MENU_PROVIDER;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub use loader::ConfigLoader;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MenugraftConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub menus: MenusConfig,
    #[serde(default)]
    pub shadow: ShadowConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Sled database directory; `None` uses the platform data directory
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl StorageConfig {
    pub fn resolved_path(&self) -> Result<PathBuf, ApiError> {
        match &self.path {
            Some(path) => Ok(path.clone()),
            None => paths::default_store_path(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenusConfig {
    #[serde(default = "default_menu_prefix")]
    pub group_menu_prefix: String,
    /// Deepest level a link may sit at in any menu
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

fn default_menu_prefix() -> String {
    DEFAULT_MENU_PREFIX.to_string()
}

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

impl Default for MenusConfig {
    fn default() -> Self {
        Self {
            group_menu_prefix: default_menu_prefix(),
            max_depth: default_max_depth(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShadowConfig {
    #[serde(default = "default_shadow_prefix")]
    pub id_prefix: String,
    #[serde(default = "default_shadow_provider")]
    pub provider: String,
}

fn default_shadow_prefix() -> String {
    DEFAULT_SHADOW_PREFIX.to_string()
}

fn default_shadow_provider() -> String {
    DEFAULT_SHADOW_PROVIDER.to_string()
}

impl Default for ShadowConfig {
    fn default() -> Self {
        Self {
            id_prefix: default_shadow_prefix(),
            provider: default_shadow_provider(),
        }
    }
}

impl MenugraftConfig {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.menus.group_menu_prefix.is_empty() {
            return Err(ApiError::ConfigError(
                "menus.group_menu_prefix must not be empty".to_string(),
            ));
        }
        if self.menus.max_depth == 0 {
            return Err(ApiError::ConfigError(
                "menus.max_depth must be at least 1".to_string(),
            ));
        }
        if self.shadow.id_prefix.is_empty() || self.shadow.provider.is_empty() {
            return Err(ApiError::ConfigError(
                "shadow.id_prefix and shadow.provider must not be empty".to_string(),
            ));
        }
        if self.shadow.provider == GROUP_MENU_PROVIDER {
            return Err(ApiError::ConfigError(format!(
                "shadow.provider must differ from the group link provider '{}'",
                GROUP_MENU_PROVIDER
            )));
        }
        Ok(())
    }

    pub fn shadow_scheme(&self) -> Result<ShadowScheme, ApiError> {
        ShadowScheme::new(self.shadow.id_prefix.clone(), self.shadow.provider.clone()).ok_or_else(
            || ApiError::ConfigError("shadow.id_prefix and shadow.provider must not be empty".to_string()),
        )
    }

    pub fn naming(&self) -> GroupMenuNaming {
        GroupMenuNaming::new(self.menus.group_menu_prefix.clone())
    }
}
