//! Config loading entry point

use crate::config::{sources, MenugraftConfig};
use crate::error::ApiError;
use config::Config;
use std::path::Path;

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load from the global file and environment.
    pub fn load() -> Result<MenugraftConfig, ApiError> {
        Self::build(None)
    }

    /// Load with `path` layered over the global file.
    pub fn load_from_file(path: &Path) -> Result<MenugraftConfig, ApiError> {
        Self::build(Some(path))
    }

    fn build(explicit: Option<&Path>) -> Result<MenugraftConfig, ApiError> {
        let mut builder = sources::global_file(Config::builder());
        if let Some(path) = explicit {
            builder = sources::explicit_file(builder, path);
        }
        let builder = sources::environment(builder)?;
        let config: MenugraftConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }
}
