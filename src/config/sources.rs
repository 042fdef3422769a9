//! Configuration sources added to the builder, lowest precedence first

use crate::config::paths;
use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, Environment, File, FileFormat};
use std::path::Path;

pub const ENV_PREFIX: &str = "MENUGRAFT";

/// The global config file, when one exists.
pub fn global_file(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
    match paths::global_config_file() {
        Ok(path) if path.is_file() => builder.add_source(
            File::from(path)
                .format(FileFormat::Toml)
                .required(false),
        ),
        _ => builder,
    }
}

/// A file the caller named; it must exist.
pub fn explicit_file(builder: ConfigBuilder<DefaultState>, path: &Path) -> ConfigBuilder<DefaultState> {
    builder.add_source(File::from(path).format(FileFormat::Toml).required(true))
}

/// `MENUGRAFT__SECTION__KEY` overrides.
pub fn environment(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Ok(builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .separator("__")
            .try_parsing(true),
    ))
}
