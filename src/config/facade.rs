//! Configuration loader: assembles sources in precedence order and validates.

use super::merge::merge_policy;
use super::sources::{environment, global_file, workspace_file};
use super::FsConfig;
use crate::error::ConfigError;
use config::File;
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for a workspace
    ///
    /// Precedence (lowest to highest): defaults, global config file,
    /// `<root>/config/memfs.toml`, `<root>/config/<MEMFS_ENV>.toml`,
    /// `MEMFS_` environment variables.
    pub fn load(workspace_root: &Path) -> Result<FsConfig, ConfigError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = workspace_file::add_to_builder(builder, workspace_root)?;
        let builder = environment::add_to_builder(builder);

        let config: FsConfig = builder.build()?.try_deserialize()?;
        Self::validated(config)
    }

    /// Load configuration from a single file, without environment overrides
    pub fn load_from_file(path: &Path) -> Result<FsConfig, ConfigError> {
        let config: FsConfig = merge_policy::builder_with_defaults()?
            .add_source(File::from(path))
            .build()?
            .try_deserialize()?;
        Self::validated(config)
    }

    /// Built-in defaults only
    pub fn default() -> FsConfig {
        FsConfig::default()
    }

    pub fn global_config_path() -> Option<PathBuf> {
        global_file::global_config_path()
    }

    fn validated(config: FsConfig) -> Result<FsConfig, ConfigError> {
        config.validate().map_err(|errors| {
            let error_msgs: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            ConfigError::Invalid(format!(
                "Configuration validation failed:\n{}",
                error_msgs.join("\n")
            ))
        })?;
        debug!(
            max_symlink_depth = config.resolver.max_symlink_depth,
            "Configuration loaded"
        );
        Ok(config)
    }
}
