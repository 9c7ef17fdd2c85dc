//! Configuration System
//!
//! Layered configuration for the filesystem: built-in defaults, a global
//! config file, workspace config files and `MEMFS_`-prefixed environment
//! variables, validated before use.

use crate::error::ConfigError;
use crate::logging::LoggingConfig;
use crate::path::{default_reserved_names, PathLimits};
use crate::tree::resolve::DEFAULT_MAX_SYMLINK_DEPTH;
use serde::{Deserialize, Serialize};

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FsConfig {
    /// Symlink resolution settings
    #[serde(default)]
    pub resolver: ResolverConfig,

    /// Path validation limits
    #[serde(default)]
    pub paths: PathConfig,

    /// Ownership and permission bits given to new nodes
    #[serde(default)]
    pub defaults: NodeDefaults,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Nested symlink resolutions allowed before reporting a loop
    #[serde(default = "default_max_symlink_depth")]
    pub max_symlink_depth: usize,
}

fn default_max_symlink_depth() -> usize {
    DEFAULT_MAX_SYMLINK_DEPTH
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            max_symlink_depth: default_max_symlink_depth(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathConfig {
    #[serde(default = "default_max_path_length")]
    pub max_path_length: usize,

    #[serde(default = "default_max_segment_length")]
    pub max_segment_length: usize,

    /// Device names rejected as path segments
    #[serde(default = "default_reserved_names")]
    pub reserved_names: Vec<String>,
}

fn default_max_path_length() -> usize {
    4096
}

fn default_max_segment_length() -> usize {
    255
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            max_path_length: default_max_path_length(),
            max_segment_length: default_max_segment_length(),
            reserved_names: default_reserved_names(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeDefaults {
    #[serde(default = "default_file_mode")]
    pub file_mode: u32,
    #[serde(default = "default_directory_mode")]
    pub directory_mode: u32,
    #[serde(default = "default_symlink_mode")]
    pub symlink_mode: u32,
    #[serde(default)]
    pub uid: u32,
    #[serde(default)]
    pub gid: u32,
}

fn default_file_mode() -> u32 {
    0o644
}

fn default_directory_mode() -> u32 {
    0o755
}

fn default_symlink_mode() -> u32 {
    0o777
}

impl Default for NodeDefaults {
    fn default() -> Self {
        Self {
            file_mode: default_file_mode(),
            directory_mode: default_directory_mode(),
            symlink_mode: default_symlink_mode(),
            uid: 0,
            gid: 0,
        }
    }
}

/// Configuration validation errors
#[derive(Debug, Clone)]
pub enum ValidationError {
    Resolver(String),
    Paths(String),
    Logging(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Resolver(msg) => write!(f, "Resolver: {}", msg),
            ValidationError::Paths(msg) => write!(f, "Paths: {}", msg),
            ValidationError::Logging(msg) => write!(f, "Logging: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl FsConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.resolver.max_symlink_depth == 0 {
            errors.push(ValidationError::Resolver(
                "max_symlink_depth must be at least 1".to_string(),
            ));
        }

        if self.paths.max_path_length == 0 {
            errors.push(ValidationError::Paths(
                "max_path_length must be at least 1".to_string(),
            ));
        }
        if self.paths.max_segment_length == 0 {
            errors.push(ValidationError::Paths(
                "max_segment_length must be at least 1".to_string(),
            ));
        }
        if self.paths.max_segment_length > self.paths.max_path_length {
            errors.push(ValidationError::Paths(format!(
                "max_segment_length ({}) exceeds max_path_length ({})",
                self.paths.max_segment_length, self.paths.max_path_length
            )));
        }

        let level = self.logging.level.as_str();
        if !["trace", "debug", "info", "warn", "error", "off"].contains(&level) {
            errors.push(ValidationError::Logging(format!(
                "unknown level '{}'",
                level
            )));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    pub fn path_limits(&self) -> PathLimits {
        PathLimits {
            max_path_length: self.paths.max_path_length,
            max_segment_length: self.paths.max_segment_length,
            reserved_names: self.paths.reserved_names.clone(),
        }
    }

    /// Render the configuration as a TOML document
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Invalid(e.to_string()))
    }
}
