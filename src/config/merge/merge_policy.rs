//! Merge rules: defaults first, later sources override earlier ones key by key.

use config::builder::DefaultState;
use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with merge policy defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("resolver.max_symlink_depth", 40_i64)?
        .set_default("paths.max_path_length", 4096_i64)?
        .set_default("paths.max_segment_length", 255_i64)?
        .set_default("logging.level", "info")
}
