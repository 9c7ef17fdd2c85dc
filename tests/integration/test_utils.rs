//! Shared test utilities for integration tests
//!
//! Provides a stock project tree and isolated config-home handling.

use memfs::MemoryFs;
use std::sync::Mutex;
use tempfile::TempDir;

/// Global mutex to serialize environment variable access across all tests
static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Environment variable state to restore after test
struct EnvState {
    xdg_config_home: Option<String>,
    memfs_env: Option<String>,
}

impl EnvState {
    fn capture() -> Self {
        Self {
            xdg_config_home: std::env::var("XDG_CONFIG_HOME").ok(),
            memfs_env: std::env::var("MEMFS_ENV").ok(),
        }
    }

    fn restore(self) {
        match self.xdg_config_home {
            Some(orig) => std::env::set_var("XDG_CONFIG_HOME", orig),
            None => std::env::remove_var("XDG_CONFIG_HOME"),
        }
        match self.memfs_env {
            Some(orig) => std::env::set_var("MEMFS_ENV", orig),
            None => std::env::remove_var("MEMFS_ENV"),
        }
    }
}

/// Run `f` with XDG_CONFIG_HOME pointing into `test_dir`
///
/// The original environment is restored afterwards; a global mutex keeps
/// parallel tests from seeing each other's variables.
pub fn with_config_home<F, R>(test_dir: &TempDir, f: F) -> R
where
    F: FnOnce() -> R,
{
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let env_state = EnvState::capture();

    let config_home = test_dir.path().join("xdg");
    std::fs::create_dir_all(&config_home).unwrap();
    std::env::set_var("XDG_CONFIG_HOME", config_home.to_str().unwrap());

    let result = f();

    env_state.restore();
    result
}

/// Run `f` with the given variables set (or removed, for `None`)
///
/// Shares the config-home mutex; previous values are restored afterwards.
pub fn with_env_vars<F, R>(vars: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let saved: Vec<(String, Option<String>)> = vars
        .iter()
        .map(|(key, _)| (key.to_string(), std::env::var(key).ok()))
        .collect();
    for (key, value) in vars {
        match value {
            Some(value) => std::env::set_var(key, value),
            None => std::env::remove_var(key),
        }
    }

    let result = f();

    for (key, value) in saved {
        match value {
            Some(value) => std::env::set_var(&key, value),
            None => std::env::remove_var(&key),
        }
    }
    result
}

/// A small source tree:
///
/// ```text
/// /README.md
/// /.env
/// /src/index.ts
/// /src/utils/helper.ts
/// /src/utils/format.js
/// /node_modules/pkg/index.ts
/// ```
pub fn sample_project() -> MemoryFs {
    let mut fs = MemoryFs::new();
    fs.write_file("/README.md", "# project").unwrap();
    fs.write_file("/.env", "SECRET=1").unwrap();
    fs.write_file("/src/index.ts", "export {}").unwrap();
    fs.write_file("/src/utils/helper.ts", "export const h = 1").unwrap();
    fs.write_file("/src/utils/format.js", "module.exports = {}").unwrap();
    fs.write_file("/node_modules/pkg/index.ts", "// vendored").unwrap();
    fs
}
