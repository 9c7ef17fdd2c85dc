//! Error types for the in-memory filesystem.

use std::fmt;
use thiserror::Error;

/// Boxed cause carried by an [`FsError`].
pub type Cause = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result alias used by every filesystem operation.
pub type FsResult<T> = Result<T, FsError>;

/// Failure category of a filesystem operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    FileNotFound,
    DirectoryNotFound,
    /// Reserved: permissions are stored, never enforced.
    PermissionDenied,
    DirectoryNotEmpty,
    FileAlreadyExists,
    DirectoryAlreadyExists,
    InvalidPath,
    NotAFile,
    NotADirectory,
    NotASymlink,
    SymlinkLoop,
    MaxDepthExceeded,
    /// Reserved for collaborators (interchange parsing and the like).
    IoError,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::FileNotFound => "file not found",
            ErrorKind::DirectoryNotFound => "directory not found",
            ErrorKind::PermissionDenied => "permission denied",
            ErrorKind::DirectoryNotEmpty => "directory not empty",
            ErrorKind::FileAlreadyExists => "file already exists",
            ErrorKind::DirectoryAlreadyExists => "directory already exists",
            ErrorKind::InvalidPath => "invalid path",
            ErrorKind::NotAFile => "not a file",
            ErrorKind::NotADirectory => "not a directory",
            ErrorKind::NotASymlink => "not a symlink",
            ErrorKind::SymlinkLoop => "too many levels of symbolic links",
            ErrorKind::MaxDepthExceeded => "maximum depth exceeded",
            ErrorKind::IoError => "i/o error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Filesystem error: a kind, the offending path, and optional detail.
#[derive(Debug, Error)]
#[error("{kind}: {path}{}", reason_suffix(.reason))]
pub struct FsError {
    kind: ErrorKind,
    path: String,
    reason: Option<String>,
    #[source]
    source: Option<Cause>,
}

fn reason_suffix(reason: &Option<String>) -> String {
    match reason {
        Some(r) => format!(" ({})", r),
        None => String::new(),
    }
}

impl FsError {
    pub fn new(kind: ErrorKind, path: impl Into<String>) -> Self {
        Self {
            kind,
            path: path.into(),
            reason: None,
            source: None,
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<Cause>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }

    pub fn file_not_found(path: impl Into<String>) -> Self {
        Self::new(ErrorKind::FileNotFound, path)
    }

    pub fn directory_not_found(path: impl Into<String>) -> Self {
        Self::new(ErrorKind::DirectoryNotFound, path)
    }

    pub fn directory_not_empty(path: impl Into<String>) -> Self {
        Self::new(ErrorKind::DirectoryNotEmpty, path)
    }

    pub fn file_exists(path: impl Into<String>) -> Self {
        Self::new(ErrorKind::FileAlreadyExists, path)
    }

    pub fn directory_exists(path: impl Into<String>) -> Self {
        Self::new(ErrorKind::DirectoryAlreadyExists, path)
    }

    pub fn invalid_path(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidPath, path).with_reason(reason)
    }

    pub fn not_a_file(path: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotAFile, path)
    }

    pub fn not_a_directory(path: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotADirectory, path)
    }

    pub fn not_a_symlink(path: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotASymlink, path)
    }

    pub fn symlink_loop(path: impl Into<String>, depth: usize) -> Self {
        Self::new(ErrorKind::SymlinkLoop, path)
            .with_reason(format!("resolution exceeded {} levels", depth))
    }

    pub fn snapshot_not_found(id: &str) -> Self {
        Self::new(ErrorKind::FileNotFound, format!("snapshot:{}", id))
            .with_reason("unknown snapshot id")
    }
}

/// Configuration and logging setup errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Logging setup failed: {0}")]
    Logging(String),
}
