//! Path normalization, joining and validation
//!
//! Paths are `/`-separated UTF-8 strings. Nothing here touches the tree;
//! the functions only rewrite strings and split them into segments.

use crate::error::{FsError, FsResult};
use unicode_normalization::UnicodeNormalization;

pub const SEPARATOR: char = '/';
pub const ROOT: &str = "/";

/// Limits applied by [`validate`]
#[derive(Debug, Clone)]
pub struct PathLimits {
    pub max_path_length: usize,
    pub max_segment_length: usize,
    /// Compared case-insensitively against the part of a segment before its first `.`
    pub reserved_names: Vec<String>,
}

impl Default for PathLimits {
    fn default() -> Self {
        Self {
            max_path_length: 4096,
            max_segment_length: 255,
            reserved_names: default_reserved_names(),
        }
    }
}

pub fn default_reserved_names() -> Vec<String> {
    let mut names: Vec<String> = ["CON", "PRN", "AUX", "NUL"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    for i in 1..=9 {
        names.push(format!("COM{}", i));
        names.push(format!("LPT{}", i));
    }
    names
}

pub fn is_absolute(path: &str) -> bool {
    path.starts_with(SEPARATOR)
}

/// Normalize a path string
///
/// This function:
/// 1. Normalizes Unicode to NFC
/// 2. Collapses repeated separators and drops `.` segments
/// 3. Resolves `..` against the preceding segment; a leading `..` is
///    dropped for absolute paths and kept for relative ones
/// 4. Removes trailing separators (except root)
///
/// An empty or fully-collapsed relative path becomes `.`.
pub fn normalize(path: &str) -> String {
    let nfc: String = path.nfc().collect();
    let absolute = is_absolute(&nfc);

    let mut stack: Vec<&str> = Vec::new();
    for segment in nfc.split(SEPARATOR) {
        match segment {
            "" | "." => {}
            ".." => {
                if stack.last().is_some_and(|last| *last != "..") {
                    stack.pop();
                } else if !absolute {
                    stack.push("..");
                }
            }
            other => stack.push(other),
        }
    }

    if absolute {
        format!("/{}", stack.join("/"))
    } else if stack.is_empty() {
        ".".to_string()
    } else {
        stack.join("/")
    }
}

/// Split a path into its normalized segments (`/` and `.` yield none)
pub fn split(path: &str) -> Vec<String> {
    normalize(path)
        .split(SEPARATOR)
        .filter(|s| !s.is_empty() && *s != ".")
        .map(str::to_string)
        .collect()
}

/// Build an absolute path from segments
pub fn from_segments<S: AsRef<str>>(segments: &[S]) -> String {
    let mut out = String::from(ROOT);
    for (i, segment) in segments.iter().enumerate() {
        if i > 0 {
            out.push(SEPARATOR);
        }
        out.push_str(segment.as_ref());
    }
    out
}

pub fn dirname(path: &str) -> String {
    let normalized = normalize(path);
    if normalized == ROOT {
        return normalized;
    }
    match normalized.rfind(SEPARATOR) {
        Some(0) => ROOT.to_string(),
        Some(i) => normalized[..i].to_string(),
        None => ".".to_string(),
    }
}

/// Final segment of a path, optionally with `suffix` removed
///
/// The suffix is kept when it is the whole name.
pub fn basename(path: &str, suffix: Option<&str>) -> String {
    let normalized = normalize(path);
    if normalized == ROOT {
        return String::new();
    }
    let base = match normalized.rfind(SEPARATOR) {
        Some(i) => &normalized[i + 1..],
        None => normalized.as_str(),
    };
    match suffix {
        Some(suffix) if !suffix.is_empty() && base != suffix => base
            .strip_suffix(suffix)
            .unwrap_or(base)
            .to_string(),
        _ => base.to_string(),
    }
}

/// Join path fragments and normalize the result
pub fn join<S: AsRef<str>>(parts: &[S]) -> String {
    let joined = parts
        .iter()
        .map(AsRef::as_ref)
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join("/");
    normalize(&joined)
}

/// Resolve `path` to an absolute path, relative paths against `base`
pub fn resolve(base: &str, path: &str) -> String {
    if is_absolute(path) {
        return normalize(path);
    }
    let base = if is_absolute(base) {
        base.to_string()
    } else {
        format!("/{}", base)
    };
    normalize(&format!("{}/{}", base, path))
}

/// Relative path leading from `from` to `to`
///
/// Both are resolved against the root first. Identical paths yield an
/// empty string.
pub fn relative(from: &str, to: &str) -> String {
    let from = split(&resolve(ROOT, from));
    let to = split(&resolve(ROOT, to));

    let common = from
        .iter()
        .zip(to.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<&str> = Vec::with_capacity(from.len() - common + to.len() - common);
    parts.extend(std::iter::repeat("..").take(from.len() - common));
    parts.extend(to[common..].iter().map(String::as_str));
    parts.join("/")
}

/// Validate a path before it is used for a mutation or lookup
///
/// Rejects empty input, control characters, over-long paths or segments,
/// reserved device names and segments ending in a space or period.
/// `.` and `..` segments are exempt from the per-segment checks.
pub fn validate(path: &str, limits: &PathLimits) -> FsResult<()> {
    if path.is_empty() {
        return Err(FsError::invalid_path(path, "path is empty"));
    }
    if path.chars().any(char::is_control) {
        return Err(FsError::invalid_path(path, "path contains control characters"));
    }
    if path.chars().count() > limits.max_path_length {
        return Err(FsError::invalid_path(
            path,
            format!("path exceeds {} characters", limits.max_path_length),
        ));
    }

    for segment in path.split(SEPARATOR) {
        if segment.is_empty() || segment == "." || segment == ".." {
            continue;
        }
        if segment.chars().count() > limits.max_segment_length {
            return Err(FsError::invalid_path(
                path,
                format!(
                    "segment '{}' exceeds {} characters",
                    segment, limits.max_segment_length
                ),
            ));
        }
        let stem = segment.split('.').next().unwrap_or(segment);
        if limits
            .reserved_names
            .iter()
            .any(|reserved| reserved.eq_ignore_ascii_case(stem))
        {
            return Err(FsError::invalid_path(
                path,
                format!("segment '{}' is a reserved name", segment),
            ));
        }
        if segment.ends_with(' ') || segment.ends_with('.') {
            return Err(FsError::invalid_path(
                path,
                format!("segment '{}' ends with a space or period", segment),
            ));
        }
    }

    Ok(())
}
