//! Glob pattern compilation
//!
//! Patterns compile to anchored regular expressions:
//! - `**` matches any run of characters, separators included
//! - `*` matches any run of characters except `/`
//! - `?` matches exactly one character other than `/`
//!
//! Every other character is literal. `**/*.rs` therefore needs at least one
//! directory level; it does not match a bare `main.rs`.

use crate::error::{FsError, FsResult};
use regex::Regex;

/// Compiled glob pattern
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    regex: Regex,
}

impl Pattern {
    pub fn new(pattern: &str) -> FsResult<Self> {
        let expr = to_regex(pattern);
        let regex = Regex::new(&expr).map_err(|e| {
            FsError::invalid_path(pattern, "pattern does not compile").with_source(e)
        })?;
        Ok(Self {
            source: pattern.to_string(),
            regex,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn matches(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }
}

/// Translate a glob into an anchored regular expression
pub fn to_regex(pattern: &str) -> String {
    let mut expr = String::with_capacity(pattern.len() * 2 + 2);
    expr.push('^');

    let mut chars = pattern.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '*' if chars.peek() == Some(&'*') => {
                chars.next();
                expr.push_str(".*");
            }
            '*' => expr.push_str("[^/]*"),
            '?' => expr.push_str("[^/]"),
            other => {
                let mut buf = [0u8; 4];
                expr.push_str(&regex::escape(other.encode_utf8(&mut buf)));
            }
        }
    }

    expr.push('$');
    expr
}

/// A set of ignore patterns
///
/// A path is ignored when any pattern matches either the path relative to
/// the traversal root or the bare entry name.
#[derive(Debug, Clone, Default)]
pub struct IgnoreSet {
    patterns: Vec<Pattern>,
}

impl IgnoreSet {
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> FsResult<Self> {
        let patterns = patterns
            .iter()
            .map(|p| Pattern::new(p.as_ref()))
            .collect::<FsResult<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    pub fn is_ignored(&self, relative_path: &str, name: &str) -> bool {
        self.patterns
            .iter()
            .any(|p| p.matches(relative_path) || p.matches(name))
    }
}
