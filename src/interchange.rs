//! JSON import and export
//!
//! Two layouts are understood. *Nested* maps names to values inside a base
//! directory; *flat* maps full paths to values. Values are `null` for an
//! empty directory, a string for UTF-8 file content, an array of byte
//! numbers for any other content and an object for a subdirectory.
//!
//! Symlinks export as the string `"symlink:<target>"`. Importing that
//! string writes a plain file with that content, so links do not survive
//! a round trip.

use crate::error::{ErrorKind, FsError, FsResult};
use crate::fs::MemoryFs;
use crate::path;
use crate::types::NodeKind;
use serde_json::{Map, Value};
use tracing::debug;

/// Prefix marking an exported symlink
pub const SYMLINK_PREFIX: &str = "symlink:";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layout {
    #[default]
    Nested,
    Flat,
}

impl Layout {
    /// Flat when some key looks like a path and holds a leaf value
    pub fn detect(object: &Map<String, Value>) -> Self {
        let flat = object
            .iter()
            .any(|(key, value)| key.contains(path::SEPARATOR) && is_leaf(value));
        if flat {
            Layout::Flat
        } else {
            Layout::Nested
        }
    }
}

/// Export the tree below `base`
pub fn export_json(fs: &MemoryFs, base: &str, layout: Layout) -> FsResult<Value> {
    let mut out = Map::new();
    match layout {
        Layout::Nested => export_nested(fs, base, &mut out)?,
        Layout::Flat => export_flat(fs, base, &mut out)?,
    }
    debug!(base, entries = out.len(), ?layout, "Exported tree");
    Ok(Value::Object(out))
}

/// Export as a pretty-printed JSON document
pub fn export_string(fs: &MemoryFs, base: &str, layout: Layout) -> FsResult<String> {
    let value = export_json(fs, base, layout)?;
    serde_json::to_string_pretty(&value).map_err(|e| io_error(base, e))
}

/// Import `value` below `base`, detecting the layout
///
/// Returns the number of files and directories written.
pub fn import_json(fs: &mut MemoryFs, value: &Value, base: &str) -> FsResult<usize> {
    let object = value
        .as_object()
        .ok_or_else(|| FsError::new(ErrorKind::IoError, base).with_reason("expected a JSON object"))?;
    fs.create_directory(base, true)?;
    let base = path::resolve(fs.cwd(), base);

    let layout = Layout::detect(object);
    let mut written = 0;
    for (key, entry) in object {
        let target = match layout {
            Layout::Flat => path::resolve(&base, key),
            Layout::Nested => path::join(&[base.as_str(), key.as_str()]),
        };
        written += import_value(fs, &target, entry)?;
    }
    debug!(base = %base, written, ?layout, "Imported tree");
    Ok(written)
}

/// Parse a JSON document and import it
pub fn import_str(fs: &mut MemoryFs, json: &str, base: &str) -> FsResult<usize> {
    let value: Value = serde_json::from_str(json).map_err(|e| io_error(base, e))?;
    import_json(fs, &value, base)
}

fn import_value(fs: &mut MemoryFs, target: &str, value: &Value) -> FsResult<usize> {
    match value {
        Value::Null => {
            fs.create_directory(target, true)?;
            Ok(1)
        }
        Value::String(text) => {
            fs.write_file(target, text)?;
            Ok(1)
        }
        Value::Array(items) => {
            fs.write_file(target, bytes_of(target, items)?)?;
            Ok(1)
        }
        Value::Object(children) => {
            fs.create_directory(target, true)?;
            let mut written = 1;
            for (name, child) in children {
                written += import_value(fs, &path::join(&[target, name.as_str()]), child)?;
            }
            Ok(written)
        }
        Value::Bool(_) | Value::Number(_) => Err(FsError::new(ErrorKind::IoError, target)
            .with_reason("expected null, a string, a byte array or an object")),
    }
}

fn export_nested(fs: &MemoryFs, dir: &str, out: &mut Map<String, Value>) -> FsResult<()> {
    for entry in fs.read_directory_entries(dir)? {
        let child = path::join(&[dir, entry.name.as_str()]);
        let value = match entry.kind {
            NodeKind::Directory => {
                let mut nested = Map::new();
                export_nested(fs, &child, &mut nested)?;
                if nested.is_empty() {
                    Value::Null
                } else {
                    Value::Object(nested)
                }
            }
            NodeKind::File => content_value(fs.read_file(&child)?),
            NodeKind::Symlink => symlink_value(fs, &child)?,
        };
        out.insert(entry.name, value);
    }
    Ok(())
}

fn export_flat(fs: &MemoryFs, dir: &str, out: &mut Map<String, Value>) -> FsResult<()> {
    for entry in fs.read_directory_entries(dir)? {
        let child = path::join(&[dir, entry.name.as_str()]);
        match entry.kind {
            NodeKind::Directory => {
                if fs.read_directory(&child)?.is_empty() {
                    out.insert(child, Value::Null);
                } else {
                    export_flat(fs, &child, out)?;
                }
            }
            NodeKind::File => {
                let value = content_value(fs.read_file(&child)?);
                out.insert(child, value);
            }
            NodeKind::Symlink => {
                let value = symlink_value(fs, &child)?;
                out.insert(child, value);
            }
        }
    }
    Ok(())
}

fn content_value(content: Vec<u8>) -> Value {
    match String::from_utf8(content) {
        Ok(text) => Value::String(text),
        Err(e) => Value::Array(e.into_bytes().into_iter().map(Value::from).collect()),
    }
}

fn symlink_value(fs: &MemoryFs, link: &str) -> FsResult<Value> {
    Ok(Value::String(format!("{}{}", SYMLINK_PREFIX, fs.read_link(link)?)))
}

fn is_leaf(value: &Value) -> bool {
    value.is_null() || value.is_string() || value.is_array()
}

fn bytes_of(target: &str, items: &[Value]) -> FsResult<Vec<u8>> {
    items
        .iter()
        .map(|item| {
            item.as_u64()
                .and_then(|n| u8::try_from(n).ok())
                .ok_or_else(|| {
                    FsError::new(ErrorKind::IoError, target)
                        .with_reason("byte arrays may only hold integers 0-255")
                })
        })
        .collect()
}

fn io_error(path: &str, source: serde_json::Error) -> FsError {
    FsError::new(ErrorKind::IoError, path)
        .with_reason("malformed JSON")
        .with_source(source)
}
