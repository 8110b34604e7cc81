//! Deterministic geometry filenames.
//!
//! The geometry and label emitters both derive names through
//! [`FilenameDeriver`], so every label row names exactly the file the
//! geometry pass writes for the same record.

use std::fmt;
use std::path::Path;

/// Substituted for a component that sanitizes to nothing.
pub const PLACEHOLDER: &str = "key_empty";
pub const GEOMETRY_EXTENSION: &str = "vasp";
pub const DEFAULT_PREFIX: &str = "POSCAR_";

/// Replaces every character outside `[A-Za-z0-9_-]` with `_`.
///
/// An empty result becomes [`PLACEHOLDER`]. The function is idempotent.
pub fn sanitize(text: &str) -> String {
    let cleaned = replace_unsafe(text);
    if cleaned.is_empty() {
        PLACEHOLDER.to_string()
    } else {
        cleaned
    }
}

fn replace_unsafe(text: &str) -> String {
    text.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Identity of one input file within a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceId {
    index: usize,
    stem: String,
}

impl SourceId {
    /// `index` is the 0-based position of the file in sorted order.
    pub fn new(index: usize, path: &Path) -> Self {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            index,
            stem: sanitize(&stem),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Sanitized file name without its extension.
    pub fn stem(&self) -> &str {
        &self.stem
    }
}

/// Position of one record inside its source document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKey<'a> {
    /// Step `step` of entry `entry` under top-level key `group`, both 0-based.
    Nested {
        group: &'a str,
        entry: usize,
        step: usize,
    },
    /// 1-based `entry` of a flat export, with its material id if present.
    Flat {
        entry: usize,
        material_id: Option<&'a str>,
    },
}

impl fmt::Display for RecordKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKey::Nested { group, entry, step } => {
                write!(f, "step {step} of entry {entry} under key '{group}'")
            }
            RecordKey::Flat {
                entry,
                material_id: Some(id),
            } => write!(f, "entry {entry} ('{id}')"),
            RecordKey::Flat { entry, .. } => write!(f, "entry {entry}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedFilename(String);

impl DerivedFilename {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<Path> for DerivedFilename {
    fn as_ref(&self) -> &Path {
        Path::new(&self.0)
    }
}

impl fmt::Display for DerivedFilename {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone)]
pub struct FilenameDeriver {
    prefix: String,
}

impl FilenameDeriver {
    /// Unsafe characters in `prefix` are replaced; an empty prefix stays empty.
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: replace_unsafe(prefix),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn derive(&self, source: &SourceId, key: &RecordKey<'_>) -> DerivedFilename {
        let name = match key {
            RecordKey::Nested { group, entry, step } => format!(
                "{}{}_{}_entry{}_step{}.{}",
                self.prefix,
                source.stem,
                sanitize(group),
                entry,
                step,
                GEOMETRY_EXTENSION
            ),
            RecordKey::Flat { entry, material_id } => {
                let id = material_id
                    .filter(|id| !id.is_empty())
                    .map(sanitize)
                    .unwrap_or_else(|| format!("entry_{entry}"));
                format!(
                    "{}_jsonNum_{}_entryNum{}_{}.{}",
                    self.prefix, source.index, entry, id, GEOMETRY_EXTENSION
                )
            }
        };
        DerivedFilename(name)
    }
}
