use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use walkdir::WalkDir;

use super::error::Error;
use super::naming::SourceId;

const INPUT_EXTENSION: &str = "json";

/// One discovered input file and its position in the batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputFile {
    pub index: usize,
    pub path: PathBuf,
}

impl InputFile {
    pub fn source_id(&self) -> SourceId {
        SourceId::new(self.index, &self.path)
    }
}

/// Lists the non-hidden `*.json` entries directly inside `dir`, sorted by name.
///
/// Every matching name takes an index, including a directory that happens to
/// be named `*.json`; it fails later in [`load_document`] as a per-file
/// error. Subdirectories are not descended into. An empty result is
/// [`Error::NoInputs`].
pub fn discover_inputs(dir: &Path) -> Result<Vec<InputFile>, Error> {
    let mut inputs = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|source| Error::InputDir {
            path: dir.to_path_buf(),
            source,
        })?;
        let name = entry.file_name().to_string_lossy();
        if name.starts_with('.') {
            continue;
        }
        let is_json = entry
            .path()
            .extension()
            .is_some_and(|ext| ext == INPUT_EXTENSION);
        if is_json {
            inputs.push(InputFile {
                index: inputs.len(),
                path: entry.into_path(),
            });
        }
    }
    if inputs.is_empty() {
        return Err(Error::NoInputs(dir.to_path_buf()));
    }
    Ok(inputs)
}

/// Reads and parses one input document.
pub fn load_document(path: &Path) -> Result<Value, Error> {
    let bytes = fs::read(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&bytes).map_err(|source| Error::Json {
        path: path.to_path_buf(),
        source,
    })
}
