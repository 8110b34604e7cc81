//! Error types for the conversion pipeline.
//!
//! Errors fall into two groups. Run-level errors ([`Error::NoInputs`],
//! [`Error::OutputDir`], [`Error::LabelFile`], ...) stop the whole batch.
//! File-level errors ([`Error::Read`], [`Error::Json`], [`Error::Shape`])
//! are recorded in the [`FileReport`](super::FileReport) of the offending file
//! and the batch moves on to the next one.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while discovering, loading, or emitting a batch.
#[derive(Debug, Error)]
pub enum Error {
    /// The input directory could not be listed.
    #[error("failed to read input directory '{}': {source}", .path.display())]
    InputDir {
        path: PathBuf,
        source: walkdir::Error,
    },

    /// No `*.json` files were found in the input directory.
    #[error("no JSON files found in directory '{}'", .0.display())]
    NoInputs(PathBuf),

    /// The output directory did not exist and could not be created.
    #[error("failed to create output directory '{}': {source}", .path.display())]
    OutputDir {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The label CSV could not be opened for writing.
    #[error("failed to create label file '{}': {source}", .path.display())]
    LabelFile { path: PathBuf, source: csv::Error },

    /// Buffered label rows could not be flushed to disk.
    #[error("failed to flush label file: {0}")]
    LabelFlush(#[source] std::io::Error),

    /// A field-name override file is not valid TOML for [`FieldNames`](super::FieldNames).
    #[error("failed to parse field names: {0}")]
    Fields(#[from] toml::de::Error),

    /// An input file could not be read.
    #[error("failed to read '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// An input file is not valid JSON.
    #[error("failed to parse JSON in '{}': {source}", .path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// An input file is valid JSON but not in the shape the schema expects.
    #[error("'{}': {source}", .path.display())]
    Shape { path: PathBuf, source: ShapeError },
}

impl Error {
    /// `true` for errors that only disqualify a single input file.
    pub fn is_per_file(&self) -> bool {
        matches!(
            self,
            Error::Read { .. } | Error::Json { .. } | Error::Shape { .. }
        )
    }
}

/// Document-level shape problems found by the traversals.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
    #[error("top level is {found}, expected an object")]
    NotAnObject { found: &'static str },

    #[error("no '{field}' found in the JSON file")]
    NoEntries { field: String },

    #[error("'{field}' is {found}, expected a list")]
    NotAList { field: String, found: &'static str },
}
