use super::Format;
use crate::model::lattice::LatticeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O operation failed: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("failed to parse {format} data: {details} (at line ~{line})")]
    Parse {
        format: Format,
        line: usize,
        details: String,
    },

    #[error("invalid {format} structure at '{path}': {details}")]
    Schema {
        format: Format,
        path: String,
        details: String,
    },

    #[error("invalid lattice: {0}")]
    Lattice(#[from] LatticeError),

    #[error("disordered structure with partial occupancies cannot be written as {0}")]
    DisorderedStructure(Format),
}

impl Error {
    pub fn parse(format: Format, line: usize, details: impl Into<String>) -> Self {
        Self::Parse {
            format,
            line,
            details: details.into(),
        }
    }

    pub fn schema(format: Format, path: impl Into<String>, details: impl Into<String>) -> Self {
        Self::Schema {
            format,
            path: path.into(),
            details: details.into(),
        }
    }
}
