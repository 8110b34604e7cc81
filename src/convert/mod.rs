//! Batch conversion of JSON structure exports.
//!
//! A run discovers the `*.json` files in one directory, walks each document
//! according to its [`Schema`], and feeds every leaf record to an emitter:
//!
//! - [`GeometryEmitter`] writes one POSCAR file per record with a structure.
//! - [`LabelEmitter`] writes one `id_prop.csv` row per record with both a
//!   structure and a scalar label.
//!
//! Both emitters name files through the same [`FilenameDeriver`], so running
//! them over the same inputs gives a label file whose first column lists
//! exactly the geometry files written.

mod config;
mod error;
mod geometry;
mod inputs;
mod label;
mod labels;
mod markers;
mod naming;
mod report;
mod walk;

pub mod flat;
pub mod nested;

pub use config::{ConvertConfig, FieldNames, FlatFields, NestedFields, Schema, default_field_names};
pub use error::{Error, ShapeError};
pub use geometry::{DEFAULT_GEOMETRY_DIR, GeometryEmitter};
pub use inputs::{InputFile, discover_inputs, load_document};
pub use label::{LabelError, ScalarLabel, energy, min_band_gap};
pub use labels::{DEFAULT_LABEL_DIR, LABEL_FILE_NAME, LabelEmitter};
pub use markers::{completed_marker, skipped_marker};
pub use naming::{
    DEFAULT_PREFIX, DerivedFilename, FilenameDeriver, GEOMETRY_EXTENSION, PLACEHOLDER, RecordKey,
    SourceId, sanitize,
};
pub use report::{Counts, FileReport, FileStatus, RunReport};

use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::io::PoscarCodec;

/// Converts every input in `input_dir` to POSCAR files under `out_dir`.
pub fn convert_geometry(
    input_dir: &Path,
    out_dir: &Path,
    config: ConvertConfig,
) -> Result<RunReport, Error> {
    let inputs = discover_inputs(input_dir)?;
    let mut emitter = GeometryEmitter::new(out_dir, config, PoscarCodec)?;
    for input in &inputs {
        emitter.process_file(input);
    }
    Ok(emitter.finish())
}

/// Writes `out_dir/id_prop.csv` for every input in `input_dir`.
pub fn convert_labels(
    input_dir: &Path,
    out_dir: &Path,
    config: ConvertConfig,
) -> Result<RunReport, Error> {
    let inputs = discover_inputs(input_dir)?;
    let mut emitter = LabelEmitter::create(out_dir, config)?;
    for input in &inputs {
        emitter.process_file(input);
    }
    emitter.finish()
}

fn create_output_dir(dir: &Path) -> Result<(), Error> {
    fs::create_dir_all(dir).map_err(|source| Error::OutputDir {
        path: dir.to_path_buf(),
        source,
    })
}

/// The value of `field` if it is present and truthy.
///
/// `null`, `false`, `0`, `""`, `[]` and `{}` all count as absent.
fn structure_field<'a>(record: &'a Value, field: &str) -> Option<&'a Value> {
    record.get(field).filter(|value| is_truthy(value))
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|x| x != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}
