//! Schema dispatch shared by both emitters.

use serde_json::Value;
use tracing::{debug, info, warn};

use super::config::{ConvertConfig, Schema};
use super::error::{Error, ShapeError};
use super::flat;
use super::inputs::{InputFile, load_document};
use super::label::{LabelError, ScalarLabel};
use super::naming::RecordKey;
use super::nested::{self, NestedEvent};
use super::report::{Counts, FileReport, FileStatus};

/// One leaf record, independent of the schema it came from.
#[derive(Debug)]
pub(crate) struct Record<'a> {
    pub key: RecordKey<'a>,
    pub structure: Option<&'a Value>,
    pub label: Result<ScalarLabel, LabelError>,
}

/// Loads `input`, walks it, and hands each record to `visit`.
///
/// A file that cannot be loaded or has the wrong shape comes back with
/// [`FileStatus::Skipped`]; nothing is propagated.
pub(crate) fn process_input<F>(input: &InputFile, config: &ConvertConfig, mut visit: F) -> FileReport
where
    F: FnMut(Record<'_>, &mut Counts),
{
    info!("Processing file {}: '{}'", input.index, input.path.display());
    let mut report = FileReport::new(input);

    let result = load_document(&input.path).and_then(|doc| {
        debug!("Loaded JSON data from '{}'", input.path.display());
        walk(&doc, config, &mut report.counts, &mut visit).map_err(|source| Error::Shape {
            path: input.path.clone(),
            source,
        })
    });

    if let Err(e) = result {
        warn!("Skipping file '{}': {}", input.path.display(), e);
        report.status = FileStatus::Skipped {
            reason: e.to_string(),
        };
    }
    report
}

fn walk<'a, F>(
    doc: &'a Value,
    config: &'a ConvertConfig,
    counts: &mut Counts,
    visit: &mut F,
) -> Result<(), ShapeError>
where
    F: FnMut(Record<'a>, &mut Counts),
{
    match config.schema {
        Schema::Nested => {
            for event in nested::traverse(doc, &config.fields.nested)? {
                match event {
                    NestedEvent::Step(step) => {
                        counts.records += 1;
                        let record = Record {
                            key: step.key(),
                            structure: step.structure,
                            label: step.label,
                        };
                        visit(record, counts);
                    }
                    NestedEvent::SkippedGroup { group, reason } => {
                        counts.groups_skipped += 1;
                        info!("Skipping key '{}': {}", group, reason);
                    }
                    NestedEvent::SkippedEntry {
                        group,
                        entry_index,
                        reason,
                    } => {
                        counts.entries_skipped += 1;
                        info!(
                            "Skipping entry {} under key '{}': {}",
                            entry_index, group, reason
                        );
                    }
                }
            }
        }
        Schema::Flat => {
            let entries = flat::traverse(doc, &config.fields.flat)?;
            info!("Found {} entries", entries.len());
            for entry in entries {
                counts.records += 1;
                let record = Record {
                    key: entry.key(),
                    structure: entry.structure,
                    label: entry.label,
                };
                visit(record, counts);
            }
        }
    }
    Ok(())
}
