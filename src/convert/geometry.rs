use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::config::ConvertConfig;
use super::create_output_dir;
use super::error::Error;
use super::inputs::InputFile;
use super::markers;
use super::naming::{FilenameDeriver, SourceId};
use super::report::{Counts, FileReport, RunReport};
use super::walk::{Record, process_input};
use crate::io::{PoscarCodec, StructureCodec};

/// Default output directory for geometry files.
pub const DEFAULT_GEOMETRY_DIR: &str = "POSCAR_files";

/// Writes one geometry file per record that carries a structure.
pub struct GeometryEmitter<C = PoscarCodec> {
    out_dir: PathBuf,
    config: ConvertConfig,
    codec: C,
    deriver: FilenameDeriver,
    report: RunReport,
}

impl<C: StructureCodec> GeometryEmitter<C> {
    /// Creates `out_dir` if needed.
    pub fn new(out_dir: impl Into<PathBuf>, config: ConvertConfig, codec: C) -> Result<Self, Error> {
        let out_dir = out_dir.into();
        create_output_dir(&out_dir)?;
        let deriver = FilenameDeriver::new(&config.prefix);
        Ok(Self {
            out_dir,
            config,
            codec,
            deriver,
            report: RunReport::default(),
        })
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    pub fn process_file(&mut self, input: &InputFile) -> &FileReport {
        let source = input.source_id();
        let report = process_input(input, &self.config, |record, counts| {
            self.emit(&source, record, counts)
        });
        if self.config.write_markers {
            markers::touch(&markers::completed_marker(&self.out_dir, input.index));
        }
        self.report.files.push(report);
        &self.report.files[self.report.files.len() - 1]
    }

    pub fn finish(self) -> RunReport {
        if self.config.write_markers {
            let skipped = self.report.totals().skipped;
            markers::touch(&markers::skipped_marker(&self.out_dir, skipped));
        }
        self.report
    }

    fn emit(&self, source: &SourceId, record: Record<'_>, counts: &mut Counts) {
        let key = record.key;
        let Some(dict) = record.structure else {
            counts.skipped += 1;
            warn!("No structure for {}. Skipping.", key);
            return;
        };

        let structure = match self.codec.reconstruct(dict) {
            Ok(structure) => structure,
            Err(e) => {
                counts.failed += 1;
                warn!("Could not rebuild structure for {}: {}", key, e);
                return;
            }
        };

        let path = self.out_dir.join(self.deriver.derive(source, &key));
        match self.codec.serialize(&structure, &path) {
            Ok(()) => {
                counts.written += 1;
                debug!("Wrote '{}'", path.display());
            }
            Err(e) => {
                counts.failed += 1;
                warn!("Could not write '{}': {}", path.display(), e);
            }
        }
    }
}
