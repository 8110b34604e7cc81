use std::fs::File;
use std::io::Write;
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

pub const LABEL_FILE_NAME: &str = "id_prop.csv";
pub const DEFAULT_LABEL_DIR: &str = ".";

/// Writes `<filename>,<label>` rows, without a header, for every record that
/// has both a structure and a label.
pub struct LabelEmitter<W: Write = File> {
    writer: csv::Writer<W>,
    config: ConvertConfig,
    deriver: FilenameDeriver,
    marker_dir: Option<PathBuf>,
    report: RunReport,
}

impl LabelEmitter<File> {
    /// Creates `out_dir` if needed and truncates `out_dir/id_prop.csv`.
    pub fn create(out_dir: &Path, config: ConvertConfig) -> Result<Self, Error> {
        create_output_dir(out_dir)?;
        let path = out_dir.join(LABEL_FILE_NAME);
        let writer = csv_builder()
            .from_path(&path)
            .map_err(|source| Error::LabelFile { path, source })?;
        let marker_dir = config.write_markers.then(|| out_dir.to_path_buf());
        Ok(Self::with_csv(writer, config, marker_dir))
    }
}

impl<W: Write> LabelEmitter<W> {
    /// Writes rows to an arbitrary sink. Progress markers are never written.
    pub fn from_writer(writer: W, config: ConvertConfig) -> Self {
        Self::with_csv(csv_builder().from_writer(writer), config, None)
    }

    fn with_csv(writer: csv::Writer<W>, config: ConvertConfig, marker_dir: Option<PathBuf>) -> Self {
        let deriver = FilenameDeriver::new(&config.prefix);
        Self {
            writer,
            config,
            deriver,
            marker_dir,
            report: RunReport::default(),
        }
    }

    pub fn process_file(&mut self, input: &InputFile) -> &FileReport {
        let source = input.source_id();
        let writer = &mut self.writer;
        let deriver = &self.deriver;
        let report = process_input(input, &self.config, |record, counts| {
            write_row(writer, deriver, &source, record, counts)
        });
        if let Some(dir) = &self.marker_dir {
            markers::touch(&markers::completed_marker(dir, input.index));
        }
        self.report.files.push(report);
        &self.report.files[self.report.files.len() - 1]
    }

    /// Flushes the CSV. A flush failure is fatal for the run.
    pub fn finish(self) -> Result<RunReport, Error> {
        self.finish_into_inner().map(|(report, _)| report)
    }

    /// Like [`finish`](Self::finish), also returning the underlying sink.
    pub fn finish_into_inner(self) -> Result<(RunReport, W), Error> {
        let inner = self
            .writer
            .into_inner()
            .map_err(|e| Error::LabelFlush(e.into_error()))?;
        if let Some(dir) = &self.marker_dir {
            let skipped = self.report.totals().skipped;
            markers::touch(&markers::skipped_marker(dir, skipped));
        }
        Ok((self.report, inner))
    }
}

fn csv_builder() -> csv::WriterBuilder {
    let mut builder = csv::WriterBuilder::new();
    builder.has_headers(false).terminator(csv::Terminator::CRLF);
    builder
}

fn write_row<W: Write>(
    writer: &mut csv::Writer<W>,
    deriver: &FilenameDeriver,
    source: &SourceId,
    record: Record<'_>,
    counts: &mut Counts,
) {
    let key = record.key;
    if record.structure.is_none() {
        counts.skipped += 1;
        warn!("No structure for {}. Skipping.", key);
        return;
    }
    let label = match record.label {
        Ok(label) => label,
        Err(e) => {
            counts.skipped += 1;
            warn!("No label for {}: {}. Skipping.", key, e);
            return;
        }
    };

    let name = deriver.derive(source, &key);
    let value = label.to_string();
    match writer.write_record([name.as_str(), value.as_str()]) {
        Ok(()) => {
            counts.written += 1;
            debug!("Labeled {} as {}", name, value);
        }
        Err(e) => {
            counts.skipped += 1;
            warn!("Could not write label row for {}: {}", key, e);
        }
    }
}
