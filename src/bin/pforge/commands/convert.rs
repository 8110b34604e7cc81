use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use poscar_forge::convert::{
    DEFAULT_GEOMETRY_DIR, DEFAULT_LABEL_DIR, Error as ConvertError, FileReport, GeometryEmitter,
    InputFile, LABEL_FILE_NAME, LabelEmitter, RunReport, discover_inputs,
};
use poscar_forge::io::{PoscarCodec, StructureCodec};

use crate::cli::ConvertArgs;
use crate::config::build_convert_config;
use crate::display::{Context as DisplayContext, Progress, print_file_issues, print_run_summary};
use crate::util::text::{count, display_name};

const TOTAL_STEPS: u8 = 3;

/// Labels that differ between the geometry and labels runs.
struct Job {
    step: &'static str,
    done: &'static str,
    summary: &'static str,
    written: &'static str,
}

trait BatchEmitter {
    fn process(&mut self, input: &InputFile) -> &FileReport;
    fn close(self) -> Result<RunReport, ConvertError>;
}

impl<C: StructureCodec> BatchEmitter for GeometryEmitter<C> {
    fn process(&mut self, input: &InputFile) -> &FileReport {
        self.process_file(input)
    }

    fn close(self) -> Result<RunReport, ConvertError> {
        Ok(GeometryEmitter::finish(self))
    }
}

impl BatchEmitter for LabelEmitter {
    fn process(&mut self, input: &InputFile) -> &FileReport {
        self.process_file(input)
    }

    fn close(self) -> Result<RunReport, ConvertError> {
        LabelEmitter::finish(self)
    }
}

pub fn run_geometry(args: ConvertArgs, ctx: DisplayContext) -> Result<()> {
    let config = build_convert_config(&args)?;
    let out_dir = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_GEOMETRY_DIR));

    let job = Job {
        step: "Writing POSCAR files",
        done: "Geometry complete",
        summary: "Geometry Summary",
        written: "POSCAR Written",
    };
    run_batch(&args, ctx, &out_dir, &out_dir, job, |dir| {
        GeometryEmitter::new(dir, config, PoscarCodec)
    })
}

pub fn run_labels(args: ConvertArgs, ctx: DisplayContext) -> Result<()> {
    let config = build_convert_config(&args)?;
    let out_dir = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LABEL_DIR));
    let label_path = out_dir.join(LABEL_FILE_NAME);

    let job = Job {
        step: "Writing label rows",
        done: "Labels complete",
        summary: "Label Summary",
        written: "Rows Written",
    };
    run_batch(&args, ctx, &out_dir, &label_path, job, |dir| {
        LabelEmitter::create(dir, config)
    })
}

fn run_batch<E, F>(
    args: &ConvertArgs,
    ctx: DisplayContext,
    out_dir: &Path,
    shown_output: &Path,
    job: Job,
    make_emitter: F,
) -> Result<()>
where
    E: BatchEmitter,
    F: FnOnce(&Path) -> Result<E, ConvertError>,
{
    let mut progress = Progress::new(ctx.interactive, TOTAL_STEPS);

    progress.step("Discovering inputs");
    let inputs = discover_inputs(&args.input).context("Failed to discover input files")?;
    info!(
        "Found {} in '{}'",
        count(inputs.len(), "JSON file"),
        args.input.display()
    );
    progress.complete_step(
        "Discovering inputs",
        &[format!(
            "{} in {}",
            count(inputs.len(), "JSON file"),
            args.input.display()
        )],
    );

    progress.step("Preparing output");
    let mut emitter = make_emitter(out_dir).context("Failed to prepare output")?;
    progress.complete_step("Preparing output", &[shown_output.display().to_string()]);

    progress.files(job.step, inputs.len());
    for input in &inputs {
        let file = emitter.process(input);
        progress.advance(&display_name(&file.path));
    }
    let report = emitter.close().context("Failed to finish output")?;

    let totals = report.totals();
    progress.complete_step(
        job.step,
        &[
            format!("{} written", count(totals.written, "record")),
            format!("{} skipped", count(totals.skipped, "record")),
        ],
    );
    progress.finish(job.done);

    info!(
        "Processed {} ({} skipped): {} written, {} skipped, {} failed",
        count(report.files.len(), "file"),
        report.files_skipped(),
        count(totals.written, "record"),
        totals.skipped,
        totals.failed
    );

    if ctx.interactive {
        print_run_summary(job.summary, &report, shown_output, job.written);
        print_file_issues(&report);
    }

    Ok(())
}
