use std::path::Path;

use anyhow::{Context, Result, bail};
use tracing::{debug, info, warn};

use poscar_forge::io::read_poscar;

use crate::cli::VerifyArgs;
use crate::display::{Context as DisplayContext, Progress, print_verify_summary};
use crate::io::open_input;
use crate::util::text::count;

const TOTAL_STEPS: u8 = 2;

#[derive(Debug, Default, PartialEq)]
struct Findings {
    rows: usize,
    missing: Vec<String>,
    unreadable: Vec<(String, String)>,
}

impl Findings {
    fn problems(&self) -> usize {
        self.missing.len() + self.unreadable.len()
    }
}

pub fn run_verify(args: VerifyArgs, ctx: DisplayContext) -> Result<()> {
    let mut progress = Progress::new(ctx.interactive, TOTAL_STEPS);

    progress.step("Reading label file");
    let names = read_label_names(&args.labels)?;
    progress.complete_step(
        "Reading label file",
        &[format!("{} in {}", count(names.len(), "row"), args.labels.display())],
    );

    progress.files("Checking geometry files", names.len());
    let mut findings = Findings {
        rows: names.len(),
        ..Findings::default()
    };
    for name in &names {
        check_geometry(&args.geometry, name, &mut findings);
        progress.advance(name);
    }
    progress.complete_step(
        "Checking geometry files",
        &[format!("{} found", count(findings.problems(), "problem"))],
    );
    progress.finish("Verification complete");

    if ctx.interactive {
        print_verify_summary(findings.rows, &findings.missing, &findings.unreadable);
    }

    if findings.problems() > 0 {
        bail!(
            "{} of {} label rows do not match a readable geometry file",
            findings.problems(),
            findings.rows
        );
    }
    info!("All {} match a readable geometry file", count(findings.rows, "label row"));
    Ok(())
}

/// First column of every row; the file has no header.
fn read_label_names(path: &Path) -> Result<Vec<String>> {
    let input = open_input(path)?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(input);

    let mut names = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record
            .with_context(|| format!("Failed to read row {} of '{}'", i + 1, path.display()))?;
        match record.get(0).map(str::trim).filter(|name| !name.is_empty()) {
            Some(name) => names.push(name.to_string()),
            None => warn!("Row {} of '{}' has no filename", i + 1, path.display()),
        }
    }
    Ok(names)
}

fn check_geometry(dir: &Path, name: &str, findings: &mut Findings) {
    let path = dir.join(name);
    if !path.is_file() {
        warn!("'{}' is listed but does not exist", path.display());
        findings.missing.push(name.to_string());
        return;
    }

    let result = open_input(&path).and_then(|reader| {
        read_poscar(reader).with_context(|| format!("Failed to parse '{}'", path.display()))
    });
    match result {
        Ok(structure) => debug!("'{}' holds {} sites", name, structure.site_count()),
        Err(e) => {
            warn!("{:#}", e);
            findings
                .unreadable
                .push((name.to_string(), format!("{:#}", e.root_cause())));
        }
    }
}
