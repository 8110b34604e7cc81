use std::io::{self, Write};

use anyhow::Error;

use crate::util::text::wrap;

#[rustfmt::skip]
pub fn print_error(err: &Error) {
    let mut stderr = io::stderr().lock();

    let _ = writeln!(stderr);
    let _ = writeln!(stderr, "   ╔══════════════════════════════════════════════════════════════╗");
    let _ = writeln!(stderr, "   ║  ✗ Error                                                     ║");
    let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");

    for line in wrap(&err.to_string(), 59) {
        let _ = writeln!(stderr, "   ║  {:<59} ║", line);
    }

    let mut source = err.source();
    while let Some(cause) = source {
        let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");
        let _ = writeln!(stderr, "   ║  Caused by:                                                  ║");
        for line in wrap(&cause.to_string(), 59) {
            let _ = writeln!(stderr, "   ║    {:<57} ║", line);
        }
        source = cause.source();
    }

    let hints = HintCollector::collect(err);
    if !hints.is_empty() {
        let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");
        let _ = writeln!(stderr, "   ║  Hints:                                                      ║");
        for hint in hints {
            let wrapped = wrap(&hint, 55);
            if let Some((first, rest)) = wrapped.split_first() {
                let _ = writeln!(stderr, "   ║    • {:<55} ║", first);
                for line in rest {
                    let _ = writeln!(stderr, "   ║      {:<55} ║", line);
                }
            }
        }
    }

    let _ = writeln!(stderr, "   ╚══════════════════════════════════════════════════════════════╝");
    let _ = writeln!(stderr);
}

#[derive(Default)]
struct HintCollector {
    hints: Vec<String>,
    has_typed_hints: bool,
}

impl HintCollector {
    fn collect(err: &Error) -> Vec<String> {
        let mut collector = Self::default();

        collector.collect_convert_hints(err);
        collector.collect_io_hints(err);

        if !collector.has_typed_hints {
            collector.collect_fallback_hints(err);
        }

        collector.hints
    }

    fn add(&mut self, hint: impl Into<String>) {
        self.hints.push(hint.into());
    }

    fn mark_typed(&mut self) {
        self.has_typed_hints = true;
    }

    fn collect_convert_hints(&mut self, err: &Error) {
        use poscar_forge::convert::Error as ConvertError;

        let Some(convert_err) = err.downcast_ref::<ConvertError>() else {
            return;
        };

        self.mark_typed();

        match convert_err {
            ConvertError::InputDir { source, .. } => {
                if let Some(io_err) = source.io_error() {
                    self.collect_std_io_hints(io_err);
                }
                self.add("-i/--input must name an existing, readable directory");
            }

            ConvertError::NoInputs(_) => {
                self.add("Only files ending in .json directly inside the input directory are read");
                self.add("Subdirectories and hidden files are ignored");
            }

            ConvertError::OutputDir { source, .. } => {
                self.collect_std_io_hints(source);
                self.add("Choose another location with -o/--output");
            }

            ConvertError::LabelFile { .. } | ConvertError::LabelFlush(_) => {
                self.add("id_prop.csv could not be written in the output directory");
                self.add("Check permissions and free space, or choose another -o/--output");
            }

            ConvertError::Fields(_) => {
                self.add("The --fields file must be TOML with optional [nested] and [flat] tables");
                self.add("Every key is a string naming a JSON field; unlisted keys keep their defaults");
            }

            ConvertError::Read { source, .. } => {
                self.collect_std_io_hints(source);
            }

            ConvertError::Json { .. } => {
                self.add("The file is not valid JSON; it may be truncated");
            }

            ConvertError::Shape { .. } => {
                self.add("Check that --schema matches the layout of the exports");
                self.add("nested (2d): {group: [{steps: [...]}]}; flat (3d): {entries: [...]}");
            }
        }
    }

    fn collect_io_hints(&mut self, err: &Error) {
        use poscar_forge::io::Error as IoError;

        let Some(io_err) = err.downcast_ref::<IoError>() else {
            return;
        };

        self.mark_typed();

        match io_err {
            IoError::Io { source } => self.collect_std_io_hints(source),

            IoError::Parse { format, line, .. } => {
                self.add(format!(
                    "Parser encountered an issue near line {} in {} format",
                    line, format
                ));
                self.add("Inspect the file around that line for malformed entries");
            }

            IoError::Schema { path, .. } => {
                self.add(format!("The structure dictionary is malformed at '{}'", path));
                self.add("Structures must follow pymatgen's Structure.as_dict() layout");
            }

            IoError::Lattice(_) => {
                self.add("The lattice matrix must hold finite, linearly independent vectors");
            }

            IoError::DisorderedStructure(_) => {
                self.add("POSCAR files hold exactly one species per site");
                self.add("Order partially occupied sites before exporting");
            }
        }
    }

    fn collect_std_io_hints(&mut self, source: &std::io::Error) {
        use std::io::ErrorKind;

        match source.kind() {
            ErrorKind::NotFound => {
                self.add("File or directory not found");
                self.add("Check the path spelling and ensure it exists");
            }

            ErrorKind::PermissionDenied => {
                self.add("Permission denied accessing the path");
                self.add("Check permissions with `ls -la`");
            }

            ErrorKind::AlreadyExists | ErrorKind::NotADirectory => {
                self.add("A file is in the way of a directory that needs to be created");
            }

            ErrorKind::StorageFull | ErrorKind::WriteZero => {
                self.add("Failed to write data (disk full?)");
                self.add("Check available disk space");
            }

            _ => {
                self.add("I/O operation failed");
                self.add("Check file path, permissions, and disk space");
            }
        }
    }

    fn collect_fallback_hints(&mut self, err: &Error) {
        let msg = error_chain_text(err);

        if msg.contains("label rows") {
            self.add("Re-run `pforge geometry` with the same --schema, -i and -f as the labels run");
            self.add("Label rows are only written for records that also have a structure");
            return;
        }

        if msg.contains("no such file") || msg.contains("not found") {
            self.add("Check that the file path is correct");
            self.add("Verify the file exists and is readable");
            return;
        }

        if msg.contains("permission denied") {
            self.add("Check file permissions with `ls -la`");
            self.add("Ensure you have the required access rights");
        }
    }
}

fn error_chain_text(err: &Error) -> String {
    let mut text = String::new();

    text.push_str(&err.to_string());

    let mut source = err.source();
    while let Some(cause) = source {
        text.push('\n');
        text.push_str(&cause.to_string());
        source = cause.source();
    }

    text.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    use poscar_forge::convert::Error as ConvertError;

    #[test]
    fn no_inputs_gets_discovery_hints() {
        let err = Error::new(ConvertError::NoInputs(PathBuf::from("in")));
        let hints = HintCollector::collect(&err);
        assert!(hints.iter().any(|h| h.contains(".json")));
    }

    #[test]
    fn context_does_not_hide_typed_hints() {
        let err = Error::new(ConvertError::OutputDir {
            path: PathBuf::from("out"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        })
        .context("Failed to prepare output directory");
        let hints = HintCollector::collect(&err);
        assert!(hints.iter().any(|h| h.contains("Permission denied")));
        assert!(hints.iter().any(|h| h.contains("-o/--output")));
    }

    #[test]
    fn verify_failures_get_rerun_hint() {
        let err = anyhow::anyhow!("2 of 5 label rows do not match a readable geometry file");
        let hints = HintCollector::collect(&err);
        assert!(hints[0].contains("pforge geometry"));
    }
}
