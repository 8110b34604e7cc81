use std::ops::AddAssign;
use std::path::PathBuf;

use super::inputs::InputFile;

/// Record-level tallies for one file or a whole run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counts {
    /// Records the traversal yielded.
    pub records: usize,
    /// Records that produced an output file or row.
    pub written: usize,
    /// Records left out for a missing structure or label.
    pub skipped: usize,
    /// Records whose structure could not be rebuilt or written.
    pub failed: usize,
    pub groups_skipped: usize,
    pub entries_skipped: usize,
}

impl AddAssign for Counts {
    fn add_assign(&mut self, rhs: Self) {
        self.records += rhs.records;
        self.written += rhs.written;
        self.skipped += rhs.skipped;
        self.failed += rhs.failed;
        self.groups_skipped += rhs.groups_skipped;
        self.entries_skipped += rhs.entries_skipped;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileStatus {
    Processed,
    /// The file was unreadable or not in the expected shape.
    Skipped { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub index: usize,
    pub path: PathBuf,
    pub status: FileStatus,
    pub counts: Counts,
}

impl FileReport {
    pub(crate) fn new(input: &InputFile) -> Self {
        Self {
            index: input.index,
            path: input.path.clone(),
            status: FileStatus::Processed,
            counts: Counts::default(),
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self.status, FileStatus::Skipped { .. })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub files: Vec<FileReport>,
}

impl RunReport {
    pub fn totals(&self) -> Counts {
        let mut totals = Counts::default();
        for file in &self.files {
            totals += file.counts;
        }
        totals
    }

    pub fn files_processed(&self) -> usize {
        self.files.iter().filter(|f| !f.is_skipped()).count()
    }

    pub fn files_skipped(&self) -> usize {
        self.files.iter().filter(|f| f.is_skipped()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(index: usize, status: FileStatus, written: usize, skipped: usize) -> FileReport {
        FileReport {
            index,
            path: PathBuf::from(format!("{index}.json")),
            status,
            counts: Counts {
                records: written + skipped,
                written,
                skipped,
                ..Counts::default()
            },
        }
    }

    #[test]
    fn totals_sum_file_counts() {
        let run = RunReport {
            files: vec![
                report(0, FileStatus::Processed, 3, 1),
                report(
                    1,
                    FileStatus::Skipped {
                        reason: "bad".into(),
                    },
                    0,
                    0,
                ),
                report(2, FileStatus::Processed, 2, 2),
            ],
        };
        let totals = run.totals();
        assert_eq!(totals.written, 5);
        assert_eq!(totals.skipped, 3);
        assert_eq!(totals.records, 8);
        assert_eq!(run.files_processed(), 2);
        assert_eq!(run.files_skipped(), 1);
    }
}
