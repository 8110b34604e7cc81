use std::io::{self, Write};
use std::path::Path;

use poscar_forge::convert::{FileStatus, RunReport};

use crate::util::text::{display_name, truncate};

const INDENT: &str = "      ";

const BOX_INNER_WIDTH: usize = 62;
const SAFE_TABLE_WIDTH: usize = BOX_INNER_WIDTH - INDENT.len();

/// Counters for one geometry or labels run.
pub fn print_run_summary(title: &str, report: &RunReport, output: &Path, written_label: &str) {
    let stderr = io::stderr();
    let mut out = stderr.lock();

    let totals = report.totals();
    let mut rows = vec![
        ("Files Processed", report.files_processed().to_string()),
        ("Files Skipped", report.files_skipped().to_string()),
        ("Records", totals.records.to_string()),
        (written_label, totals.written.to_string()),
        ("Records Skipped", totals.skipped.to_string()),
    ];
    if totals.failed > 0 {
        rows.push(("Records Failed", totals.failed.to_string()));
    }
    if totals.groups_skipped + totals.entries_skipped > 0 {
        rows.push((
            "Empty Groups",
            format!(
                "{} groups, {} entries",
                totals.groups_skipped, totals.entries_skipped
            ),
        ));
    }
    rows.push(("Output", output.display().to_string()));

    print_kv_table(&mut out, title, &rows);
}

/// Lists files that were skipped entirely, with the reason.
pub fn print_file_issues(report: &RunReport) {
    let rows: Vec<(String, String)> = report
        .files
        .iter()
        .filter_map(|file| match &file.status {
            FileStatus::Skipped { reason } => Some((display_name(&file.path), reason.clone())),
            FileStatus::Processed => None,
        })
        .collect();

    if rows.is_empty() {
        return;
    }

    let stderr = io::stderr();
    let mut out = stderr.lock();
    print_issue_table(&mut out, "Skipped Files", &rows);
}

pub fn print_verify_summary(rows_checked: usize, missing: &[String], unreadable: &[(String, String)]) {
    let stderr = io::stderr();
    let mut out = stderr.lock();

    let rows = vec![
        ("Label Rows", rows_checked.to_string()),
        ("Missing Files", missing.len().to_string()),
        ("Unreadable Files", unreadable.len().to_string()),
    ];
    print_kv_table(&mut out, "Verification", &rows);

    let mut issues: Vec<(String, String)> = missing
        .iter()
        .map(|name| (name.clone(), "not found".to_string()))
        .collect();
    issues.extend(unreadable.iter().cloned());
    if !issues.is_empty() {
        print_issue_table(&mut out, "Problems", &issues);
    }
}

fn print_kv_table(out: &mut impl Write, title: &str, rows: &[(&str, String)]) {
    let key_w = 16usize;
    let sep_overhead = 6;
    let val_w = SAFE_TABLE_WIDTH.saturating_sub(key_w + sep_overhead);

    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "{}┌─ {} ─┐",
        INDENT,
        truncate(title, SAFE_TABLE_WIDTH - 6)
    );
    let _ = writeln!(
        out,
        "{}┌{k_line}┬{v_line}┐",
        INDENT,
        k_line = "─".repeat(key_w + 2),
        v_line = "─".repeat(val_w + 2)
    );
    for (key, val) in rows {
        let _ = writeln!(
            out,
            "{}│ {:<key_w$} │ {:>val_w$} │",
            INDENT,
            truncate(key, key_w),
            truncate(val, val_w),
        );
    }
    let _ = writeln!(
        out,
        "{}└{k_line}┴{v_line}┘",
        INDENT,
        k_line = "─".repeat(key_w + 2),
        v_line = "─".repeat(val_w + 2)
    );
}

fn print_issue_table(out: &mut impl Write, title: &str, rows: &[(String, String)]) {
    const MAX_ROWS: usize = 20;

    let name_w = 22usize;
    let reason_w = SAFE_TABLE_WIDTH.saturating_sub(name_w + 6);

    let _ = writeln!(out);
    let _ = writeln!(out, "{}┌─ {} ({}) ─┐", INDENT, title, rows.len());
    for (name, reason) in rows.iter().take(MAX_ROWS) {
        let _ = writeln!(
            out,
            "{}│ {:<name_w$} │ {:<reason_w$} │",
            INDENT,
            truncate(name, name_w),
            truncate(reason, reason_w),
        );
    }
    if rows.len() > MAX_ROWS {
        let _ = writeln!(out, "{}  … and {} more", INDENT, rows.len() - MAX_ROWS);
    }
}
