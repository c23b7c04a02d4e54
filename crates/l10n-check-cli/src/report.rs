use std::fmt::Write as _;

use l10n_check_core::{AnalysisSummary, Diagnostic, Diagnostics, PropertyStore};
use serde::Serialize;

#[derive(Debug, Default, Serialize)]
pub struct CheckReport {
    pub files: Vec<FileReport>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unreadable: Vec<UnreadableFile>,
    pub comparisons: Vec<ComparisonReport>,
    pub faults: usize,
}

#[derive(Debug, Serialize)]
pub struct FileReport {
    pub path: String,
    pub keys: usize,
    pub records: usize,
    pub diagnostics: Vec<DiagnosticReport>,
}

#[derive(Debug, Serialize)]
pub struct UnreadableFile {
    pub path: String,
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct ComparisonReport {
    pub master: String,
    pub other: String,
    pub empty_mismatches: usize,
    pub missing_in_other: usize,
    pub missing_in_master: usize,
    pub same_values: usize,
    pub diagnostics: Vec<DiagnosticReport>,
}

#[derive(Debug, Serialize)]
pub struct DiagnosticReport {
    pub code: String,
    pub severity: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
}

impl From<&Diagnostic> for DiagnosticReport {
    fn from(diag: &Diagnostic) -> Self {
        Self {
            code: diag.code.clone(),
            severity: diag.severity.as_str(),
            message: diag.message.clone(),
            line: diag.line,
        }
    }
}

impl FileReport {
    pub fn new(store: &PropertyStore, diagnostics: &Diagnostics) -> Self {
        Self {
            path: store.name().to_string(),
            keys: store.len(),
            records: store.records().len(),
            diagnostics: diagnostics.entries().iter().map(DiagnosticReport::from).collect(),
        }
    }
}

impl ComparisonReport {
    pub fn new(
        master: &PropertyStore,
        other: &PropertyStore,
        summary: &AnalysisSummary,
        diagnostics: &Diagnostics,
    ) -> Self {
        Self {
            master: master.name().to_string(),
            other: other.name().to_string(),
            empty_mismatches: summary.empty_mismatches,
            missing_in_other: summary.missing_in_other,
            missing_in_master: summary.missing_in_master,
            same_values: summary.same_values,
            diagnostics: diagnostics.entries().iter().map(DiagnosticReport::from).collect(),
        }
    }
}

/// `<file> - N keys`, followed by every record when `verbose` is set.
pub fn render_summary(store: &PropertyStore, verbose: bool) -> String {
    let mut out = format!("{} - {} keys\n", store.name(), store.len());
    if verbose {
        for property in store.records() {
            let _ = writeln!(out, "\t{property}");
        }
    }
    out
}

/// Renders one diagnostics log. Returns the text and the number of
/// diagnostics it shows; warnings are left out when `no_warnings` is set.
pub fn render_diagnostics(diagnostics: &Diagnostics, no_warnings: bool) -> (String, usize) {
    let mut out = format!("file: {}\n", diagnostics.resource());
    let mut shown = 0;
    shown += render_section(&mut out, "errors:", diagnostics.errors());
    if !no_warnings {
        shown += render_section(&mut out, "warnings:", diagnostics.warnings());
    }
    if shown == 0 {
        out.push_str(if no_warnings {
            "\tno errors\n"
        } else {
            "\tno warnings or errors\n"
        });
    }
    (out, shown)
}

/// Renders the findings of one master/other comparison, grouped by check.
pub fn render_comparison(report: &ComparisonReport) -> String {
    let mut out = String::new();
    let groups = [
        (
            l10n_check_core::codes::EMPTY_MISMATCH,
            format!(
                "Key(s) empty/non-empty in '{}' but not in '{}'",
                report.master, report.other
            ),
        ),
        (
            l10n_check_core::codes::MISSING_KEY,
            format!("Key(s) missing between '{}' and '{}'", report.master, report.other),
        ),
        (
            l10n_check_core::codes::SAME_VALUE,
            format!(
                "Key(s) with same values in '{}' and '{}'",
                report.master, report.other
            ),
        ),
    ];
    for (code, header) in groups {
        let mut entries = report
            .diagnostics
            .iter()
            .filter(|diag| diag.code == code)
            .peekable();
        if entries.peek().is_none() {
            continue;
        }
        let _ = writeln!(out, "{header}");
        for diag in entries {
            let _ = writeln!(out, "\t{}", diag.message);
        }
        out.push('\n');
    }
    out
}

fn render_section<'a>(
    out: &mut String,
    header: &str,
    entries: impl Iterator<Item = &'a Diagnostic>,
) -> usize {
    let mut count = 0;
    for diag in entries {
        if count == 0 {
            let _ = writeln!(out, "{header}");
        }
        let _ = writeln!(out, "\t{diag}");
        count += 1;
    }
    count
}
