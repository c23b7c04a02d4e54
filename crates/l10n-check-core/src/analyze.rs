use alloc::format;

use crate::diagnostic::{DiagnosticSink, codes};
use crate::store::PropertyStore;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnalyzeOptions {
    /// Report keys whose values are identical, ignoring case.
    pub same_values: bool,
}

/// Finding counts of one master/other comparison.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnalysisSummary {
    pub empty_mismatches: usize,
    pub missing_in_other: usize,
    pub missing_in_master: usize,
    pub same_values: usize,
}

impl AnalysisSummary {
    pub fn total(&self) -> usize {
        self.empty_mismatches + self.missing_in_other + self.missing_in_master + self.same_values
    }
}

/// Runs every cross-file check of `master` against `other`.
pub fn analyze(
    master: &PropertyStore,
    other: &PropertyStore,
    options: &AnalyzeOptions,
    sink: &mut impl DiagnosticSink,
) -> AnalysisSummary {
    let summary = AnalysisSummary {
        empty_mismatches: find_empty_mismatches(master, other, sink),
        missing_in_other: find_missing_keys(master, other, sink),
        missing_in_master: find_missing_keys(other, master, sink),
        same_values: if options.same_values {
            find_same_values(master, other, sink)
        } else {
            0
        },
    };
    tracing::debug!(
        master = master.name(),
        other = other.name(),
        findings = summary.total(),
        "analyzed property stores"
    );
    summary
}

/// Reports keys of `a` that `b` lacks. Only one direction is checked.
pub fn find_missing_keys(
    a: &PropertyStore,
    b: &PropertyStore,
    sink: &mut impl DiagnosticSink,
) -> usize {
    let mut faults = 0;
    for property in a.iter().filter(|property| !b.contains_key(property.key())) {
        sink.add_warning_at(
            codes::MISSING_KEY,
            format!(
                "key '{}' in '{}' but not in '{}'",
                property.key(),
                a.name(),
                b.name()
            ),
            property.line(),
        );
        faults += 1;
    }
    faults
}

/// Reports shared keys whose value is empty on exactly one side.
pub fn find_empty_mismatches(
    a: &PropertyStore,
    b: &PropertyStore,
    sink: &mut impl DiagnosticSink,
) -> usize {
    let mut faults = 0;
    for property in a.iter() {
        let Some(other) = b.get(property.key()) else {
            continue;
        };
        if property.value().is_empty() != other.value().is_empty() {
            sink.add_warning_at(
                codes::EMPTY_MISMATCH,
                format!(
                    "key '{}' is empty in '{}' but not in '{}'",
                    property.key(),
                    if property.value().is_empty() { a.name() } else { b.name() },
                    if property.value().is_empty() { b.name() } else { a.name() },
                ),
                property.line(),
            );
            faults += 1;
        }
    }
    faults
}

/// Reports shared keys with non-empty values that are equal ignoring case,
/// which usually means a string was copied without being translated.
pub fn find_same_values(
    a: &PropertyStore,
    b: &PropertyStore,
    sink: &mut impl DiagnosticSink,
) -> usize {
    let mut faults = 0;
    for property in a.iter() {
        let Some(other) = b.get(property.key()) else {
            continue;
        };
        let (left, right) = (property.value(), other.value());
        if !left.is_empty() && !right.is_empty() && eq_ignore_case(left, right) {
            sink.add_warning_at(
                codes::SAME_VALUE,
                format!(
                    "key '{}' has the same value in '{}' and '{}': {left:?}",
                    property.key(),
                    a.name(),
                    b.name()
                ),
                property.line(),
            );
            faults += 1;
        }
    }
    faults
}

fn eq_ignore_case(left: &str, right: &str) -> bool {
    left.chars()
        .flat_map(char::to_lowercase)
        .eq(right.chars().flat_map(char::to_lowercase))
}
