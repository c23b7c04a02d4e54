use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

/// Stable identifiers for every finding the parser and analyzer can report.
pub mod codes {
    pub const KEY_ONLY: &str = "L10N001";
    pub const UNICODE_TOO_SHORT: &str = "L10N002";
    pub const UNICODE_INVALID: &str = "L10N003";
    pub const NON_GRAPHIC: &str = "L10N004";
    pub const INVALID_UTF8: &str = "L10N005";
    pub const TRAILING_WHITESPACE: &str = "L10N010";
    pub const DUPLICATE_KEY: &str = "L10N011";
    pub const UNPAIRED_SURROGATE: &str = "L10N012";
    pub const MISSING_KEY: &str = "L10N100";
    pub const EMPTY_MISMATCH: &str = "L10N101";
    pub const SAME_VALUE: &str = "L10N102";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Warning,
    Error,
}

impl Severity {
    pub const fn as_str(self) -> &'static str {
        match self {
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub code: String,
    pub severity: Severity,
    pub message: String,
    pub line: Option<u32>,
}

impl Diagnostic {
    pub fn new(severity: Severity, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            severity,
            message: message.into(),
            line: None,
        }
    }

    pub fn warning(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, code, message)
    }

    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, code, message)
    }

    /// Attaches a 1-based source line. Line 0 means "no line" and is ignored.
    pub fn with_line(mut self, line: u32) -> Self {
        self.line = if line == 0 { None } else { Some(line) };
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "Line {line}: {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Append-only receiver for diagnostics produced while parsing or analyzing.
pub trait DiagnosticSink {
    fn push(&mut self, diagnostic: Diagnostic);

    fn add_warning(&mut self, code: &str, message: String) {
        self.push(Diagnostic::warning(code, message));
    }

    fn add_warning_at(&mut self, code: &str, message: String, line: u32) {
        self.push(Diagnostic::warning(code, message).with_line(line));
    }

    fn add_error(&mut self, code: &str, message: String) {
        self.push(Diagnostic::error(code, message));
    }

    fn add_error_at(&mut self, code: &str, message: String, line: u32) {
        self.push(Diagnostic::error(code, message).with_line(line));
    }
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn push(&mut self, diagnostic: Diagnostic) {
        Vec::push(self, diagnostic);
    }
}

/// Diagnostics attributed to a single resource, usually one file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    resource: String,
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new(resource: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            entries: Vec::new(),
        }
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }

    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    pub fn has_findings(&self) -> bool {
        !self.entries.is_empty()
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries
            .iter()
            .filter(|diag| diag.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries
            .iter()
            .filter(|diag| diag.severity == Severity::Warning)
    }

    pub fn error_count(&self) -> usize {
        self.errors().count()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings().count()
    }

    pub fn into_entries(self) -> Vec<Diagnostic> {
        self.entries
    }
}

impl DiagnosticSink for Diagnostics {
    fn push(&mut self, diagnostic: Diagnostic) {
        self.entries.push(diagnostic);
    }
}
