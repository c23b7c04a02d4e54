#![no_std]
#![forbid(unsafe_code)]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

mod analyze;
mod diagnostic;
mod encoding;
mod error;
mod escape;
mod lines;
mod parse;
mod store;
mod tokenizer;

pub use analyze::{
    AnalysisSummary, AnalyzeOptions, analyze, find_empty_mismatches, find_missing_keys,
    find_same_values,
};
pub use diagnostic::{Diagnostic, DiagnosticSink, Diagnostics, Severity, codes};
pub use encoding::Encoding;
pub use error::{CoreError, CoreResult};
pub use escape::{Decoded, Ending, decode, escape_value};
pub use lines::{LineKind, Lines, PhysicalLine, classify, is_whitespace, split_lines};
pub use parse::{ParseOptions, parse, parse_properties};
pub use store::{Property, PropertyStore};
pub use tokenizer::{LineOutcome, RecordBuffer};
