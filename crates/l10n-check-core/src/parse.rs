use alloc::format;
use alloc::string::String;

use crate::diagnostic::{DiagnosticSink, Diagnostics, codes};
use crate::encoding::Encoding;
use crate::escape::{Ending, decode};
use crate::lines::{LineKind, classify, split_lines};
use crate::store::{Property, PropertyStore};
use crate::tokenizer::{LineOutcome, RecordBuffer};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOptions {
    pub encoding: Encoding,
}

/// Parses `input` into a property store named `name`, reporting every
/// anomaly to `sink`. Parsing never fails; malformed records are reported
/// and skipped.
pub fn parse(
    name: impl Into<String>,
    input: &[u8],
    options: &ParseOptions,
    sink: &mut impl DiagnosticSink,
) -> PropertyStore {
    let mut state = ParseState {
        record: RecordBuffer::new(),
        start_line: 0,
        encoding: options.encoding,
        store: PropertyStore::new(name),
    };

    let input = options.encoding.strip_bom(input);
    let mut outcome = LineOutcome::Complete;
    for line in split_lines(input) {
        outcome = if outcome == LineOutcome::Continued {
            state.record.read_continuation(line.bytes)
        } else {
            if classify(line.bytes) != LineKind::Data {
                continue;
            }
            state.start_line = line.number;
            state.record.read_first(line.bytes)
        };
        match outcome {
            LineOutcome::Complete => state.finish_record(sink),
            LineOutcome::KeyOnly => state.discard_key_only(sink),
            LineOutcome::Continued => {}
        }
    }
    if outcome == LineOutcome::Continued {
        state.finish_record(sink);
    }

    tracing::debug!(
        resource = state.store.name(),
        keys = state.store.len(),
        records = state.store.records().len(),
        "parsed properties"
    );
    state.store
}

/// Parses into a fresh diagnostics log attributed to `name`.
pub fn parse_properties(
    name: impl Into<String>,
    input: &[u8],
    options: &ParseOptions,
) -> (PropertyStore, Diagnostics) {
    let name = name.into();
    let mut diagnostics = Diagnostics::new(name.clone());
    let store = parse(name, input, options, &mut diagnostics);
    (store, diagnostics)
}

struct ParseState {
    record: RecordBuffer,
    start_line: u32,
    encoding: Encoding,
    store: PropertyStore,
}

impl ParseState {
    fn finish_record(&mut self, sink: &mut impl DiagnosticSink) {
        let line = self.start_line;
        let key = decode(self.record.key(), self.encoding, line, sink).text;
        let value = decode(self.record.value(), self.encoding, line, sink);
        if value.ending == Ending::Literal && has_trailing_whitespace(&value.text) {
            sink.add_warning_at(
                codes::TRAILING_WHITESPACE,
                format!("value of key '{key}' contains unescaped trailing spaces"),
                line,
            );
        }

        let property = Property::new(key, value.text, line);
        if let Some(previous) = self.store.insert(property.clone()) {
            sink.add_warning_at(
                codes::DUPLICATE_KEY,
                format!("key '{}' overwrites line {previous}", property.key()),
                line,
            );
        }
        self.record.clear();
    }

    fn discard_key_only(&mut self, sink: &mut impl DiagnosticSink) {
        let key = String::from_utf8_lossy(self.record.key());
        sink.add_error_at(
            codes::KEY_ONLY,
            format!("line contains only a key: '{key}'"),
            self.start_line,
        );
        self.record.clear();
    }
}

fn has_trailing_whitespace(value: &str) -> bool {
    value.ends_with([' ', '\t', '\r', '\n', '\x0C'])
}

#[cfg(test)]
mod tests {
    use super::{ParseOptions, parse_properties};
    use crate::diagnostic::{Severity, codes};
    use crate::encoding::Encoding;

    fn latin1(input: &[u8]) -> (crate::PropertyStore, crate::Diagnostics) {
        parse_properties("test.properties", input, &ParseOptions::default())
    }

    #[test]
    fn parses_simple_pairs() {
        let (store, diags) = latin1(b"# header\n\na = 1\nb:2\n  c 3\n");
        assert!(!diags.has_findings());
        assert_eq!(store.value("a"), Some("1"));
        assert_eq!(store.value("b"), Some("2"));
        assert_eq!(store.value("c"), Some("3"));
        assert_eq!(store.get("c").map(|p| p.line()), Some(5));
    }

    #[test]
    fn duplicate_key_warns_and_keeps_both_records() {
        let (store, diags) = latin1(b"a=1\na=2\n");
        assert_eq!(diags.warning_count(), 1);
        assert_eq!(diags.error_count(), 0);
        let warning = diags.warnings().next().expect("warning");
        assert_eq!(warning.code, codes::DUPLICATE_KEY);
        assert_eq!(warning.message, "key 'a' overwrites line 1");
        assert_eq!(warning.line, Some(2));
        assert_eq!(store.value("a"), Some("2"));
        assert_eq!(store.records().len(), 2);
    }

    #[test]
    fn key_only_line_is_error_and_discarded() {
        let (store, diags) = latin1(b"justakey\n");
        assert_eq!(diags.entries().len(), 1);
        let error = &diags.entries()[0];
        assert_eq!(error.severity, Severity::Error);
        assert_eq!(error.code, codes::KEY_ONLY);
        assert_eq!(error.message, "line contains only a key: 'justakey'");
        assert_eq!(error.line, Some(1));
        assert!(store.is_empty());
        assert!(store.records().is_empty());
    }

    #[test]
    fn crlf_input_yields_two_records() {
        let (store, diags) = latin1(b"a=1\r\nb=2\r\n");
        assert!(!diags.has_findings());
        assert_eq!(store.records().len(), 2);
        assert!(
            store
                .records()
                .iter()
                .all(|p| !p.key().is_empty() && !p.value().is_empty())
        );
        assert_eq!(store.get("b").map(|p| p.line()), Some(2));
    }

    #[test]
    fn continuation_joins_lines_and_keeps_start_line() {
        let input = b"\nmsg = first \\\n      second \\\n   third\nnext = x\n";
        let (store, diags) = latin1(input);
        assert!(!diags.has_findings());
        assert_eq!(store.value("msg"), Some("first second third"));
        assert_eq!(store.get("msg").map(|p| p.line()), Some(2));
        assert_eq!(store.get("next").map(|p| p.line()), Some(5));
    }

    #[test]
    fn comment_marker_inside_continuation_is_value() {
        let (store, _) = latin1(b"a = x\\\n  # y\n");
        assert_eq!(store.value("a"), Some("x# y"));
    }

    #[test]
    fn continuation_at_end_of_input_is_finished() {
        let (store, diags) = latin1(b"a = tail\\");
        assert!(!diags.has_findings());
        assert_eq!(store.value("a"), Some("tail"));
    }

    #[test]
    fn continued_empty_value_is_stored() {
        let (store, diags) = latin1(b"a = \\\n\nb = 1\n");
        assert!(!diags.has_findings());
        assert_eq!(store.value("a"), Some(""));
        assert_eq!(store.value("b"), Some("1"));
    }

    #[test]
    fn escaped_backslash_before_continuation() {
        let (store, diags) = latin1(b"a = \\\\\\\n\n");
        assert!(!diags.has_findings());
        assert_eq!(store.value("a"), Some("\\"));
    }

    #[test]
    fn malformed_unicode_reports_once_and_drops_sequence() {
        let (store, diags) = latin1(b"k=\\u12");
        assert_eq!(diags.entries().len(), 1);
        assert_eq!(diags.entries()[0].code, codes::UNICODE_TOO_SHORT);
        assert_eq!(diags.entries()[0].line, Some(1));
        assert_eq!(store.value("k"), Some(""));
    }

    #[test]
    fn warns_on_unescaped_trailing_whitespace() {
        let (_, diags) = latin1(b"k = v  \n");
        let warning = diags.warnings().next().expect("warning");
        assert_eq!(warning.code, codes::TRAILING_WHITESPACE);
        assert_eq!(
            warning.message,
            "value of key 'k' contains unescaped trailing spaces"
        );

        let (store, diags) = latin1(b"k = v \\ \n");
        assert!(!diags.has_findings());
        assert_eq!(store.value("k"), Some("v  "));
    }

    #[test]
    fn escaped_key_separators_are_decoded() {
        let (store, _) = latin1(b"a\\:b = c\n");
        assert_eq!(store.value("a:b"), Some("c"));
    }

    #[test]
    fn utf8_mode_skips_bom_and_keeps_text() {
        let options = ParseOptions {
            encoding: Encoding::Utf8,
        };
        let input = "\u{FEFF}greeting = Grüß dich\n".as_bytes();
        let (store, diags) = parse_properties("de.properties", input, &options);
        assert!(!diags.has_findings());
        assert_eq!(store.value("greeting"), Some("Grüß dich"));
    }

    #[test]
    fn latin1_mode_flags_utf8_continuation_bytes() {
        let (store, diags) = latin1("k = \u{00E9}\u{0153}".as_bytes());
        assert!(diags.error_count() > 0);
        assert!(store.contains_key("k"));
    }
}
