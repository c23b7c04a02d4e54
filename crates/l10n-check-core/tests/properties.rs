use l10n_check_core::{Encoding, ParseOptions, escape_value, parse_properties};
use proptest::prelude::*;

fn parse_value(line: &str, encoding: Encoding) -> (Option<String>, usize) {
    let (store, diagnostics) =
        parse_properties("prop.properties", line.as_bytes(), &ParseOptions { encoding });
    (
        store.value("key").map(str::to_string),
        diagnostics.entries().len(),
    )
}

proptest! {
    #[test]
    fn escaped_values_read_back_unchanged(value in "\\PC{1,40}|[\\t\\n\\r\\x0C \\\\:=#!a-z]{1,20}") {
        let line = format!("key={}\n", escape_value(&value));
        for encoding in [Encoding::Latin1, Encoding::Utf8] {
            let (decoded, findings) = parse_value(&line, encoding);
            prop_assert_eq!(decoded.as_deref(), Some(value.as_str()));
            prop_assert_eq!(findings, 0);
        }
    }

    #[test]
    fn continuation_matches_single_line(words in prop::collection::vec("[a-z0-9]{1,8}", 1..6), indent in 0usize..6) {
        let single = format!("key = {}\n", words.join(" "));
        let pad = " ".repeat(indent);
        let continued = format!("key = {}\n", words.join(&format!(" \\\n{pad}")));
        prop_assert_eq!(
            parse_value(&single, Encoding::Latin1),
            parse_value(&continued, Encoding::Latin1)
        );
    }
}

#[test]
fn control_escapes_round_trip() {
    let value = "tab\tnewline\ncr\rff\u{0C}euro\u{20AC}";
    let line = format!("key={}", escape_value(value));
    assert!(line.contains("\\t") && line.contains("\\u20AC"));
    let (decoded, findings) = parse_value(&line, Encoding::Latin1);
    assert_eq!(decoded.as_deref(), Some(value));
    assert_eq!(findings, 0);
}
