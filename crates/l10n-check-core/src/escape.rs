use alloc::format;
use alloc::string::String;

use crate::diagnostic::{DiagnosticSink, codes};
use crate::encoding::Encoding;

/// How a decoded span ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ending {
    /// Last unit was a literal character, or the span was empty.
    Literal,
    /// Last unit was a backslash escape.
    Escaped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    pub text: String,
    pub ending: Ending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DecodeState {
    Normal,
    Escape,
    Unicode { digits: [char; 4], len: usize },
}

/// Decodes escape sequences of a raw key or value span. Malformed escapes and
/// non-graphic characters are reported against `line`; decoding continues.
pub fn decode(
    raw: &[u8],
    encoding: Encoding,
    line: u32,
    sink: &mut impl DiagnosticSink,
) -> Decoded {
    let mut decoder = Decoder {
        text: String::with_capacity(raw.len()),
        high_surrogate: None,
        line,
    };
    let mut state = DecodeState::Normal;
    let mut ending = Ending::Literal;

    for (idx, ch) in encoding.chars(raw, line, sink) {
        state = match state {
            DecodeState::Normal => {
                if ch == '\\' {
                    ending = Ending::Escaped;
                    DecodeState::Escape
                } else {
                    ending = Ending::Literal;
                    decoder.push_literal(ch, idx, sink);
                    DecodeState::Normal
                }
            }
            DecodeState::Escape => match ch {
                't' => decoder.push_char('\t', DecodeState::Normal, sink),
                'n' => decoder.push_char('\n', DecodeState::Normal, sink),
                'r' => decoder.push_char('\r', DecodeState::Normal, sink),
                'f' => decoder.push_char('\x0C', DecodeState::Normal, sink),
                'u' => DecodeState::Unicode {
                    digits: ['\0'; 4],
                    len: 0,
                },
                _ => {
                    decoder.flush_surrogate(sink);
                    decoder.push_literal(ch, idx, sink);
                    DecodeState::Normal
                }
            },
            DecodeState::Unicode { mut digits, len } => {
                digits[len] = ch;
                if len + 1 < digits.len() {
                    DecodeState::Unicode {
                        digits,
                        len: len + 1,
                    }
                } else {
                    decoder.push_unicode(&digits, sink);
                    DecodeState::Normal
                }
            }
        };
    }

    if let DecodeState::Unicode { .. } = state {
        sink.add_error_at(
            codes::UNICODE_TOO_SHORT,
            String::from(
                "unicode sequence start found (\\u) but there are too few remaining characters in the value",
            ),
            line,
        );
    }
    decoder.flush_surrogate(sink);

    Decoded {
        text: decoder.text,
        ending,
    }
}

struct Decoder {
    text: String,
    high_surrogate: Option<u16>,
    line: u32,
}

impl Decoder {
    fn push_char(
        &mut self,
        ch: char,
        next: DecodeState,
        sink: &mut impl DiagnosticSink,
    ) -> DecodeState {
        self.flush_surrogate(sink);
        self.text.push(ch);
        next
    }

    fn push_literal(&mut self, ch: char, idx: usize, sink: &mut impl DiagnosticSink) {
        self.flush_surrogate(sink);
        if !is_graphic_or_space(ch) {
            sink.add_error_at(
                codes::NON_GRAPHIC,
                format!(
                    "non-graphic character found, code: {}, index in value: {idx}",
                    u32::from(ch)
                ),
                self.line,
            );
        }
        self.text.push(ch);
    }

    fn push_unicode(&mut self, digits: &[char; 4], sink: &mut impl DiagnosticSink) {
        let Some(unit) = parse_hex_unit(digits) else {
            self.flush_surrogate(sink);
            let sequence: String = digits.iter().collect();
            sink.add_error_at(
                codes::UNICODE_INVALID,
                format!("invalid unicode sequence: {sequence}"),
                self.line,
            );
            return;
        };
        match unit {
            0xD800..=0xDBFF => {
                self.flush_surrogate(sink);
                self.high_surrogate = Some(unit);
            }
            0xDC00..=0xDFFF => match self.high_surrogate.take() {
                Some(high) => {
                    let code = 0x10000 + ((u32::from(high) - 0xD800) << 10) + (u32::from(unit) - 0xDC00);
                    self.text
                        .push(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER));
                }
                None => self.unpaired_surrogate(unit, sink),
            },
            _ => {
                self.flush_surrogate(sink);
                self.text
                    .push(char::from_u32(u32::from(unit)).unwrap_or(char::REPLACEMENT_CHARACTER));
            }
        }
    }

    fn flush_surrogate(&mut self, sink: &mut impl DiagnosticSink) {
        if let Some(high) = self.high_surrogate.take() {
            self.unpaired_surrogate(high, sink);
        }
    }

    fn unpaired_surrogate(&mut self, unit: u16, sink: &mut impl DiagnosticSink) {
        sink.add_warning_at(
            codes::UNPAIRED_SURROGATE,
            format!("unpaired surrogate \\u{unit:04X} replaced"),
            self.line,
        );
        self.text.push(char::REPLACEMENT_CHARACTER);
    }
}

fn parse_hex_unit(digits: &[char; 4]) -> Option<u16> {
    digits.iter().try_fold(0u16, |acc, digit| {
        digit.to_digit(16).map(|value| acc * 16 + value as u16)
    })
}

fn is_graphic_or_space(ch: char) -> bool {
    ch.is_whitespace() || !(ch.is_control() || is_format(ch))
}

fn is_format(ch: char) -> bool {
    matches!(
        ch,
        '\u{AD}'
            | '\u{200B}'..='\u{200F}'
            | '\u{202A}'..='\u{202E}'
            | '\u{2060}'..='\u{2064}'
            | '\u{FEFF}'
    )
}

/// Escapes a value so that it reads back unchanged as the value of a
/// `key=value` line, whatever the input encoding.
pub fn escape_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 8);
    let trailing_start = value
        .char_indices()
        .rev()
        .take_while(|(_, ch)| matches!(ch, ' ' | '\t' | '\r' | '\n' | '\x0C'))
        .last()
        .map(|(idx, _)| idx)
        .unwrap_or(value.len());
    for (idx, ch) in value.char_indices() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\x0C' => out.push_str("\\f"),
            ' ' if idx == 0 || idx >= trailing_start => out.push_str("\\ "),
            ':' | '=' if idx == 0 => {
                out.push('\\');
                out.push(ch);
            }
            ' '..='~' => out.push(ch),
            _ => {
                let mut units = [0u16; 2];
                for unit in ch.encode_utf16(&mut units) {
                    out.push_str(&format!("\\u{unit:04X}"));
                }
            }
        }
    }
    out
}
