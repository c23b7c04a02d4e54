use alloc::format;
use alloc::vec::Vec;
use core::fmt;
use core::str::FromStr;

use crate::diagnostic::{DiagnosticSink, codes};
use crate::{CoreError, CoreResult};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// How raw bytes of a key or value map to characters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Encoding {
    /// One byte is one character (ISO-8859-1).
    #[default]
    Latin1,
    Utf8,
}

impl Encoding {
    pub const fn as_str(self) -> &'static str {
        match self {
            Encoding::Latin1 => "latin1",
            Encoding::Utf8 => "utf-8",
        }
    }

    pub(crate) fn strip_bom(self, input: &[u8]) -> &[u8] {
        match self {
            Encoding::Utf8 => input.strip_prefix(UTF8_BOM).unwrap_or(input),
            Encoding::Latin1 => input,
        }
    }

    /// Characters of `raw` paired with their byte offset in `raw`.
    pub(crate) fn chars(
        self,
        raw: &[u8],
        line: u32,
        sink: &mut impl DiagnosticSink,
    ) -> Vec<(usize, char)> {
        match self {
            Encoding::Latin1 => raw
                .iter()
                .enumerate()
                .map(|(idx, byte)| (idx, char::from(*byte)))
                .collect(),
            Encoding::Utf8 => decode_utf8(raw, line, sink),
        }
    }
}

fn decode_utf8(raw: &[u8], line: u32, sink: &mut impl DiagnosticSink) -> Vec<(usize, char)> {
    let mut out = Vec::with_capacity(raw.len());
    let mut offset = 0;
    while offset < raw.len() {
        match core::str::from_utf8(&raw[offset..]) {
            Ok(valid) => {
                out.extend(valid.char_indices().map(|(idx, ch)| (offset + idx, ch)));
                break;
            }
            Err(err) => {
                let valid_len = err.valid_up_to();
                let valid = core::str::from_utf8(&raw[offset..offset + valid_len]).unwrap_or("");
                out.extend(valid.char_indices().map(|(idx, ch)| (offset + idx, ch)));
                let bad_start = offset + valid_len;
                let bad_len = err.error_len().unwrap_or(raw.len() - bad_start);
                sink.add_error_at(
                    codes::INVALID_UTF8,
                    format!("invalid utf-8 sequence, index in value: {bad_start}"),
                    line,
                );
                out.push((bad_start, char::REPLACEMENT_CHARACTER));
                offset = bad_start + bad_len;
            }
        }
    }
    out
}

impl FromStr for Encoding {
    type Err = CoreError;

    fn from_str(value: &str) -> CoreResult<Self> {
        if value.eq_ignore_ascii_case("latin1") || value.eq_ignore_ascii_case("iso-8859-1") {
            Ok(Encoding::Latin1)
        } else if value.eq_ignore_ascii_case("utf8") || value.eq_ignore_ascii_case("utf-8") {
            Ok(Encoding::Utf8)
        } else {
            Err(CoreError::InvalidInput("unknown encoding"))
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
