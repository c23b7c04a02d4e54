/// Whitespace as understood by the `.properties` grammar: tab, LF, FF, CR and space.
pub const fn is_whitespace(byte: u8) -> bool {
    matches!(byte, b'\t' | b'\n' | 0x0C | b'\r' | b' ')
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhysicalLine<'a> {
    /// 1-based line number in the input.
    pub number: u32,
    pub bytes: &'a [u8],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Blank,
    Comment,
    Data,
}

/// Physical lines of a byte buffer. `\n`, `\r` and `\r\n` each end one line;
/// an unterminated trailing line is yielded when it is non-empty.
#[derive(Debug, Clone)]
pub struct Lines<'a> {
    input: &'a [u8],
    offset: usize,
    number: u32,
}

pub fn split_lines(input: &[u8]) -> Lines<'_> {
    Lines {
        input,
        offset: 0,
        number: 0,
    }
}

impl<'a> Iterator for Lines<'a> {
    type Item = PhysicalLine<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.offset >= self.input.len() {
            return None;
        }
        let start = self.offset;
        let rest = &self.input[start..];
        let end = match rest.iter().position(|byte| *byte == b'\r' || *byte == b'\n') {
            Some(pos) => {
                let end = start + pos;
                let mut next = end + 1;
                if self.input[end] == b'\r' && self.input.get(next) == Some(&b'\n') {
                    next += 1;
                }
                self.offset = next;
                end
            }
            None => {
                self.offset = self.input.len();
                self.input.len()
            }
        };
        self.number += 1;
        Some(PhysicalLine {
            number: self.number,
            bytes: &self.input[start..end],
        })
    }
}

pub fn classify(line: &[u8]) -> LineKind {
    match line.iter().find(|byte| !is_whitespace(**byte)) {
        None => LineKind::Blank,
        Some(b'#') | Some(b'!') => LineKind::Comment,
        Some(_) => LineKind::Data,
    }
}
