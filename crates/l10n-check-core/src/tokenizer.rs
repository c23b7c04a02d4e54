use alloc::vec::Vec;

use crate::lines::is_whitespace;

/// Result of feeding one physical line into a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineOutcome {
    /// The record is complete and ready to be decoded.
    Complete,
    /// The value ended in an unconsumed backslash and continues on the next line.
    Continued,
    /// The first line ended before a value started.
    KeyOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FirstLineState {
    LeadingSpace,
    Key { escape_pending: bool },
    Separator,
    Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ContinuationState {
    LeadingSpace,
    Value,
}

/// Raw key and value bytes of the logical record being assembled.
#[derive(Debug, Clone, Default)]
pub struct RecordBuffer {
    key: Vec<u8>,
    value: Vec<u8>,
}

impl RecordBuffer {
    pub fn new() -> Self {
        Self {
            key: Vec::with_capacity(256),
            value: Vec::with_capacity(1024),
        }
    }

    pub fn key(&self) -> &[u8] {
        &self.key
    }

    pub fn value(&self) -> &[u8] {
        &self.value
    }

    pub fn is_empty(&self) -> bool {
        self.key.is_empty() && self.value.is_empty()
    }

    pub fn clear(&mut self) {
        self.key.clear();
        self.value.clear();
    }

    /// Reads the first physical line of a record: leading whitespace, key,
    /// separator, value.
    pub fn read_first(&mut self, line: &[u8]) -> LineOutcome {
        let mut state = FirstLineState::LeadingSpace;
        for &byte in line {
            state = match state {
                FirstLineState::LeadingSpace => {
                    if is_whitespace(byte) {
                        FirstLineState::LeadingSpace
                    } else {
                        self.key.push(byte);
                        FirstLineState::Key {
                            escape_pending: byte == b'\\',
                        }
                    }
                }
                FirstLineState::Key { escape_pending } => {
                    if is_whitespace(byte) {
                        FirstLineState::Separator
                    } else if (byte == b':' || byte == b'=') && !escape_pending {
                        FirstLineState::Separator
                    } else {
                        self.key.push(byte);
                        FirstLineState::Key {
                            escape_pending: byte == b'\\' && !escape_pending,
                        }
                    }
                }
                FirstLineState::Separator => {
                    if is_whitespace(byte) || byte == b':' || byte == b'=' {
                        FirstLineState::Separator
                    } else {
                        self.value.push(byte);
                        FirstLineState::Value
                    }
                }
                FirstLineState::Value => {
                    self.value.push(byte);
                    FirstLineState::Value
                }
            };
        }
        if state != FirstLineState::Value {
            return LineOutcome::KeyOnly;
        }
        self.finish_line()
    }

    /// Reads a continuation line: leading whitespace is dropped and the rest
    /// is appended to the value.
    pub fn read_continuation(&mut self, line: &[u8]) -> LineOutcome {
        let mut state = ContinuationState::LeadingSpace;
        for &byte in line {
            state = match state {
                ContinuationState::LeadingSpace if is_whitespace(byte) => {
                    ContinuationState::LeadingSpace
                }
                ContinuationState::LeadingSpace | ContinuationState::Value => {
                    self.value.push(byte);
                    ContinuationState::Value
                }
            };
        }
        self.finish_line()
    }

    fn finish_line(&mut self) -> LineOutcome {
        let trailing = self
            .value
            .iter()
            .rev()
            .take_while(|byte| **byte == b'\\')
            .count();
        if trailing % 2 == 1 {
            self.value.pop();
            LineOutcome::Continued
        } else {
            LineOutcome::Complete
        }
    }
}
