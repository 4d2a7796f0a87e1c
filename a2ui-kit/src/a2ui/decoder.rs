//! Streaming JSONL Decoder
//!
//! Splits an append-only text stream into top-level JSON object records.
//! Records may span chunks and lines, nest objects and arrays, and carry
//! braces or escaped quotes inside string values.
//!
//! ```text
//! "{\"a\":{\"b\":"   "1}}\n{\"c\""   ":\"}\"}"
//!        │                │              │
//!        └──── feed ──────┴──── feed ────┴──▶ [Record({"a":{"b":1}}), Record({"c":"}"})]
//! ```

use serde_json::Value;

use super::error::{SkipReason, preview};

/// Result of decoding one unit of buffered text.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodeOutcome {
    /// A complete JSON object
    Record(Value),
    /// Text that did not yield a record
    Skipped(SkipReason),
}

impl DecodeOutcome {
    /// The decoded record, if any.
    pub fn into_record(self) -> Option<Value> {
        match self {
            DecodeOutcome::Record(value) => Some(value),
            DecodeOutcome::Skipped(_) => None,
        }
    }
}

/// Incremental record splitter.
///
/// Scanner state survives between [`feed`](Self::feed) calls, so splitting
/// the input at any point yields the same outcomes as feeding it whole.
#[derive(Debug, Default, Clone)]
pub struct JsonlDecoder {
    buffer: String,
    in_string: bool,
    escape_next: bool,
    brace_depth: usize,
    bracket_depth: usize,
}

impl JsonlDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume a chunk and return every record completed by it.
    pub fn feed(&mut self, chunk: &str) -> Vec<DecodeOutcome> {
        let mut outcomes = Vec::new();

        for ch in chunk.chars() {
            if self.in_string {
                self.buffer.push(ch);
                if self.escape_next {
                    self.escape_next = false;
                } else if ch == '\\' {
                    self.escape_next = true;
                } else if ch == '"' {
                    self.in_string = false;
                }
                continue;
            }

            match ch {
                '{' => {
                    if self.is_top_level() {
                        self.discard_stray_text(&mut outcomes);
                    }
                    self.brace_depth += 1;
                    self.buffer.push(ch);
                }
                '}' if self.brace_depth > 0 => {
                    self.brace_depth -= 1;
                    self.buffer.push(ch);
                    if self.is_top_level() {
                        let text = std::mem::take(&mut self.buffer);
                        outcomes.push(self.log_skip(parse_record(text.trim())));
                    }
                }
                '[' => {
                    self.bracket_depth += 1;
                    self.buffer.push(ch);
                }
                ']' => {
                    self.bracket_depth = self.bracket_depth.saturating_sub(1);
                    self.buffer.push(ch);
                }
                // Quotes in prose between records are not string delimiters.
                '"' if !self.is_top_level() => {
                    self.in_string = true;
                    self.buffer.push(ch);
                }
                _ => self.buffer.push(ch),
            }
        }

        outcomes
    }

    /// End of stream: try whatever is left in the buffer once more.
    pub fn flush(&mut self) -> Vec<DecodeOutcome> {
        let text = std::mem::take(&mut self.buffer);
        self.reset();

        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Vec::new();
        }

        let outcome = if trimmed.starts_with('{') || trimmed.starts_with('[') {
            parse_record(trimmed)
        } else {
            DecodeOutcome::Skipped(SkipReason::StrayText { len: trimmed.len() })
        };
        vec![self.log_skip(outcome)]
    }

    /// Drop all buffered text and scanner state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Whether nothing but whitespace is buffered.
    pub fn is_idle(&self) -> bool {
        self.buffer.trim().is_empty()
    }

    /// Whether an object or array opened by the buffered text is still
    /// unclosed. Prose with a stray `[` does not count.
    pub fn holds_open_record(&self) -> bool {
        !self.is_top_level() && self.buffer.trim_start().starts_with(['{', '['])
    }

    /// Give up on an unclosed object or array and report it as skipped.
    /// Text buffered between records is kept.
    pub fn abandon(&mut self) -> Option<DecodeOutcome> {
        if self.is_top_level() {
            return None;
        }
        let text = std::mem::take(&mut self.buffer);
        self.reset();

        let trimmed = text.trim();
        let reason = if trimmed.starts_with('{') {
            SkipReason::Truncated {
                preview: preview(trimmed),
            }
        } else {
            SkipReason::StrayText { len: trimmed.len() }
        };
        Some(self.log_skip(DecodeOutcome::Skipped(reason)))
    }

    fn is_top_level(&self) -> bool {
        self.brace_depth == 0 && self.bracket_depth == 0
    }

    fn discard_stray_text(&mut self, outcomes: &mut Vec<DecodeOutcome>) {
        let len = self.buffer.trim().len();
        self.buffer.clear();
        if len > 0 {
            outcomes.push(self.log_skip(DecodeOutcome::Skipped(SkipReason::StrayText { len })));
        }
    }

    fn log_skip(&self, outcome: DecodeOutcome) -> DecodeOutcome {
        if let DecodeOutcome::Skipped(reason) = &outcome {
            log::debug!("[A2UI decoder] Skipped: {}", reason);
        }
        outcome
    }
}

/// Decode a complete text in one go (feed + flush).
pub fn decode_all(text: &str) -> Vec<DecodeOutcome> {
    let mut decoder = JsonlDecoder::new();
    let mut outcomes = decoder.feed(text);
    outcomes.extend(decoder.flush());
    outcomes
}

/// Parse one candidate record. Only JSON objects count as records.
pub fn parse_record(text: &str) -> DecodeOutcome {
    match serde_json::from_str::<Value>(text) {
        Ok(value @ Value::Object(_)) => DecodeOutcome::Record(value),
        Ok(_) => DecodeOutcome::Skipped(SkipReason::NotAnObject {
            preview: preview(text),
        }),
        Err(e) => DecodeOutcome::Skipped(SkipReason::Malformed {
            message: e.to_string(),
            preview: preview(text),
        }),
    }
}
