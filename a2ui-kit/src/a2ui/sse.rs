//! SSE (Server-Sent Events) Framing
//!
//! Unwraps event-stream framing around A2UI records.
//! - Lines starting with "data:" carry a JSON payload
//! - "data: [DONE]" marks the end of the stream
//! - Lines starting with ":" are comments (keep-alive pings)
//! - "event:", "id:" and "retry:" fields are ignored
//! - Anything else is unframed JSONL and goes to the line decoder

use super::config::A2uiConfig;
use super::decoder::{DecodeOutcome, JsonlDecoder, decode_all};
use super::error::SkipReason;
use super::message::A2uiMessage;

const IGNORED_FIELDS: [&str; 3] = ["event:", "id:", "retry:"];

/// One complete line of an event stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SseLine<'a> {
    /// Payload of a `data:` line, trimmed
    Data(&'a str),
    /// The end-of-stream sentinel
    Done,
    /// Comment or field line without a payload
    Ignored,
    /// Line without framing
    Raw(&'a str),
}

/// Classify one line (without its newline).
pub fn classify_line<'a>(line: &'a str, config: &A2uiConfig) -> SseLine<'a> {
    let trimmed = line.trim();
    if let Some(data) = trimmed.strip_prefix(config.data_prefix.as_str()) {
        let data = data.trim();
        if data == config.done_sentinel {
            SseLine::Done
        } else {
            SseLine::Data(data)
        }
    } else if trimmed.starts_with(':') || IGNORED_FIELDS.iter().any(|f| trimmed.starts_with(f)) {
        SseLine::Ignored
    } else {
        SseLine::Raw(line)
    }
}

/// Splits a chunked stream into complete lines, holding back the
/// unterminated tail until the next chunk.
#[derive(Debug, Default, Clone)]
pub struct LineBuffer {
    pending: String,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk and return every line it completed.
    pub fn push(&mut self, chunk: &str) -> Vec<String> {
        self.pending.push_str(chunk);
        let Some(last_newline) = self.pending.rfind('\n') else {
            return Vec::new();
        };
        let rest = self.pending.split_off(last_newline + 1);
        let complete = std::mem::replace(&mut self.pending, rest);
        complete.lines().map(str::to_string).collect()
    }

    /// Take the unterminated tail, if any.
    pub fn take_rest(&mut self) -> Option<String> {
        let rest = std::mem::take(&mut self.pending);
        (!rest.is_empty()).then_some(rest)
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

/// Stream parser from raw chunks to A2UI messages.
///
/// Framed (`data:`) payloads are decoded on their own. Each unframed line is
/// decoded as a standalone record too, except that a line leaving an object
/// open carries on into the next lines, so pretty-printed records work. A
/// line starting with `{` always begins a new record: whatever is still
/// open is reported as [`SkipReason::Truncated`] and dropped.
#[derive(Debug, Default, Clone)]
pub struct SseParser {
    config: A2uiConfig,
    lines: LineBuffer,
    decoder: JsonlDecoder,
    done: bool,
    skipped: Vec<SkipReason>,
}

impl SseParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: A2uiConfig) -> Self {
        SseParser {
            config,
            ..Self::default()
        }
    }

    /// Consume a chunk and return every message completed by it.
    pub fn process_chunk(&mut self, chunk: &str) -> Vec<A2uiMessage> {
        let mut messages = Vec::new();
        for line in self.lines.push(chunk) {
            self.process_line(&line, &mut messages);
        }
        messages
    }

    /// End of stream: process the unterminated line and whatever the line
    /// decoder still holds.
    pub fn flush(&mut self) -> Vec<A2uiMessage> {
        let mut messages = Vec::new();
        if let Some(rest) = self.lines.take_rest() {
            self.process_line(&rest, &mut messages);
        }
        let outcomes = self.decoder.flush();
        collect_messages(outcomes, &mut self.skipped, &mut messages);
        messages
    }

    /// Drop buffered text, the done flag and pending skip reasons.
    pub fn reset(&mut self) {
        self.lines.clear();
        self.decoder.reset();
        self.done = false;
        self.skipped.clear();
    }

    /// Whether the end-of-stream sentinel has been seen.
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Drain the reasons for everything skipped so far.
    pub fn take_skipped(&mut self) -> Vec<SkipReason> {
        std::mem::take(&mut self.skipped)
    }

    fn process_line(&mut self, line: &str, messages: &mut Vec<A2uiMessage>) {
        match classify_line(line, &self.config) {
            SseLine::Data(payload) => {
                collect_messages(decode_all(payload), &mut self.skipped, messages);
            }
            SseLine::Done => {
                log::debug!("[A2UI sse] Stream done");
                self.done = true;
            }
            SseLine::Ignored => {}
            SseLine::Raw(text) => {
                let mut outcomes = Vec::new();
                // A record at column zero ends whatever earlier lines left open.
                if text.starts_with('{') {
                    outcomes.extend(self.decoder.abandon());
                }
                outcomes.extend(self.decoder.feed(text));
                outcomes.extend(self.decoder.feed("\n"));
                if !self.decoder.holds_open_record() {
                    outcomes.extend(self.decoder.abandon());
                }
                collect_messages(outcomes, &mut self.skipped, messages);
            }
        }
    }
}

/// Parse a complete text in one go.
pub fn parse_messages(text: &str) -> Vec<A2uiMessage> {
    let mut parser = SseParser::new();
    let mut messages = parser.process_chunk(text);
    messages.extend(parser.flush());
    messages
}

/// Classify decoded records, routing failures into `skipped`.
pub(crate) fn collect_messages(
    outcomes: Vec<DecodeOutcome>,
    skipped: &mut Vec<SkipReason>,
    messages: &mut Vec<A2uiMessage>,
) {
    for outcome in outcomes {
        match outcome {
            DecodeOutcome::Record(record) => match A2uiMessage::from_record(record) {
                Ok(message) => messages.push(message),
                Err(reason) => {
                    log::debug!("[A2UI sse] Skipped: {}", reason);
                    skipped.push(reason);
                }
            },
            DecodeOutcome::Skipped(reason) => skipped.push(reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::a2ui::message::MessageKind;

    fn kinds(messages: &[A2uiMessage]) -> Vec<MessageKind> {
        messages.iter().map(A2uiMessage::kind).collect()
    }

    #[test]
    fn test_sse_parser_data() {
        let mut parser = SseParser::new();

        let messages = parser.process_chunk("data: {\"beginRendering\": {\"root\": \"r\"}}\n\n");
        assert_eq!(kinds(&messages), vec![MessageKind::BeginRendering]);
        assert!(!parser.is_done());
    }

    #[test]
    fn test_line_split_across_chunks() {
        let mut parser = SseParser::new();

        assert!(parser.process_chunk("data: {\"deleteSurface\":").is_empty());
        let messages = parser.process_chunk(" {\"surfaceId\": \"a\"}}\ndata: [DONE]\n");
        assert_eq!(messages[0].surface_id(), Some("a"));
        assert!(parser.is_done());
    }

    #[test]
    fn test_comments_and_fields_ignored() {
        let mut parser = SseParser::new();
        let text = ": keep-alive\nevent: message\nid: 7\nretry: 1000\ndata: {\"beginRendering\":{}}\n";
        assert_eq!(parser.process_chunk(text).len(), 1);
        assert!(parser.take_skipped().is_empty());
    }

    #[test]
    fn test_unframed_jsonl_and_pretty_records() {
        let text = concat!(
            "{\"surfaceUpdate\":{\"components\":[]}}\n",
            "{\n",
            "  \"beginRendering\": {\n",
            "    \"root\": \"root\"\n",
            "  }\n",
            "}\n",
        );
        let messages = parse_messages(text);
        assert_eq!(
            kinds(&messages),
            vec![MessageKind::SurfaceUpdate, MessageKind::BeginRendering]
        );
    }

    #[test]
    fn test_truncated_line_does_not_swallow_later_records() {
        let mut parser = SseParser::new();
        let text = concat!(
            "{\"surfaceUpdate\":{\"components\":[{\"id\":\"a\"\n",
            "{\"surfaceUpdate\":{\"components\":[{\"id\":\"b\",\"component\":{\"Text\":{}}}]}}\n",
            "{\"beginRendering\":{\"root\":\"b\"}}\n",
        );
        let mut messages = parser.process_chunk(text);
        messages.extend(parser.flush());

        assert_eq!(
            kinds(&messages),
            vec![MessageKind::SurfaceUpdate, MessageKind::BeginRendering]
        );
        assert!(matches!(
            &parser.take_skipped()[..],
            [SkipReason::Truncated { .. }]
        ));
    }

    #[test]
    fn test_open_bracket_in_prose_does_not_swallow_later_records() {
        let text = concat!(
            "Choose one of [A or B:\n",
            "{\"surfaceUpdate\":{\"components\":[{\"id\":\"a\",\"component\":{\"Text\":{}}}]}}\n",
            "{\"beginRendering\":{\"root\":\"a\"}}\n",
        );
        assert_eq!(
            kinds(&parse_messages(text)),
            vec![MessageKind::SurfaceUpdate, MessageKind::BeginRendering]
        );

        let mut parser = SseParser::new();
        let messages = parser.process_chunk("Choose one of [A or B:\n  {\"beginRendering\":{}}\n");
        assert_eq!(kinds(&messages), vec![MessageKind::BeginRendering]);
        assert!(parser.flush().is_empty());
        assert_eq!(
            parser.take_skipped(),
            vec![SkipReason::StrayText { len: 22 }]
        );
    }

    #[test]
    fn test_flush_handles_unterminated_line() {
        let mut parser = SseParser::new();
        assert!(parser.process_chunk("{\"beginRendering\":{\"root\":\"x\"}}").is_empty());
        assert_eq!(parser.flush().len(), 1);
    }

    #[test]
    fn test_skips_are_collected() {
        let mut parser = SseParser::new();
        let text = "data: {\"role\":\"assistant\"}\ndata: {broken\nHello there\n";
        assert!(parser.process_chunk(text).is_empty());
        assert!(parser.flush().is_empty());

        let skipped = parser.take_skipped();
        assert!(matches!(skipped[0], SkipReason::Unclassified));
        assert!(matches!(skipped[1], SkipReason::Malformed { .. }));
        assert!(matches!(skipped[2], SkipReason::StrayText { .. }));
        assert!(parser.take_skipped().is_empty());
    }

    #[test]
    fn test_custom_framing() {
        let config = A2uiConfig {
            data_prefix: "payload:".to_string(),
            done_sentinel: "END".to_string(),
            ..A2uiConfig::default()
        };
        let mut parser = SseParser::with_config(config);
        let messages = parser.process_chunk("payload: {\"beginRendering\":{}}\npayload: END\n");
        assert_eq!(messages.len(), 1);
        assert!(parser.is_done());

        parser.reset();
        assert!(!parser.is_done());
    }

    #[test]
    fn test_line_buffer() {
        let mut lines = LineBuffer::new();
        assert!(lines.push("ab").is_empty());
        assert_eq!(lines.push("c\r\nd\n\ne"), vec!["abc", "d", ""]);
        assert_eq!(lines.take_rest(), Some("e".to_string()));
        assert_eq!(lines.take_rest(), None);
    }
}
