//! Error types for decoding and resolution.
//!
//! Nothing in this module is ever raised out of the decoder or the tree
//! resolver. Skips are reported as values so callers can inspect them, and
//! resolution failures are turned into placeholder nodes.

use thiserror::Error;

use super::message::MessageKind;

/// Why a piece of the input stream did not produce a message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipReason {
    /// Buffered text looked like a record but failed to parse.
    #[error("malformed record ({message}): {preview}")]
    Malformed { message: String, preview: String },

    /// Text parsed, but the top-level value is not an object.
    #[error("record is not a JSON object: {preview}")]
    NotAnObject { preview: String },

    /// A record was still open when the next one began.
    #[error("record cut off before it closed: {preview}")]
    Truncated { preview: String },

    /// Text found between records (prose, code fences, top-level arrays).
    #[error("{len} bytes of text outside any record")]
    StrayText { len: usize },

    /// Record has none of the recognized message keys.
    #[error("record has no recognized message key")]
    Unclassified,

    /// Message key present, but its payload has the wrong shape.
    #[error("invalid {kind} payload: {message}")]
    InvalidPayload { kind: MessageKind, message: String },
}

/// Failure while resolving a single component into a render node.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("properties of `{type_name}` are not an object")]
    InvalidProps { type_name: String },

    #[error("`child` must be a component id, got {found}")]
    InvalidChild { found: String },

    #[error("`children` is malformed: {reason}")]
    InvalidChildren { reason: String },
}

const PREVIEW_LEN: usize = 80;

/// Shortened copy of `text` for log lines and skip reasons.
pub(crate) fn preview(text: &str) -> String {
    match text.char_indices().nth(PREVIEW_LEN) {
        Some((idx, _)) => format!("{}…", &text[..idx]),
        None => text.to_string(),
    }
}
