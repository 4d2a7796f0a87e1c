//! A2UI runtime configuration.

use serde::{Deserialize, Serialize};

/// Surface id used when a message omits `surfaceId`.
pub const DEFAULT_SURFACE_ID: &str = "default";

/// Maximum component nesting the tree resolver will follow.
pub const DEFAULT_MAX_DEPTH: usize = 50;

/// Event-stream line prefix carrying a payload.
pub const DATA_PREFIX: &str = "data:";

/// Event-stream payload that terminates the stream.
pub const DONE_SENTINEL: &str = "[DONE]";

/// Tunables shared by the parser, the surface manager and the tree resolver.
///
/// Every field has a default, so a partial (or empty) config table is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct A2uiConfig {
    /// Surface receiving messages that carry no `surfaceId`
    pub default_surface_id: String,

    /// Depth cap for component tree resolution
    pub max_depth: usize,

    /// Framing marker for event-stream payload lines
    pub data_prefix: String,

    /// Payload marking the end of an event stream
    pub done_sentinel: String,
}

impl Default for A2uiConfig {
    fn default() -> Self {
        A2uiConfig {
            default_surface_id: DEFAULT_SURFACE_ID.to_string(),
            max_depth: DEFAULT_MAX_DEPTH,
            data_prefix: DATA_PREFIX.to_string(),
            done_sentinel: DONE_SENTINEL.to_string(),
        }
    }
}
