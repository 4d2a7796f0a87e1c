//! # Description
//!
//! A2UI Kit decodes Agent-to-UI records out of streamed LLM responses and
//! maintains the surfaces they describe: component definitions, a per-surface
//! data model and a resolved render tree ready for any widget toolkit.
//!
//! # Features
//!
//! - Incremental JSONL decoding that tolerates arbitrary chunk splits and prose.
//! - SSE framing, plus OpenAI and Gemini chat-delta streams.
//! - Multi-surface state with path-scoped data model merges.
//! - Cycle-safe, depth-capped component tree resolution with templates.
//! - A generic component `Catalog` for plugging in your own widgets.
//!
//! Everything lives in the [`a2ui`] module; [`prelude`] re-exports the types
//! most hosts need.

pub mod a2ui;

pub mod prelude {
    pub use crate::a2ui::{
        A2uiConfig, A2uiMessage, A2uiSession, ButtonAction, Catalog, ComponentKind, InputFormat,
        NodeKind, RenderChildren, RenderNode, SurfaceEvent, SurfaceManager, TreeResolver,
        UserAction, session_events,
    };
}
