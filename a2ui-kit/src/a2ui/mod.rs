//! A2UI Protocol Implementation
//!
//! A2UI (Agent-to-UI) is a declarative JSON protocol for AI agents to generate
//! rich, interactive UIs. This module decodes A2UI records out of a streamed
//! model response and keeps the per-surface state a renderer draws from.
//!
//! # Architecture
//!
//! ```text
//! transport chunks (SSE or raw JSONL)
//!        ↓
//! SseParser / DeltaParser
//!        ↓
//! JsonlDecoder ── skipped records (SkipReason)
//!        ↓
//! A2uiMessage::from_record
//!        ↓
//! SurfaceManager
//!        ↓
//! ┌──────┴──────┐
//! │             │
//! DataModel  Components
//!    │             │
//!    └──────┬──────┘
//!           ↓
//!     TreeResolver → RenderNode → Catalog
//! ```
//!
//! # Example
//!
//! ```rust
//! use a2ui_kit::a2ui::*;
//!
//! let mut session = A2uiSession::new(InputFormat::Framed);
//! session.push_chunk("data: {\"surfaceUpdate\":{\"components\":[");
//! session.push_chunk("{\"id\":\"t\",\"component\":{\"Text\":{\"text\":{\"literalString\":\"Hi\"}}}}]}}\n");
//! session.push_chunk("data: {\"beginRendering\":{\"root\":\"t\"}}\n");
//! session.finish();
//!
//! let tree = session.render_default().unwrap();
//! assert_eq!(tree.type_tag, "Text");
//! ```

mod action;
mod catalog;
mod config;
mod data_model;
mod decoder;
mod error;
mod manager;
mod message;
mod provider;
mod resolver;
mod session;
mod sse;
mod surface;
mod value;

pub use action::*;
pub use catalog::*;
pub use config::*;
pub use data_model::*;
pub use decoder::*;
pub use error::*;
pub use manager::*;
pub use message::*;
pub use provider::*;
pub use resolver::*;
pub use session::*;
pub use sse::*;
pub use surface::*;
pub use value::*;
