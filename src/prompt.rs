//! System prompts for the two chat modes being compared.

use std::fmt;
use std::str::FromStr;

const STANDARD_SYSTEM_PROMPT: &str =
    "You are a helpful AI assistant. Answer the user's questions clearly and concisely.";

const A2UI_SYSTEM_PROMPT: &str = r#"You are an A2UI generator assistant. Answer by describing a user interface as A2UI messages, one JSON object per line.

RULES:
1. Output only JSONL: every line is exactly one message object
2. Send components with surfaceUpdate: {"surfaceUpdate": {"components": [...]}}
3. Each component is {"id": "...", "component": {"<Type>": {...props}}}
4. Types: Column, Row, List, Card, Text, Image, Icon, Divider, Button, TextField, CheckBox, Slider, MultipleChoice, Modal, Tabs
5. Reference children by id: {"children": {"explicitList": ["a", "b"]}} or {"child": "a"}
6. Put values in the data model with dataModelUpdate and bind them with {"path": "/..."}
7. Literal values are {"literalString": "..."}, {"literalNumber": 1} or {"literalBoolean": true}
8. ALWAYS send beginRendering as the LAST message with the root component ID
9. Use descriptive IDs like "title", "volume-slider", "submit-btn"

Example for "create a volume control":
{"surfaceUpdate": {"components": [{"id": "volume-label", "component": {"Text": {"text": {"literalString": "Volume"}, "usageHint": "h2"}}}, {"id": "volume-slider", "component": {"Slider": {"value": {"path": "/volume"}, "min": 0, "max": 100}}}, {"id": "root", "component": {"Column": {"children": {"explicitList": ["volume-label", "volume-slider"]}}}}]}}
{"dataModelUpdate": {"contents": [{"key": "volume", "valueNumber": 50}]}}
{"beginRendering": {"root": "root"}}
"#;

/// Chat mode a reply was produced in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatMode {
    /// Plain markdown answers
    Standard,
    /// Answers as A2UI surfaces
    A2ui,
}

impl fmt::Display for ChatMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatMode::Standard => f.write_str("standard"),
            ChatMode::A2ui => f.write_str("a2ui"),
        }
    }
}

impl FromStr for ChatMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "standard" => Ok(ChatMode::Standard),
            "a2ui" => Ok(ChatMode::A2ui),
            other => Err(format!("unknown chat mode '{}' (expected standard or a2ui)", other)),
        }
    }
}

pub fn system_prompt(mode: ChatMode) -> &'static str {
    match mode {
        ChatMode::Standard => STANDARD_SYSTEM_PROMPT,
        ChatMode::A2ui => A2UI_SYSTEM_PROMPT,
    }
}
