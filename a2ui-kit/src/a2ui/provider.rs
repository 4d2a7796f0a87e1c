//! Chat-completion delta streams.
//!
//! When the model is called directly, A2UI records arrive as text deltas
//! inside the provider's own SSE frames. This module peels those frames off
//! and hands back plain text for the line decoder.

use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

use super::config::A2uiConfig;
use super::sse::{LineBuffer, SseLine, classify_line};

// ============================================================================
// Streaming chunk types
// ============================================================================

#[derive(Debug, Deserialize)]
struct OpenAiChunk {
    #[serde(default)]
    choices: Vec<OpenAiChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    #[serde(default)]
    delta: Option<OpenAiDelta>,
}

#[derive(Debug, Deserialize)]
struct OpenAiDelta {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiChunk {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Deserialize)]
struct GeminiPart {
    #[serde(default)]
    text: Option<String>,
}

/// Chat API whose streaming frames carry the model's text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    /// `choices[0].delta.content`
    OpenAi,
    /// `candidates[0].content.parts[0].text`
    Gemini,
}

impl Provider {
    /// Text carried by one `data:` payload, if any.
    pub fn extract_delta(&self, payload: &str) -> Option<String> {
        let delta = match self {
            Provider::OpenAi => serde_json::from_str::<OpenAiChunk>(payload)
                .ok()?
                .choices
                .into_iter()
                .next()?
                .delta?
                .content,
            Provider::Gemini => serde_json::from_str::<GeminiChunk>(payload)
                .ok()?
                .candidates
                .into_iter()
                .next()?
                .content?
                .parts
                .into_iter()
                .next()?
                .text,
        };
        delta.filter(|text| !text.is_empty())
    }

    pub fn name(&self) -> &'static str {
        match self {
            Provider::OpenAi => "openai",
            Provider::Gemini => "gemini",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Provider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "openai" => Ok(Provider::OpenAi),
            "gemini" => Ok(Provider::Gemini),
            other => Err(format!("unknown provider '{}'", other)),
        }
    }
}

/// Turns a provider's SSE stream into the concatenated model text.
///
/// Frames that do not parse or carry no text are ignored.
#[derive(Debug, Clone)]
pub struct DeltaParser {
    provider: Provider,
    config: A2uiConfig,
    lines: LineBuffer,
    done: bool,
}

impl DeltaParser {
    pub fn new(provider: Provider) -> Self {
        Self::with_config(provider, A2uiConfig::default())
    }

    pub fn with_config(provider: Provider, config: A2uiConfig) -> Self {
        DeltaParser {
            provider,
            config,
            lines: LineBuffer::new(),
            done: false,
        }
    }

    pub fn provider(&self) -> Provider {
        self.provider
    }

    /// Consume a chunk and return the text of every frame it completed.
    pub fn process_chunk(&mut self, chunk: &str) -> String {
        let mut text = String::new();
        for line in self.lines.push(chunk) {
            self.process_line(&line, &mut text);
        }
        text
    }

    /// End of stream: process the unterminated last line.
    pub fn flush(&mut self) -> String {
        let mut text = String::new();
        if let Some(rest) = self.lines.take_rest() {
            self.process_line(&rest, &mut text);
        }
        text
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn reset(&mut self) {
        self.lines.clear();
        self.done = false;
    }

    fn process_line(&mut self, line: &str, text: &mut String) {
        match classify_line(line, &self.config) {
            SseLine::Data(payload) => {
                if let Some(delta) = self.provider.extract_delta(payload) {
                    text.push_str(&delta);
                }
            }
            SseLine::Done => self.done = true,
            SseLine::Ignored | SseLine::Raw(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_openai_delta() {
        let payload = r#"{"id":"c1","choices":[{"index":0,"delta":{"content":"{\"begin"}}]}"#;
        assert_eq!(
            Provider::OpenAi.extract_delta(payload),
            Some("{\"begin".to_string())
        );
        assert_eq!(
            Provider::OpenAi.extract_delta(r#"{"choices":[{"delta":{"role":"assistant"}}]}"#),
            None
        );
        assert_eq!(Provider::OpenAi.extract_delta("not json"), None);
    }

    #[test]
    fn test_extract_gemini_delta() {
        let payload = r#"{"candidates":[{"content":{"parts":[{"text":"Hello"}],"role":"model"}}]}"#;
        assert_eq!(Provider::Gemini.extract_delta(payload), Some("Hello".to_string()));
        assert_eq!(Provider::Gemini.extract_delta(r#"{"candidates":[]}"#), None);
    }

    #[test]
    fn test_delta_parser_concatenates_frames() {
        let mut parser = DeltaParser::new(Provider::OpenAi);
        let mut text = parser.process_chunk("data: {\"choices\":[{\"delta\":{\"content\":\"Hel\"}}]}\n\ndata: {\"choi");
        text.push_str(&parser.process_chunk("ces\":[{\"delta\":{\"content\":\"lo\"}}]}\n\n: ping\ndata: [DONE]\n"));

        assert_eq!(text, "Hello");
        assert!(parser.is_done());
    }

    #[test]
    fn test_provider_from_str() {
        assert_eq!("OpenAI".parse::<Provider>(), Ok(Provider::OpenAi));
        assert_eq!("gemini".parse::<Provider>(), Ok(Provider::Gemini));
        assert!("claude".parse::<Provider>().is_err());
    }
}
