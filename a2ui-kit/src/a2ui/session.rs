//! A2UI Session
//!
//! Bundles an input parser with a [`SurfaceManager`] so a caller can push
//! transport chunks and read surfaces back out. Each chunk is decoded,
//! classified and applied to completion before the call returns.

use futures::{Stream, StreamExt};
use std::fmt;
use std::str::FromStr;

use super::config::A2uiConfig;
use super::decoder::JsonlDecoder;
use super::error::SkipReason;
use super::manager::{SurfaceEvent, SurfaceManager};
use super::provider::{DeltaParser, Provider};
use super::resolver::{RenderNode, TreeResolver};
use super::sse::{SseParser, collect_messages};

/// Shape of the incoming byte stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputFormat {
    /// A2UI records, SSE-framed or raw JSONL
    #[default]
    Framed,
    /// OpenAI chat-completion SSE deltas
    OpenAi,
    /// Gemini `streamGenerateContent` SSE deltas
    Gemini,
}

impl InputFormat {
    pub const ALL: [InputFormat; 3] = [InputFormat::Framed, InputFormat::OpenAi, InputFormat::Gemini];

    pub fn name(&self) -> &'static str {
        match self {
            InputFormat::Framed => "framed",
            InputFormat::OpenAi => "openai",
            InputFormat::Gemini => "gemini",
        }
    }
}

impl fmt::Display for InputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for InputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        InputFormat::ALL
            .into_iter()
            .find(|format| format.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown input format '{}' (expected framed, openai or gemini)", s))
    }
}

#[derive(Debug, Clone)]
enum Input {
    Framed(SseParser),
    Deltas {
        deltas: DeltaParser,
        decoder: JsonlDecoder,
        skipped: Vec<SkipReason>,
    },
}

impl Input {
    fn new(format: InputFormat, config: &A2uiConfig) -> Self {
        let deltas = |provider| Input::Deltas {
            deltas: DeltaParser::with_config(provider, config.clone()),
            decoder: JsonlDecoder::new(),
            skipped: Vec::new(),
        };
        match format {
            InputFormat::Framed => Input::Framed(SseParser::with_config(config.clone())),
            InputFormat::OpenAi => deltas(Provider::OpenAi),
            InputFormat::Gemini => deltas(Provider::Gemini),
        }
    }
}

/// One rendering session: parser state plus the surfaces it feeds.
#[derive(Debug, Clone)]
pub struct A2uiSession {
    format: InputFormat,
    config: A2uiConfig,
    input: Input,
    manager: SurfaceManager,
    resolver: TreeResolver,
    transcript: String,
}

impl A2uiSession {
    pub fn new(format: InputFormat) -> Self {
        Self::with_config(format, A2uiConfig::default())
    }

    pub fn with_config(format: InputFormat, config: A2uiConfig) -> Self {
        A2uiSession {
            format,
            input: Input::new(format, &config),
            manager: SurfaceManager::with_config(&config),
            resolver: TreeResolver::with_config(&config),
            transcript: String::new(),
            config,
        }
    }

    pub fn format(&self) -> InputFormat {
        self.format
    }

    /// Feed one transport chunk.
    pub fn push_chunk(&mut self, chunk: &str) -> Vec<SurfaceEvent> {
        let mut messages = Vec::new();
        match &mut self.input {
            Input::Framed(parser) => {
                self.transcript.push_str(chunk);
                messages = parser.process_chunk(chunk);
            }
            Input::Deltas {
                deltas,
                decoder,
                skipped,
            } => {
                let text = deltas.process_chunk(chunk);
                self.transcript.push_str(&text);
                collect_messages(decoder.feed(&text), skipped, &mut messages);
            }
        }
        self.manager.process_messages(messages)
    }

    /// End of stream: flush every buffer.
    pub fn finish(&mut self) -> Vec<SurfaceEvent> {
        let mut messages = Vec::new();
        match &mut self.input {
            Input::Framed(parser) => messages = parser.flush(),
            Input::Deltas {
                deltas,
                decoder,
                skipped,
            } => {
                let text = deltas.flush();
                self.transcript.push_str(&text);
                let mut outcomes = decoder.feed(&text);
                outcomes.extend(decoder.flush());
                collect_messages(outcomes, skipped, &mut messages);
            }
        }
        log::debug!(
            "[A2UI session] Finished: {} surfaces, transcript {} bytes",
            self.manager.len(),
            self.transcript.len()
        );
        self.manager.process_messages(messages)
    }

    /// Text received so far; for provider formats, the concatenated deltas.
    pub fn transcript(&self) -> &str {
        &self.transcript
    }

    /// Whether the end-of-stream sentinel has been seen.
    pub fn is_done(&self) -> bool {
        match &self.input {
            Input::Framed(parser) => parser.is_done(),
            Input::Deltas { deltas, .. } => deltas.is_done(),
        }
    }

    /// Drain the reasons for everything skipped so far.
    pub fn take_skipped(&mut self) -> Vec<SkipReason> {
        match &mut self.input {
            Input::Framed(parser) => parser.take_skipped(),
            Input::Deltas { skipped, .. } => std::mem::take(skipped),
        }
    }

    pub fn manager(&self) -> &SurfaceManager {
        &self.manager
    }

    /// Resolve one surface with the session's depth cap.
    pub fn render(&self, surface_id: &str) -> Option<RenderNode> {
        self.resolver.resolve(self.manager.get_surface(surface_id)?)
    }

    /// Resolve the default surface.
    pub fn render_default(&self) -> Option<RenderNode> {
        self.render(self.manager.default_surface_id())
    }

    /// Start over with empty buffers and no surfaces.
    pub fn reset(&mut self) {
        self.input = Input::new(self.format, &self.config);
        self.manager.reset();
        self.transcript.clear();
    }
}

/// Drive a session from an async chunk stream.
///
/// Events are yielded as each chunk is applied; the session is finished
/// when the chunk stream ends. Dropping the returned stream early leaves
/// the session holding whatever was applied so far.
pub fn session_events<'a, S>(
    session: &'a mut A2uiSession,
    chunks: S,
) -> impl Stream<Item = SurfaceEvent> + Unpin + 'a
where
    S: Stream + 'a,
    S::Item: AsRef<str> + 'a,
{
    Box::pin(async_stream::stream! {
        let mut chunks = Box::pin(chunks);
        while let Some(chunk) = chunks.next().await {
            for event in session.push_chunk(chunk.as_ref()) {
                yield event;
            }
        }
        for event in session.finish() {
            yield event;
        }
    })
}
