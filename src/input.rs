//! Reading responses from files or stdin.

use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use futures::Stream;
use tokio::io::{AsyncRead, AsyncReadExt};

pub type Reader = Box<dyn AsyncRead + Unpin + Send>;

/// Open a file, or stdin for `None` and `-`.
pub async fn open(path: Option<&Path>) -> Result<Reader> {
    match path {
        Some(path) if path != Path::new("-") => {
            let file = tokio::fs::File::open(path)
                .await
                .with_context(|| format!("failed to open {}", path.display()))?;
            Ok(Box::new(file))
        }
        _ => Ok(Box::new(tokio::io::stdin())),
    }
}

/// Read a whole response into memory.
pub async fn read_all(path: Option<&Path>) -> Result<String> {
    let mut reader = open(path).await?;
    let mut text = String::new();
    reader
        .read_to_string(&mut text)
        .await
        .with_context(|| match path {
            Some(path) => format!("failed to read {}", path.display()),
            None => "failed to read stdin".to_string(),
        })?;
    Ok(text)
}

/// Stream text out of `reader` in pieces of at most `chunk_size` bytes.
///
/// Multi-byte characters cut by a read boundary are held back until the
/// rest arrives, so every yielded chunk is valid UTF-8.
pub fn chunks<R>(mut reader: R, chunk_size: usize) -> impl Stream<Item = io::Result<String>>
where
    R: AsyncRead + Unpin,
{
    async_stream::try_stream! {
        let mut buf = vec![0u8; chunk_size.max(1)];
        let mut utf8 = Utf8Chunker::default();
        loop {
            let n = reader.read(&mut buf).await?;
            if n == 0 {
                break;
            }
            let text = utf8.push(&buf[..n]);
            if !text.is_empty() {
                yield text;
            }
        }
        let rest = utf8.finish();
        if !rest.is_empty() {
            yield rest;
        }
    }
}

/// Incremental byte-to-text conversion.
#[derive(Debug, Default)]
pub struct Utf8Chunker {
    pending: Vec<u8>,
}

impl Utf8Chunker {
    /// Append bytes and return the longest decodable prefix.
    ///
    /// Invalid sequences are replaced with U+FFFD; only an incomplete
    /// trailing sequence is kept for the next call.
    pub fn push(&mut self, bytes: &[u8]) -> String {
        self.pending.extend_from_slice(bytes);
        let valid = match std::str::from_utf8(&self.pending) {
            Ok(_) => self.pending.len(),
            Err(e) if e.error_len().is_none() => e.valid_up_to(),
            Err(_) => self.pending.len(),
        };
        let text = String::from_utf8_lossy(&self.pending[..valid]).into_owned();
        self.pending.drain(..valid);
        text
    }

    /// Whatever is still pending, lossily decoded.
    pub fn finish(&mut self) -> String {
        let text = String::from_utf8_lossy(&self.pending).into_owned();
        self.pending.clear();
        text
    }
}
