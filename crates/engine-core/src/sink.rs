//! Output sinks: write a command's content to a named destination.
//!
//! Files are created or truncated, written through a buffered writer and flushed
//! before the handle is released, on success and on failure alike.

use crate::error::EngineError;
use model::execution::format::{Destination, OutputFormat};
use std::{
    fs::{self, File},
    io::{self, BufWriter, Write},
    sync::{Mutex, PoisonError},
};
use tracing::debug;

/// What a command produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    Text(String),
    Binary(Vec<u8>),
}

impl Content {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Content::Text(text) => text.as_bytes(),
            Content::Binary(bytes) => bytes,
        }
    }

    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_bytes().is_empty()
    }

    fn kind(&self) -> &'static str {
        match self {
            Content::Text(_) => "text",
            Content::Binary(_) => "binary",
        }
    }

    /// Text formats take text content; `Image` takes binary content.
    pub fn check_format(&self, format: OutputFormat) -> Result<(), EngineError> {
        match (self, format.is_binary()) {
            (Content::Text(_), false) | (Content::Binary(_), true) => Ok(()),
            _ => Err(EngineError::ContentMismatch {
                format,
                content: self.kind(),
            }),
        }
    }
}

impl From<String> for Content {
    fn from(text: String) -> Self {
        Content::Text(text)
    }
}

impl From<Vec<u8>> for Content {
    fn from(bytes: Vec<u8>) -> Self {
        Content::Binary(bytes)
    }
}

/// Callback that streams content into an open destination.
pub type Producer<'p> = dyn FnMut(&mut dyn Write) -> io::Result<()> + 'p;

pub trait OutputSink: Send + Sync {
    /// Opens `destination`, hands it to `produce`, then flushes and releases it
    /// whether or not `produce` succeeded.
    fn write_stream(
        &self,
        destination: &Destination,
        format: OutputFormat,
        produce: &mut Producer<'_>,
    ) -> Result<(), EngineError>;

    fn write(
        &self,
        destination: &Destination,
        format: OutputFormat,
        content: &Content,
    ) -> Result<(), EngineError> {
        content.check_format(format)?;
        self.write_stream(destination, format, &mut |out| {
            out.write_all(content.as_bytes())
        })
    }
}

/// Writes to the file system, or to standard output for [`Destination::Stdout`].
#[derive(Debug, Default, Clone)]
pub struct FileSink;

impl FileSink {
    pub fn new() -> Self {
        Self
    }
}

impl OutputSink for FileSink {
    fn write_stream(
        &self,
        destination: &Destination,
        format: OutputFormat,
        produce: &mut Producer<'_>,
    ) -> Result<(), EngineError> {
        let io_error = |source: io::Error| EngineError::Io {
            destination: destination.to_string(),
            source,
        };

        match destination {
            Destination::Stdout => {
                let stdout = io::stdout();
                let mut out = stdout.lock();
                let produced = produce(&mut out);
                let flushed = out.flush();
                produced.and(flushed).map_err(io_error)
            }
            Destination::File(path) => {
                if let Some(parent) = path.parent()
                    && !parent.as_os_str().is_empty()
                {
                    fs::create_dir_all(parent).map_err(io_error)?;
                }

                debug!("Writing {} output to {}", format, path.display());
                let file = File::create(path).map_err(io_error)?;
                let mut writer = BufWriter::new(file);
                let produced = produce(&mut writer);
                // Flush even when the producer failed, so partial output is not lost
                let flushed = writer.flush();
                drop(writer);
                produced.and(flushed).map_err(io_error)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedOutput {
    pub destination: Destination,
    pub format: OutputFormat,
    pub bytes: Vec<u8>,
}

impl CapturedOutput {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }
}

/// Keeps every write in memory, in order. For embedding front-ends that want
/// the output without touching the file system.
#[derive(Debug, Default)]
pub struct MemorySink {
    outputs: Mutex<Vec<CapturedOutput>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn outputs(&self) -> Vec<CapturedOutput> {
        self.outputs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Most recent output written to `destination`.
    pub fn last_for(&self, destination: &Destination) -> Option<CapturedOutput> {
        self.outputs()
            .into_iter()
            .rev()
            .find(|out| &out.destination == destination)
    }
}

impl OutputSink for MemorySink {
    fn write_stream(
        &self,
        destination: &Destination,
        format: OutputFormat,
        produce: &mut Producer<'_>,
    ) -> Result<(), EngineError> {
        let mut bytes = Vec::new();
        let produced = produce(&mut bytes);

        self.outputs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(CapturedOutput {
                destination: destination.clone(),
                format,
                bytes,
            });

        produced.map_err(|source| EngineError::Io {
            destination: destination.to_string(),
            source,
        })
    }
}
