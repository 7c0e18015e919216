//! Link builder and read loop.
//!
//! The [`CommandLinkBuilder`] provides a fluent API for registering command
//! handlers and configuring framing. The [`CommandLink`] couples one
//! [`FrameAccumulator`] with a shared [`HandlerRegistry`]:
//! 1. Read a chunk from the reader
//! 2. Feed it to the accumulator
//! 3. Dispatch every completed frame
//!
//! # Example
//!
//! ```ignore
//! use cmdlink::CommandLink;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut link = CommandLink::builder()
//!         .command_typed("MOVE", |(pitch, roll, yaw): (i32, i32, i32)| {
//!             println!("pitch={pitch} roll={roll} yaw={yaw}");
//!             Ok(())
//!         })
//!         .build()?;
//!
//!     let summary = link.run(tokio::io::stdin()).await?;
//!     eprintln!("{:?}", summary);
//!     Ok(())
//! }
//! ```

use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::{debug, warn};

use crate::config::{LinkConfig, TrailingBytes};
use crate::error::{CmdlinkError, Result};
use crate::handler::{
    Dispatch, FromArgs, Handler, HandlerRegistry, HandlerRegistryBuilder, HandlerResult,
};
use crate::protocol::{FrameAccumulator, FramingConfig};

/// Builder for configuring and creating a [`CommandLink`].
pub struct CommandLinkBuilder {
    registry: HandlerRegistryBuilder,
    config: LinkConfig,
}

impl CommandLinkBuilder {
    /// Create a new link builder.
    pub fn new() -> Self {
        Self {
            registry: HandlerRegistryBuilder::new(),
            config: LinkConfig::default(),
        }
    }

    /// Register a handler for a command name.
    pub fn command<H: Handler>(mut self, name: &str, handler: H) -> Self {
        self.registry = self.registry.register(name, handler);
        self
    }

    /// Register a closure receiving the raw argument string.
    pub fn command_fn<F>(mut self, name: &str, handler: F) -> Self
    where
        F: Fn(&str) -> HandlerResult + Send + Sync + 'static,
    {
        self.registry = self.registry.register_fn(name, handler);
        self
    }

    /// Register a closure receiving parsed arguments.
    pub fn command_typed<F, T>(mut self, name: &str, handler: F) -> Self
    where
        F: Fn(T) -> HandlerResult + Send + Sync + 'static,
        T: FromArgs + 'static,
    {
        self.registry = self.registry.register_typed(name, handler);
        self
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: LinkConfig) -> Self {
        self.config = config;
        self
    }

    /// Set delimiters and capacity.
    pub fn framing(mut self, framing: FramingConfig) -> Self {
        self.config.framing = framing;
        self
    }

    /// Set the trailing-byte policy.
    pub fn trailing(mut self, trailing: TrailingBytes) -> Self {
        self.config.trailing = trailing;
        self
    }

    /// Set how many bytes are requested per read.
    pub fn read_buffer_size(mut self, size: usize) -> Self {
        self.config.read_buffer_size = size;
        self
    }

    /// Freeze the registrations and create the link.
    ///
    /// # Errors
    ///
    /// Returns a config error if the configuration is invalid.
    pub fn build(self) -> Result<CommandLink> {
        CommandLink::new(Arc::new(self.registry.build()), self.config)
    }
}

impl Default for CommandLinkBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Counters for one link.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkSummary {
    /// Chunks processed.
    pub chunks: u64,
    /// Frames dispatched to a handler that succeeded.
    pub handled: u64,
    /// Frames dispatched to a handler that failed.
    pub failed: u64,
    /// Frames with no registered handler.
    pub unrouted: u64,
    /// Frames discarded for exceeding the capacity.
    pub overflows: u64,
}

impl LinkSummary {
    fn record(&mut self, outcome: Dispatch) {
        match outcome {
            Dispatch::Handled => self.handled += 1,
            Dispatch::Failed => self.failed += 1,
            Dispatch::Unrouted => self.unrouted += 1,
        }
    }
}

/// One command stream: an accumulator plus a shared registry.
pub struct CommandLink {
    accumulator: FrameAccumulator,
    registry: Arc<HandlerRegistry>,
    config: LinkConfig,
    summary: LinkSummary,
}

impl CommandLink {
    /// Create a new link builder.
    pub fn builder() -> CommandLinkBuilder {
        CommandLinkBuilder::new()
    }

    /// Create a link over an existing registry.
    ///
    /// The registry can be shared by several links, one per stream.
    pub fn new(registry: Arc<HandlerRegistry>, config: LinkConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            accumulator: FrameAccumulator::with_config(config.framing)?,
            registry,
            config,
            summary: LinkSummary::default(),
        })
    }

    /// Feed one chunk and dispatch every frame it completes.
    ///
    /// Returns the dispatch outcome of each frame, in order. Overflows are
    /// logged and counted, never returned.
    pub fn process_chunk(&mut self, chunk: &[u8]) -> Vec<Dispatch> {
        self.summary.chunks += 1;

        let results = match self.config.trailing {
            TrailingBytes::Rescan => self.accumulator.feed_all(chunk),
            TrailingBytes::Drop => self.accumulator.feed(chunk).transpose().into_iter().collect(),
        };

        let mut outcomes = Vec::with_capacity(results.len());
        for result in results {
            match result {
                Ok(frame) => {
                    debug!(command = frame.name(), "dispatching frame");
                    let outcome = self.registry.dispatch(&frame);
                    self.summary.record(outcome);
                    outcomes.push(outcome);
                }
                Err(e) => {
                    warn!("Discarding frame: {}", e);
                    self.summary.overflows += 1;
                }
            }
        }

        outcomes
    }

    /// Read chunks until EOF, dispatching frames as they complete.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the reader fails. Framing and handler
    /// problems never end the loop.
    pub async fn run<R: AsyncRead + Unpin>(&mut self, mut reader: R) -> Result<LinkSummary> {
        let mut buf = vec![0u8; self.config.read_buffer_size];

        loop {
            let n = match reader.read(&mut buf).await {
                Ok(0) => return Ok(self.summary), // Link closed
                Ok(n) => n,
                Err(e) => return Err(CmdlinkError::Io(e)),
            };

            self.process_chunk(&buf[..n]);
        }
    }

    /// Get the shared registry.
    pub fn registry(&self) -> &Arc<HandlerRegistry> {
        &self.registry
    }

    /// Get the accumulator (for inspecting state and stats).
    pub fn accumulator(&self) -> &FrameAccumulator {
        &self.accumulator
    }

    /// Get the configuration.
    pub fn config(&self) -> &LinkConfig {
        &self.config
    }

    /// Get the counters so far.
    pub fn summary(&self) -> LinkSummary {
        self.summary
    }
}
