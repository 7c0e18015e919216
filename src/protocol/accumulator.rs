//! Frame accumulator for reassembling fragmented serial input.
//!
//! Uses `bytes::BytesMut` for the bounded content buffer.
//! Implements a state machine for handling fragmented frames:
//! - `Idle`: no start byte seen, input outside frames is dropped
//! - `Accumulating`: start byte seen, buffering content until the stop byte
//!
//! # Example
//!
//! ```
//! use cmdlink::protocol::FrameAccumulator;
//!
//! let mut acc = FrameAccumulator::new();
//!
//! // Data arrives in chunks from the serial port
//! assert!(acc.feed(b"#MOVE,10").unwrap().is_none());
//! let frame = acc.feed(b",20,30$").unwrap().unwrap();
//!
//! assert_eq!(frame.name(), "MOVE");
//! assert_eq!(frame.arguments(), "10,20,30");
//! ```

use bytes::BytesMut;
use tracing::{debug, trace};

use super::frame::{parse_content, Frame};
use super::wire_format::{FramingConfig, DEFAULT_MAX_CONTENT_LEN};
use crate::error::{CmdlinkError, Result};

/// State machine for frame parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Waiting for a start byte.
    Idle,
    /// Start byte seen, waiting for the stop byte.
    Accumulating,
}

/// Counters describing what the accumulator has done with its input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AccumulatorStats {
    /// Frames emitted.
    pub frames: u64,
    /// Closed frames discarded for lacking a field delimiter or valid UTF-8.
    pub malformed: u64,
    /// Frames discarded because their content exceeded the capacity.
    pub overflows: u64,
    /// Bytes dropped outside any frame (before a start byte or after a stop byte).
    pub discarded_bytes: u64,
}

/// Outcome of running the state machine over one slice.
struct Step<'a> {
    result: Result<Option<Frame>>,
    /// Bytes following a stop byte, not yet examined.
    rest: &'a [u8],
}

/// Reassembles `#NAME,ARGS$` frames from arbitrarily split chunks.
///
/// One accumulator owns the state of exactly one stream. The content buffer
/// never grows beyond [`FramingConfig::max_content_len`].
#[derive(Debug)]
pub struct FrameAccumulator {
    /// Content bytes of the frame being received.
    buffer: BytesMut,
    /// Current parsing state.
    state: State,
    /// Delimiters and capacity.
    config: FramingConfig,
    stats: AccumulatorStats,
}

impl FrameAccumulator {
    /// Create a new accumulator with the default framing.
    pub fn new() -> Self {
        Self::from_valid_config(FramingConfig::default())
    }

    /// Create a new accumulator with custom framing.
    ///
    /// # Errors
    ///
    /// Returns a config error if the framing bytes collide or the capacity
    /// is zero or above [`ABSOLUTE_MAX_CONTENT_LEN`](super::ABSOLUTE_MAX_CONTENT_LEN).
    pub fn with_config(config: FramingConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: FramingConfig) -> Self {
        Self {
            // Grows on demand; `append` enforces the bound.
            buffer: BytesMut::with_capacity(config.max_content_len.min(DEFAULT_MAX_CONTENT_LEN)),
            state: State::Idle,
            config,
            stats: AccumulatorStats::default(),
        }
    }

    /// Feed one chunk and return at most one completed frame.
    ///
    /// Bytes following the stop byte in the same chunk are dropped. Use
    /// [`feed_all`](Self::feed_all) to extract back-to-back frames.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(frame))` if the chunk closed a well-formed frame
    /// - `Ok(None)` if more data is needed or the frame was malformed
    ///
    /// # Errors
    ///
    /// Returns [`CmdlinkError::Overflow`] if the frame content outgrew the
    /// capacity. The frame is discarded and the accumulator is idle again.
    pub fn feed(&mut self, chunk: &[u8]) -> Result<Option<Frame>> {
        let step = self.step(chunk);

        if !step.rest.is_empty() {
            trace!(dropped = step.rest.len(), "dropping bytes after stop byte");
            self.stats.discarded_bytes += step.rest.len() as u64;
        }

        step.result
    }

    /// Feed one chunk and extract every frame it completes, in order.
    ///
    /// Bytes after each stop byte are scanned again, so `#A,1$#B,2$` yields
    /// two frames. Overflows appear inline as `Err` items and scanning
    /// continues after them.
    pub fn feed_all(&mut self, chunk: &[u8]) -> Vec<Result<Frame>> {
        let mut results = Vec::new();
        let mut input = chunk;

        loop {
            let Step { result, rest } = self.step(input);

            match result {
                Ok(Some(frame)) => results.push(Ok(frame)),
                Ok(None) => {}
                Err(e) => results.push(Err(e)),
            }

            if rest.is_empty() {
                return results;
            }
            input = rest;
        }
    }

    /// Run the state machine up to the first stop byte in `chunk`.
    fn step<'a>(&mut self, chunk: &'a [u8]) -> Step<'a> {
        let content = match self.state {
            State::Idle => match self.find(chunk, self.config.start) {
                Some(pos) => {
                    self.stats.discarded_bytes += pos as u64;
                    self.buffer.clear();
                    self.state = State::Accumulating;
                    &chunk[pos + 1..]
                }
                None => {
                    self.stats.discarded_bytes += chunk.len() as u64;
                    return Step {
                        result: Ok(None),
                        rest: &[],
                    };
                }
            },
            State::Accumulating => chunk,
        };

        match self.find(content, self.config.stop) {
            Some(pos) => {
                let rest = &content[pos + 1..];
                let result = self.append(&content[..pos]).map(|()| self.close());
                Step { result, rest }
            }
            None => Step {
                result: self.append(content).map(|()| None),
                rest: &[],
            },
        }
    }

    fn find(&self, haystack: &[u8], needle: u8) -> Option<usize> {
        haystack.iter().position(|&b| b == needle)
    }

    /// Append content bytes, discarding the frame if they do not fit.
    fn append(&mut self, bytes: &[u8]) -> Result<()> {
        let attempted = self.buffer.len() + bytes.len();
        let capacity = self.config.max_content_len;

        if attempted > capacity {
            debug!(attempted, capacity, "frame content overflow, discarding frame");
            self.stats.overflows += 1;
            self.reset();
            return Err(CmdlinkError::Overflow {
                capacity,
                attempted,
            });
        }

        self.buffer.extend_from_slice(bytes);
        Ok(())
    }

    /// Close the open frame and parse its content.
    fn close(&mut self) -> Option<Frame> {
        let frame = parse_content(&self.buffer, self.config.delimiter);
        self.reset();

        match frame {
            Some(frame) => {
                self.stats.frames += 1;
                Some(frame)
            }
            None => {
                self.stats.malformed += 1;
                None
            }
        }
    }

    /// Discard any partial frame and return to idle.
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.state = State::Idle;
    }

    /// Check whether no frame is currently open.
    pub fn is_idle(&self) -> bool {
        self.state == State::Idle
    }

    /// Get the number of buffered content bytes.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Check if the content buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Maximum number of content bytes one frame may hold.
    pub fn max_content_len(&self) -> usize {
        self.config.max_content_len
    }

    /// Get the framing configuration.
    pub fn config(&self) -> &FramingConfig {
        &self.config
    }

    /// Get the counters accumulated since creation.
    pub fn stats(&self) -> AccumulatorStats {
        self.stats
    }
}

impl Default for FrameAccumulator {
    fn default() -> Self {
        Self::new()
    }
}
