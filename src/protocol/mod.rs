//! Protocol module - wire format, framing, and frame types.
//!
//! This module implements the serial command framing:
//! - `#NAME,ARGS$` delimiters and capacity
//! - Frame accumulator for reassembling fragmented chunks
//! - Frame struct and content parsing

mod accumulator;
mod frame;
mod wire_format;

pub use accumulator::{AccumulatorStats, FrameAccumulator};
pub use frame::{parse_content, Frame};
pub use wire_format::{
    FramingConfig, ABSOLUTE_MAX_CONTENT_LEN, DEFAULT_MAX_CONTENT_LEN, FIELD_DELIMITER, START_BYTE,
    STOP_BYTE,
};
