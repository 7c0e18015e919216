//! # cmdlink
//!
//! Incremental command framing and dispatch for serial links.
//!
//! Commands arrive as `#NAME,ARGS$` in chunks of arbitrary size. A
//! [`FrameAccumulator`](protocol::FrameAccumulator) reassembles them and a
//! [`HandlerRegistry`](handler::HandlerRegistry) routes each completed frame
//! to the handler registered under its name.
//!
//! ## Architecture
//!
//! - **Protocol**: delimiters, bounded accumulator, frame parsing
//! - **Handler**: immutable name → handler table, argument helpers
//! - **Link**: read loop coupling a reader, an accumulator and a registry
//!
//! ## Example
//!
//! ```
//! use cmdlink::handler::HandlerRegistry;
//! use cmdlink::protocol::FrameAccumulator;
//!
//! let registry = HandlerRegistry::builder()
//!     .register_fn("MOVE", |args| {
//!         assert_eq!(args, "10,20,30");
//!         Ok(())
//!     })
//!     .build();
//!
//! let mut acc = FrameAccumulator::new();
//! for chunk in [&b"#MOVE,10"[..], &b",20,30$"[..]] {
//!     if let Some(frame) = acc.feed(chunk).unwrap() {
//!         registry.dispatch(&frame);
//!     }
//! }
//! ```

pub mod config;
pub mod error;
pub mod handler;
pub mod link;
pub mod protocol;

pub use config::{LinkConfig, TrailingBytes};
pub use error::{CmdlinkError, Result};
pub use handler::{Dispatch, Handler, HandlerRegistry};
pub use link::{CommandLink, CommandLinkBuilder, LinkSummary};
pub use protocol::{Frame, FrameAccumulator};
