//! Handler module - command registration and dispatch.
//!
//! Provides:
//! - [`HandlerRegistry`] - maps command names to handlers
//! - [`Args`] / [`FromArgs`] - helpers for parsing the argument string
//!
//! # Example
//!
//! ```
//! use cmdlink::handler::HandlerRegistry;
//!
//! let registry = HandlerRegistry::builder()
//!     // Raw argument string
//!     .register_fn("HEARTBEAT", |_args| Ok(()))
//!     // Parsed arguments
//!     .register_typed("MOVE", |(pitch, roll, yaw): (i32, i32, i32)| {
//!         assert!(pitch <= 180 && roll <= 180 && yaw <= 180);
//!         Ok(())
//!     })
//!     .build();
//!
//! assert!(registry.contains("MOVE"));
//! ```

mod args;
mod registry;

pub use args::{Args, FromArgs, ARG_SEPARATOR};
pub use registry::{
    Dispatch, FnHandler, Handler, HandlerRegistry, HandlerRegistryBuilder, HandlerResult,
    TypedHandler,
};
