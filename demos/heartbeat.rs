//! Heartbeat Monitor - driving the accumulator by hand, without tokio.
//!
//! This example demonstrates:
//! - Feeding fragmented chunks into a `FrameAccumulator`
//! - Dispatching through a shared `HandlerRegistry`
//! - The difference between `feed` (one frame per chunk) and `feed_all`
//!
//! # Running
//!
//! ```text
//! cargo run --example heartbeat
//! ```

use std::sync::Arc;

use cmdlink::handler::{Dispatch, HandlerRegistry};
use cmdlink::protocol::FrameAccumulator;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let registry = Arc::new(
        HandlerRegistry::builder()
            .register_fn("HEARTBEAT", |args| {
                println!("heartbeat {}", args);
                Ok(())
            })
            .build(),
    );

    // Chunks as a UART driver might hand them over.
    let chunks: [&[u8]; 4] = [b"\r\n#HEART", b"BEAT,1$#HEARTBEAT,2$", b"#PING,", b"0$"];

    println!("-- feed: bytes after a stop byte are dropped");
    let mut acc = FrameAccumulator::new();
    for chunk in chunks {
        if let Some(frame) = acc.feed(chunk)? {
            report(registry.dispatch(&frame), frame.name());
        }
    }

    println!("-- feed_all: every frame in a chunk surfaces");
    let mut acc = FrameAccumulator::new();
    for chunk in chunks {
        for frame in acc.feed_all(chunk) {
            let frame = frame?;
            report(registry.dispatch(&frame), frame.name());
        }
    }

    println!("{:?}", acc.stats());
    Ok(())
}

fn report(outcome: Dispatch, name: &str) {
    if outcome != Dispatch::Handled {
        println!("{} -> {:?}", name, outcome);
    }
}
