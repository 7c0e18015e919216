//! Gimbal Controller - three-axis servo commands over a serial stream.
//!
//! This example demonstrates:
//! - Building a link with the builder pattern
//! - Registering a typed handler that parses `pitch,roll,yaw`
//! - Running the read loop over stdin as a stand-in for the serial port
//!
//! # Running
//!
//! ```text
//! printf '#MOVE,90,45,10$#HEARTBEAT,1$#MOVE,200,0,0$' | cargo run --example gimbal
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use cmdlink::{CmdlinkError, CommandLink};

/// Servo travel in degrees.
const SERVO_RANGE: std::ops::RangeInclusive<i32> = 0..=180;

fn check_angle(axis: &str, degrees: i32) -> cmdlink::Result<i32> {
    if SERVO_RANGE.contains(&degrees) {
        Ok(degrees)
    } else {
        Err(CmdlinkError::Argument(format!(
            "{} angle {} outside {:?}",
            axis, degrees, SERVO_RANGE
        )))
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let beats = Arc::new(AtomicU64::new(0));
    let beat_counter = beats.clone();

    let mut link = CommandLink::builder()
        // MOVE,pitch,roll,yaw
        .command_typed("MOVE", |(pitch, roll, yaw): (i32, i32, i32)| {
            let pitch = check_angle("pitch", pitch)?;
            let roll = check_angle("roll", roll)?;
            let yaw = check_angle("yaw", yaw)?;
            eprintln!("gimbal -> pitch={} roll={} yaw={}", pitch, roll, yaw);
            Ok(())
        })
        // HEARTBEAT,<anything>
        .command_fn("HEARTBEAT", move |_args| {
            beat_counter.fetch_add(1, Ordering::Relaxed);
            Ok(())
        })
        .build()?;

    let summary = link.run(tokio::io::stdin()).await?;

    eprintln!(
        "handled={} failed={} unrouted={} overflows={} heartbeats={}",
        summary.handled,
        summary.failed,
        summary.unrouted,
        summary.overflows,
        beats.load(Ordering::Relaxed)
    );

    Ok(())
}
