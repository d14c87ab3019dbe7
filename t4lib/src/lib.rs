//! Host-side library for the Teensy 4 behavioral rig serial link.
//!
//! The rig controller speaks a small length-prefixed binary protocol that
//! commands ModIO relay/I2C expansion boards and stream-marker pins. This
//! crate encodes outbound commands, reassembles the inbound byte stream
//! into frames, and decodes those frames into typed messages. Actual
//! serial I/O stays behind the [embedded_io] port traits.

mod client;
pub use client::*;

pub mod protocol;
