//! Stream-marker commands and replies.
//!
//! The marker drives a clock/data pin pair wired into the recording
//! hardware, pulsing out small codes that let recorded data streams be
//! lined up with rig events after the fact.

use crate::protocol::codes::{HostClass, MarkerCmd};
use crate::protocol::serialize::{MessageSerialize, Serializer};

/// Enable the marker on a pair of output pins, host message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Enable {
    /// Pulse duration, device clock ticks.
    pub duration: u32,
    pub clock_pin: u8,
    pub data_pin: u8,
}

impl MessageSerialize for Enable {
    fn message_class(&self) -> HostClass {
        HostClass::StreamMarker
    }

    fn message_body<S>(&self, ser: &mut S) -> Result<(), S::Error>
    where
        S: Serializer,
    {
        ser.write_u8(MarkerCmd::Enable.code())?;
        ser.write_le_u32(self.duration)?;
        ser.write_u8(self.clock_pin)?;
        ser.write_u8(self.data_pin)
    }
}

/// Disable the marker and release its pins, host message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Disable;

impl MessageSerialize for Disable {
    fn message_class(&self) -> HostClass {
        HostClass::StreamMarker
    }

    fn message_body<S>(&self, ser: &mut S) -> Result<(), S::Error>
    where
        S: Serializer,
    {
        ser.write_u8(MarkerCmd::Disable.code())
    }
}

/// Ask the device to put a fresh code on the marker pins, host message.
/// The success reply carries the code it chose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Mark;

impl MessageSerialize for Mark {
    fn message_class(&self) -> HostClass {
        HostClass::StreamMarker
    }

    fn message_body<S>(&self, ser: &mut S) -> Result<(), S::Error>
    where
        S: Serializer,
    {
        ser.write_u8(MarkerCmd::Mark.code())
    }
}

/// A decoded marker response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Reply {
    pub cmd: MarkerCmd,
    /// The marker code, on successful [MarkerCmd::Mark] replies only.
    pub reading: Option<u8>,
}
