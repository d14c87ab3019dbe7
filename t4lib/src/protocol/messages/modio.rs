//! ModIO relay/I2C expansion board commands and replies.
//!
//! Every ModIO frame carries `(port, address)` after the header: the I2C
//! controller the board hangs off, and the board's bus address.

use crate::protocol::codes::{HostClass, ModIoCmd, ModIoFreq, ModIoPullup};
use crate::protocol::error::EncodeError;
use crate::protocol::serialize::{MessageSerialize, Serializer};

/// Boards carry at most this many relays.
pub const MAX_RELAYS: usize = 4;

/// Relay states packed into a 4-bit mask, bit *i* for relay *i*.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RelayMask(u8);

impl RelayMask {
    /// Pack a list of relay states, lowest relay first. Relays past the
    /// end of the list stay off.
    pub fn from_states(states: &[bool]) -> Result<Self, EncodeError> {
        if states.len() > MAX_RELAYS {
            return Err(EncodeError::InvalidArgument(
                "a ModIO board has at most 4 relays",
            ));
        }

        let mut bits = 0;
        for (i, on) in states.iter().enumerate() {
            bits |= (*on as u8) << i;
        }
        Ok(Self(bits))
    }

    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    /// State of relay `i`, for `i < MAX_RELAYS`.
    pub const fn relay(self, i: usize) -> bool {
        self.0 & (1 << i) != 0
    }
}

/// Register a board on an I2C port, host message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Create {
    pub port: u8,
    pub address: u8,
    pub freq: ModIoFreq,
    pub pullup: ModIoPullup,
}

impl MessageSerialize for Create {
    fn message_class(&self) -> HostClass {
        HostClass::ModIoBoard
    }

    fn message_body<S>(&self, ser: &mut S) -> Result<(), S::Error>
    where
        S: Serializer,
    {
        ser.write_u8(self.port)?;
        ser.write_u8(self.address)?;
        ser.write_u8(ModIoCmd::Create.code())?;
        ser.write_u8(self.freq.code())?;
        ser.write_u8(self.pullup.code())
    }
}

/// Release a previously created board, host message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Remove {
    pub port: u8,
    pub address: u8,
}

impl MessageSerialize for Remove {
    fn message_class(&self) -> HostClass {
        HostClass::ModIoBoard
    }

    fn message_body<S>(&self, ser: &mut S) -> Result<(), S::Error>
    where
        S: Serializer,
    {
        ser.write_u8(self.port)?;
        ser.write_u8(self.address)?;
        ser.write_u8(ModIoCmd::Remove.code())
    }
}

/// One-shot digital read of a board's pins, host message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ReadDigital {
    pub port: u8,
    pub address: u8,
}

impl MessageSerialize for ReadDigital {
    fn message_class(&self) -> HostClass {
        HostClass::ModIoBoard
    }

    fn message_body<S>(&self, ser: &mut S) -> Result<(), S::Error>
    where
        S: Serializer,
    {
        ser.write_u8(self.port)?;
        ser.write_u8(self.address)?;
        ser.write_u8(ModIoCmd::ReadDig.code())
    }
}

/// Start streaming digital reads on change, host message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ReadDigitalContStart {
    pub port: u8,
    pub address: u8,
}

impl MessageSerialize for ReadDigitalContStart {
    fn message_class(&self) -> HostClass {
        HostClass::ModIoBoard
    }

    fn message_body<S>(&self, ser: &mut S) -> Result<(), S::Error>
    where
        S: Serializer,
    {
        ser.write_u8(self.port)?;
        ser.write_u8(self.address)?;
        ser.write_u8(ModIoCmd::ReadDigContStart.code())
    }
}

/// Stop a continuous digital read, host message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ReadDigitalContStop {
    pub port: u8,
    pub address: u8,
}

impl MessageSerialize for ReadDigitalContStop {
    fn message_class(&self) -> HostClass {
        HostClass::ModIoBoard
    }

    fn message_body<S>(&self, ser: &mut S) -> Result<(), S::Error>
    where
        S: Serializer,
    {
        ser.write_u8(self.port)?;
        ser.write_u8(self.address)?;
        ser.write_u8(ModIoCmd::ReadDigContStop.code())
    }
}

/// Set a board's relays, host message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WriteDigital {
    pub port: u8,
    pub address: u8,
    pub relays: RelayMask,
}

impl WriteDigital {
    /// Pack up to four relay states. Fails before any bytes are produced
    /// if more are supplied.
    pub fn new(port: u8, address: u8, states: &[bool]) -> Result<Self, EncodeError> {
        Ok(Self {
            port,
            address,
            relays: RelayMask::from_states(states)?,
        })
    }
}

impl MessageSerialize for WriteDigital {
    fn message_class(&self) -> HostClass {
        HostClass::ModIoBoard
    }

    fn message_body<S>(&self, ser: &mut S) -> Result<(), S::Error>
    where
        S: Serializer,
    {
        ser.write_u8(self.port)?;
        ser.write_u8(self.address)?;
        ser.write_u8(ModIoCmd::WriteDig.code())?;
        // the mark slot is filled in by the device on its way back
        ser.write_u8(0)?;
        ser.write_u8(self.relays.bits())
    }
}

/// Move a board to a new I2C address, host message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChangeAddress {
    pub port: u8,
    pub address: u8,
    pub new_address: u8,
}

impl MessageSerialize for ChangeAddress {
    fn message_class(&self) -> HostClass {
        HostClass::ModIoBoard
    }

    fn message_body<S>(&self, ser: &mut S) -> Result<(), S::Error>
    where
        S: Serializer,
    {
        ser.write_u8(self.port)?;
        ser.write_u8(self.address)?;
        ser.write_u8(ModIoCmd::AddressChange.code())?;
        ser.write_u8(0)?;
        ser.write_u8(self.new_address)
    }
}

/// Fields present on every ModIO response that got past the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Reply {
    pub port: u8,
    pub address: u8,
    pub cmd: ModIoCmd,
    /// Extra pair on digital read/write responses; absent when the
    /// sub-command never carries one, or when an error omitted it.
    pub data: Option<Digital>,
}

/// The `(mark, value)` pair on a digital read/write response: the stream
/// marker code the device tied to the operation, and the pin state seen
/// or written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Digital {
    pub mark: u8,
    pub value: u8,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn mask_packs_bit_per_relay() {
        let mask = RelayMask::from_states(&[true, false, true, false]).unwrap();
        assert_eq!(mask.bits(), 0b0000_0101);
        assert!(mask.relay(0));
        assert!(!mask.relay(1));
        assert!(mask.relay(2));
        assert!(!mask.relay(3));
    }

    #[test]
    fn mask_defaults_unlisted_relays_off() {
        let mask = RelayMask::from_states(&[true]).unwrap();
        assert_eq!(mask.bits(), 0b0000_0001);
    }

    #[test]
    fn mask_rejects_too_many_states() {
        assert_eq!(
            RelayMask::from_states(&[false; 5]),
            Err(EncodeError::InvalidArgument(
                "a ModIO board has at most 4 relays"
            ))
        );
    }
}
