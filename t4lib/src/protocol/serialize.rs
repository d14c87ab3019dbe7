//! Serialization of outbound frames.

use std::convert::Infallible;

use super::codes::{HostClass, HostError};
use super::{HEADER_LEN, MAX_FRAME_SIZE};

/// A sink for the bytes of a frame.
pub trait Serializer {
    type Error;

    fn write_u8(&mut self, val: u8) -> Result<(), Self::Error>;

    fn write_bytes(&mut self, val: &[u8]) -> Result<(), Self::Error> {
        for b in val {
            self.write_u8(*b)?;
        }
        Ok(())
    }

    fn write_le_u32(&mut self, val: u32) -> Result<(), Self::Error> {
        self.write_bytes(&val.to_le_bytes())
    }
}

/// A serializer collecting into an owned byte vector.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SerializerVec {
    data: Vec<u8>,
}

impl SerializerVec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn done(self) -> Vec<u8> {
        self.data
    }
}

impl Serializer for SerializerVec {
    type Error = Infallible;

    fn write_u8(&mut self, val: u8) -> Result<(), Self::Error> {
        self.data.push(val);
        Ok(())
    }

    fn write_bytes(&mut self, val: &[u8]) -> Result<(), Self::Error> {
        self.data.extend_from_slice(val);
        Ok(())
    }
}

/// A serializer that only counts bytes, used to fill in the length byte.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SerializerLength {
    len: usize,
}

impl SerializerLength {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Serializer for SerializerLength {
    type Error = Infallible;

    fn write_u8(&mut self, _val: u8) -> Result<(), Self::Error> {
        self.len += 1;
        Ok(())
    }

    fn write_bytes(&mut self, val: &[u8]) -> Result<(), Self::Error> {
        self.len += val.len();
        Ok(())
    }

    fn write_le_u32(&mut self, _val: u32) -> Result<(), Self::Error> {
        self.len += 4;
        Ok(())
    }
}

/// A trait for outbound commands.
pub trait MessageSerialize {
    /// The message class this command belongs to.
    fn message_class(&self) -> HostClass;

    /// Serialize the payload after the fixed header.
    ///
    /// Must perform the same writes every time it is called on the same
    /// message; the length byte is computed from a dry run.
    fn message_body<S>(&self, ser: &mut S) -> Result<(), S::Error>
    where
        S: Serializer;

    /// Payload size in bytes, measured with [SerializerLength].
    fn body_len(&self) -> usize {
        let mut len_ser = SerializerLength::new();
        match self.message_body(&mut len_ser) {
            Ok(()) => len_ser.len(),
            Err(never) => match never {},
        }
    }

    /// Serialize the whole frame: length byte, header, payload. Host
    /// frames always carry [HostError::NoError].
    fn frame<S>(&self, id: u8, ser: &mut S) -> Result<(), S::Error>
    where
        S: Serializer,
    {
        let len = HEADER_LEN + self.body_len();
        debug_assert!(len <= MAX_FRAME_SIZE);

        ser.write_u8(len as u8)?;
        ser.write_u8(self.message_class().code())?;
        ser.write_u8(id)?;
        ser.write_u8(HostError::NoError.code())?;
        self.message_body(ser)
    }
}
