//! Typed messages on the rig link.

use super::codes::{HostClass, HostError};
use super::serialize::{MessageSerialize, Serializer};

pub mod marker;
pub mod modio;

/// Echo request, host message. Header-only; the device answers with an
/// identical header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Echo;

impl MessageSerialize for Echo {
    fn message_class(&self) -> HostClass {
        HostClass::Echo
    }

    fn message_body<S>(&self, _ser: &mut S) -> Result<(), S::Error>
    where
        S: Serializer,
    {
        Ok(())
    }
}

/// Any outbound command, for callers that dispatch on message kind at
/// runtime rather than holding a concrete command type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HostMessage {
    Echo(Echo),
    ModIoCreate(modio::Create),
    ModIoRemove(modio::Remove),
    ModIoReadDigital(modio::ReadDigital),
    ModIoReadDigitalContStart(modio::ReadDigitalContStart),
    ModIoReadDigitalContStop(modio::ReadDigitalContStop),
    ModIoWriteDigital(modio::WriteDigital),
    ModIoChangeAddress(modio::ChangeAddress),
    MarkerEnable(marker::Enable),
    MarkerDisable(marker::Disable),
    MarkerMark(marker::Mark),
}

impl MessageSerialize for HostMessage {
    fn message_class(&self) -> HostClass {
        match self {
            Self::Echo(m) => m.message_class(),
            Self::ModIoCreate(m) => m.message_class(),
            Self::ModIoRemove(m) => m.message_class(),
            Self::ModIoReadDigital(m) => m.message_class(),
            Self::ModIoReadDigitalContStart(m) => m.message_class(),
            Self::ModIoReadDigitalContStop(m) => m.message_class(),
            Self::ModIoWriteDigital(m) => m.message_class(),
            Self::ModIoChangeAddress(m) => m.message_class(),
            Self::MarkerEnable(m) => m.message_class(),
            Self::MarkerDisable(m) => m.message_class(),
            Self::MarkerMark(m) => m.message_class(),
        }
    }

    fn message_body<S>(&self, ser: &mut S) -> Result<(), S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Echo(m) => m.message_body(ser),
            Self::ModIoCreate(m) => m.message_body(ser),
            Self::ModIoRemove(m) => m.message_body(ser),
            Self::ModIoReadDigital(m) => m.message_body(ser),
            Self::ModIoReadDigitalContStart(m) => m.message_body(ser),
            Self::ModIoReadDigitalContStop(m) => m.message_body(ser),
            Self::ModIoWriteDigital(m) => m.message_body(ser),
            Self::ModIoChangeAddress(m) => m.message_body(ser),
            Self::MarkerEnable(m) => m.message_body(ser),
            Self::MarkerDisable(m) => m.message_body(ser),
            Self::MarkerMark(m) => m.message_body(ser),
        }
    }
}

/// One decoded device-to-host message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DeviceMessage {
    /// Correlation id echoed from the request this answers.
    pub id: u8,
    /// Device-reported outcome.
    pub error: HostError,
    pub body: DeviceBody,
}

impl DeviceMessage {
    pub fn class(&self) -> HostClass {
        match self.body {
            DeviceBody::ModIo(_) => HostClass::ModIoBoard,
            DeviceBody::Marker(_) => HostClass::StreamMarker,
            DeviceBody::Comm => HostClass::Comm,
            DeviceBody::Echo => HostClass::Echo,
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_error()
    }
}

/// Class-specific payload of a decoded message. `None` means the device
/// short-circuited an error response down to the bare header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DeviceBody {
    ModIo(Option<modio::Reply>),
    Marker(Option<marker::Reply>),
    Comm,
    Echo,
}
