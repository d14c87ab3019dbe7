//! The closed code sets shared by encoder and decoder.
//!
//! Each set mirrors an enum in the rig firmware; decoding a value outside
//! the set is an [UnknownEnumValue](super::DecodeError::UnknownEnumValue),
//! never a coerced default.

/// Message class, byte 1 of every frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HostClass {
    /// 0, ModIO relay/I2C expansion board commands.
    ModIoBoard = 0,
    /// 1, stream-marker timing-pulse commands.
    StreamMarker = 1,
    /// 2, link-level notices from the device.
    Comm = 2,
    /// 3, echo request/reply.
    Echo = 3,
}

impl HostClass {
    pub const fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::ModIoBoard),
            1 => Some(Self::StreamMarker),
            2 => Some(Self::Comm),
            3 => Some(Self::Echo),
            _ => None,
        }
    }
}

/// Error code, byte 3 of every frame. Outbound frames always carry
/// [HostError::NoError]; the host does not report errors to the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HostError {
    NoError = 0,
    AlreadyExists = 1,
    BadInput = 2,
    NoResource = 3,
    NotFound = 4,
    I2cTeensyError = 5,
    NotRunning = 6,
    BadState = 7,
    ProgramError = 8,
    DroppingData = 9,
    /// 10, a device-side operation timed out.
    TimedOut = 10,
}

impl HostError {
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Anything except [HostError::NoError]. An erroring response may omit
    /// the trailing payload a success would carry.
    pub fn is_error(self) -> bool {
        self != Self::NoError
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::NoError),
            1 => Some(Self::AlreadyExists),
            2 => Some(Self::BadInput),
            3 => Some(Self::NoResource),
            4 => Some(Self::NotFound),
            5 => Some(Self::I2cTeensyError),
            6 => Some(Self::NotRunning),
            7 => Some(Self::BadState),
            8 => Some(Self::ProgramError),
            9 => Some(Self::DroppingData),
            10 => Some(Self::TimedOut),
            _ => None,
        }
    }
}

/// ModIO board sub-command, first payload byte after `(port, address)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ModIoCmd {
    Create = 0,
    Remove = 1,
    ReadDigContStart = 2,
    ReadDigContStop = 3,
    ReadDig = 4,
    WriteDig = 5,
    AddressChange = 6,
}

impl ModIoCmd {
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// True for the sub-commands whose success responses append a
    /// `(mark, value)` pair.
    pub fn carries_digital(self) -> bool {
        matches!(
            self,
            Self::WriteDig | Self::ReadDig | Self::ReadDigContStart | Self::AddressChange
        )
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Create),
            1 => Some(Self::Remove),
            2 => Some(Self::ReadDigContStart),
            3 => Some(Self::ReadDigContStop),
            4 => Some(Self::ReadDig),
            5 => Some(Self::WriteDig),
            6 => Some(Self::AddressChange),
            _ => None,
        }
    }
}

/// I2C pull-up configuration for a board being created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ModIoPullup {
    Disabled = 0,
    Enabled22kOhm = 1,
    Enabled47kOhm = 2,
    Enabled100kOhm = 3,
}

impl ModIoPullup {
    pub const fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Disabled),
            1 => Some(Self::Enabled22kOhm),
            2 => Some(Self::Enabled47kOhm),
            3 => Some(Self::Enabled100kOhm),
            _ => None,
        }
    }
}

/// I2C bus frequency for a board being created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ModIoFreq {
    Freq100k = 0,
    Freq400k = 1,
    Freq1M = 2,
}

impl ModIoFreq {
    pub const fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Freq100k),
            1 => Some(Self::Freq400k),
            2 => Some(Self::Freq1M),
            _ => None,
        }
    }
}

/// Stream-marker sub-command, first payload byte of a marker frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MarkerCmd {
    Enable = 0,
    Disable = 1,
    Mark = 2,
}

impl MarkerCmd {
    pub const fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Enable),
            1 => Some(Self::Disable),
            2 => Some(Self::Mark),
            _ => None,
        }
    }
}
