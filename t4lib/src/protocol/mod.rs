//! The wire protocol for the rig link.
//!
//! Every frame, in either direction, starts with a four byte header:
//!
//! | offset | size | field |
//! |--------|------|-------|
//! | 0      | 1    | frame length, self-inclusive |
//! | 1      | 1    | message class |
//! | 2      | 1    | correlation id, echoed by the device |
//! | 3      | 1    | error code, 0 on all host frames |
//!
//! followed by a class- and sub-command-specific payload. All multi-byte
//! fields are little-endian.

/// Fixed header size: length byte, message class, correlation id, error code.
pub const HEADER_LEN: usize = 4;

/// The self-inclusive length byte caps frames at 255 bytes.
pub const MAX_FRAME_SIZE: usize = 255;

/// Nominal rate. The link is USB CDC, so the OS-side setting is a formality.
pub const BAUD_RATE: u32 = 115_200;

pub mod buffer;
pub use buffer::FrameBuffer;

pub mod codes;
pub use codes::{HostClass, HostError, MarkerCmd, ModIoCmd, ModIoFreq, ModIoPullup};

pub mod error;
pub use error::{DecodeError, EncodeError};

mod messages;
pub use messages::*;

pub mod parse;
pub use parse::decode_frame;

pub mod serialize;
pub use serialize::MessageSerialize;

/// Serialize a command into a standalone frame.
pub fn encode<M>(id: u8, msg: &M) -> Vec<u8>
where
    M: MessageSerialize,
{
    let mut ser = serialize::SerializerVec::new();
    match msg.frame(id, &mut ser) {
        Ok(()) => ser.done(),
        Err(never) => match never {},
    }
}

/// Encode an echo request; the device answers with an identical header.
pub fn encode_echo(id: u8) -> Vec<u8> {
    encode(id, &Echo)
}

/// Encode a command registering a ModIO board on an I2C port.
pub fn encode_modio_create(
    id: u8,
    port: u8,
    address: u8,
    freq: ModIoFreq,
    pullup: ModIoPullup,
) -> Vec<u8> {
    encode(
        id,
        &modio::Create {
            port,
            address,
            freq,
            pullup,
        },
    )
}

/// Encode a command releasing a previously created board.
pub fn encode_modio_remove(id: u8, port: u8, address: u8) -> Vec<u8> {
    encode(id, &modio::Remove { port, address })
}

/// Encode a one-shot digital read of a board's relay pins.
pub fn encode_modio_read_digital(id: u8, port: u8, address: u8) -> Vec<u8> {
    encode(id, &modio::ReadDigital { port, address })
}

/// Encode the start of a continuous digital read.
pub fn encode_modio_read_digital_cont_start(id: u8, port: u8, address: u8) -> Vec<u8> {
    encode(id, &modio::ReadDigitalContStart { port, address })
}

/// Encode the stop of a continuous digital read.
pub fn encode_modio_read_digital_cont_stop(id: u8, port: u8, address: u8) -> Vec<u8> {
    encode(id, &modio::ReadDigitalContStop { port, address })
}

/// Encode a relay write. Fails with [EncodeError::InvalidArgument] if more
/// than four relay states are supplied; missing trailing relays stay off.
pub fn encode_modio_write_digital(
    id: u8,
    port: u8,
    address: u8,
    states: &[bool],
) -> Result<Vec<u8>, EncodeError> {
    Ok(encode(id, &modio::WriteDigital::new(port, address, states)?))
}

/// Encode a command moving a board to a new I2C address.
pub fn encode_modio_change_address(id: u8, port: u8, address: u8, new_address: u8) -> Vec<u8> {
    encode(
        id,
        &modio::ChangeAddress {
            port,
            address,
            new_address,
        },
    )
}

/// Encode a command enabling the stream marker on a pair of pins.
pub fn encode_marker_enable(id: u8, duration: u32, clock_pin: u8, data_pin: u8) -> Vec<u8> {
    encode(
        id,
        &marker::Enable {
            duration,
            clock_pin,
            data_pin,
        },
    )
}

/// Encode a command disabling the stream marker.
pub fn encode_marker_disable(id: u8) -> Vec<u8> {
    encode(id, &marker::Disable)
}

/// Encode a request for a fresh marker code on the marker pins.
pub fn encode_marker_mark(id: u8) -> Vec<u8> {
    encode(id, &marker::Mark)
}
