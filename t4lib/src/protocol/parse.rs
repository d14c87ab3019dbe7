//! Decoding of device-to-host frames.
//!
//! [decode_frame] takes one complete frame as sliced off by
//! [FrameBuffer](super::FrameBuffer) and produces a
//! [DeviceMessage](super::DeviceMessage), consuming every byte. Frames
//! whose error code is set may legally stop right after the header, or
//! after any later field; everything present is still decoded.

use super::codes::{HostClass, HostError, MarkerCmd, ModIoCmd};
use super::error::DecodeError;
use super::messages::{marker, modio, DeviceBody, DeviceMessage};
use super::HEADER_LEN;

impl<'a> nom::error::ParseError<&'a [u8]> for DecodeError {
    fn from_error_kind(_input: &'a [u8], _kind: nom::error::ErrorKind) -> Self {
        // only byte-at-a-time parsers run here, so a bare nom error can
        // only mean the input ran out
        DecodeError::TruncatedFrame { field: "payload" }
    }

    fn append(_input: &'a [u8], _kind: nom::error::ErrorKind, other: Self) -> Self {
        other
    }
}

type PResult<'a, O> = nom::IResult<&'a [u8], O, DecodeError>;

/// One required byte, reported under `field` if the frame ends first.
fn field_u8<'a>(field: &'static str) -> impl Fn(&'a [u8]) -> PResult<'a, u8> {
    move |input| {
        nom::number::complete::u8(input)
            .map_err(|_: nom::Err<DecodeError>| {
                nom::Err::Failure(DecodeError::TruncatedFrame { field })
            })
    }
}

/// One required byte looked up in a closed code set.
fn code_u8<'a, T>(
    field: &'static str,
    lookup: fn(u8) -> Option<T>,
) -> impl Fn(&'a [u8]) -> PResult<'a, T> {
    move |input| {
        let (rest, value) = field_u8(field)(input)?;
        match lookup(value) {
            Some(code) => Ok((rest, code)),
            None => Err(nom::Err::Failure(DecodeError::UnknownEnumValue {
                field,
                value,
            })),
        }
    }
}

/// ModIO payload: `(port, address, cmd)`, then a `(mark, value)` pair on
/// the sub-commands that carry one. An erroring response may cut off
/// before the pair; a successful one may not.
fn modio_reply<'a>(has_error: bool) -> impl Fn(&'a [u8]) -> PResult<'a, modio::Reply> {
    move |input| {
        let (input, port) = field_u8("modio port")(input)?;
        let (input, address) = field_u8("modio address")(input)?;
        let (input, cmd) = code_u8("modio sub-command", ModIoCmd::from_code)(input)?;

        let (input, data) = if !cmd.carries_digital() || (input.is_empty() && has_error) {
            (input, None)
        } else {
            let (input, mark) = field_u8("modio mark")(input)?;
            let (input, value) = field_u8("modio value")(input)?;
            (input, Some(modio::Digital { mark, value }))
        };

        Ok((
            input,
            modio::Reply {
                port,
                address,
                cmd,
                data,
            },
        ))
    }
}

/// Marker payload: the sub-command, then the marker code on a successful
/// [MarkerCmd::Mark] reply.
fn marker_reply<'a>(has_error: bool) -> impl Fn(&'a [u8]) -> PResult<'a, marker::Reply> {
    move |input| {
        let (input, cmd) = code_u8("marker sub-command", MarkerCmd::from_code)(input)?;

        let (input, reading) = if cmd != MarkerCmd::Mark || (input.is_empty() && has_error) {
            (input, None)
        } else {
            let (input, reading) = field_u8("marker reading")(input)?;
            (input, Some(reading))
        };

        Ok((input, marker::Reply { cmd, reading }))
    }
}

/// Flatten a nom result into the crate error type.
fn run<'a, O>(res: PResult<'a, O>) -> Result<(&'a [u8], O), DecodeError> {
    res.map_err(|err| match err {
        nom::Err::Incomplete(_) => DecodeError::TruncatedFrame { field: "payload" },
        nom::Err::Error(e) | nom::Err::Failure(e) => e,
    })
}

/// Decode one complete device frame, length byte included.
///
/// The frame must be exactly as long as its length byte declares; extra
/// bytes past the decoded shape are [DecodeError::TrailingData], never
/// silently dropped.
pub fn decode_frame(frame: &[u8]) -> Result<DeviceMessage, DecodeError> {
    let declared = frame.first().copied().unwrap_or(0);
    if declared as usize != frame.len() || frame.len() < HEADER_LEN {
        return Err(DecodeError::MalformedFrame {
            declared,
            actual: frame.len(),
        });
    }

    let rest = &frame[1..];
    let (rest, class) = run(code_u8("message class", HostClass::from_code)(rest))?;
    let (rest, id) = run(field_u8("correlation id")(rest))?;
    let (rest, error) = run(code_u8("error code", HostError::from_code)(rest))?;
    let has_error = error.is_error();

    let (rest, body) = match class {
        HostClass::Echo => (rest, DeviceBody::Echo),
        HostClass::Comm => (rest, DeviceBody::Comm),
        HostClass::ModIoBoard if rest.is_empty() && has_error => (rest, DeviceBody::ModIo(None)),
        HostClass::ModIoBoard => {
            let (rest, reply) = run(modio_reply(has_error)(rest))?;
            (rest, DeviceBody::ModIo(Some(reply)))
        }
        HostClass::StreamMarker if rest.is_empty() && has_error => {
            (rest, DeviceBody::Marker(None))
        }
        HostClass::StreamMarker => {
            let (rest, reply) = run(marker_reply(has_error)(rest))?;
            (rest, DeviceBody::Marker(Some(reply)))
        }
    };

    if !rest.is_empty() {
        return Err(DecodeError::TrailingData { count: rest.len() });
    }

    Ok(DeviceMessage { id, error, body })
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn echo_reply() {
        assert_eq!(
            decode_frame(&[4, 3, 7, 0]),
            Ok(DeviceMessage {
                id: 7,
                error: HostError::NoError,
                body: DeviceBody::Echo,
            })
        );
    }

    #[test]
    fn comm_notice_is_header_only() {
        assert_eq!(
            decode_frame(&[4, 2, 5, 0]),
            Ok(DeviceMessage {
                id: 5,
                error: HostError::NoError,
                body: DeviceBody::Comm,
            })
        );
    }

    #[test]
    fn comm_notice_with_payload_is_trailing_data() {
        assert_eq!(
            decode_frame(&[5, 2, 5, 0, 1]),
            Err(DecodeError::TrailingData { count: 1 })
        );
    }

    #[test]
    fn modio_error_short_circuits_to_header() {
        assert_eq!(
            decode_frame(&[4, 0, 9, 2]),
            Ok(DeviceMessage {
                id: 9,
                error: HostError::BadInput,
                body: DeviceBody::ModIo(None),
            })
        );
    }

    #[test]
    fn marker_error_short_circuits_to_header() {
        assert_eq!(
            decode_frame(&[4, 1, 9, 7]),
            Ok(DeviceMessage {
                id: 9,
                error: HostError::BadState,
                body: DeviceBody::Marker(None),
            })
        );
    }

    #[test]
    fn write_digital_reply_carries_mark_and_value() {
        assert_eq!(
            decode_frame(&[9, 0, 1, 0, 2, 0x10, 5, 0, 0b0011]),
            Ok(DeviceMessage {
                id: 1,
                error: HostError::NoError,
                body: DeviceBody::ModIo(Some(modio::Reply {
                    port: 2,
                    address: 0x10,
                    cmd: ModIoCmd::WriteDig,
                    data: Some(modio::Digital { mark: 0, value: 3 }),
                })),
            })
        );
    }

    #[test]
    fn create_reply_has_no_digital_pair() {
        assert_eq!(
            decode_frame(&[7, 0, 1, 0, 2, 16, 0]),
            Ok(DeviceMessage {
                id: 1,
                error: HostError::NoError,
                body: DeviceBody::ModIo(Some(modio::Reply {
                    port: 2,
                    address: 16,
                    cmd: ModIoCmd::Create,
                    data: None,
                })),
            })
        );
    }

    #[test]
    fn error_reply_with_full_payload_still_decodes() {
        assert_eq!(
            decode_frame(&[9, 0, 1, 4, 2, 16, 4, 1, 0]),
            Ok(DeviceMessage {
                id: 1,
                error: HostError::NotFound,
                body: DeviceBody::ModIo(Some(modio::Reply {
                    port: 2,
                    address: 16,
                    cmd: ModIoCmd::ReadDig,
                    data: Some(modio::Digital { mark: 1, value: 0 }),
                })),
            })
        );
    }

    #[test]
    fn length_byte_must_match_byte_count() {
        assert_eq!(
            decode_frame(&[5, 3, 1, 0]),
            Err(DecodeError::MalformedFrame {
                declared: 5,
                actual: 4,
            })
        );
    }

    #[test]
    fn frames_shorter_than_the_header_are_malformed() {
        assert_eq!(
            decode_frame(&[3, 3, 1]),
            Err(DecodeError::MalformedFrame {
                declared: 3,
                actual: 3,
            })
        );
        assert_eq!(
            decode_frame(&[0]),
            Err(DecodeError::MalformedFrame {
                declared: 0,
                actual: 1,
            })
        );
    }

    #[test]
    fn echo_with_payload_is_trailing_data() {
        assert_eq!(
            decode_frame(&[5, 3, 1, 0, 9]),
            Err(DecodeError::TrailingData { count: 1 })
        );
    }

    #[test]
    fn modio_reply_cut_at_sub_command_is_truncated() {
        assert_eq!(
            decode_frame(&[6, 0, 1, 0, 2, 16]),
            Err(DecodeError::TruncatedFrame {
                field: "modio sub-command",
            })
        );
    }

    #[test]
    fn successful_read_missing_its_pair_is_truncated() {
        assert_eq!(
            decode_frame(&[7, 0, 1, 0, 2, 16, 4]),
            Err(DecodeError::TruncatedFrame {
                field: "modio mark",
            })
        );
    }

    #[test]
    fn unknown_class_is_rejected() {
        assert_eq!(
            decode_frame(&[4, 9, 1, 0]),
            Err(DecodeError::UnknownEnumValue {
                field: "message class",
                value: 9,
            })
        );
    }

    #[test]
    fn unknown_error_code_is_rejected() {
        assert_eq!(
            decode_frame(&[4, 3, 1, 0xEE]),
            Err(DecodeError::UnknownEnumValue {
                field: "error code",
                value: 0xEE,
            })
        );
    }

    #[test]
    fn unknown_modio_sub_command_is_rejected() {
        assert_eq!(
            decode_frame(&[5, 0, 1, 0, 2]),
            Err(DecodeError::TruncatedFrame {
                field: "modio address",
            })
        );
        assert_eq!(
            decode_frame(&[7, 0, 1, 0, 2, 16, 9]),
            Err(DecodeError::UnknownEnumValue {
                field: "modio sub-command",
                value: 9,
            })
        );
    }

    #[test]
    fn successful_mark_reply_carries_its_code() {
        assert_eq!(
            decode_frame(&[6, 1, 2, 0, 2, 0xAA]),
            Ok(DeviceMessage {
                id: 2,
                error: HostError::NoError,
                body: DeviceBody::Marker(Some(marker::Reply {
                    cmd: MarkerCmd::Mark,
                    reading: Some(0xAA),
                })),
            })
        );
    }

    #[test]
    fn erroring_mark_reply_may_omit_its_code() {
        assert_eq!(
            decode_frame(&[5, 1, 2, 6, 2]),
            Ok(DeviceMessage {
                id: 2,
                error: HostError::NotRunning,
                body: DeviceBody::Marker(Some(marker::Reply {
                    cmd: MarkerCmd::Mark,
                    reading: None,
                })),
            })
        );
    }

    #[test]
    fn successful_mark_reply_missing_its_code_is_truncated() {
        assert_eq!(
            decode_frame(&[5, 1, 2, 0, 2]),
            Err(DecodeError::TruncatedFrame {
                field: "marker reading",
            })
        );
    }
}
