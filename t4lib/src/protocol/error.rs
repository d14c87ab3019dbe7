//! Errors raised by the codec itself. Port I/O failures live in
//! [ClientError](crate::ClientError).

/// A command could not be constructed. Raised before any bytes are produced.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodeError {
    /// A construction argument was out of range.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
}

/// One extracted frame could not be decoded.
///
/// Always local to the offending frame: the reassembly remainder and the
/// other frames extracted in the same batch are unaffected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// The length byte disagrees with the received byte count, or the
    /// frame is shorter than the fixed header.
    #[error("bad frame length: declared {declared}, received {actual} byte(s)")]
    MalformedFrame { declared: u8, actual: usize },

    /// The frame ends before a required field completes.
    #[error("frame ends before {field} completes")]
    TruncatedFrame { field: &'static str },

    /// Bytes remain past the last field the frame's shape accounts for.
    #[error("{count} trailing byte(s) after the last expected field")]
    TrailingData { count: usize },

    /// A field's value matches no code in its set.
    #[error("unrecognized {field} code {value:#04x}")]
    UnknownEnumValue { field: &'static str, value: u8 },
}
