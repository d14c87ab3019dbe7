//! Reassembly of the inbound byte stream into complete frames.

use super::error::DecodeError;
use super::messages::DeviceMessage;
use super::parse::decode_frame;

/// Accumulates raw bytes from the serial link and slices complete frames
/// off the front, keeping any trailing partial frame for the next read.
///
/// One buffer per link. Appends and extractions must not race; the codec
/// assumes the caller serializes the read path and the processing path.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameBuffer {
    buf: Vec<u8>,
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append newly received bytes. No-op on empty input.
    pub fn append(&mut self, bytes: &[u8]) {
        if bytes.is_empty() {
            return;
        }
        self.buf.extend_from_slice(bytes);
    }

    /// Slice off every complete frame currently buffered, in arrival
    /// order, raw and undecoded. Whatever remains is an incomplete
    /// trailing frame and stays buffered; if nothing was consumed the
    /// buffer is left untouched.
    pub fn extract_frames(&mut self) -> Vec<Vec<u8>> {
        let mut frames = Vec::new();
        let mut pos = 0;

        while pos < self.buf.len() {
            // A zero length byte can never head a valid frame and would
            // otherwise stall the stream; slice the single byte off so
            // the decoder reports it as malformed.
            let n = (self.buf[pos] as usize).max(1);
            if pos + n > self.buf.len() {
                break;
            }
            frames.push(self.buf[pos..pos + n].to_vec());
            pos += n;
        }

        if pos != 0 {
            self.buf.drain(..pos);
        }
        if !self.buf.is_empty() {
            tracing::trace!(pending = self.buf.len(), "retaining partial frame");
        }

        frames
    }

    /// [extract_frames](Self::extract_frames), with each frame decoded.
    /// A frame that fails to decode yields an `Err` entry in its place;
    /// the rest of the batch and the retained remainder are unaffected.
    pub fn decode_frames(&mut self) -> Vec<Result<DeviceMessage, DecodeError>> {
        self.extract_frames()
            .into_iter()
            .map(|frame| {
                decode_frame(&frame).map_err(|err| {
                    tracing::debug!(%err, frame = ?frame, "dropping undecodable frame");
                    err
                })
            })
            .collect()
    }

    /// Bytes of the incomplete trailing frame, if any.
    pub fn pending(&self) -> &[u8] {
        &self.buf
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn clear(&mut self) {
        self.buf.clear();
    }
}

#[cfg(test)]
mod test {
    use quickcheck_macros::quickcheck;

    use crate::protocol::{
        encode_echo, encode_marker_enable, encode_marker_mark, encode_modio_remove,
    };

    use super::*;

    #[test]
    fn empty_buffer_extracts_nothing() {
        let mut buf = FrameBuffer::new();
        assert_eq!(buf.extract_frames(), Vec::<Vec<u8>>::new());
        assert!(buf.is_empty());
    }

    #[test]
    fn append_empty_is_a_noop() {
        let mut buf = FrameBuffer::new();
        buf.append(&[]);
        assert!(buf.is_empty());
    }

    #[test]
    fn single_complete_frame() {
        let mut buf = FrameBuffer::new();
        buf.append(&[4, 3, 7, 0]);
        assert_eq!(buf.extract_frames(), vec![vec![4, 3, 7, 0]]);
        assert!(buf.is_empty());
    }

    #[test]
    fn two_frames_in_one_append() {
        let mut buf = FrameBuffer::new();
        buf.append(&[4, 3, 1, 0, 4, 2, 2, 0]);
        assert_eq!(
            buf.extract_frames(),
            vec![vec![4, 3, 1, 0], vec![4, 2, 2, 0]]
        );
        assert!(buf.is_empty());
    }

    #[test]
    fn frame_split_across_appends() {
        let mut buf = FrameBuffer::new();
        buf.append(&[4, 3]);
        assert_eq!(buf.extract_frames(), Vec::<Vec<u8>>::new());
        buf.append(&[7, 0]);
        assert_eq!(buf.extract_frames(), vec![vec![4, 3, 7, 0]]);
        assert!(buf.is_empty());
    }

    #[test]
    fn short_frame_stays_pending_until_completed() {
        // declares 10 bytes, only 8 present
        let mut buf = FrameBuffer::new();
        buf.append(&[10, 0, 1, 0, 2, 16, 5, 0]);
        assert_eq!(buf.extract_frames(), Vec::<Vec<u8>>::new());
        assert_eq!(buf.pending().len(), 8);

        buf.append(&[1, 3]);
        assert_eq!(
            buf.extract_frames(),
            vec![vec![10, 0, 1, 0, 2, 16, 5, 0, 1, 3]]
        );
        assert!(buf.is_empty());
    }

    #[test]
    fn complete_frame_plus_partial_tail() {
        let mut buf = FrameBuffer::new();
        buf.append(&[4, 3, 1, 0, 7, 0, 1]);
        assert_eq!(buf.extract_frames(), vec![vec![4, 3, 1, 0]]);
        assert_eq!(buf.pending(), &[7, 0, 1]);
    }

    #[test]
    fn zero_length_byte_becomes_degenerate_frame() {
        let mut buf = FrameBuffer::new();
        buf.append(&[0, 4, 3, 1, 0]);
        assert_eq!(buf.extract_frames(), vec![vec![0], vec![4, 3, 1, 0]]);
        assert!(buf.is_empty());
    }

    #[test]
    fn decode_errors_do_not_poison_the_batch() {
        let mut buf = FrameBuffer::new();
        buf.append(&[0]);
        buf.append(&[4, 3, 7, 0]);

        let msgs = buf.decode_frames();
        assert_eq!(msgs.len(), 2);
        assert!(msgs[0].is_err());
        let echo = msgs[1].as_ref().unwrap();
        assert_eq!(echo.id, 7);
        assert!(buf.is_empty());
    }

    #[quickcheck]
    fn reassembly_is_fragmentation_invariant(cmds: Vec<(u8, u8)>, cuts: Vec<usize>) -> bool {
        let frames: Vec<Vec<u8>> = cmds
            .iter()
            .map(|(kind, id)| match kind % 4 {
                0 => encode_echo(*id),
                1 => encode_modio_remove(*id, 1, 0x20),
                2 => encode_marker_mark(*id),
                _ => encode_marker_enable(*id, 500, 3, 4),
            })
            .collect();
        let stream: Vec<u8> = frames.concat();

        let mut buf = FrameBuffer::new();
        let mut out = Vec::new();
        let mut cuts = cuts.into_iter();
        let mut pos = 0;
        while pos < stream.len() {
            let left = stream.len() - pos;
            let n = cuts.next().unwrap_or(left) % left + 1;
            buf.append(&stream[pos..pos + n]);
            pos += n;
            out.extend(buf.extract_frames());
        }

        out == frames && buf.is_empty()
    }
}
