use crate::protocol::{
    decode_frame, DecodeError, DeviceMessage, FrameBuffer, MessageSerialize,
};

/// Re-export to allow using [Client] with [std::io] streams.
pub use embedded_io_adapters::std::FromStd;

/// An error type for [Client].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ClientError<E> {
    /// EOF in underlying stream.
    UnexpectedEof,
    /// Other IO error in underlying stream.
    Io(E),
}

impl<E> std::error::Error for ClientError<E> where E: core::fmt::Debug {}

impl<E> core::fmt::Display for ClientError<E>
where
    E: core::fmt::Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match self {
            Self::UnexpectedEof => write!(f, "unexpected eof"),
            Self::Io(e) => write!(f, "io error: {:?}", e),
        }
    }
}

impl<E> From<E> for ClientError<E> {
    fn from(other: E) -> Self {
        Self::Io(other)
    }
}

/// A client for one end of the rig link: a port plus the reassembly
/// buffer for its inbound byte stream.
#[derive(Debug)]
pub struct Client<F> {
    port: F,
    buffer: FrameBuffer,
    chunk: [u8; 256],
}

impl<F> Client<F> {
    pub fn new(port: F) -> Self {
        Self {
            port,
            buffer: FrameBuffer::new(),
            chunk: [0; 256],
        }
    }

    /// Destroy the client and return the underlying port.
    pub fn free(self) -> F {
        self.port
    }

    pub fn port(&self) -> &F {
        &self.port
    }

    pub fn port_mut(&mut self) -> &mut F {
        &mut self.port
    }

    pub fn buffer(&self) -> &FrameBuffer {
        &self.buffer
    }

    pub fn buffer_mut(&mut self) -> &mut FrameBuffer {
        &mut self.buffer
    }

    /// Read once from the port and return every frame that completed,
    /// raw and undecoded. May return an empty batch if the read ended
    /// mid-frame.
    pub fn read_frames(&mut self) -> Result<Vec<Vec<u8>>, ClientError<F::Error>>
    where
        F: embedded_io::Read,
    {
        let amt = self.port.read(&mut self.chunk)?;
        if amt == 0 {
            // end of file is an error
            return Err(ClientError::UnexpectedEof);
        }

        self.buffer.append(&self.chunk[..amt]);
        Ok(self.buffer.extract_frames())
    }

    /// [read_frames](Self::read_frames), with each frame decoded. Codec
    /// failures are per-frame entries, not client errors.
    pub fn read_messages(
        &mut self,
    ) -> Result<Vec<Result<DeviceMessage, DecodeError>>, ClientError<F::Error>>
    where
        F: embedded_io::Read,
    {
        self.read_frames().map(|frames| {
            frames
                .iter()
                .map(|frame| decode_frame(frame))
                .collect()
        })
    }

    /// Write a command to the port as one frame, and flush.
    pub fn send<M>(&mut self, id: u8, msg: &M) -> Result<(), ClientError<F::Error>>
    where
        F: embedded_io::Write,
        M: MessageSerialize,
    {
        let frame = crate::protocol::encode(id, msg);

        let mut written = 0;
        while written < frame.len() {
            let amt = self.port.write(&frame[written..])?;
            if amt == 0 {
                return Err(ClientError::UnexpectedEof);
            }
            written += amt;
        }
        self.port.flush()?;
        Ok(())
    }
}

/// A [Client] wrapped around a [std::io] stream.
pub type ClientStd<F> = Client<FromStd<F>>;

impl<F> Client<FromStd<F>>
where
    F: std::io::Read + std::io::Write,
{
    /// Create a client from a [std::io] stream.
    pub fn new_std(port: F) -> Self {
        Self::new(FromStd::new(port))
    }
}

#[cfg(test)]
mod test {
    use crate::protocol::{encode_echo, DeviceBody, HostError};

    use super::*;

    #[test]
    fn read_reassembles_across_reads() {
        // a slice reader yields everything in one read call
        let stream = [vec![4, 3, 7, 0], vec![10, 0, 1, 0]].concat();
        let mut client = Client::new(&stream[..]);

        let frames = client.read_frames().unwrap();
        assert_eq!(frames, vec![vec![4, 3, 7, 0]]);
        assert_eq!(client.buffer().pending(), &[10, 0, 1, 0]);
    }

    #[test]
    fn read_messages_decodes_the_batch() {
        let stream = [4u8, 3, 7, 0];
        let mut client = Client::new(&stream[..]);

        let msgs = client.read_messages().unwrap();
        assert_eq!(msgs.len(), 1);
        let msg = msgs[0].as_ref().unwrap();
        assert_eq!(msg.id, 7);
        assert_eq!(msg.error, HostError::NoError);
        assert_eq!(msg.body, DeviceBody::Echo);
    }

    #[test]
    fn eof_is_an_error() {
        let mut client = Client::new(&b""[..]);
        assert_eq!(client.read_frames(), Err(ClientError::UnexpectedEof));
    }

    #[test]
    fn send_writes_one_flushed_frame() {
        let mut client = Client::new(Vec::new());
        client.send(7, &crate::protocol::Echo).unwrap();
        assert_eq!(client.free(), encode_echo(7));
    }
}
