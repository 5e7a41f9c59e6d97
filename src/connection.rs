use std::io::{Error, ErrorKind, Read, Result, Write};
use std::net::TcpStream;

/// Request heads larger than this are rejected.
pub const MAX_HEAD_SIZE: usize = 8 * 1024;

static HEAD_END: &[u8] = b"\r\n\r\n";

/// A byte transport a response can be written to.
pub trait ReadWrite: Read + Write {
    fn as_read_mut(&mut self) -> &mut dyn Read;

    fn as_write_mut(&mut self) -> &mut dyn Write;

    /// Whether `flush` pushes everything written so far to the peer. Streaming responses are
    /// refused on transports that cannot.
    fn supports_flush(&self) -> bool {
        true
    }
}

impl ReadWrite for TcpStream {
    fn as_read_mut(&mut self) -> &mut dyn Read {
        self
    }

    fn as_write_mut(&mut self) -> &mut dyn Write {
        self
    }
}

pub struct Connection<'a> {
    stream: &'a mut dyn ReadWrite,
}

impl<'a> Connection<'a> {
    pub fn new(stream: &'a mut dyn ReadWrite) -> Self {
        Connection { stream }
    }

    /// Reads up to and including the empty line that ends a request head.
    ///
    /// Anything the peer sent after the head is dropped. Fails with `UnexpectedEof` if the peer
    /// closes first and with `InvalidData` once the head grows past [`MAX_HEAD_SIZE`].
    pub fn read_head(&mut self) -> Result<Vec<u8>> {
        let mut request_bytes: Vec<u8> = Vec::new();
        let mut stream_buf: [u8; 1024] = [0; 1024];

        loop {
            let n = match self.stream.as_read_mut().read(&mut stream_buf) {
                Ok(0) => {
                    return Err(Error::new(
                        ErrorKind::UnexpectedEof,
                        "connection closed before the request head ended",
                    ))
                }
                Ok(n) => n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(err),
            };

            // the terminator may straddle two reads
            let search_from = request_bytes.len().saturating_sub(HEAD_END.len() - 1);
            request_bytes.extend_from_slice(&stream_buf[..n]);

            if let Some(position) = request_bytes[search_from..]
                .windows(HEAD_END.len())
                .position(|window| window == HEAD_END)
            {
                request_bytes.truncate(search_from + position + HEAD_END.len());
                return Ok(request_bytes);
            }

            if request_bytes.len() > MAX_HEAD_SIZE {
                return Err(Error::new(
                    ErrorKind::InvalidData,
                    "request head is too large",
                ));
            }
        }
    }

    pub fn supports_flush(&self) -> bool {
        self.stream.supports_flush()
    }

    pub fn write(&mut self, bytes: &[u8]) -> Result<()> {
        self.stream.as_write_mut().write_all(bytes)
    }

    pub fn flush(&mut self) -> Result<()> {
        self.stream.as_write_mut().flush()
    }
}
