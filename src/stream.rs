use crate::connection::Connection;
use crate::error::ServeError;
use crate::http_version::HttpVersion;
use crate::response::Response;
use crate::response_status_code::ResponseStatusCode;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

pub const DEFAULT_CHUNK_SIZE: usize = 4 * 1024;

/// Where a stream stopped, which decides whether the client can still get an error response.
#[derive(Debug)]
pub enum StreamError {
    /// Nothing was written yet; a fresh error response can be sent.
    BeforeHead(ServeError),
    /// The response head is out. The connection can only be dropped.
    MidStream { error: ServeError, sent: u64 },
}

impl Display for StreamError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StreamError::BeforeHead(error) => write!(f, "{error}"),
            StreamError::MidStream { error, sent } => {
                write!(f, "{error} (aborted after {sent} body bytes)")
            }
        }
    }
}

impl Error for StreamError {}

#[derive(Debug, Copy, Clone)]
pub struct StreamOptions {
    pub version: HttpVersion,
    pub chunk_size: usize,
    /// Send the head a GET would get and no body.
    pub head_only: bool,
}

impl Default for StreamOptions {
    fn default() -> Self {
        StreamOptions {
            version: HttpVersion::Http1_1,
            chunk_size: DEFAULT_CHUNK_SIZE,
            head_only: false,
        }
    }
}

/// Streams the file at `path` as a 200 response.
///
/// The caller has already resolved `path` to a regular file. The file handle lives for the
/// duration of this call only.
pub fn stream_file(
    connection: &mut Connection,
    path: &Path,
    options: StreamOptions,
) -> Result<u64, StreamError> {
    let file = File::open(path).map_err(|err| StreamError::BeforeHead(ServeError::Open(err)))?;

    stream_body(connection, file, content_type(path).as_deref(), options)
}

/// Content type for `path` from its extension, `None` when the extension is unknown.
pub fn content_type(path: &Path) -> Option<String> {
    mime_guess::from_path(path)
        .first()
        .map(|mime| mime.essence_str().to_string())
}

/// Copies `reader` to the connection one chunk at a time, flushing after every chunk.
pub fn stream_body(
    connection: &mut Connection,
    mut reader: impl Read,
    content_type: Option<&str>,
    options: StreamOptions,
) -> Result<u64, StreamError> {
    if !connection.supports_flush() {
        return Err(StreamError::BeforeHead(ServeError::StreamingNotSupported));
    }

    let chunked = options.version.supports_chunked();
    let mut head = Response::builder()
        .version(options.version)
        .status_code(ResponseStatusCode::Ok)
        .header("Connection", "close");

    if let Some(content_type) = content_type {
        head = head.header("Content-Type", content_type);
    }

    if chunked {
        head = head.header("Transfer-Encoding", "chunked");
    }

    let mut writer = ChunkWriter {
        connection,
        head: Some(head.get().as_bytes()),
        chunked,
        sent: 0,
    };

    if options.head_only {
        writer.commit().map_err(|err| writer.mid_stream(err))?;
        writer.connection.flush().map_err(|err| writer.mid_stream(err))?;
        return Ok(0);
    }

    let mut buf = vec![0u8; options.chunk_size.max(1)];

    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) if writer.is_committed() => {
                return Err(StreamError::MidStream {
                    error: ServeError::Read(err),
                    sent: writer.sent,
                })
            }
            Err(err) => return Err(StreamError::BeforeHead(ServeError::Read(err))),
        };

        writer
            .write_chunk(&buf[..n])
            .map_err(|err| writer.mid_stream(err))?;
    }

    writer.finish().map_err(|err| writer.mid_stream(err))?;

    Ok(writer.sent)
}

/// Body framing. The head goes out together with the first chunk.
struct ChunkWriter<'c, 'a> {
    connection: &'c mut Connection<'a>,
    head: Option<Vec<u8>>,
    chunked: bool,
    sent: u64,
}

impl ChunkWriter<'_, '_> {
    fn is_committed(&self) -> bool {
        self.head.is_none()
    }

    fn commit(&mut self) -> std::io::Result<()> {
        if let Some(head) = self.head.take() {
            self.connection.write(&head)?;
        }

        Ok(())
    }

    fn write_chunk(&mut self, chunk: &[u8]) -> std::io::Result<()> {
        self.commit()?;

        if self.chunked {
            let mut frame = format!("{:X}\r\n", chunk.len()).into_bytes();
            frame.extend_from_slice(chunk);
            frame.extend_from_slice(b"\r\n");
            self.connection.write(&frame)?;
        } else {
            self.connection.write(chunk)?;
        }

        self.connection.flush()?;
        self.sent += chunk.len() as u64;

        Ok(())
    }

    fn finish(&mut self) -> std::io::Result<()> {
        self.commit()?;

        if self.chunked {
            self.connection.write(b"0\r\n\r\n")?;
        }

        self.connection.flush()
    }

    fn mid_stream(&self, err: std::io::Error) -> StreamError {
        StreamError::MidStream {
            error: ServeError::Write(err),
            sent: self.sent,
        }
    }
}
