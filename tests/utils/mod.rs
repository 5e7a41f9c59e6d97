use std::collections::HashMap;
use std::io::{Read, Result, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::path::Path;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;
use tree_serve::server::Server;
use tree_serve::server_config::ServerConfigBuilder;

/// Runs `f` on its own thread and panics if it has not returned within `duration`.
pub fn panic_after<T, F>(duration: Duration, f: F) -> T
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    let (done_tx, done_rx) = mpsc::channel();
    let handle = thread::spawn(move || {
        let value = f();
        done_tx.send(()).expect("Unable to send completion signal");
        value
    });

    match done_rx.recv_timeout(duration) {
        Ok(()) | Err(RecvTimeoutError::Disconnected) => handle.join().expect("Thread panicked"),
        Err(RecvTimeoutError::Timeout) => panic!("Thread took too long"),
    }
}

/// Starts a server for `root` on an ephemeral port. The accept loop lives until the test
/// process exits.
pub fn start_server(root: &Path, chunk_size: usize) -> (Server, SocketAddr) {
    let config = ServerConfigBuilder::new()
        .root(root.to_str().unwrap())
        .host("127.0.0.1")
        .port(0)
        .chunk_size(chunk_size)
        .get();
    let server = Server::new(Some(config)).expect("Tree builds");

    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    let accepting = server.clone();
    thread::spawn(move || accepting.serve(listener).expect("Server runs"));

    (server, addr)
}

#[derive(Debug)]
pub struct RawResponse {
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

pub fn issue_str_request(addr: SocketAddr, request: &str) -> Result<RawResponse> {
    let mut tcp = TcpStream::connect(addr)?;
    tcp.write_all(request.as_bytes())?;

    let mut response_bytes: Vec<u8> = vec![];
    tcp.read_to_end(&mut response_bytes)?;

    Ok(parse_response(&response_bytes))
}

pub fn get(addr: SocketAddr, url: &str) -> RawResponse {
    issue_str_request(
        addr,
        &format!("GET {url} HTTP/1.1\r\nHost: localhost\r\n\r\n"),
    )
    .unwrap()
}

fn parse_response(bytes: &[u8]) -> RawResponse {
    let head_end = bytes
        .windows(4)
        .position(|window| window == b"\r\n\r\n")
        .expect("Response has a complete head");
    let head = std::str::from_utf8(&bytes[..head_end]).unwrap();
    let mut lines = head.split("\r\n");

    let status_line = lines.next().unwrap();
    let status = status_line.split(' ').nth(1).unwrap().parse::<u16>().unwrap();

    let headers: HashMap<String, String> = lines
        .map(|line| {
            let (name, value) = line.split_once(": ").unwrap();
            (name.to_string(), value.to_string())
        })
        .collect();

    let rest = &bytes[head_end + 4..];
    let chunked = headers.get("Transfer-Encoding").map(String::as_str) == Some("chunked");
    // a HEAD response carries the framing header but no body
    let body = if chunked && !rest.is_empty() {
        decode_chunked(rest)
    } else {
        rest.to_vec()
    };

    RawResponse {
        status,
        headers,
        body,
    }
}

pub fn decode_chunked(mut rest: &[u8]) -> Vec<u8> {
    let mut body = vec![];

    loop {
        let line_end = rest
            .windows(2)
            .position(|window| window == b"\r\n")
            .expect("Chunk size line is terminated");
        let size = usize::from_str_radix(std::str::from_utf8(&rest[..line_end]).unwrap(), 16)
            .expect("Chunk size is hex");
        rest = &rest[line_end + 2..];

        if size == 0 {
            assert_eq!(rest, b"\r\n", "Body ends after the last chunk");
            return body;
        }

        body.extend_from_slice(&rest[..size]);
        assert_eq!(&rest[size..size + 2], b"\r\n");
        rest = &rest[size + 2..];
    }
}
