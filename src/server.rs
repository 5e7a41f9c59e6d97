use crate::connection::{Connection, ReadWrite};
use crate::error::ServeError;
use crate::http_version::HttpVersion;
use crate::request::{parse_request, Request};
use crate::request_method::RequestMethod;
use crate::resolver::Resolver;
use crate::response::{Response, ResponseBuilder};
use crate::response_status_code::ResponseStatusCode;
use crate::server_config::ServerConfig;
use crate::stream::{stream_file, StreamError, StreamOptions};
use crate::tree::{TreeError, TreeNode};
use log::{debug, error, info, warn};
use std::io::{ErrorKind, Result};
use std::net::{Shutdown, TcpListener, TcpStream};
use std::path::Path;
use std::sync::Arc;
use std::thread;

/// Serves one directory tree. Cloning is cheap; every clone shares the same tree.
#[derive(Clone)]
pub struct Server {
    config: Arc<ServerConfig>,
    resolver: Arc<Resolver>,
}

impl Server {
    /// Indexes `config.root`. The server cannot be created without a complete tree.
    pub fn new(config: Option<ServerConfig>) -> std::result::Result<Self, TreeError> {
        let config = config.unwrap_or_default();
        let root = Path::new(&config.root);

        let tree = TreeNode::build(root)?;
        info!("Indexed {} entries under {}", tree.node_count(), root.display());
        debug!("Tree:\n{tree}");

        let resolver = Resolver::new(Arc::new(tree), root, &config.default_file);

        Ok(Server {
            config: Arc::new(config),
            resolver: Arc::new(resolver),
        })
    }

    pub fn tree(&self) -> &TreeNode {
        self.resolver.tree()
    }

    pub fn run(&self) -> Result<()> {
        let listener = TcpListener::bind((self.config.host.as_str(), self.config.port))?;

        info!("Server listening on port {}", self.config.port);

        self.serve(listener)
    }

    /// Accepts connections forever, one thread per connection.
    pub fn serve(&self, listener: TcpListener) -> Result<()> {
        for stream in listener.incoming() {
            let mut stream = match stream {
                Ok(stream) => stream,
                Err(err) => {
                    warn!("Failed to accept connection: {err}");
                    continue;
                }
            };

            let server = self.clone();
            thread::spawn(move || {
                if let Err(err) = server.handle_connection(&mut stream) {
                    warn!("Connection error: {err}");
                }
            });
        }

        Ok(())
    }

    fn handle_connection(&self, stream: &mut TcpStream) -> Result<()> {
        let peer = stream.peer_addr()?;
        debug!("Accepted connection from {peer}");

        self.handle(stream)?;

        // the peer sees EOF even if another handle to the socket is still open
        stream.shutdown(Shutdown::Write)
    }

    /// Reads one request from `stream` and writes its response.
    pub fn handle(&self, stream: &mut dyn ReadWrite) -> Result<()> {
        let mut connection = Connection::new(stream);

        let head = match connection.read_head() {
            Ok(head) => head,
            Err(err) if matches!(err.kind(), ErrorKind::InvalidData | ErrorKind::UnexpectedEof) => {
                debug!("Unreadable request: {err}");
                return connection.write(&bad_request().as_bytes());
            }
            Err(err) => return Err(err),
        };

        let request = match parse_request(&head) {
            Ok(request) => request,
            Err(err) => {
                debug!("Malformed request: {err}");
                return connection.write(&bad_request().as_bytes());
            }
        };

        debug!("{} {}", request.method, request.url);

        if !request.method.is_retrieval() {
            let response = empty_response(&request, ResponseStatusCode::MethodNotAllowed)
                .header("Allow", "GET, HEAD")
                .get();

            return connection.write(&response.as_bytes());
        }

        let path = match self.resolver.resolve(&request.url) {
            Ok(path) => path,
            Err(err) => {
                warn!("{} {}: {err}", request.method, request.url);
                return connection.write(&error_response(&request, &err).as_bytes());
            }
        };

        let options = StreamOptions {
            version: request.version,
            chunk_size: self.config.chunk_size,
            head_only: request.method == RequestMethod::Head,
        };

        match stream_file(&mut connection, &path, options) {
            Ok(sent) => {
                debug!("{} {}: sent {sent} bytes", request.method, request.url);
                Ok(())
            }
            Err(StreamError::BeforeHead(err)) => {
                warn!("{} {}: {err}", request.method, request.url);
                connection.write(&error_response(&request, &err).as_bytes())
            }
            Err(err @ StreamError::MidStream { .. }) => {
                error!("{} {}: {err}", request.method, request.url);
                Ok(())
            }
        }
    }
}

fn empty_response(request: &Request, status_code: ResponseStatusCode) -> ResponseBuilder {
    Response::builder()
        .version(request.version)
        .status_code(status_code)
        .header("Connection", "close")
        .header("Content-Length", "0")
}

fn bad_request() -> Response {
    Response::builder()
        .version(HttpVersion::Http1_1)
        .status_code(ResponseStatusCode::BadRequest)
        .header("Connection", "close")
        .header("Content-Length", "0")
        .get()
}

fn error_response(request: &Request, err: &ServeError) -> Response {
    let mut response = Response::builder()
        .version(request.version)
        .status_code(err.status_code())
        .header("Connection", "close")
        .text_body(err.body())
        .get();

    // HEAD keeps the Content-Length a GET would have had
    if request.method == RequestMethod::Head {
        response.set_body(vec![]);
    }

    response
}
