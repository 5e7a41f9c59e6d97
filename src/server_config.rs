use crate::stream::DEFAULT_CHUNK_SIZE;

pub struct ServerConfig {
    /// Directory whose tree is served.
    pub root: String,
    pub host: String,
    pub port: u16,
    /// File served in place of a directory.
    pub default_file: String,
    /// Bytes read from a file before each flush.
    pub chunk_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            root: String::from("web"),
            host: String::from("0.0.0.0"),
            port: 80,
            default_file: String::from("index.html"),
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

pub struct ServerConfigBuilder {
    server_config: ServerConfig,
}

#[allow(clippy::new_without_default)]
impl ServerConfigBuilder {
    pub fn new() -> Self {
        ServerConfigBuilder {
            server_config: ServerConfig::default(),
        }
    }

    pub fn root(mut self, root: &str) -> Self {
        self.server_config.root = root.to_string();

        self
    }

    pub fn host(mut self, host: &str) -> Self {
        self.server_config.host = host.to_string();

        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.server_config.port = port;

        self
    }

    pub fn default_file(mut self, default_file: &str) -> Self {
        self.server_config.default_file = default_file.to_string();

        self
    }

    pub fn chunk_size(mut self, chunk_size: usize) -> Self {
        self.server_config.chunk_size = chunk_size.max(1);

        self
    }

    pub fn get(self) -> ServerConfig {
        self.server_config
    }
}
