mod header;
mod token;
mod utils;

pub mod connection;
pub mod error;
pub mod http_version;
pub mod request;
pub mod request_method;
pub mod resolver;
pub mod response;
pub mod response_status_code;
pub mod server;
pub mod server_config;
pub mod stream;
pub mod tree;
