use crate::utils::StringUtils;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum HttpVersion {
    Http1_0,
    Http1_1,
}

impl HttpVersion {
    pub fn as_bytes(&self) -> Vec<u8> {
        self.to_string().as_bytes_vec()
    }

    /// HTTP/1.0 peers do not understand chunked framing; their bodies end when the connection
    /// closes.
    pub fn supports_chunked(&self) -> bool {
        matches!(self, HttpVersion::Http1_1)
    }
}

impl FromStr for HttpVersion {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, ()> {
        match value {
            "HTTP/1.0" => Ok(HttpVersion::Http1_0),
            "HTTP/1.1" => Ok(HttpVersion::Http1_1),
            _ => Err(()),
        }
    }
}

impl Display for HttpVersion {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let string_value = match self {
            HttpVersion::Http1_0 => "HTTP/1.0",
            HttpVersion::Http1_1 => "HTTP/1.1",
        };

        write!(f, "{}", string_value)
    }
}
