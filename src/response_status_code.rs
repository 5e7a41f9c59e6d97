use crate::utils::StringUtils;
use std::fmt::{Display, Formatter};

// only the codes this server can answer with
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ResponseStatusCode {
    Ok = 200,
    BadRequest = 400,
    MethodNotAllowed = 405,
    InternalServerError = 500,
}

impl ResponseStatusCode {
    pub fn as_bytes(&self) -> Vec<u8> {
        format!("{} {}", *self as u16, self).as_bytes_vec()
    }
}

impl Display for ResponseStatusCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let string_value = match self {
            ResponseStatusCode::Ok => "OK",
            ResponseStatusCode::BadRequest => "Bad Request",
            ResponseStatusCode::MethodNotAllowed => "Method Not Allowed",
            ResponseStatusCode::InternalServerError => "Internal Server Error",
        };

        write!(f, "{}", string_value)
    }
}
