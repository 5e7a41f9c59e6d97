use crate::header::is_header_valid;
use crate::http_version::HttpVersion;
use crate::request_method::RequestMethod;
use crate::utils::{skip_whitespace, IteratorUtils, StringUtils};
use std::collections::HashMap;
use std::error::Error;
use std::iter::Peekable;
use std::str::FromStr;

type Result<T> = std::result::Result<T, Box<dyn Error + Send + Sync>>;

#[derive(Debug)]
pub struct Request {
    pub method: RequestMethod,
    pub url: String,
    pub version: HttpVersion,
    pub headers: HashMap<String, String>,
}

impl Request {
    pub fn has_header(&self, header_name: &str, header_value: Option<&str>) -> bool {
        match (self.get_header(header_name), header_value) {
            (Some(value), Some(header_value)) => header_value == value,
            (Some(_), None) => true,
            (None, _) => false,
        }
    }

    /// Header names compare case-insensitively.
    pub fn get_header(&self, header_name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(header_name))
            .map(|(_, value)| value.as_str())
    }
}

fn take_until_crlf<'a>(iterator: &mut impl Iterator<Item = &'a u8>) -> Result<Vec<u8>> {
    let mut values: Vec<u8> = vec![];

    for value in iterator {
        if *value == b'\n' {
            return if values.last() == Some(&b'\r') {
                values.pop();

                Ok(values)
            } else {
                Err("Found LF without CR".into())
            };
        }

        values.push(*value);
    }

    Err("Could not find CRLF".into())
}

fn parse_request_line<'a>(
    iterator: &mut impl Iterator<Item = &'a u8>,
) -> Result<(RequestMethod, String, HttpVersion)> {
    let method_bytes = iterator.take_while_copy(|byte| **byte != b' ');
    let method = RequestMethod::from_str(&String::from_vec(method_bytes));

    let url_bytes = iterator.take_while_copy(|byte| **byte != b' ');
    let url = String::from_vec(url_bytes);

    let version_bytes = take_until_crlf(iterator)?;
    let version = HttpVersion::from_str(&String::from_vec(version_bytes));

    match (method, version) {
        (Ok(method), Ok(version)) if !url.is_empty() => Ok((method, url, version)),
        _ => Err("Request line parsing error".into()),
    }
}

fn parse_headers<'a>(
    iterator: &mut Peekable<impl Iterator<Item = &'a u8>>,
) -> Result<HashMap<String, String>> {
    let mut headers: HashMap<String, String> = HashMap::new();

    loop {
        // an empty line ends the head
        if iterator.next_if(|byte| **byte == b'\r').is_some() {
            return match iterator.next() {
                Some(&b'\n') => Ok(headers),
                _ => Err("Found CR without LF in header line".into()),
            };
        }

        if iterator.peek().is_none() {
            return Err("Head ended before the empty line".into());
        }

        let header_name = String::from_vec(iterator.take_while_copy(|byte| **byte != b':'));
        skip_whitespace(iterator);
        let header_value = String::from_vec(take_until_crlf(iterator)?);
        let header_value = header_value.trim_end().to_string();

        if !is_header_valid(&header_name, &header_value) {
            return Err(format!("Invalid header \"{header_name}\"").into());
        }

        headers.insert(header_name, header_value);
    }
}

/// Parses a request head: request line, headers and the terminating empty line.
pub fn parse_request(bytes: &[u8]) -> Result<Request> {
    let mut bytes_iter = bytes.iter().peekable();
    let (method, url, version) = parse_request_line(bytes_iter.by_ref())?;
    let headers = parse_headers(&mut bytes_iter)?;

    Ok(Request {
        method,
        url,
        version,
        headers,
    })
}
