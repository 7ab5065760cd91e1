//! Foundation (framework-native) request and response model.
//!
//! # Design
//! These types are plain data with public fields, the way the framework hands
//! them over. The factories only ever borrow them, so converting never
//! changes the input. Response bodies come in the three shapes the framework
//! produces: an in-memory buffer, a file to send verbatim, or a writer.

use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::PathBuf;

use bytes::Bytes;
use indexmap::IndexMap;

use crate::cookie::Cookie;
use crate::headers::Headers;
use crate::stream::StreamWriter;
use crate::upload::FileBag;

/// Key-value parameters; values may be scalars or nested structures.
pub type ParameterBag = IndexMap<String, serde_json::Value>;

/// Server variables, analogous to CGI environment variables.
pub type ServerBag = IndexMap<String, String>;

/// Raw request content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    Bytes(Bytes),
    /// Content spooled to disk, read when the request is converted.
    File(PathBuf),
}

impl Default for Content {
    fn default() -> Self {
        Content::Bytes(Bytes::new())
    }
}

impl Content {
    /// Drain a readable handle into memory.
    pub fn from_reader(mut reader: impl Read) -> io::Result<Self> {
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf)?;
        Ok(Content::Bytes(buf.into()))
    }

    /// Open a reader positioned at the start of the content.
    pub fn open(&self) -> io::Result<Box<dyn Read + '_>> {
        match self {
            Content::Bytes(bytes) => Ok(Box::new(&bytes[..])),
            Content::File(path) => Ok(Box::new(File::open(path)?)),
        }
    }
}

impl From<&'static str> for Content {
    fn from(s: &'static str) -> Self {
        Content::Bytes(Bytes::from_static(s.as_bytes()))
    }
}

impl From<Vec<u8>> for Content {
    fn from(v: Vec<u8>) -> Self {
        Content::Bytes(v.into())
    }
}

/// A framework-native request.
#[derive(Debug, Clone, PartialEq)]
pub struct FoundationRequest {
    pub method: String,
    pub uri: String,
    pub attributes: ParameterBag,
    /// Parsed body parameters.
    pub request: ParameterBag,
    pub query: ParameterBag,
    pub cookies: ParameterBag,
    pub files: FileBag,
    pub server: ServerBag,
    pub headers: Headers,
    pub content: Content,
}

impl FoundationRequest {
    /// A request with empty bags and no content.
    pub fn new(method: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            uri: uri.into(),
            attributes: ParameterBag::new(),
            request: ParameterBag::new(),
            query: ParameterBag::new(),
            cookies: ParameterBag::new(),
            files: FileBag::new(),
            server: ServerBag::new(),
            headers: Headers::new(),
            content: Content::default(),
        }
    }
}

/// Body of a framework-native response.
#[derive(Clone)]
pub enum ResponseBody {
    Buffered(Bytes),
    /// A file on disk sent verbatim.
    File(PathBuf),
    Streamed(StreamWriter),
}

impl Default for ResponseBody {
    fn default() -> Self {
        ResponseBody::Buffered(Bytes::new())
    }
}

impl fmt::Debug for ResponseBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseBody::Buffered(bytes) => f.debug_tuple("Buffered").field(bytes).finish(),
            ResponseBody::File(path) => f.debug_tuple("File").field(path).finish(),
            ResponseBody::Streamed(_) => f.write_str("Streamed(..)"),
        }
    }
}

/// A framework-native response.
#[derive(Debug, Clone)]
pub struct FoundationResponse {
    pub status: u16,
    pub headers: Headers,
    /// Cookies in the order they were set.
    pub cookies: Vec<Cookie>,
    pub protocol_version: String,
    pub body: ResponseBody,
}

impl Default for FoundationResponse {
    fn default() -> Self {
        Self {
            status: 200,
            headers: Headers::new(),
            cookies: Vec::new(),
            protocol_version: "1.1".to_string(),
            body: ResponseBody::default(),
        }
    }
}

impl FoundationResponse {
    pub fn new(status: u16, body: ResponseBody) -> Self {
        Self {
            status,
            body,
            ..Self::default()
        }
    }

    pub fn set_cookie(&mut self, cookie: Cookie) {
        self.cookies.push(cookie);
    }
}
