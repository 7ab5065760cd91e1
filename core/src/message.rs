//! Standard message model: immutable server-request and response values.
//!
//! # Design
//! Values are built once through consuming `with_*` methods and then only
//! read. Method, URI and status use the `http` crate types so parsing and
//! validation follow the wider ecosystem; headers use [`Headers`] because
//! `http::HeaderMap` would lower-case the names.
//!
//! Both types convert into `http::Request<Bytes>` / `http::Response<Bytes>`
//! for handing off to hyper-style stacks. That direction keeps only what the
//! `http` types can represent.

use bytes::Bytes;
use http::header::{HeaderMap, HeaderName, HeaderValue};
use http::{Method, StatusCode, Uri, Version};

use crate::error::BridgeError;
use crate::foundation::{ParameterBag, ServerBag};
use crate::headers::Headers;
use crate::stream::Stream;
use crate::upload::UploadedFiles;

/// A server-side request in the standard model.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerRequest {
    method: Method,
    uri: Uri,
    protocol_version: String,
    headers: Headers,
    body: Stream,
    attributes: ParameterBag,
    parsed_body: ParameterBag,
    query_params: ParameterBag,
    cookie_params: ParameterBag,
    server_params: ServerBag,
    uploaded_files: UploadedFiles,
}

impl ServerRequest {
    /// An HTTP/1.1 request with no headers, an empty body and empty bags.
    pub fn new(method: Method, uri: Uri) -> Self {
        Self {
            method,
            uri,
            protocol_version: "1.1".to_string(),
            headers: Headers::new(),
            body: Stream::empty(),
            attributes: ParameterBag::new(),
            parsed_body: ParameterBag::new(),
            query_params: ParameterBag::new(),
            cookie_params: ParameterBag::new(),
            server_params: ServerBag::new(),
            uploaded_files: UploadedFiles::new(),
        }
    }

    pub fn with_protocol_version(mut self, version: impl Into<String>) -> Self {
        self.protocol_version = version.into();
        self
    }

    pub fn with_headers(mut self, headers: Headers) -> Self {
        self.headers = headers;
        self
    }

    pub fn with_header<I, V>(mut self, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.headers.set(name, values);
        self
    }

    pub fn with_added_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.append(name, value);
        self
    }

    pub fn without_header(mut self, name: &str) -> Self {
        self.headers.remove(name);
        self
    }

    pub fn with_body(mut self, body: Stream) -> Self {
        self.body = body;
        self
    }

    pub fn with_attributes(mut self, attributes: ParameterBag) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: serde_json::Value) -> Self {
        self.attributes.insert(name.into(), value);
        self
    }

    pub fn with_parsed_body(mut self, parsed_body: ParameterBag) -> Self {
        self.parsed_body = parsed_body;
        self
    }

    pub fn with_query_params(mut self, query_params: ParameterBag) -> Self {
        self.query_params = query_params;
        self
    }

    pub fn with_cookie_params(mut self, cookie_params: ParameterBag) -> Self {
        self.cookie_params = cookie_params;
        self
    }

    pub fn with_server_params(mut self, server_params: ServerBag) -> Self {
        self.server_params = server_params;
        self
    }

    pub fn with_uploaded_files(mut self, uploaded_files: UploadedFiles) -> Self {
        self.uploaded_files = uploaded_files;
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    pub fn protocol_version(&self) -> &str {
        &self.protocol_version
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn header(&self, name: &str) -> &[String] {
        self.headers.get(name)
    }

    pub fn header_line(&self, name: &str) -> String {
        self.headers.line(name)
    }

    pub fn body(&self) -> &Stream {
        &self.body
    }

    pub fn body_mut(&mut self) -> &mut Stream {
        &mut self.body
    }

    pub fn attributes(&self) -> &ParameterBag {
        &self.attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&serde_json::Value> {
        self.attributes.get(name)
    }

    pub fn parsed_body(&self) -> &ParameterBag {
        &self.parsed_body
    }

    pub fn query_params(&self) -> &ParameterBag {
        &self.query_params
    }

    pub fn cookie_params(&self) -> &ParameterBag {
        &self.cookie_params
    }

    pub fn server_params(&self) -> &ServerBag {
        &self.server_params
    }

    pub fn uploaded_files(&self) -> &UploadedFiles {
        &self.uploaded_files
    }
}

/// A response in the standard model.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    status: StatusCode,
    protocol_version: String,
    headers: Headers,
    body: Stream,
}

impl Response {
    /// An HTTP/1.1 response with no headers and an empty body.
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            protocol_version: "1.1".to_string(),
            headers: Headers::new(),
            body: Stream::empty(),
        }
    }

    pub fn with_protocol_version(mut self, version: impl Into<String>) -> Self {
        self.protocol_version = version.into();
        self
    }

    pub fn with_headers(mut self, headers: Headers) -> Self {
        self.headers = headers;
        self
    }

    pub fn with_header<I, V>(mut self, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.headers.set(name, values);
        self
    }

    pub fn with_added_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.append(name, value);
        self
    }

    pub fn without_header(mut self, name: &str) -> Self {
        self.headers.remove(name);
        self
    }

    pub fn with_body(mut self, body: Stream) -> Self {
        self.body = body;
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Canonical reason phrase for the status, or `""` for unregistered codes.
    pub fn reason_phrase(&self) -> &'static str {
        self.status.canonical_reason().unwrap_or("")
    }

    pub fn protocol_version(&self) -> &str {
        &self.protocol_version
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn header(&self, name: &str) -> &[String] {
        self.headers.get(name)
    }

    pub fn header_line(&self, name: &str) -> String {
        self.headers.line(name)
    }

    pub fn body(&self) -> &Stream {
        &self.body
    }

    pub fn body_mut(&mut self) -> &mut Stream {
        &mut self.body
    }
}

impl TryFrom<ServerRequest> for http::Request<Bytes> {
    type Error = BridgeError;

    fn try_from(req: ServerRequest) -> Result<Self, Self::Error> {
        let mut out = http::Request::new(req.body.to_bytes());
        *out.method_mut() = req.method;
        *out.uri_mut() = req.uri;
        *out.version_mut() = http_version(&req.protocol_version)?;
        *out.headers_mut() = header_map(&req.headers)?;
        Ok(out)
    }
}

impl TryFrom<Response> for http::Response<Bytes> {
    type Error = BridgeError;

    fn try_from(resp: Response) -> Result<Self, Self::Error> {
        let mut out = http::Response::new(resp.body.to_bytes());
        *out.status_mut() = resp.status;
        *out.version_mut() = http_version(&resp.protocol_version)?;
        *out.headers_mut() = header_map(&resp.headers)?;
        Ok(out)
    }
}

fn http_version(version: &str) -> Result<Version, BridgeError> {
    match version {
        "0.9" => Ok(Version::HTTP_09),
        "1.0" => Ok(Version::HTTP_10),
        "1.1" => Ok(Version::HTTP_11),
        "2" | "2.0" => Ok(Version::HTTP_2),
        "3" | "3.0" => Ok(Version::HTTP_3),
        other => Err(BridgeError::UnsupportedVersion(other.to_string())),
    }
}

fn header_map(headers: &Headers) -> Result<HeaderMap, BridgeError> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, values) in headers.iter() {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| BridgeError::InvalidHeader(name.to_string()))?;
        for value in values {
            let header_value = HeaderValue::from_str(value)
                .map_err(|_| BridgeError::InvalidHeader(format!("{name}: {value}")))?;
            map.append(header_name.clone(), header_value);
        }
    }
    Ok(map)
}
