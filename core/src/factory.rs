//! Foundation → standard conversion.
//!
//! # Design
//! `MessageFactory` holds only its configuration and carries no state
//! between calls. Each call borrows the foundation value, copies every field
//! into a freshly owned standard value, and materialises the body before
//! returning, so the result never observes later changes to the input.

use http::{Method, StatusCode, Uri};

use crate::config::FactoryConfig;
use crate::error::BridgeError;
use crate::foundation::{FoundationRequest, FoundationResponse, ResponseBody};
use crate::message::{Response, ServerRequest};
use crate::protocol::protocol_version;
use crate::stream::Stream;
use crate::upload::{map_files, UploadedFile, UploadedFileDescriptor};

/// Header that carries serialized response cookies.
pub const SET_COOKIE: &str = "Set-Cookie";

/// Builds standard messages from foundation messages.
pub trait HttpMessageFactory {
    fn create_request(&self, request: &FoundationRequest) -> Result<ServerRequest, BridgeError>;

    fn create_response(&self, response: &FoundationResponse) -> Result<Response, BridgeError>;
}

/// Stateless [`HttpMessageFactory`].
#[derive(Debug, Clone, Default)]
pub struct MessageFactory {
    config: FactoryConfig,
}

impl MessageFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: FactoryConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FactoryConfig {
        &self.config
    }
}

impl HttpMessageFactory for MessageFactory {
    fn create_request(&self, request: &FoundationRequest) -> Result<ServerRequest, BridgeError> {
        let method = Method::from_bytes(request.method.as_bytes())
            .map_err(|_| BridgeError::InvalidMethod(request.method.clone()))?;
        let uri: Uri = request
            .uri
            .parse()
            .map_err(|_| BridgeError::InvalidUri(request.uri.clone()))?;

        let body = Stream::from_reader(request.content.open()?)?;
        let uploaded_files = map_files(&request.files, upload_from_descriptor)?;
        let version = protocol_version(&request.server, &self.config.default_protocol_version);

        tracing::debug!(
            method = %method,
            uri = %uri,
            protocol_version = %version,
            body_len = body.len(),
            uploaded_files = uploaded_files.len(),
            "converted foundation request"
        );

        Ok(ServerRequest::new(method, uri)
            .with_protocol_version(version)
            .with_headers(request.headers.clone())
            .with_body(body)
            .with_attributes(request.attributes.clone())
            .with_parsed_body(request.request.clone())
            .with_query_params(request.query.clone())
            .with_cookie_params(request.cookies.clone())
            .with_server_params(request.server.clone())
            .with_uploaded_files(uploaded_files))
    }

    fn create_response(&self, response: &FoundationResponse) -> Result<Response, BridgeError> {
        let status = StatusCode::from_u16(response.status)
            .map_err(|_| BridgeError::InvalidStatus(response.status))?;

        let mut headers = response.headers.clone();
        for cookie in &response.cookies {
            let value = cookie.to_set_cookie();
            tracing::trace!(cookie = %cookie.name, "serialized response cookie");
            headers.append(SET_COOKIE, value);
        }

        let body = match &response.body {
            ResponseBody::Buffered(bytes) => Stream::new(bytes.clone()),
            ResponseBody::File(path) => Stream::from_path(path)?,
            ResponseBody::Streamed(writer) => Stream::capture(writer)?,
        };

        tracing::debug!(
            status = status.as_u16(),
            protocol_version = %response.protocol_version,
            cookies = response.cookies.len(),
            body_len = body.len(),
            "converted foundation response"
        );

        Ok(Response::new(status)
            .with_protocol_version(response.protocol_version.clone())
            .with_headers(headers)
            .with_body(body))
    }
}

/// Map one foundation upload descriptor to a standard uploaded file.
///
/// Slots without a successful upload stay in place as placeholders with no
/// content.
fn upload_from_descriptor(file: &UploadedFileDescriptor) -> Result<UploadedFile, BridgeError> {
    tracing::trace!(
        path = %file.path.display(),
        client_name = %file.client_original_name,
        error = file.error.code(),
        "converting uploaded file"
    );
    let uploaded = if file.error.is_ok() {
        UploadedFile::from_path(file.path.clone(), file.client_size)
    } else {
        UploadedFile::failed(file.error, file.client_size)
    };
    Ok(uploaded
        .with_client_filename(file.client_original_name.clone())
        .with_client_media_type(file.client_mime_type.clone()))
}
