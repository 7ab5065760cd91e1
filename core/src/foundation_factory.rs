//! Standard → foundation conversion.
//!
//! # Design
//! The reverse direction rebuilds what the framework expects to find: server
//! variables derived from the URI and method, uploaded files as real files
//! on disk, and cookies split back out of `Set-Cookie`. The input request is
//! never modified; uploaded files are copied, not moved.

use std::io::Write;
use std::path::PathBuf;

use bytes::Bytes;
use uuid::Uuid;

use crate::config::FactoryConfig;
use crate::cookie::Cookie;
use crate::error::BridgeError;
use crate::factory::SET_COOKIE;
use crate::foundation::{Content, FoundationRequest, FoundationResponse, ResponseBody, ServerBag};
use crate::message::{Response, ServerRequest};
use crate::protocol::SERVER_PROTOCOL;
use crate::stream::writer;
use crate::upload::{map_files, UploadedFile, UploadedFileDescriptor};

/// Builds foundation messages from standard messages.
pub trait HttpFoundationFactory {
    fn create_request(&self, request: &ServerRequest) -> Result<FoundationRequest, BridgeError>;

    fn create_response(&self, response: &Response) -> Result<FoundationResponse, BridgeError>;
}

/// Stateless [`HttpFoundationFactory`].
#[derive(Debug, Clone, Default)]
pub struct FoundationFactory {
    config: FactoryConfig,
}

impl FoundationFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: FactoryConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FactoryConfig {
        &self.config
    }

    /// Write an uploaded file into the upload directory under a fresh name.
    fn store_upload(&self, file: &UploadedFile) -> Result<UploadedFileDescriptor, BridgeError> {
        let path = if file.error().is_ok() {
            let target = self.config.upload_dir().join(format!("upload-{}", Uuid::new_v4()));
            let written = file.copy_to(&target)?;
            tracing::trace!(path = %target.display(), bytes = written, "stored uploaded file");
            target
        } else {
            PathBuf::new()
        };

        Ok(UploadedFileDescriptor {
            path,
            client_original_name: file.client_filename().unwrap_or_default().to_string(),
            client_mime_type: file.client_media_type().unwrap_or_default().to_string(),
            client_size: file.size(),
            error: file.error(),
        })
    }
}

impl HttpFoundationFactory for FoundationFactory {
    fn create_request(&self, request: &ServerRequest) -> Result<FoundationRequest, BridgeError> {
        let uri = request.uri();

        let mut server = ServerBag::new();
        if let Some(host) = uri.host() {
            server.insert("SERVER_NAME".into(), host.to_string());
        }
        if let Some(port) = uri.port_u16() {
            server.insert("SERVER_PORT".into(), port.to_string());
        }
        server.insert("REQUEST_URI".into(), uri.path().to_string());
        server.insert("QUERY_STRING".into(), uri.query().unwrap_or_default().to_string());
        server.insert("REQUEST_METHOD".into(), request.method().to_string());
        for (name, value) in request.server_params() {
            server.insert(name.clone(), value.clone());
        }
        server
            .entry(SERVER_PROTOCOL.to_string())
            .or_insert_with(|| format!("HTTP/{}", request.protocol_version()));

        let files = map_files(request.uploaded_files(), |file| self.store_upload(file))?;
        let content = Content::Bytes(request.body().to_bytes());

        tracing::debug!(
            method = %request.method(),
            uri = %uri,
            content_len = request.body().len(),
            files = files.len(),
            "converted standard request"
        );

        Ok(FoundationRequest {
            method: request.method().to_string(),
            uri: uri.to_string(),
            attributes: request.attributes().clone(),
            request: request.parsed_body().clone(),
            query: request.query_params().clone(),
            cookies: request.cookie_params().clone(),
            files,
            server,
            headers: request.headers().clone(),
            content,
        })
    }

    fn create_response(&self, response: &Response) -> Result<FoundationResponse, BridgeError> {
        let mut headers = response.headers().clone();
        let cookies = headers
            .remove(SET_COOKIE)
            .unwrap_or_default()
            .iter()
            .map(|value| Cookie::parse(value))
            .collect::<Result<Vec<_>, _>>()?;

        let bytes: Bytes = response.body().to_bytes();
        let body = if self.config.streamed_responses {
            ResponseBody::Streamed(writer(move |out| out.write_all(&bytes)))
        } else {
            ResponseBody::Buffered(bytes)
        };

        tracing::debug!(
            status = response.status().as_u16(),
            cookies = cookies.len(),
            streamed = self.config.streamed_responses,
            "converted standard response"
        );

        Ok(FoundationResponse {
            status: response.status().as_u16(),
            headers,
            cookies,
            protocol_version: response.protocol_version().to_string(),
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use http::{Method, StatusCode, Uri};
    use serde_json::json;

    use super::*;
    use crate::cookie::SameSite;
    use crate::stream::Stream;
    use crate::upload::{FileTree, UploadError, UploadedFiles};

    #[test]
    fn server_bag_is_seeded_from_uri_and_method() {
        let req = ServerRequest::new(Method::POST, Uri::from_static("http://example.com:8080/a/b?c=d"))
            .with_protocol_version("2.0");
        let out = FoundationFactory::new().create_request(&req).unwrap();

        assert_eq!(out.method, "POST");
        assert_eq!(out.uri, "http://example.com:8080/a/b?c=d");
        assert_eq!(out.server["SERVER_NAME"], "example.com");
        assert_eq!(out.server["SERVER_PORT"], "8080");
        assert_eq!(out.server["REQUEST_URI"], "/a/b");
        assert_eq!(out.server["QUERY_STRING"], "c=d");
        assert_eq!(out.server["REQUEST_METHOD"], "POST");
        assert_eq!(out.server[SERVER_PROTOCOL], "HTTP/2.0");
    }

    #[test]
    fn explicit_server_params_win() {
        let mut params = ServerBag::new();
        params.insert("REQUEST_METHOD".into(), "GET".into());
        params.insert(SERVER_PROTOCOL.into(), "HTTP/1.0".into());
        let req = ServerRequest::new(Method::POST, Uri::from_static("/")).with_server_params(params);

        let out = FoundationFactory::new().create_request(&req).unwrap();
        assert_eq!(out.server["REQUEST_METHOD"], "GET");
        assert_eq!(out.server[SERVER_PROTOCOL], "HTTP/1.0");
        assert!(!out.server.contains_key("SERVER_NAME"));
    }

    #[test]
    fn bags_headers_and_full_content_are_copied() {
        let mut req = ServerRequest::new(Method::PUT, Uri::from_static("/x"))
            .with_attribute("id", json!(7))
            .with_header("X-Case", ["Kept"])
            .with_body(Stream::new("whole body"));
        req.body_mut().contents();

        let out = FoundationFactory::new().create_request(&req).unwrap();
        assert_eq!(out.attributes["id"], json!(7));
        assert_eq!(out.headers.iter().next().map(|(k, _)| k), Some("X-Case"));
        assert_eq!(out.content, Content::Bytes(Bytes::from_static(b"whole body")));
    }

    #[test]
    fn failed_uploads_get_an_empty_path() {
        let mut files = UploadedFiles::new();
        files.insert(
            "doc".into(),
            FileTree::Leaf(UploadedFile::failed(UploadError::Partial, Some(3)).with_client_filename("d.pdf")),
        );
        let req = ServerRequest::new(Method::POST, Uri::from_static("/")).with_uploaded_files(files);

        let out = FoundationFactory::new().create_request(&req).unwrap();
        let doc = out.files["doc"].as_leaf().unwrap();
        assert_eq!(doc.path, PathBuf::new());
        assert_eq!(doc.error, UploadError::Partial);
        assert_eq!(doc.client_original_name, "d.pdf");
        assert_eq!(doc.client_size, Some(3));
    }

    #[test]
    fn set_cookie_moves_into_cookies() {
        let resp = Response::new(StatusCode::OK)
            .with_header("Content-Type", ["text/plain"])
            .with_added_header("Set-Cookie", "a=1; path=/")
            .with_added_header("Set-Cookie", "b=2; samesite=strict")
            .with_body(Stream::new("ok"));

        let out = FoundationFactory::new().create_response(&resp).unwrap();
        assert_eq!(out.status, 200);
        assert!(!out.headers.contains("set-cookie"));
        assert_eq!(out.headers.first("Content-Type"), Some("text/plain"));
        assert_eq!(
            out.cookies,
            vec![
                Cookie::new("a", "1").with_path("/"),
                Cookie::new("b", "2").with_same_site(SameSite::Strict),
            ]
        );
        assert!(matches!(out.body, ResponseBody::Buffered(ref b) if b == "ok"));
    }

    #[test]
    fn malformed_set_cookie_is_an_error() {
        let resp = Response::new(StatusCode::OK).with_added_header("Set-Cookie", "garbage");
        assert!(matches!(
            FoundationFactory::new().create_response(&resp),
            Err(BridgeError::InvalidCookie(_))
        ));
    }

    #[test]
    fn streamed_responses_write_the_body() {
        let config = FactoryConfig {
            streamed_responses: true,
            ..FactoryConfig::default()
        };
        let resp = Response::new(StatusCode::ACCEPTED).with_body(Stream::new("later"));
        let out = FoundationFactory::with_config(config).create_response(&resp).unwrap();

        let ResponseBody::Streamed(w) = &out.body else {
            panic!("expected a streamed body, got {:?}", out.body);
        };
        let mut captured = Stream::capture(w).unwrap();
        assert_eq!(captured.contents(), "later");
        assert_eq!(out.status, 202);
    }
}
