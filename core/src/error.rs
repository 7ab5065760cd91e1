//! Error types for message conversion.
//!
//! # Design
//! Conversion is close to total: the only failures are I/O while
//! materialising a body, a writer that reports an error, and values the
//! target model refuses to represent (method, URI, status, header names).
//! A malformed `SERVER_PROTOCOL` is deliberately not an error.

use thiserror::Error;

use crate::upload::UploadError;

/// Errors returned by the factories and the value objects they build.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// Reading a file, a content handle, or running a body writer failed.
    #[error("I/O failure while materialising body: {0}")]
    Io(#[from] std::io::Error),

    /// The method is not a valid HTTP token.
    #[error("invalid method: {0}")]
    InvalidMethod(String),

    /// The URI could not be parsed into a structured URI.
    #[error("invalid uri: {0}")]
    InvalidUri(String),

    /// The status code is outside 100..=999.
    #[error("invalid status code: {0}")]
    InvalidStatus(u16),

    /// A header name or value cannot be represented by the `http` crate.
    #[error("invalid header: {0}")]
    InvalidHeader(String),

    /// A `Set-Cookie` value has no `name=value` pair.
    #[error("invalid cookie: {0}")]
    InvalidCookie(String),

    /// The protocol version has no `http::Version` counterpart.
    #[error("unsupported protocol version: {0}")]
    UnsupportedVersion(String),

    /// The uploaded file carries a non-`Ok` status and has no content.
    #[error("uploaded file is unavailable: {0}")]
    Upload(UploadError),
}
