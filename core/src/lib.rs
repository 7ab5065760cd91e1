//! Bidirectional adapter between the foundation and standard HTTP message
//! models.
//!
//! # Overview
//! The foundation model is the framework-native request/response: parameter
//! bags, a file bag, server variables, a header bag, a cookie list, and a
//! body that is buffered, file-backed, or written by a callback. The standard
//! model is a set of immutable request/response values with a seekable body
//! stream and uploaded-file value objects.
//!
//! [`MessageFactory`] converts foundation → standard and
//! [`FoundationFactory`] converts standard → foundation.
//!
//! # Design
//! - Both factories are stateless; they hold only a [`FactoryConfig`].
//! - Conversion borrows its input and returns freshly owned output with every
//!   body fully materialised, so outputs never alias the input.
//! - Header names keep their casing; lookups are case-insensitive.
//! - Streamed bodies are [`StreamWriter`]s that receive the sink to write
//!   into, so capturing a body needs no global output redirection and is
//!   safe to run concurrently.
//!
//! ```
//! use foundation_bridge::{FoundationRequest, HttpMessageFactory, MessageFactory};
//!
//! let mut request = FoundationRequest::new("OPTIONS", "/foo/bar");
//! request.server.insert("SERVER_PROTOCOL".into(), "HTTP/2.0".into());
//!
//! let converted = MessageFactory::new().create_request(&request).unwrap();
//! assert_eq!(converted.method(), "OPTIONS");
//! assert_eq!(converted.uri().to_string(), "/foo/bar");
//! assert_eq!(converted.protocol_version(), "2.0");
//! ```

pub mod config;
pub mod cookie;
pub mod error;
pub mod factory;
pub mod foundation;
pub mod foundation_factory;
pub mod headers;
pub mod message;
pub mod protocol;
pub mod stream;
pub mod upload;

pub use config::FactoryConfig;
pub use cookie::{Cookie, SameSite};
pub use error::BridgeError;
pub use factory::{HttpMessageFactory, MessageFactory, SET_COOKIE};
pub use foundation::{Content, FoundationRequest, FoundationResponse, ParameterBag, ResponseBody, ServerBag};
pub use foundation_factory::{FoundationFactory, HttpFoundationFactory};
pub use headers::Headers;
pub use message::{Response, ServerRequest};
pub use stream::{writer, Stream, StreamWriter};
pub use upload::{FileBag, FileSource, FileTree, UploadError, UploadedFile, UploadedFileDescriptor, UploadedFiles};
