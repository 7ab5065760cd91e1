//! End-to-end conversions in both directions with real files on disk.
//!
//! # Design
//! Uploaded files and file-backed bodies are written to a `tempfile`
//! directory, converted, and read back through the converted value objects.
//! The reverse factory is pointed at its own temporary upload directory.

use std::io::Write;

use foundation_bridge::{
    writer, Content, FactoryConfig, FileTree, FoundationFactory, FoundationRequest, FoundationResponse,
    HttpFoundationFactory, HttpMessageFactory, MessageFactory, ResponseBody, UploadError, UploadedFileDescriptor,
};
use http::{Method, StatusCode};
use indexmap::IndexMap;
use serde_json::json;

fn descriptor(path: &std::path::Path, name: &str, size: u64, mime: &str) -> UploadedFileDescriptor {
    UploadedFileDescriptor {
        path: path.to_path_buf(),
        client_original_name: name.to_string(),
        client_mime_type: mime.to_string(),
        client_size: Some(size),
        error: UploadError::Ok,
    }
}

#[test]
fn uploaded_file_metadata_and_content_survive_conversion() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("upload.tmp");
    std::fs::write(&path, b"uploaded file contents").unwrap();

    let mut request = FoundationRequest::new("GET", "/");
    request.files.insert("0".into(), FileTree::Leaf(descriptor(&path, "foo.test", 10, "type")));
    request.content = Content::from("test");

    let converted = MessageFactory::new().create_request(&request).unwrap();
    let files = converted.uploaded_files();
    assert_eq!(files.len(), 1);

    let file = files["0"].as_leaf().unwrap();
    assert_eq!(file.size(), Some(10));
    assert_eq!(file.client_filename(), Some("foo.test"));
    assert_eq!(file.client_media_type(), Some("type"));
    assert_eq!(file.error(), UploadError::Ok);
    assert_eq!(file.stream().unwrap().contents(), "uploaded file contents");
}

#[test]
fn nested_upload_fields_keep_their_shape() {
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("a.tmp");
    let second = dir.path().join("b.tmp");
    std::fs::write(&first, b"first").unwrap();
    std::fs::write(&second, b"second").unwrap();

    let mut docs = IndexMap::new();
    docs.insert("0".to_string(), FileTree::Leaf(descriptor(&first, "a.txt", 5, "text/plain")));
    docs.insert("1".to_string(), FileTree::Leaf(UploadedFileDescriptor::empty_slot()));
    docs.insert("2".to_string(), FileTree::Leaf(descriptor(&second, "b.txt", 6, "text/plain")));

    let mut request = FoundationRequest::new("POST", "/docs");
    request.files.insert("docs".into(), FileTree::Nested(docs));

    let converted = MessageFactory::new().create_request(&request).unwrap();
    let FileTree::Nested(docs) = &converted.uploaded_files()["docs"] else {
        panic!("expected nested docs field");
    };
    let keys: Vec<&str> = docs.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["0", "1", "2"]);
    assert_eq!(docs["0"].as_leaf().unwrap().stream().unwrap().contents(), "first");
    assert_eq!(docs["1"].as_leaf().unwrap().error(), UploadError::NoFile);
    assert_eq!(docs["2"].as_leaf().unwrap().stream().unwrap().contents(), "second");
}

#[test]
fn file_backed_request_content_is_read_in_full() {
    let mut spool = tempfile::NamedTempFile::new().unwrap();
    spool.write_all(b"spooled request body").unwrap();

    let mut request = FoundationRequest::new("PUT", "/blob");
    request.content = Content::File(spool.path().to_path_buf());

    let mut converted = MessageFactory::new().create_request(&request).unwrap();
    assert_eq!(converted.body_mut().contents(), "spooled request body");
}

#[test]
fn binary_file_response_is_materialised() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    let payload: Vec<u8> = (0u8..=255).cycle().take(70_000).collect();
    file.write_all(&payload).unwrap();

    let response = FoundationResponse::new(200, ResponseBody::File(file.path().to_path_buf()));
    let mut converted = MessageFactory::new().create_response(&response).unwrap();

    drop(file);
    assert_eq!(converted.status(), StatusCode::OK);
    assert!(converted.headers().is_empty());
    assert_eq!(converted.protocol_version(), "1.1");
    assert_eq!(converted.body_mut().contents(), payload.as_slice());
}

#[test]
fn request_round_trips_through_both_factories() {
    let source_dir = tempfile::tempdir().unwrap();
    let upload_dir = tempfile::tempdir().unwrap();
    let path = source_dir.path().join("avatar.tmp");
    std::fs::write(&path, b"\x89PNG...").unwrap();

    let mut original = FoundationRequest::new("POST", "/profile?tab=1");
    original.attributes.insert("_route".into(), json!("profile"));
    original.request.insert("name".into(), json!("Ada"));
    original.query.insert("tab".into(), json!("1"));
    original.cookies.insert("session".into(), json!("abc"));
    original.server.insert("SERVER_PROTOCOL".into(), "HTTP/1.0".into());
    original.headers.set("X-Requested-With", ["XMLHttpRequest"]);
    original.files.insert("avatar".into(), FileTree::Leaf(descriptor(&path, "me.png", 7, "image/png")));
    original.content = Content::from("name=Ada");

    let standard = MessageFactory::new().create_request(&original).unwrap();
    assert_eq!(standard.protocol_version(), "1.0");

    let config = FactoryConfig {
        upload_dir: Some(upload_dir.path().to_path_buf()),
        ..FactoryConfig::default()
    };
    let back = FoundationFactory::with_config(config).create_request(&standard).unwrap();

    assert_eq!(back.method, "POST");
    assert_eq!(back.uri, "/profile?tab=1");
    assert_eq!(back.attributes, original.attributes);
    assert_eq!(back.request, original.request);
    assert_eq!(back.query, original.query);
    assert_eq!(back.cookies, original.cookies);
    assert_eq!(back.headers, original.headers);
    assert_eq!(back.content, original.content);
    assert_eq!(back.server["SERVER_PROTOCOL"], "HTTP/1.0");
    assert_eq!(back.server["REQUEST_URI"], "/profile");
    assert_eq!(back.server["QUERY_STRING"], "tab=1");

    let avatar = back.files["avatar"].as_leaf().unwrap();
    assert!(avatar.path.starts_with(upload_dir.path()));
    assert_ne!(avatar.path, path);
    assert_eq!(avatar.client_original_name, "me.png");
    assert_eq!(avatar.client_mime_type, "image/png");
    assert_eq!(avatar.client_size, Some(7));
    assert_eq!(std::fs::read(&avatar.path).unwrap(), b"\x89PNG...");
    assert!(path.exists(), "source upload must be left in place");
}

#[test]
fn response_round_trips_through_both_factories() {
    let mut original = FoundationResponse::new(
        404,
        ResponseBody::Streamed(writer(|out| {
            out.write_all(b"not ")?;
            out.write_all(b"found")
        })),
    );
    original.headers.set("Content-Type", ["text/plain"]);
    original.set_cookie(foundation_bridge::Cookie::new("foo", "bar").with_path("/"));

    let standard = MessageFactory::new().create_response(&original).unwrap();
    assert_eq!(standard.status(), StatusCode::NOT_FOUND);
    assert_eq!(standard.header_line("set-cookie"), "foo=bar; path=/");

    let back = FoundationFactory::new().create_response(&standard).unwrap();
    assert_eq!(back.status, 404);
    assert_eq!(back.cookies, original.cookies);
    assert_eq!(back.headers, original.headers);
    assert!(matches!(back.body, ResponseBody::Buffered(ref b) if b == "not found"));
}

#[test]
fn standard_values_hand_off_to_http_types() {
    let mut request = FoundationRequest::new("DELETE", "/items/9");
    request.headers.set("Accept", ["application/json"]);
    let standard = MessageFactory::new().create_request(&request).unwrap();

    let http_request = http::Request::<bytes::Bytes>::try_from(standard).unwrap();
    assert_eq!(http_request.method(), &Method::DELETE);
    assert_eq!(http_request.headers()["accept"], "application/json");
}
