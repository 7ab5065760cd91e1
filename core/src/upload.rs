//! Uploaded files in both models.
//!
//! # Design
//! Form fields can nest (`files[docs][0]`), so both models keep uploads in a
//! [`FileTree`] keyed by field name. The foundation side describes a file by
//! its temporary path; the standard side exposes a value object whose stream
//! is read on demand from that path (or from memory when built directly).
//!
//! The upload status code, not an empty name or size, decides whether a slot
//! holds a file.

use std::fmt;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use indexmap::IndexMap;

use crate::error::BridgeError;
use crate::stream::Stream;

/// Upload status codes as reported by the server that received the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UploadError {
    Ok = 0,
    IniSize = 1,
    FormSize = 2,
    Partial = 3,
    NoFile = 4,
    NoTmpDir = 6,
    CantWrite = 7,
    Extension = 8,
}

impl UploadError {
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(UploadError::Ok),
            1 => Some(UploadError::IniSize),
            2 => Some(UploadError::FormSize),
            3 => Some(UploadError::Partial),
            4 => Some(UploadError::NoFile),
            6 => Some(UploadError::NoTmpDir),
            7 => Some(UploadError::CantWrite),
            8 => Some(UploadError::Extension),
            _ => None,
        }
    }

    pub fn is_ok(self) -> bool {
        self == UploadError::Ok
    }
}

impl fmt::Display for UploadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            UploadError::Ok => "the file was uploaded",
            UploadError::IniSize => "the file exceeds the server size limit",
            UploadError::FormSize => "the file exceeds the form size limit",
            UploadError::Partial => "the file was only partially uploaded",
            UploadError::NoFile => "no file was uploaded",
            UploadError::NoTmpDir => "missing temporary directory",
            UploadError::CantWrite => "failed to write file to disk",
            UploadError::Extension => "an extension stopped the upload",
        };
        f.write_str(msg)
    }
}

/// A leaf file or a nested group of fields.
#[derive(Debug, Clone, PartialEq)]
pub enum FileTree<T> {
    Leaf(T),
    Nested(IndexMap<String, FileTree<T>>),
}

impl<T> FileTree<T> {
    /// Map every leaf, keeping the shape and key order of the tree.
    pub fn try_map<U, E>(&self, f: &mut impl FnMut(&T) -> Result<U, E>) -> Result<FileTree<U>, E> {
        match self {
            FileTree::Leaf(file) => Ok(FileTree::Leaf(f(file)?)),
            FileTree::Nested(children) => {
                let mut mapped = IndexMap::with_capacity(children.len());
                for (key, child) in children {
                    mapped.insert(key.clone(), child.try_map(&mut *f)?);
                }
                Ok(FileTree::Nested(mapped))
            }
        }
    }

    pub fn as_leaf(&self) -> Option<&T> {
        match self {
            FileTree::Leaf(file) => Some(file),
            FileTree::Nested(_) => None,
        }
    }

    /// Leaves in depth-first order.
    pub fn leaves(&self) -> Vec<&T> {
        match self {
            FileTree::Leaf(file) => vec![file],
            FileTree::Nested(children) => children.values().flat_map(|c| c.leaves()).collect(),
        }
    }
}

/// Map every entry of a keyed forest of file trees.
pub(crate) fn map_files<T, U, E>(
    files: &IndexMap<String, FileTree<T>>,
    mut f: impl FnMut(&T) -> Result<U, E>,
) -> Result<IndexMap<String, FileTree<U>>, E> {
    let mut mapped = IndexMap::with_capacity(files.len());
    for (key, tree) in files {
        mapped.insert(key.clone(), tree.try_map(&mut f)?);
    }
    Ok(mapped)
}

/// Foundation-side description of one submitted file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFileDescriptor {
    /// Temporary location of the file; empty when nothing was uploaded.
    pub path: PathBuf,
    pub client_original_name: String,
    pub client_mime_type: String,
    pub client_size: Option<u64>,
    pub error: UploadError,
}

impl UploadedFileDescriptor {
    /// An unfilled optional upload slot.
    pub fn empty_slot() -> Self {
        Self {
            path: PathBuf::new(),
            client_original_name: String::new(),
            client_mime_type: String::new(),
            client_size: None,
            error: UploadError::NoFile,
        }
    }
}

/// Where the bytes of a standard uploaded file come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileSource {
    Path(PathBuf),
    Memory(Bytes),
}

/// Standard-side uploaded file value object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    source: Option<FileSource>,
    size: Option<u64>,
    error: UploadError,
    client_filename: Option<String>,
    client_media_type: Option<String>,
}

impl UploadedFile {
    /// A successfully uploaded file stored at `path`.
    pub fn from_path(path: impl Into<PathBuf>, size: Option<u64>) -> Self {
        Self {
            source: Some(FileSource::Path(path.into())),
            size,
            error: UploadError::Ok,
            client_filename: None,
            client_media_type: None,
        }
    }

    /// A successfully uploaded file held in memory.
    pub fn from_bytes(bytes: impl Into<Bytes>) -> Self {
        let bytes = bytes.into();
        Self {
            size: Some(bytes.len() as u64),
            source: Some(FileSource::Memory(bytes)),
            error: UploadError::Ok,
            client_filename: None,
            client_media_type: None,
        }
    }

    /// A slot whose upload did not succeed. It carries no content.
    pub fn failed(error: UploadError, size: Option<u64>) -> Self {
        Self {
            source: None,
            size,
            error,
            client_filename: None,
            client_media_type: None,
        }
    }

    pub fn with_client_filename(mut self, name: impl Into<String>) -> Self {
        self.client_filename = Some(name.into());
        self
    }

    pub fn with_client_media_type(mut self, media_type: impl Into<String>) -> Self {
        self.client_media_type = Some(media_type.into());
        self
    }

    pub fn size(&self) -> Option<u64> {
        self.size
    }

    pub fn error(&self) -> UploadError {
        self.error
    }

    pub fn client_filename(&self) -> Option<&str> {
        self.client_filename.as_deref()
    }

    pub fn client_media_type(&self) -> Option<&str> {
        self.client_media_type.as_deref()
    }

    pub fn source(&self) -> Option<&FileSource> {
        self.source.as_ref()
    }

    /// Open a fresh stream over the file's bytes.
    pub fn stream(&self) -> Result<Stream, BridgeError> {
        match &self.source {
            Some(FileSource::Path(path)) => Ok(Stream::from_path(path)?),
            Some(FileSource::Memory(bytes)) => Ok(Stream::new(bytes.clone())),
            None => Err(BridgeError::Upload(self.error)),
        }
    }

    /// Copy the file's bytes to `target`, returning how many were written.
    pub fn copy_to(&self, target: &Path) -> Result<u64, BridgeError> {
        match &self.source {
            Some(FileSource::Path(path)) => Ok(std::fs::copy(path, target)?),
            Some(FileSource::Memory(bytes)) => {
                std::fs::write(target, bytes)?;
                Ok(bytes.len() as u64)
            }
            None => Err(BridgeError::Upload(self.error)),
        }
    }
}

/// Foundation file bag.
pub type FileBag = IndexMap<String, FileTree<UploadedFileDescriptor>>;

/// Standard uploaded-file tree.
pub type UploadedFiles = IndexMap<String, FileTree<UploadedFile>>;
