//! Device filesystem contracts used across kernel + adapters.

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use crate::kernel::path;

pub type Result<T> = std::result::Result<T, FsError>;

pub type FsFuture<T> = Pin<Box<dyn Future<Output = Result<T>> + Send + 'static>>;

#[derive(Debug)]
pub enum FsError {
    NotFound(String),
    AlreadyExists(String),
    NotAFile(String),
    NotADirectory(String),
    InvalidPath(String),
    Io(std::io::Error),
}

impl fmt::Display for FsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FsError::NotFound(path) => write!(f, "not found: {}", path),
            FsError::AlreadyExists(path) => write!(f, "already exists: {}", path),
            FsError::NotAFile(path) => write!(f, "not a file: {}", path),
            FsError::NotADirectory(path) => write!(f, "not a directory: {}", path),
            FsError::InvalidPath(path) => write!(f, "invalid path: {}", path),
            FsError::Io(e) => write!(f, "io error: {}", e),
        }
    }
}

impl std::error::Error for FsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FsError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for FsError {
    fn from(e: std::io::Error) -> Self {
        FsError::Io(e)
    }
}

/// Live handle to a file on the device. Not serializable on purpose: panels
/// refer to it through a `FileKey`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileHandle {
    full_path: String,
}

impl FileHandle {
    pub fn new(full_path: &str) -> Self {
        Self {
            full_path: path::normalize(full_path),
        }
    }

    pub fn full_path(&self) -> &str {
        &self.full_path
    }

    pub fn name(&self) -> &str {
        path::file_name(&self.full_path)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntryInfo {
    pub name: String,
    pub is_dir: bool,
}

/// Entry CRUD on the device filesystem. Every operation is asynchronous and
/// may fail; paths are device paths.
pub trait FileSystemGateway: Send + Sync {
    fn entry_exists(&self, path: &str) -> FsFuture<bool>;
    fn entry_rename(&self, from: &str, to: &str) -> FsFuture<()>;
    fn entry_copy(&self, from: &str, to: &str) -> FsFuture<()>;
    fn entry_remove(&self, path: &str) -> FsFuture<()>;
    /// Moves `from` into `to_dir`, returning the new device path.
    fn entry_move(&self, from: &str, to_dir: &str) -> FsFuture<String>;
    fn file_create(&self, path: &str) -> FsFuture<()>;
    fn folder_create(&self, path: &str) -> FsFuture<()>;
    fn file_read_text(&self, path: &str) -> FsFuture<String>;
    fn file_write_text(&self, path: &str, text: String) -> FsFuture<()>;
    fn folder_get_content(&self, path: &str) -> FsFuture<Vec<DirEntryInfo>>;
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/ports/file.rs"]
mod tests;
