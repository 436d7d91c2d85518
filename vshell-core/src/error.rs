//! Error types for the virtual file system shell.

use thiserror::Error;

/// Errors that can occur while operating on an archive-backed VFS.
///
/// The first group are user errors: the shell reports them as command output
/// and keeps going. Everything else means the archive or its surroundings
/// could not be used and is propagated to the caller.
#[derive(Error, Debug)]
pub enum VshError {
    #[error("No such file: {0}")]
    NoSuchFile(String),

    #[error("No such directory: {0}")]
    NoSuchDirectory(String),

    #[error("Destination file already exists: {0}")]
    DestinationExists(String),

    #[error("Not a directory: {0}")]
    NotADirectory(String),

    #[error("Duplicate archive entry: {0}")]
    DuplicateEntry(String),

    #[error("Archive entry is both a file and a directory: {0}")]
    PathConflict(String),

    #[error("Not a text file: {0}")]
    NotText(String),

    #[error("Archive is closed")]
    ArchiveClosed,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl VshError {
    /// True for errors caused by the command's arguments rather than by the
    /// archive or the host file system.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            VshError::NoSuchFile(_)
                | VshError::NoSuchDirectory(_)
                | VshError::DestinationExists(_)
                | VshError::NotADirectory(_)
        )
    }
}

/// Result type for VFS shell operations.
pub type VshResult<T> = Result<T, VshError>;
