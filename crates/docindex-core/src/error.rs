//! Error taxonomy shared by the core and the I/O layers built on it.

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    #[error("Path is not a file: {}", .0.display())]
    NotAFile(PathBuf),

    #[error("Path is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    /// A required argument was empty or malformed.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unsupported file extension: {0}")]
    UnsupportedFormat(String),

    /// A reader recognized the format but could not extract text.
    #[error("Failed to extract text from {}: {message}", .path.display())]
    Extract { path: PathBuf, message: String },

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
