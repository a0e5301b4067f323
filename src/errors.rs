use std::path::PathBuf;
use thiserror::Error;

/// The primary error type for all operations in `cdnshift`.
///
/// Every failure is terminal for the run it occurs in; nothing here is retried.
#[derive(Error, Debug)]
pub enum Error {
    /// The root argument does not name a directory.
    #[error("readable_dir:{} is not a valid path", .path.display())]
    InvalidPath { path: PathBuf },

    /// A read, backup or write failure on a single file.
    #[error("File processing failed for {}: {source}", .path.display())]
    FileIo {
        path: PathBuf,
        source: std::io::Error,
    },

    /// An error related to file system I/O outside of a specific input file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// An error that occurred during regex compilation.
    #[error("Pattern compilation failed: {0}")]
    Regex(#[from] regex::Error),

    /// An error that occurred while parsing a YAML configuration file.
    #[error("Config parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A general configuration-related error.
    #[error("Config error: {0}")]
    Config(String),

    /// An error from the `ignore` crate, which is used for directory traversal.
    #[error("Walk error: {0}")]
    Walk(#[from] ignore::Error),
}

impl Error {
    /// Wraps an I/O error with the path of the file being processed.
    pub fn file_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::FileIo {
            path: path.into(),
            source,
        }
    }
}

/// A convenient type alias for `Result<T, cdnshift::errors::Error>`.
pub type Result<T> = std::result::Result<T, Error>;

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Config(s)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Config(s.to_string())
    }
}
