use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RotamailError {
    #[error("config error: {0}")]
    Config(String),

    #[error("rotation list is empty: {}", .0.display())]
    StoreEmpty(PathBuf),

    #[error("invalid entry '{entry}' in {}: must be a bare identifier", path.display())]
    InvalidEntry { path: PathBuf, entry: String },

    #[error("rotation list is locked by another invocation: {}", .0.display())]
    StoreLocked(PathBuf),

    #[error("i/o error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("environment variable {0} is not set")]
    MissingSecret(String),

    #[error("delivery failed: {0}")]
    Delivery(String),
}

impl RotamailError {
    /// Adapter for `map_err` that tags an I/O failure with the path involved.
    pub fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| RotamailError::Io { path, source }
    }
}

pub type Result<T> = std::result::Result<T, RotamailError>;
