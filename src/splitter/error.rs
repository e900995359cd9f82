use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SplitError {
    #[error("No {marker} found in {}. Run from your project root or pass --root.", .root.display())]
    RootInvalid { root: PathBuf, marker: String },

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SplitError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SplitError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type SplitResult<T> = Result<T, SplitError>;
