use std::collections::TryReserveError;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum PathListError {
    #[error("Map error: {path}: {source}")]
    Map {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Remap error: {path}: {source}")]
    Remap {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unmap error: {path}: {source}")]
    Unmap {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Allocation error: {0}")]
    Alloc(#[from] TryReserveError),

    #[error("Path list not open: {0}")]
    NotOpen(PathBuf),

    #[error("Path list already lexed: {0}")]
    AlreadyLexed(PathBuf),
}

pub type Result<T> = std::result::Result<T, PathListError>;
