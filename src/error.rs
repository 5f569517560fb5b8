use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to parse email: {0}")]
    Parse(String),

    #[error("input contains no problem text")]
    EmptyInput,

    #[error("invalid date '{0}': expected YYYY-MM-DD format")]
    InvalidDate(String),

    #[error("problem directory already exists: {}", .0.display())]
    WorkspaceExists(PathBuf),

    #[error("corrupted tracking file {}: {source}", .path.display())]
    Tracking {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
