/// Errors raised while listing a directory.
///
/// These never escape [`Walker::walk`](crate::walker::Walker::walk): the
/// walker logs them and degrades the affected subtree to an empty report.
/// They are public so custom [`DirReader`](crate::walker::DirReader)
/// implementations can produce them.
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WalkError {
    #[error("failed to open {}: {source}", .path.display())]
    DirectoryOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to list {}: {source}", .path.display())]
    DirectoryList {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl WalkError {
    /// The directory this error occurred at.
    pub fn path(&self) -> &PathBuf {
        match self {
            Self::DirectoryOpen { path, .. } | Self::DirectoryList { path, .. } => path,
        }
    }
}
