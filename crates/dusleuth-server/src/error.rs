use thiserror::Error;

pub type Result<T> = std::result::Result<T, ServeError>;

/// Failures at the orchestrator/encoder boundary.
///
/// Walk failures never show up here: the walker absorbs them.
#[derive(Debug, Error)]
pub enum ServeError {
    #[error("failed to encode chart data: {0}")]
    Encoding(#[from] serde_json::Error),

    #[error("failed to write response: {0}")]
    TransportWrite(#[from] std::io::Error),

    #[error("background walk failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl ServeError {
    /// `true` when the client went away; nothing more can be sent.
    pub fn is_disconnect(&self) -> bool {
        matches!(self, Self::TransportWrite(_))
    }
}
