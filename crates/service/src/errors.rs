use thiserror::Error;

/// Failures of the underlying medium: filesystem, serializer or network.
#[derive(Debug, Error)]
pub enum InternalError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("search index responded with status {status}: {body}")]
    Remote { status: u16, body: String },
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),
}

/// Error kinds shared by every storage backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("contact \"{0}\" not found")]
    NotFound(String),
    #[error("contact \"{0}\" already exists")]
    AlreadyExists(String),
    #[error("contact \"{0}\" is already in favorites")]
    AlreadyFavorite(String),
    #[error("contact \"{0}\" is not in favorites already")]
    AlreadyNotFavorite(String),
    #[error("wrong action \"{0}\", please use action=add|remove")]
    WrongActionFormat(String),
    #[error("wrong filter field \"{0}\", please use field=name|phone")]
    FilterWrongFormat(String),
    #[error(transparent)]
    Internal(#[from] InternalError),
}

impl StoreError {
    pub fn is_internal(&self) -> bool {
        matches!(self, StoreError::Internal(_))
    }
}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        StoreError::Internal(InternalError::Io(e))
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Internal(InternalError::Json(e))
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(e: reqwest::Error) -> Self {
        StoreError::Internal(InternalError::Http(e))
    }
}
