/// Shared error type used across all ThreadRelay crates.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("invalid request: {0}")]
    Validation(String),

    #[error("chat record not found: {0}")]
    ThreadNotFound(String),

    #[error("completion service: {0}")]
    Completion(String),

    #[error("record store: {0}")]
    RecordStore(String),

    #[error("render: {0}")]
    Render(String),

    #[error("config: {0}")]
    Config(String),
}

impl Error {
    /// `true` for errors the caller can fix (surfaced as HTTP 400);
    /// everything else is a server-side failure (HTTP 500).
    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::Validation(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
