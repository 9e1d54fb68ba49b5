use thiserror::Error;

/// Failure while downloading an inbound attachment.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("transport error fetching {url}: {message}")]
    Transport { url: String, message: String },

    #[error("fetch of {url} returned HTTP {status}")]
    Status { url: String, status: u16 },
}

/// Failure while appending a record to a persistence sink.
#[derive(Debug, Error)]
pub enum SinkError {
    /// The sink could not be reached or authorized (credentials, lookup, token).
    #[error("sink {sink} unavailable: {message}")]
    Unavailable { sink: String, message: String },

    /// The backend answered but refused the row.
    #[error("sink {sink} rejected row: {message}")]
    Rejected { sink: String, message: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
