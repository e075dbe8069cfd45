/// Errors from search index operations.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    /// The engine could not be reached or the request did not complete.
    #[error("transport error: {0}")]
    Transport(String),

    /// The engine answered with a non-success status.
    #[error("{operation} failed with status {status}: {body}")]
    Status {
        operation: &'static str,
        status: u16,
        body: String,
    },

    /// A request or response body could not be (de)serialized.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// The client could not be built from its configuration.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result alias for index operations.
pub type IndexResult<T> = Result<T, IndexError>;
