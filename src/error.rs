use arbor_codec::error::{DecodeError, EncodeError};

/// Failure of a facade conversion.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// The text is not a valid tree document.
    #[error("invalid tree document: {0}")]
    Document(#[from] serde_json::Error),
    #[error(transparent)]
    Encode(#[from] EncodeError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
}
