//! Errors from encoding, decoding, or delivering a `Message`.

#[derive(Debug, thiserror::Error)]
pub enum StreamingError {
    #[error("failed to encode message: {0}")]
    Encode(String),
    #[error("failed to decode message: {0}")]
    Decode(String),
    #[error("receiver disconnected")]
    Disconnected,
}
