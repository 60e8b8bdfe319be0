//! `bincode` encode/decode for `Message`.

use crate::error::StreamingError;
use crate::protocol::Message;

pub fn encode(message: &Message) -> Result<Vec<u8>, StreamingError> {
    bincode::serialize(message).map_err(|e| StreamingError::Encode(e.to_string()))
}

pub fn decode(bytes: &[u8]) -> Result<Message, StreamingError> {
    bincode::deserialize(bytes).map_err(|e| StreamingError::Decode(e.to_string()))
}
