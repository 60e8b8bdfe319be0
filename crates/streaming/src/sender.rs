//! The producer half of an in-process transport pair.
//!
//! This stands in for the node-to-node transport a real deployment would
//! use; server-to-server networking is out of scope here, so it's a
//! `std::sync::mpsc` channel connecting a producer (the ring engine after a
//! mutation) to a consumer (the CLI's `describe`, or a test harness).

use std::sync::mpsc::Sender;

use crate::error::StreamingError;
use crate::protocol::Message;

pub struct StreamSender {
    tx: Sender<Message>,
}

impl StreamSender {
    pub(crate) fn new(tx: Sender<Message>) -> Self {
        Self { tx }
    }

    pub fn send(&self, message: Message) -> Result<(), StreamingError> {
        self.tx.send(message).map_err(|_| StreamingError::Disconnected)
    }
}
