//! The consumer half of an in-process transport pair.

use std::sync::mpsc::{self, Receiver};

use crate::error::StreamingError;
use crate::protocol::Message;
use crate::sender::StreamSender;

pub struct StreamReceiver {
    rx: Receiver<Message>,
}

impl StreamReceiver {
    /// Opens a connected sender/receiver pair sharing an unbounded
    /// in-process channel.
    pub fn channel() -> (StreamSender, StreamReceiver) {
        let (tx, rx) = mpsc::channel();
        (StreamSender::new(tx), StreamReceiver { rx })
    }

    /// Blocks for the next message until the sender is dropped.
    pub fn recv(&self) -> Result<Message, StreamingError> {
        self.rx.recv().map_err(|_| StreamingError::Disconnected)
    }

    pub fn try_recv(&self) -> Result<Option<Message>, StreamingError> {
        match self.rx.try_recv() {
            Ok(message) => Ok(Some(message)),
            Err(mpsc::TryRecvError::Empty) => Ok(None),
            Err(mpsc::TryRecvError::Disconnected) => Err(StreamingError::Disconnected),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::RingSnapshot;

    #[test]
    fn delivers_messages_in_order() {
        let (tx, rx) = StreamReceiver::channel();
        let snapshot = RingSnapshot { size: 32, nodes: Vec::new() };
        tx.send(Message::Snapshot(snapshot.clone())).unwrap();

        let received = rx.recv().unwrap();
        assert_eq!(received, Message::Snapshot(snapshot));
    }

    #[test]
    fn try_recv_is_empty_without_a_send() {
        let (_tx, rx) = StreamReceiver::channel();
        assert_eq!(rx.try_recv().unwrap(), None);
    }

    #[test]
    fn recv_fails_once_sender_is_dropped() {
        let (tx, rx) = StreamReceiver::channel();
        drop(tx);
        assert!(rx.recv().is_err());
    }
}
