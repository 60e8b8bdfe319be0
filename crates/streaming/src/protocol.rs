//! The wire envelope: either a migration plan produced by rebalancing, or a
//! ring snapshot for bootstrap/inspection.

use serde::{Deserialize, Serialize};

use corelib::MigrationPlan;

use crate::snapshot::RingSnapshot;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageType {
    MigrationPlan,
    RingSnapshot,
}

/// A tagged payload moving from producer to consumer over a `StreamSender`/
/// `StreamReceiver` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Message {
    Migration(MigrationPlan),
    Snapshot(RingSnapshot),
}

impl Message {
    pub fn message_type(&self) -> MessageType {
        match self {
            Message::Migration(_) => MessageType::MigrationPlan,
            Message::Snapshot(_) => MessageType::RingSnapshot,
        }
    }
}
