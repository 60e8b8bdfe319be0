//! Errors raised by the replication layer itself, distinct from
//! `corelib::Error`. This crate never mutates ring state, so its only
//! failure mode is being asked about a key the ring can't answer for.

#[derive(Debug, Clone, thiserror::Error)]
pub enum ReplicationError {
    #[error("ring has no nodes, cannot place key")]
    EmptyRing,
}
