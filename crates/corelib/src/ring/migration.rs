//! The record of what a rebalancing operation actually did.
//!
//! `add_node`/`remove_node` return one of these alongside success, so
//! callers and tests can assert on which keys moved where instead of only
//! on invariants holding afterward. Consumed for serialization by the
//! `streaming` crate.

use serde::{Deserialize, Serialize};

/// Which migration case a transfer belongs to. `Mirror` is the `M = 2`
/// full-copy join case, kept distinct from the lettered migrations since it
/// copies rather than splits an existing replica set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MigrationStep {
    Mirror,
    A,
    B,
    C,
    D,
}

/// One key's worth of movement during a rebalance: read from `read_from`,
/// written to `write_to`, and, for join migrations A/B, deleted from
/// `delete_from`. Leave migrations C/D never delete (the departing node is
/// discarded wholesale), so `delete_from` is `None` there, as it is for the
/// `M = 2` mirror copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplicaTransfer {
    pub key: String,
    pub step: MigrationStep,
    pub read_from: String,
    pub write_to: String,
    pub delete_from: Option<String>,
}

/// The ordered list of transfers a single `add_node`/`remove_node` call
/// executed, in the order they were applied (A before B; C before D).
pub type MigrationPlan = Vec<ReplicaTransfer>;
