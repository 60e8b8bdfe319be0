//! Replication strategy abstraction, narrowed to this system's fixed
//! replication factor of 2.
//!
//! Replication here is always "the key's two ring-adjacent nodes": there is
//! no pluggable replica count or cross-datacenter placement, unlike a
//! general-purpose ring. `ReplicationStrategy` still exists as a trait
//! (rather than a bare function) so the read path documents its contract
//! separately from `corelib`'s own placement logic, instead of callers
//! reaching into `Ring` internals to ask "who owns this key".

pub mod simple;

pub use simple::PairStrategy;

use corelib::Ring;

use crate::error::ReplicationError;
use crate::placement::ReplicaPlacement;

/// A strategy for answering "who owns this key" without mutating the ring.
pub trait ReplicationStrategy {
    /// Always 2 for this system; kept as a method (rather than a constant)
    /// so callers written against the trait don't need to know that.
    fn replication_factor(&self) -> usize;

    /// The primary/secondary node names for `key`, or an error if the ring
    /// has no nodes to place it on.
    fn placement_for_key(&self, ring: &Ring, key: &str) -> Result<ReplicaPlacement, ReplicationError>;
}
