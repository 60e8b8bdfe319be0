//! The read-side contract over `corelib::Ring`: names the replication
//! factor and the consistency level, without re-implementing any placement
//! or rebalancing logic the ring engine already owns.

pub mod consistency;
pub mod error;
pub mod placement;
pub mod strategy;

pub use consistency::ConsistencyLevel;
pub use error::ReplicationError;
pub use placement::ReplicaPlacement;
pub use strategy::{PairStrategy, ReplicationStrategy};
