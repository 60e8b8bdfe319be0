//! Core library for the ring-membership and rebalancing coordinator.
//!
//! This crate is the sole subject of the system: the hash primitive, the
//! opaque cache-client contract, the per-node bookkeeping record, and the
//! ring engine that places keys, routes `PUT`/`GET`, and rebalances on
//! join/leave.

pub mod cache;
pub mod error;
pub mod hash;
pub mod node;
pub mod ring;
pub mod topology;

pub use cache::{CacheClient, CacheClientFactory, CacheError};
pub use error::{Error, Result};
pub use node::{Node, NodeAddress};
pub use ring::migration::{MigrationPlan, MigrationStep, ReplicaTransfer};
pub use ring::Ring;
pub use topology::Topology;

/// Construct a new ring of the given size, opening cache clients through
/// `factory` as nodes join.
///
/// Mirrors the engine API's `new_ring(N)` entry point.
pub fn new_ring(size: u32, factory: Box<dyn CacheClientFactory>) -> Result<Ring> {
    Ring::new(size, factory)
}
