//! The ring engine: ordered cluster, placement/lookup, and rebalancing.
//!
//! This is where the real design lives: the rebalancing case analysis in
//! `ring::ring` carries most of this crate's implementation weight.

pub mod migration;
pub mod position;
#[allow(clippy::module_inception)]
pub mod ring;

pub use migration::{MigrationPlan, MigrationStep, ReplicaTransfer};
pub use ring::Ring;
