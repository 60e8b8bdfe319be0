//! The only replication strategy this system has: a key's primary is
//! `successorIndex(H(k))`, its secondary is the primary's ring successor.
//!
//! This mirrors `corelib::Ring::put`/`get`'s own placement computation
//! exactly, so a `PairStrategy` query never disagrees with what the engine
//! would actually do for a write.

use corelib::hash::position_in;
use corelib::ring::position::successor_index;
use corelib::Ring;

use crate::error::ReplicationError;
use crate::placement::ReplicaPlacement;
use crate::strategy::ReplicationStrategy;

/// Fixed replication factor of 2, no configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct PairStrategy;

impl ReplicationStrategy for PairStrategy {
    fn replication_factor(&self) -> usize {
        2
    }

    fn placement_for_key(&self, ring: &Ring, key: &str) -> Result<ReplicaPlacement, ReplicationError> {
        let nodes = ring.nodes();
        let m = nodes.len();
        if m == 0 {
            return Err(ReplicationError::EmptyRing);
        }

        let mut positions: Vec<u32> = nodes.iter().map(|n| n.position).collect();
        positions.sort_unstable();

        let p = position_in(key, ring.size());
        let s = successor_index(&positions, p) % m;
        let primary_position = positions[s];
        let primary_idx = nodes.iter().position(|n| n.position == primary_position).unwrap();
        let secondary_idx = (primary_idx + 1) % m;

        Ok(ReplicaPlacement {
            primary: nodes[primary_idx].name.clone(),
            secondary: nodes[secondary_idx].name.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use corelib::cache::InMemoryCacheClientFactory;

    #[test]
    fn replication_factor_is_always_two() {
        assert_eq!(PairStrategy.replication_factor(), 2);
    }

    #[test]
    fn empty_ring_is_an_error() {
        let ring = Ring::new(100, Box::new(InMemoryCacheClientFactory)).unwrap();
        assert!(matches!(
            PairStrategy.placement_for_key(&ring, "k"),
            Err(ReplicationError::EmptyRing)
        ));
    }

    #[test]
    fn placement_matches_put_routing() {
        let mut ring = Ring::new(100, Box::new(InMemoryCacheClientFactory)).unwrap();
        ring.add_node("m1", "10.0.0.1", 7001).unwrap();
        ring.add_node("m2", "10.0.0.2", 7002).unwrap();
        ring.add_node("m3", "10.0.0.3", 7003).unwrap();

        let (primary, secondary) = ring.put("k1", "v1").unwrap();
        let placement = PairStrategy.placement_for_key(&ring, "k1").unwrap();

        assert_eq!(placement.primary, primary);
        assert_eq!(placement.secondary, secondary);
    }
}
