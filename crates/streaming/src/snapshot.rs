//! A serializable capture of ring membership, for bootstrapping a fresh
//! coordinator's view or for `describe`-style tooling.

use serde::{Deserialize, Serialize};

use corelib::{NodeAddress, Ring};

/// One node's membership facts, without its cache client or key set (those
/// are runtime-local; a snapshot only carries what's needed to reconstruct
/// ring placement).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSnapshot {
    pub name: String,
    pub address: NodeAddress,
    pub position: u32,
}

/// A point-in-time view of ring membership.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RingSnapshot {
    pub size: u32,
    pub nodes: Vec<NodeSnapshot>,
}

impl RingSnapshot {
    /// Captures the current membership of `ring`. Does not include key
    /// ownership or cache client state; those aren't part of the wire
    /// contract this snapshot exists for.
    pub fn capture(ring: &Ring) -> Self {
        let nodes = ring
            .nodes()
            .iter()
            .map(|n| NodeSnapshot {
                name: n.name.clone(),
                address: n.address.clone(),
                position: n.position,
            })
            .collect();
        Self {
            size: ring.size(),
            nodes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use corelib::cache::InMemoryCacheClientFactory;

    #[test]
    fn capture_reflects_membership() {
        let mut ring = Ring::new(100, Box::new(InMemoryCacheClientFactory)).unwrap();
        ring.add_node("m1", "10.0.0.1", 7001).unwrap();
        ring.add_node("m2", "10.0.0.2", 7002).unwrap();

        let snapshot = RingSnapshot::capture(&ring);
        assert_eq!(snapshot.size, 100);
        assert_eq!(snapshot.nodes.len(), 2);
        assert!(snapshot.nodes.iter().any(|n| n.name == "m1"));
        assert!(snapshot.nodes.iter().any(|n| n.name == "m2"));
    }
}
