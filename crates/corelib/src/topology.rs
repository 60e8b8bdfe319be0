//! High-level, read-only views over a `Ring`: inspection and routing
//! helpers that sit above the engine without duplicating its mutation logic.

use std::collections::HashMap;

use crate::ring::Ring;

/// A lightweight wrapper around `&Ring` for debugging/monitoring queries.
pub struct Topology<'a> {
    ring: &'a Ring,
}

impl<'a> Topology<'a> {
    pub fn new(ring: &'a Ring) -> Self {
        Self { ring }
    }

    /// Maps each node name to the (sorted) keys it currently holds.
    pub fn ownership(&self) -> HashMap<&'a str, Vec<&'a str>> {
        let mut ownership = HashMap::new();
        for node in self.ring.nodes() {
            let mut keys: Vec<&str> = node.keys.iter().map(String::as_str).collect();
            keys.sort_unstable();
            ownership.insert(node.name.as_str(), keys);
        }
        ownership
    }

    /// Delegates to the engine, which already has direct access to node
    /// state without an extra indirection.
    pub fn describe(&self) -> String {
        self.ring.describe()
    }
}

impl Ring {
    /// Convenience accessor for the read-only topology view.
    pub fn topology(&self) -> Topology<'_> {
        Topology::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::InMemoryCacheClientFactory;

    #[test]
    fn ownership_reflects_put_keys() {
        let mut ring = Ring::new(100, Box::new(InMemoryCacheClientFactory)).unwrap();
        ring.add_node("m1", "10.0.0.1", 7000).unwrap();
        ring.put("k1", "v1").unwrap();

        let topology = ring.topology();
        let ownership = topology.ownership();
        assert_eq!(ownership.get("m1"), Some(&vec!["k1"]));
    }
}
