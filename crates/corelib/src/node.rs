//! Per-server bookkeeping: the `Node` entity of the data model.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cache::CacheClient;

/// A node's network address. Split out from `Node` so port uniqueness can be
/// checked without string parsing.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeAddress {
    pub host: String,
    pub port: u16,
}

impl fmt::Display for NodeAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// A live server participating in the ring.
///
/// `position` and `keys` are mutated only by the ring engine itself, during
/// join/leave rebalancing and `PUT`; nothing outside `ring` should need to
/// touch them directly.
pub struct Node {
    pub name: String,
    pub address: NodeAddress,
    pub position: u32,
    pub client: Box<dyn CacheClient>,
    pub keys: HashSet<String>,
}

impl Node {
    pub fn new(
        name: impl Into<String>,
        address: NodeAddress,
        position: u32,
        client: Box<dyn CacheClient>,
    ) -> Self {
        Self {
            name: name.into(),
            address,
            position,
            client,
            keys: HashSet::new(),
        }
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("name", &self.name)
            .field("address", &self.address)
            .field("position", &self.position)
            .field("keys", &self.keys.len())
            .finish()
    }
}
