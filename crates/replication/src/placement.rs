//! Names the two node roles a key's replication factor of 2 produces.

/// The two nodes that own a key: `primary` is `successorIndex(H(k))`,
/// `secondary` is primary's ring successor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplicaPlacement {
    pub primary: String,
    pub secondary: String,
}
