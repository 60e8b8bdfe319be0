//! Property tests: random sequences of membership changes and puts must
//! never violate the placement invariants (replica count, adjacency,
//! primary agreement, replica-value equality, and name/port/position
//! uniqueness).

use std::collections::{HashMap, HashSet};

use corelib::cache::InMemoryCacheClientFactory;
use corelib::hash::position_in;
use corelib::ring::position::successor_index;
use corelib::Ring;
use proptest::prelude::*;

const RING_SIZE: u32 = 64;

#[derive(Debug, Clone)]
enum Op {
    Add(String, u16),
    Remove(usize),
    Put(String, String),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (1u16..2000).prop_map(|port| Op::Add(format!("node-{port}"), port)),
        (0usize..8).prop_map(Op::Remove),
        ("[a-z]{1,8}", "[a-z]{1,8}").prop_map(|(k, v)| Op::Put(k, v)),
    ]
}

fn check_invariants(ring: &mut Ring) {
    let m = ring.node_count();
    if m == 0 {
        return;
    }

    let mut names = HashSet::new();
    let mut ports = HashSet::new();
    let mut positions = HashSet::new();
    for node in ring.nodes() {
        assert!(names.insert(node.name.clone()));
        assert!(ports.insert(node.address.port));
        assert!(positions.insert(node.position));
    }
    assert_eq!(ring.ports_in_use().len(), m);

    let mut holders: HashMap<String, Vec<usize>> = HashMap::new();
    for (idx, node) in ring.nodes().iter().enumerate() {
        for key in &node.keys {
            holders.entry(key.clone()).or_default().push(idx);
        }
    }

    let sorted_positions: Vec<u32> = {
        let mut p: Vec<u32> = ring.nodes().iter().map(|n| n.position).collect();
        p.sort_unstable();
        p
    };

    for (key, mut idxs) in holders {
        idxs.sort_unstable();
        let expected = if m == 1 { 1 } else { 2 };
        assert_eq!(idxs.len(), expected, "key {key} has wrong holder count");

        if m > 1 {
            let (a, b) = (idxs[0], idxs[1]);
            assert!(
                b - a == 1 || (a == 0 && b == m - 1),
                "key {key} holders {a},{b} not adjacent"
            );

            let p = position_in(&key, ring.size());
            let s = successor_index(&sorted_positions, p) % m;
            let primary_position = sorted_positions[s];
            let primary_idx = ring
                .nodes()
                .iter()
                .position(|n| n.position == primary_position)
                .unwrap();
            assert_eq!(primary_idx, a, "wrong primary for key {key}");

            let v0 = ring.nodes_mut()[idxs[0]].client.get(&key).unwrap();
            let v1 = ring.nodes_mut()[idxs[1]].client.get(&key).unwrap();
            assert_eq!(v0, v1, "replica divergence for key {key}");
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn random_membership_and_put_sequences_preserve_invariants(ops in prop::collection::vec(op_strategy(), 1..40)) {
        let mut ring = Ring::new(RING_SIZE, Box::new(InMemoryCacheClientFactory)).unwrap();
        let mut next_port_offset = 0u16;

        for op in ops {
            match op {
                Op::Add(name, _port) => {
                    next_port_offset += 1;
                    let port = 10_000 + next_port_offset;
                    if ring.nodes().iter().any(|n| n.name == name) {
                        continue;
                    }
                    let _ = ring.add_node(name, "10.0.0.1", port);
                }
                Op::Remove(idx) => {
                    if ring.node_count() == 0 {
                        continue;
                    }
                    let name = ring.nodes()[idx % ring.node_count()].name.clone();
                    let _ = ring.remove_node(&name);
                }
                Op::Put(k, v) => {
                    let _ = ring.put(&k, &v);
                }
            }
            check_invariants(&mut ring);
        }
    }
}
