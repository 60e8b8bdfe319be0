//! The hash ring: ordered cluster, placement/lookup, and the rebalancing
//! case analysis for membership changes. This module carries most of the
//! crate's implementation weight.

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use crate::cache::{CacheClientFactory, CacheError};
use crate::error::{Error, Result};
use crate::hash::position_in;
use crate::node::{Node, NodeAddress};
use crate::ring::migration::{MigrationPlan, MigrationStep, ReplicaTransfer};
use crate::ring::position::{in_arc, successor_index};

fn cache_err(e: CacheError) -> Error {
    Error::CacheTransportError(e.to_string())
}

/// Upper bound on rejection-sampling attempts before a join gives up with
/// `Error::RingFull`. Without a cap, position selection could loop
/// indefinitely once the cluster size approaches the ring size.
fn position_retry_cap(size: u32) -> u32 {
    4 * size + 64
}

/// The ring engine.
///
/// `cluster` is kept sorted ascending by `position` at all times; the
/// successor of index `i` is `(i + 1) % cluster.len()`, predecessor
/// symmetrically. All mutation goes through `&mut self`: the engine is the
/// single writer, so no interior mutability or locking is used anywhere in
/// this struct.
pub struct Ring {
    size: u32,
    cluster: Vec<Node>,
    ports_in_use: HashSet<u16>,
    factory: Box<dyn CacheClientFactory>,
    rng: Box<dyn RngCore>,
}

impl Ring {
    /// Construct a new ring of `size` positions. `factory` opens cache
    /// clients for nodes as they join.
    pub fn new(size: u32, factory: Box<dyn CacheClientFactory>) -> Result<Self> {
        Self::with_rng(size, factory, Box::new(StdRng::from_entropy()))
    }

    /// Like `new`, but with an injectable PRNG, so position assignment can
    /// be made deterministic for tests.
    pub fn with_rng(
        size: u32,
        factory: Box<dyn CacheClientFactory>,
        rng: Box<dyn RngCore>,
    ) -> Result<Self> {
        if size == 0 {
            return Err(Error::ConfigurationError(
                "ring size must be a positive integer".to_string(),
            ));
        }
        Ok(Self {
            size,
            cluster: Vec::new(),
            ports_in_use: HashSet::new(),
            factory,
            rng,
        })
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn node_count(&self) -> usize {
        self.cluster.len()
    }

    pub fn ports_in_use(&self) -> &HashSet<u16> {
        &self.ports_in_use
    }

    pub fn nodes(&self) -> &[Node] {
        &self.cluster
    }

    /// Mutable node access, for callers (tests, inspection tooling) that
    /// need to read back directly from a node's cache client.
    pub fn nodes_mut(&mut self) -> &mut [Node] {
        &mut self.cluster
    }

    fn position_for(&self, key: &str) -> u32 {
        position_in(key, self.size)
    }

    fn positions(&self) -> Vec<u32> {
        self.cluster.iter().map(|n| n.position).collect()
    }

    fn draw_position(&mut self) -> Result<u32> {
        let cap = position_retry_cap(self.size);
        for _ in 0..cap {
            let candidate = self.rng.next_u32() % self.size;
            if !self.cluster.iter().any(|n| n.position == candidate) {
                return Ok(candidate);
            }
        }
        Err(Error::RingFull)
    }

    /// Moves `keys` from `read_from` to `write_to`, deleting from
    /// `delete_from` first when it is `Some` (join migrations A/B and the
    /// `M = 2` mirror copy never delete from a third party the same way;
    /// leave migrations C/D never delete at all). Keys are processed in
    /// sorted order so the returned plan is deterministic.
    fn transfer_keys(
        &mut self,
        keys: &HashSet<String>,
        read_idx: usize,
        write_idx: usize,
        delete_idx: Option<usize>,
        step: MigrationStep,
    ) -> Result<MigrationPlan> {
        let mut sorted: Vec<String> = keys.iter().cloned().collect();
        sorted.sort();

        let read_name = self.cluster[read_idx].name.clone();
        let write_name = self.cluster[write_idx].name.clone();
        let delete_name = delete_idx.map(|i| self.cluster[i].name.clone());

        let mut plan = Vec::with_capacity(sorted.len());
        for key in &sorted {
            if let Some(didx) = delete_idx {
                self.cluster[didx].client.delete(key).map_err(cache_err)?;
            }
            let value = self.cluster[read_idx].client.get(key).map_err(cache_err)?;
            if let Some(v) = &value {
                self.cluster[write_idx]
                    .client
                    .set(key, v)
                    .map_err(cache_err)?;
            }
            plan.push(ReplicaTransfer {
                key: key.clone(),
                step,
                read_from: read_name.clone(),
                write_to: write_name.clone(),
                delete_from: delete_name.clone(),
            });
        }

        if let Some(didx) = delete_idx {
            for key in &sorted {
                self.cluster[didx].keys.remove(key);
            }
        }
        for key in sorted {
            self.cluster[write_idx].keys.insert(key);
        }

        tracing::debug!(step = ?step, count = plan.len(), %read_name, %write_name, "migrated keys");
        Ok(plan)
    }

    /// Joins a new node to the ring at a random unoccupied position, then
    /// rebalances so the replication invariant holds for the new cluster
    /// size. Fails without mutating state if `name` or `port` is already
    /// taken.
    pub fn add_node(
        &mut self,
        name: impl Into<String>,
        host: impl Into<String>,
        port: u16,
    ) -> Result<MigrationPlan> {
        let name = name.into();
        let host = host.into();

        if self.cluster.iter().any(|n| n.name == name) {
            return Err(Error::DuplicateName(name));
        }
        if self.ports_in_use.contains(&port) {
            return Err(Error::PortInUse(port));
        }

        let position = self.draw_position()?;
        let address = NodeAddress { host, port };
        let client = self
            .factory
            .connect(&address)
            .map_err(cache_err)?;

        let idx = self
            .cluster
            .iter()
            .position(|n| n.position >= position)
            .unwrap_or(self.cluster.len());
        self.cluster
            .insert(idx, Node::new(name.clone(), address, position, client));
        self.ports_in_use.insert(port);

        let plan = self.rebalance_after_join(idx)?;
        tracing::info!(node = %name, position, m = self.cluster.len(), "node joined");
        Ok(plan)
    }

    /// Rebalances the cluster to absorb the departing node's replicas, then
    /// removes it and releases its port.
    pub fn remove_node(&mut self, name: &str) -> Result<MigrationPlan> {
        let idx = self
            .cluster
            .iter()
            .position(|n| n.name == name)
            .ok_or_else(|| Error::UnknownName(name.to_string()))?;

        let plan = self.rebalance_before_leave(idx)?;

        let mut node = self.cluster.remove(idx);
        node.client.close();
        self.ports_in_use.remove(&node.address.port);
        tracing::info!(node = %name, "node left");
        Ok(plan)
    }

    /// Rebalancing case analysis for join, dispatched on the post-insertion
    /// cluster size `M`.
    ///
    /// # Algorithm
    /// - `M = 1`: the new node is the only one; nothing to move.
    /// - `M = 2`: full mirroring; the new node copies every key from its
    ///   sole predecessor.
    /// - `M = 3`: a two-migration split of the predecessor/successor pair's
    ///   mirrored keys between the two halves of the ring the new node now
    ///   divides.
    /// - `M >= 4`: the general case, splitting the predecessor-successor
    ///   intersection (migration A) from the successor's primary-owned arc
    ///   (migration B).
    fn rebalance_after_join(&mut self, idx: usize) -> Result<MigrationPlan> {
        let m = self.cluster.len();
        match m {
            0 => unreachable!("a node was just inserted"),
            1 => Ok(Vec::new()),
            2 => {
                // M = 2: full mirroring, no deletions. `n` copies every key
                // currently on its one predecessor.
                let p_idx = (idx + m - 1) % m;
                let keys = self.cluster[p_idx].keys.clone();
                self.transfer_keys(&keys, p_idx, idx, None, MigrationStep::Mirror)
            }
            3 => {
                let p_idx = (idx + m - 1) % m;
                let nprime_idx = (idx + 1) % m;
                debug_assert_eq!(
                    self.cluster[p_idx].keys, self.cluster[nprime_idx].keys,
                    "P and N' must be full mirrors immediately before a third node joins"
                );

                let l_p = self.cluster[p_idx].position;
                let l_n = self.cluster[idx].position;
                let l_nprime = self.cluster[nprime_idx].position;

                // Migration A: keys in (l_N', l_P], source P.keys (== N'.keys).
                let migrate_a: HashSet<String> = self.cluster[p_idx]
                    .keys
                    .iter()
                    .filter(|k| in_arc(l_nprime, l_p, self.position_for(k.as_str())))
                    .cloned()
                    .collect();
                let mut plan =
                    self.transfer_keys(&migrate_a, p_idx, idx, Some(nprime_idx), MigrationStep::A)?;

                // Migration B: keys in (l_P, l_n], source N'.keys.
                let migrate_b: HashSet<String> = self.cluster[nprime_idx]
                    .keys
                    .iter()
                    .filter(|k| in_arc(l_p, l_n, self.position_for(k.as_str())))
                    .cloned()
                    .collect();
                plan.extend(self.transfer_keys(
                    &migrate_b,
                    nprime_idx,
                    idx,
                    Some(p_idx),
                    MigrationStep::B,
                )?);

                Ok(plan)
            }
            _ => {
                let p_idx = (idx + m - 1) % m;
                let nprime_idx = (idx + 1) % m;
                let nn_idx = (idx + 2) % m;

                let l_p = self.cluster[p_idx].position;
                let l_n = self.cluster[idx].position;

                // Migration A: keys whose primary was P, secondary N' pre-insert.
                let migrate_a: HashSet<String> = self.cluster[p_idx]
                    .keys
                    .intersection(&self.cluster[nprime_idx].keys)
                    .cloned()
                    .collect();
                let mut plan =
                    self.transfer_keys(&migrate_a, p_idx, idx, Some(nprime_idx), MigrationStep::A)?;

                // Migration B: keys in N'.keys whose hash falls in (l_P, l_n].
                let migrate_b: HashSet<String> = self.cluster[nprime_idx]
                    .keys
                    .iter()
                    .filter(|k| in_arc(l_p, l_n, self.position_for(k.as_str())))
                    .cloned()
                    .collect();
                plan.extend(self.transfer_keys(
                    &migrate_b,
                    nprime_idx,
                    idx,
                    Some(nn_idx),
                    MigrationStep::B,
                )?);

                Ok(plan)
            }
        }
    }

    /// Rebalancing case analysis for leave, dispatched on the pre-removal
    /// cluster size `M`. `idx` is the index of the departing node, still
    /// present in `cluster` when this runs.
    ///
    /// # Algorithm
    /// - `M <= 2`: no safe data motion is possible or necessary; the
    ///   departing node is simply dropped.
    /// - `M >= 3`: the predecessor-owned replicas held by the departing node
    ///   promote to its successor (migration C), and the successor's
    ///   primary-owned replicas promote to the successor's successor
    ///   (migration D).
    fn rebalance_before_leave(&mut self, idx: usize) -> Result<MigrationPlan> {
        let m = self.cluster.len();
        if m <= 2 {
            return Ok(Vec::new());
        }

        let p_idx = (idx + m - 1) % m;
        let nprime_idx = (idx + 1) % m;
        let nn_idx = (idx + 2) % m;

        // Both migration sets are defined against the pre-removal state, so
        // snapshot n's keys once before either transfer mutates anything.
        // Migration C's write into N' must not bleed into Migration D's
        // intersection.
        let n_keys = self.cluster[idx].keys.clone();
        let migrate_c: HashSet<String> = self.cluster[p_idx].keys.intersection(&n_keys).cloned().collect();
        let migrate_d: HashSet<String> = self.cluster[nprime_idx]
            .keys
            .intersection(&n_keys)
            .cloned()
            .collect();

        let mut plan =
            self.transfer_keys(&migrate_c, p_idx, nprime_idx, None, MigrationStep::C)?;
        plan.extend(self.transfer_keys(&migrate_d, nprime_idx, nn_idx, None, MigrationStep::D)?);
        Ok(plan)
    }

    /// Writes `value` for `key` to both the primary and secondary node,
    /// returning their names. Last writer wins; there is no versioning.
    pub fn put(&mut self, key: &str, value: &str) -> Result<(String, String)> {
        if self.cluster.is_empty() {
            return Err(Error::EmptyRing);
        }
        let m = self.cluster.len();
        let p = self.position_for(key);
        let s = successor_index(&self.positions(), p);
        let primary_idx = s % m;
        let secondary_idx = (primary_idx + 1) % m;

        self.cluster[primary_idx]
            .client
            .set(key, value)
            .map_err(cache_err)?;
        self.cluster[primary_idx].keys.insert(key.to_string());

        if secondary_idx != primary_idx {
            self.cluster[secondary_idx]
                .client
                .set(key, value)
                .map_err(cache_err)?;
            self.cluster[secondary_idx].keys.insert(key.to_string());
        }

        let primary = self.cluster[primary_idx].name.clone();
        let secondary = self.cluster[secondary_idx].name.clone();
        tracing::debug!(key, %primary, %secondary, "put");
        Ok((primary, secondary))
    }

    /// Reads `key` from its primary, falling back to the secondary on a
    /// transport failure. A miss is not an error; only a transport failure
    /// on both replicas is.
    pub fn get(&mut self, key: &str) -> Result<Option<String>> {
        if self.cluster.is_empty() {
            return Err(Error::EmptyRing);
        }
        let m = self.cluster.len();
        let p = self.position_for(key);
        let s = successor_index(&self.positions(), p);
        let primary_idx = s % m;
        let secondary_idx = (primary_idx + 1) % m;

        match self.cluster[primary_idx].client.get(key) {
            Ok(value) => Ok(value),
            Err(e) => {
                tracing::debug!(key, error = %e, "primary get failed, failing over to secondary");
                if secondary_idx == primary_idx {
                    return Err(cache_err(e));
                }
                self.cluster[secondary_idx]
                    .client
                    .get(key)
                    .map_err(cache_err)
            }
        }
    }

    /// A human-readable listing of nodes and the keys they currently hold.
    pub fn describe(&self) -> String {
        let mut out = format!("Ring(size={}, nodes={})\n", self.size, self.cluster.len());
        for node in &self.cluster {
            let mut keys: Vec<&str> = node.keys.iter().map(String::as_str).collect();
            keys.sort_unstable();
            out.push_str(&format!(
                "  {} @ {} position={} keys=[{}]\n",
                node.name,
                node.address,
                node.position,
                keys.join(", ")
            ));
        }
        out
    }
}
