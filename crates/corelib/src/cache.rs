//! The backing cache contract: an opaque remote map per node.
//!
//! The engine treats this as an injected collaborator, never assuming
//! anything about the transport beyond the four operations below. `get`
//! failures are recoverable (the engine fails over to the secondary); `set`
//! and `delete` failures are fatal to whatever operation triggered them.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::node::NodeAddress;

/// Error raised by a cache client.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CacheError {
    #[error("transport error: {0}")]
    Transport(String),
}

/// A remote map handle for a single node.
///
/// Not required to be `Send`/`Sync`: scheduling is single-threaded
/// cooperative, the coordinator is the sole writer, and a node's client is
/// never shared or moved across threads.
pub trait CacheClient {
    fn get(&mut self, key: &str) -> Result<Option<String>, CacheError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), CacheError>;
    fn delete(&mut self, key: &str) -> Result<(), CacheError>;
    fn close(&mut self);
}

/// Opens a `CacheClient` for a node's address at join time.
///
/// Kept separate from `Node` construction so the engine never needs to know
/// the concrete transport: only the factory does.
pub trait CacheClientFactory {
    fn connect(&self, address: &NodeAddress) -> Result<Box<dyn CacheClient>, CacheError>;
}

/// In-memory `CacheClient`, sufficient as a test double for property tests
/// and anywhere else a real transport would be overkill.
#[derive(Debug, Default)]
pub struct InMemoryCacheClient {
    store: HashMap<String, String>,
    closed: bool,
}

impl InMemoryCacheClient {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CacheClient for InMemoryCacheClient {
    fn get(&mut self, key: &str) -> Result<Option<String>, CacheError> {
        Ok(self.store.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), CacheError> {
        self.store.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<(), CacheError> {
        self.store.remove(key);
        Ok(())
    }

    fn close(&mut self) {
        self.closed = true;
    }
}

/// Factory producing `InMemoryCacheClient`s, ignoring `address` entirely.
#[derive(Debug, Default)]
pub struct InMemoryCacheClientFactory;

impl CacheClientFactory for InMemoryCacheClientFactory {
    fn connect(&self, _address: &NodeAddress) -> Result<Box<dyn CacheClient>, CacheError> {
        Ok(Box::new(InMemoryCacheClient::new()))
    }
}

/// Decorator that can be armed to fail the next `get` call, for exercising
/// the `GET` failover path deterministically in tests.
pub struct FlakyCacheClient<C: CacheClient> {
    inner: C,
    fail_next_get: Arc<AtomicBool>,
}

/// A handle into a `FlakyCacheClient`'s failure switch, usable after the
/// client itself has been moved into a `Node`.
#[derive(Clone)]
pub struct FlakyHandle(Arc<AtomicBool>);

impl FlakyHandle {
    pub fn fail_next_get(&self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

impl<C: CacheClient> FlakyCacheClient<C> {
    pub fn wrap(inner: C) -> (Self, FlakyHandle) {
        let flag = Arc::new(AtomicBool::new(false));
        (
            Self {
                inner,
                fail_next_get: flag.clone(),
            },
            FlakyHandle(flag),
        )
    }
}

impl<C: CacheClient> CacheClient for FlakyCacheClient<C> {
    fn get(&mut self, key: &str) -> Result<Option<String>, CacheError> {
        if self.fail_next_get.swap(false, Ordering::SeqCst) {
            return Err(CacheError::Transport(format!(
                "simulated transport failure reading {key}"
            )));
        }
        self.inner.get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), CacheError> {
        self.inner.set(key, value)
    }

    fn delete(&mut self, key: &str) -> Result<(), CacheError> {
        self.inner.delete(key)
    }

    fn close(&mut self) {
        self.inner.close()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_in_memory_client() {
        let mut client = InMemoryCacheClient::new();
        client.set("k", "v").unwrap();
        assert_eq!(client.get("k").unwrap(), Some("v".to_string()));
        client.delete("k").unwrap();
        assert_eq!(client.get("k").unwrap(), None);
    }

    #[test]
    fn flaky_client_fails_exactly_once() {
        let (mut flaky, handle) = FlakyCacheClient::wrap(InMemoryCacheClient::new());
        flaky.set("k", "v").unwrap();
        handle.fail_next_get();
        assert!(flaky.get("k").is_err());
        assert_eq!(flaky.get("k").unwrap(), Some("v".to_string()));
    }
}
