//! Error taxonomy for the ring engine.

/// Result type alias for the core library.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the ring engine.
///
/// Precondition errors (`ConfigurationError`, `DuplicateName`, `PortInUse`,
/// `UnknownName`, `EmptyRing`) are raised before any state mutation. `GET`
/// recovers from `CacheTransportError` by failing over to the secondary;
/// everywhere else a transport error is fatal to the in-progress operation
/// and the ring is left in whatever state the migration reached.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    #[error("invalid ring size: {0}")]
    ConfigurationError(String),

    #[error("node name already exists: {0}")]
    DuplicateName(String),

    #[error("port already in use: {0}")]
    PortInUse(u16),

    #[error("no node with name: {0}")]
    UnknownName(String),

    #[error("operation requires at least one node")]
    EmptyRing,

    #[error("cache transport error: {0}")]
    CacheTransportError(String),

    #[error("no unoccupied ring position found after repeated sampling")]
    RingFull,
}
