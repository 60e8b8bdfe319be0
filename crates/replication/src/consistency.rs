//! Read consistency levels for a keyed lookup against a replica pair.

/// How many replicas a `GET` is willing to consult.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsistencyLevel {
    /// Read exactly one replica (the primary); a transport failure is
    /// returned to the caller as-is.
    One,
    /// Read the primary, falling back to the secondary on transport
    /// failure. This is the behavior `corelib::Ring::get` actually
    /// implements.
    OneWithFailover,
}
