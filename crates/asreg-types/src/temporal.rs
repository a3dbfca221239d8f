use std::fmt;

use serde::{Deserialize, Serialize};

/// Transaction timestamp supplied by the host ledger.
///
/// Milliseconds since the Unix epoch. Every replica executing a transaction
/// receives the same value, so nothing derived from it breaks determinism.
/// The registry never reads a wall clock itself.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxTimestamp(i64);

impl TxTimestamp {
    /// Wrap a host-provided millisecond timestamp.
    pub const fn from_millis(ms: i64) -> Self {
        Self(ms)
    }

    /// The Unix epoch.
    pub const fn zero() -> Self {
        Self(0)
    }

    /// Milliseconds since the Unix epoch.
    pub const fn as_millis(&self) -> i64 {
        self.0
    }
}

impl fmt::Debug for TxTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TxTimestamp({}ms)", self.0)
    }
}

impl fmt::Display for TxTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_names_the_unit() {
        assert_eq!(format!("{:?}", TxTimestamp::from_millis(7)), "TxTimestamp(7ms)");
    }

    #[test]
    fn ordering_follows_millis() {
        assert!(TxTimestamp::from_millis(1) < TxTimestamp::from_millis(2));
        assert!(TxTimestamp::zero() < TxTimestamp::from_millis(1));
    }

    #[test]
    fn serializes_as_bare_number() {
        let json = serde_json::to_string(&TxTimestamp::from_millis(42)).unwrap();
        assert_eq!(json, "42");
    }

    #[test]
    fn display_format() {
        assert_eq!(TxTimestamp::from_millis(1000).to_string(), "1000");
    }
}
