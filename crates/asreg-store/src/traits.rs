use crate::error::StoreResult;
use crate::transaction::WriteSet;

/// The narrow view of the ledger that command handlers work against.
///
/// A present empty value is distinct from an absent key: `get` returns
/// `Ok(Some(vec![]))` for the former and `Ok(None)` for the latter.
pub trait KvFacade {
    /// Read the value stored at `key`.
    fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>>;

    /// Overwrite or create the value at `key`.
    fn put(&mut self, key: &str, value: Vec<u8>) -> StoreResult<()>;

    /// Remove `key`. Succeeds when the key is already absent.
    fn delete(&mut self, key: &str) -> StoreResult<()>;
}

/// Committed ledger state.
///
/// All implementations must satisfy these invariants:
/// - `apply` is atomic: after it returns `Err`, no write from the set is
///   visible.
/// - Reads are consistent with the last successful `apply`.
/// - Key enumeration is ordered, so anything built on it stays deterministic.
pub trait KvBackend: Send + Sync {
    /// Read the committed value at `key`.
    fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>>;

    /// Atomically apply every write in `writes`.
    fn apply(&self, writes: &WriteSet) -> StoreResult<()>;

    /// All committed keys starting with `prefix`, in ascending order.
    fn keys_with_prefix(&self, prefix: &str) -> StoreResult<Vec<String>>;

    /// Check whether a key is committed.
    ///
    /// Default implementation calls `get()`. Backends may override when
    /// presence is cheaper to answer than a full read.
    fn contains(&self, key: &str) -> StoreResult<bool> {
        Ok(self.get(key)?.is_some())
    }
}
