use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};

use crate::error::StoreResult;
use crate::traits::{KvBackend, KvFacade};

/// A single pending mutation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WriteOp {
    Put(Vec<u8>),
    Delete,
}

/// The ordered set of mutations produced by one transaction.
///
/// Keyed by ledger key, so a later write to the same key replaces an earlier
/// one and iteration order never depends on the order handlers issued writes
/// to different keys.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WriteSet {
    ops: BTreeMap<String, WriteOp>,
}

impl WriteSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a put, replacing any earlier write to `key`.
    pub fn put(&mut self, key: impl Into<String>, value: Vec<u8>) {
        self.ops.insert(key.into(), WriteOp::Put(value));
    }

    /// Record a delete, replacing any earlier write to `key`.
    pub fn delete(&mut self, key: impl Into<String>) {
        self.ops.insert(key.into(), WriteOp::Delete);
    }

    /// The pending write for `key`, if any.
    pub fn get(&self, key: &str) -> Option<&WriteOp> {
        self.ops.get(key)
    }

    /// Number of keys touched.
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Returns `true` if nothing was written.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Iterate writes in ascending key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &WriteOp)> {
        self.ops.iter().map(|(k, op)| (k.as_str(), op))
    }

    /// Domain-separated BLAKE3 digest of the write set.
    ///
    /// Every field is length-prefixed, so distinct write sets cannot collide
    /// by shifting bytes between a key and its value.
    pub fn digest(&self) -> [u8; 32] {
        let mut hasher = blake3::Hasher::new();
        hasher.update(b"asreg-writeset-v1:");
        hasher.update(&(self.ops.len() as u64).to_be_bytes());
        for (key, op) in &self.ops {
            hasher.update(&(key.len() as u64).to_be_bytes());
            hasher.update(key.as_bytes());
            match op {
                WriteOp::Put(value) => {
                    hasher.update(&[1]);
                    hasher.update(&(value.len() as u64).to_be_bytes());
                    hasher.update(value);
                }
                WriteOp::Delete => {
                    hasher.update(&[0]);
                }
            }
        }
        *hasher.finalize().as_bytes()
    }

    /// Hex-encoded [`Self::digest`].
    pub fn digest_hex(&self) -> String {
        hex::encode(self.digest())
    }
}

/// One in-flight ledger transaction.
///
/// Implements [`KvFacade`] over a committed [`KvBackend`]: reads go straight
/// to committed state and are recorded in the read set; writes are buffered
/// in a [`WriteSet`] until the host commits or discards them.
pub struct Transaction<'a> {
    backend: &'a dyn KvBackend,
    reads: RefCell<BTreeSet<String>>,
    writes: WriteSet,
}

impl<'a> Transaction<'a> {
    /// Begin a transaction against `backend`.
    pub fn begin(backend: &'a dyn KvBackend) -> Self {
        Self {
            backend,
            reads: RefCell::new(BTreeSet::new()),
            writes: WriteSet::new(),
        }
    }

    /// Keys read so far, in ascending order.
    pub fn read_set(&self) -> Vec<String> {
        self.reads.borrow().iter().cloned().collect()
    }

    /// Pending writes.
    pub fn write_set(&self) -> &WriteSet {
        &self.writes
    }

    /// Finish the transaction and hand back its writes without applying them.
    pub fn into_write_set(self) -> WriteSet {
        self.writes
    }

    /// Apply the pending writes to the backend atomically.
    pub fn commit(self) -> StoreResult<WriteSet> {
        self.backend.apply(&self.writes)?;
        tracing::debug!(writes = self.writes.len(), "transaction committed");
        Ok(self.writes)
    }
}

impl KvFacade for Transaction<'_> {
    fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        self.reads.borrow_mut().insert(key.to_string());
        self.backend.get(key)
    }

    fn put(&mut self, key: &str, value: Vec<u8>) -> StoreResult<()> {
        self.writes.put(key, value);
        Ok(())
    }

    fn delete(&mut self, key: &str) -> StoreResult<()> {
        self.writes.delete(key);
        Ok(())
    }
}
