//! Read-modify-write access to the persisted item index.
//!
//! Every mutation reads the committed list, changes it in memory, and writes
//! the whole list back in the same transaction. Because the facade does not
//! return a transaction's own writes, each handler mutates the index at most
//! once.

use asreg_codec::IndexCodec;
use asreg_store::KvFacade;
use asreg_types::{ItemId, ITEM_INDEX_KEY};

use crate::error::{IndexError, IndexResult};

/// The ordered list of live item ids.
pub struct ItemIndex<'a, F: KvFacade + ?Sized> {
    kv: &'a mut F,
}

impl<'a, F: KvFacade + ?Sized> ItemIndex<'a, F> {
    /// Open the index over a transaction facade.
    pub fn new(kv: &'a mut F) -> Self {
        Self { kv }
    }

    /// Load the current ids. A missing index is empty.
    pub fn load(&self) -> IndexResult<Vec<ItemId>> {
        match self.kv.get(ITEM_INDEX_KEY)? {
            Some(bytes) => Ok(IndexCodec::decode(&bytes)?),
            None => Ok(Vec::new()),
        }
    }

    /// Returns `true` if `id` is listed.
    pub fn contains(&self, id: &ItemId) -> IndexResult<bool> {
        Ok(self.load()?.iter().any(|listed| listed == id))
    }

    /// Append `id` at the end of the index.
    ///
    /// Refuses with [`IndexError::DuplicateId`] if it is already listed.
    pub fn append(&mut self, id: &ItemId) -> IndexResult<()> {
        let mut ids = self.load()?;
        if ids.contains(id) {
            return Err(IndexError::DuplicateId(id.clone()));
        }
        ids.push(id.clone());
        self.store(&ids)?;
        tracing::debug!(%id, len = ids.len(), "item indexed");
        Ok(())
    }

    /// Remove every occurrence of `id`. Returns `true` if anything was
    /// removed; an absent id is not an error and leaves the index untouched.
    pub fn remove(&mut self, id: &ItemId) -> IndexResult<bool> {
        let mut ids = self.load()?;
        let before = ids.len();
        ids.retain(|listed| listed != id);
        if ids.len() == before {
            return Ok(false);
        }
        self.store(&ids)?;
        tracing::debug!(%id, len = ids.len(), "item unindexed");
        Ok(true)
    }

    /// Replace the index with the empty sequence.
    pub fn reset(&mut self) -> IndexResult<()> {
        self.store(&[])
    }

    fn store(&mut self, ids: &[ItemId]) -> IndexResult<()> {
        let bytes = IndexCodec::encode(ids)?;
        self.kv.put(ITEM_INDEX_KEY, bytes)?;
        Ok(())
    }
}
