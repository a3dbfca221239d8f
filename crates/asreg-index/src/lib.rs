//! Live item index for the asset registry.
//!
//! The index is the ordered list of every live item id, persisted as one JSON
//! array under `__item_index__` so callers can enumerate the registry without
//! scanning the ledger. Order is creation order; duplicates are refused.
//!
//! # Key Types
//!
//! - [`ItemIndex`] -- read-modify-write view of the index over a
//!   [`KvFacade`](asreg_store::KvFacade)
//! - [`IndexError`] -- duplicate ids, codec and storage failures

pub mod error;
pub mod index;

pub use error::{IndexError, IndexResult};
pub use index::ItemIndex;
