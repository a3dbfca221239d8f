//! Key-value ledger facade for the asset registry.
//!
//! Handlers never talk to a ledger directly. They see a [`KvFacade`] with
//! three byte-level operations (`get`, `put`, `delete`), implemented by a
//! [`Transaction`] that buffers writes over a committed [`KvBackend`].
//!
//! # Backends
//!
//! - [`InMemoryKvStore`] -- `BTreeMap`-based store for tests and embedding
//! - [`FileKvStore`] -- JSON file on disk, rewritten atomically on commit
//!
//! # Transaction Rules
//!
//! 1. Reads always observe the committed state, never the pending writes.
//! 2. Multiple writes to one key collapse to the last one issued.
//! 3. A write set is applied atomically or not at all.
//! 4. Deleting an absent key is not an error.
//! 5. Backend failures are propagated, never swallowed.

pub mod error;
pub mod file;
pub mod memory;
pub mod traits;
pub mod transaction;

pub use error::{StoreError, StoreResult};
pub use file::FileKvStore;
pub use memory::InMemoryKvStore;
pub use traits::{KvBackend, KvFacade};
pub use transaction::{Transaction, WriteOp, WriteSet};
