//! Execute-then-commit harness around a [`KvBackend`].
//!
//! Stands in for the ledger runtime: every call runs in a fresh
//! [`Transaction`], and the write set is applied only when the contract
//! returns `Ok`. A failed call leaves committed state untouched.

use asreg_store::{KvBackend, Transaction, WriteSet};
use asreg_types::{Item, TxTimestamp};

use crate::audit::{AuditReport, RegistryAuditor};
use crate::command::Entrypoint;
use crate::error::ContractResult;
use crate::registry::{Registry, TxContext};

/// Outcome of one executed transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TxReceipt {
    /// Bytes returned by the contract. Empty except for `read`.
    pub output: Vec<u8>,
    /// Hex BLAKE3 digest of `writes`.
    pub write_set_digest: String,
    /// The write set produced by the transaction.
    pub writes: WriteSet,
    /// Keys read from committed state, sorted.
    pub reads: Vec<String>,
}

/// Runs registry entrypoints against a backend.
pub struct Host<B: KvBackend> {
    backend: B,
    registry: Registry,
}

impl<B: KvBackend> Host<B> {
    pub fn new(backend: B, registry: Registry) -> Self {
        Self { backend, registry }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Run `function` through `entry` and commit its writes on success.
    pub fn execute(
        &self,
        entry: Entrypoint,
        function: &str,
        args: &[String],
        timestamp: TxTimestamp,
    ) -> ContractResult<TxReceipt> {
        self.run(entry, function, args, timestamp, true)
    }

    /// Like [`Host::execute`] but never commits. Used to endorse a
    /// transaction or compare replicas.
    pub fn simulate(
        &self,
        entry: Entrypoint,
        function: &str,
        args: &[String],
        timestamp: TxTimestamp,
    ) -> ContractResult<TxReceipt> {
        self.run(entry, function, args, timestamp, false)
    }

    pub fn init(&self, args: &[String], timestamp: TxTimestamp) -> ContractResult<TxReceipt> {
        self.execute(Entrypoint::Init, "init", args, timestamp)
    }

    pub fn invoke(
        &self,
        function: &str,
        args: &[String],
        timestamp: TxTimestamp,
    ) -> ContractResult<TxReceipt> {
        self.execute(Entrypoint::Invoke, function, args, timestamp)
    }

    /// Queries produce no writes, so there is nothing to commit.
    pub fn query(&self, function: &str, args: &[String]) -> ContractResult<Vec<u8>> {
        let receipt = self.simulate(Entrypoint::Query, function, args, TxTimestamp::zero())?;
        Ok(receipt.output)
    }

    /// Every indexed item, in index order.
    pub fn list_items(&self) -> ContractResult<Vec<Item>> {
        let mut tx = Transaction::begin(&self.backend);
        self.registry.list_items(&mut tx)
    }

    /// Check committed state against the registry invariants.
    pub fn audit(&self) -> ContractResult<AuditReport> {
        RegistryAuditor::audit(&self.backend)
    }

    fn run(
        &self,
        entry: Entrypoint,
        function: &str,
        args: &[String],
        timestamp: TxTimestamp,
        commit: bool,
    ) -> ContractResult<TxReceipt> {
        let ctx = TxContext::new(timestamp);
        let mut tx = Transaction::begin(&self.backend);
        // Dropping `tx` on error discards its write set.
        let output = self.registry.dispatch(&mut tx, &ctx, entry, function, args)?;
        let reads = tx.read_set();
        let writes = if commit {
            tx.commit()?
        } else {
            tx.into_write_set()
        };
        let write_set_digest = writes.digest_hex();
        tracing::debug!(
            %entry,
            function,
            writes = writes.len(),
            digest = %write_set_digest,
            committed = commit,
            "transaction finished"
        );
        Ok(TxReceipt {
            output,
            write_set_digest,
            writes,
            reads,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use asreg_store::InMemoryKvStore;
    use asreg_types::{ITEM_INDEX_KEY, SEED_KEY};

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    fn host() -> Host<InMemoryKvStore> {
        Host::new(InMemoryKvStore::new(), Registry::default())
    }

    fn ts() -> TxTimestamp {
        TxTimestamp::from_millis(1_700_000_000_000)
    }

    #[test]
    fn execute_commits_on_success() {
        let host = host();
        let receipt = host.init(&args(&["7"]), ts()).unwrap();
        assert!(receipt.output.is_empty());
        assert_eq!(receipt.writes.len(), 2);
        assert_eq!(receipt.write_set_digest, receipt.writes.digest_hex());
        assert_eq!(host.query("read", &args(&[SEED_KEY])).unwrap(), b"7");
    }

    #[test]
    fn failed_call_commits_nothing() {
        let host = host();
        host.invoke("init_item", &args(&["a1", "phone", "alice", "1", "0"]), ts())
            .unwrap();
        let before = host.backend().snapshot().unwrap();

        let err = host
            .invoke("init_item", &args(&["a1", "tablet", "carol", "1", "0"]), ts())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DuplicateId);
        assert_eq!(host.backend().snapshot().unwrap(), before);
    }

    #[test]
    fn simulate_leaves_state_alone() {
        let host = host();
        let receipt = host
            .simulate(Entrypoint::Invoke, "write", &args(&["k", "v"]), ts())
            .unwrap();
        assert_eq!(receipt.writes.len(), 1);
        assert!(host.backend().is_empty().unwrap());
    }

    #[test]
    fn receipt_records_reads() {
        let host = host();
        let receipt = host
            .invoke("init_item", &args(&["a1", "phone", "alice", "1", "0"]), ts())
            .unwrap();
        assert_eq!(receipt.reads, vec![ITEM_INDEX_KEY.to_string(), "item:a1".to_string()]);
    }

    #[test]
    fn query_cannot_write() {
        let host = host();
        let err = host.query("write", &args(&["k", "v"])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownVerb);
    }
}
