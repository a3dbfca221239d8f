//! End-to-end registry scenarios against an in-memory ledger.

use asreg_codec::ItemCodec;
use asreg_contract::{ErrorKind, Host, Registry};
use asreg_store::{InMemoryKvStore, KvBackend, StoreError, StoreResult, WriteSet};
use asreg_types::TxTimestamp;

const CREATED_AT: i64 = 1_700_000_000_000;
const WARRANTY: i64 = 1_735_689_600_000;

fn args(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|s| s.to_string()).collect()
}

fn ts() -> TxTimestamp {
    TxTimestamp::from_millis(CREATED_AT)
}

fn read(host: &Host<impl KvBackend>, key: &str) -> Result<Vec<u8>, ErrorKind> {
    host.query("read", &args(&[key])).map_err(|e| e.kind())
}

/// S1: an empty ledger after one `init_item`.
fn s1() -> Host<InMemoryKvStore> {
    let host = Host::new(InMemoryKvStore::new(), Registry::default());
    host.invoke(
        "init_item",
        &args(&["A1", "Phone", "alice", "499", "1735689600000"]),
        ts(),
    )
    .unwrap();
    host
}

#[test]
fn s1_create_and_read_back() {
    let host = s1();
    let item = ItemCodec::decode(&read(&host, "item:a1").unwrap()).unwrap();
    assert_eq!(item.id.as_str(), "a1");
    assert_eq!(item.name, "phone");
    assert_eq!(item.owner, "alice");
    assert_eq!(item.price, 499);
    assert_eq!(item.purchase_date, CREATED_AT);
    assert_eq!(item.warranty_validity, WARRANTY);
    assert_eq!(item.review, "");
    assert_eq!(read(&host, "__item_index__").unwrap(), br#"["a1"]"#);
    assert!(host.audit().unwrap().is_valid());
}

#[test]
fn s2_transfer() {
    let host = s1();
    host.invoke(
        "set_user",
        &args(&["a1", "bob", "550"]),
        TxTimestamp::from_millis(CREATED_AT + 5_000),
    )
    .unwrap();

    let item = ItemCodec::decode(&read(&host, "item:a1").unwrap()).unwrap();
    assert_eq!(item.owner, "bob");
    assert_eq!(item.price, 550);
    assert_eq!(item.purchase_date, CREATED_AT);
    assert_eq!(item.warranty_validity, WARRANTY);
    assert_eq!(item.name, "phone");
}

#[test]
fn s3_duplicate_rejected() {
    let host = s1();
    let before = host.backend().snapshot().unwrap();
    let err = host
        .invoke("init_item", &args(&["A1", "Tablet", "carol", "299", "0"]), ts())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DuplicateId);
    assert!(err.to_string().starts_with("DUPLICATE_ID: "));
    assert_eq!(host.backend().snapshot().unwrap(), before);
}

#[test]
fn s4_delete_removes_record_and_index_entry() {
    let host = s1();
    host.invoke("delete", &args(&["a1"]), ts()).unwrap();
    assert_eq!(read(&host, "item:a1"), Err(ErrorKind::NotFound));
    assert_eq!(read(&host, "__item_index__").unwrap(), b"[]");

    let again = host.invoke("delete", &args(&["a1"]), ts()).unwrap();
    assert!(again.writes.iter().all(|(key, _)| key == "item:a1"));
    assert!(host.audit().unwrap().is_valid());
}

#[test]
fn s5_init_resets_index_only() {
    let host = s1();
    host.init(&args(&["42"]), ts()).unwrap();
    assert_eq!(read(&host, "abc").unwrap(), b"42");
    assert_eq!(read(&host, "__item_index__").unwrap(), b"[]");
    assert!(read(&host, "item:a1").is_ok());

    let report = host.audit().unwrap();
    assert_eq!(report.violations.len(), 1);
    assert_eq!(report.violations[0].key, "item:a1");
}

#[test]
fn s6_bad_integer_writes_nothing() {
    let host = Host::new(InMemoryKvStore::new(), Registry::default());
    let err = host
        .invoke("init_item", &args(&["b2", "pen", "dan", "cheap", "0"]), ts())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BadInteger);
    assert!(host.backend().is_empty().unwrap());
}

#[test]
fn repair_history_accumulates() {
    let host = s1();
    host.invoke("repair_item", &args(&["A1", "screen replaced"]), ts())
        .unwrap();
    host.invoke("repair_item", &args(&["a1", "battery swapped"]), ts())
        .unwrap();

    let items = host.list_items().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].review, "^screen replaced^battery swapped");
    assert_eq!(
        items[0].review_notes('^').collect::<Vec<_>>(),
        vec!["screen replaced", "battery swapped"]
    );
}

#[test]
fn legacy_null_index_is_empty() {
    let host = Host::new(InMemoryKvStore::new(), Registry::default());
    host.invoke("write", &args(&["__item_index__", "null"]), ts())
        .unwrap();
    assert!(host.list_items().unwrap().is_empty());

    host.invoke("init_item", &args(&["a1", "phone", "alice", "1", "0"]), ts())
        .unwrap();
    assert_eq!(read(&host, "__item_index__").unwrap(), br#"["a1"]"#);
}

/// Backend that fails reads, commits, or both.
struct FlakyLedger {
    inner: InMemoryKvStore,
    fail_reads: bool,
}

impl KvBackend for FlakyLedger {
    fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        if self.fail_reads {
            return Err(StoreError::Backend("ledger unavailable\nretry".into()));
        }
        self.inner.get(key)
    }

    fn apply(&self, _writes: &WriteSet) -> StoreResult<()> {
        Err(StoreError::Backend("commit rejected".into()))
    }

    fn keys_with_prefix(&self, prefix: &str) -> StoreResult<Vec<String>> {
        self.inner.keys_with_prefix(prefix)
    }
}

#[test]
fn read_failures_surface_as_storage_failure() {
    let host = Host::new(
        FlakyLedger {
            inner: InMemoryKvStore::new(),
            fail_reads: true,
        },
        Registry::default(),
    );
    let err = host
        .invoke("init_item", &args(&["a1", "phone", "alice", "1", "0"]), ts())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::StorageFailure);
    assert_eq!(
        err.to_string().lines().count(),
        1,
        "message must stay on one line"
    );
}

#[test]
fn commit_failures_surface_as_storage_failure() {
    let host = Host::new(
        FlakyLedger {
            inner: InMemoryKvStore::new(),
            fail_reads: false,
        },
        Registry::default(),
    );
    let err = host.invoke("write", &args(&["k", "v"]), ts()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::StorageFailure);
    assert!(host.backend().inner.is_empty().unwrap());
}
