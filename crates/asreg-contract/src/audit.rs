//! Consistency checks over committed registry state.
//!
//! The auditor never writes. It reads the index and every `item:` record from
//! a [`KvBackend`] and reports where they disagree.

use std::collections::{BTreeMap, BTreeSet};

use asreg_codec::{IndexCodec, ItemCodec};
use asreg_store::KvBackend;
use asreg_types::keys::id_from_item_key;
use asreg_types::{item_key, ItemId, ITEM_INDEX_KEY, ITEM_KEY_PREFIX};
use serde::Serialize;

use crate::error::ContractResult;

/// Kinds of inconsistency between item records and the index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum ViolationKind {
    /// An indexed id has no `item:` record.
    MissingRecord,
    /// A record's `id` differs from the id in its key.
    IdMismatch,
    /// A decodable record is not listed in the index.
    Unindexed,
    /// An id is listed more than once.
    DuplicateIndexEntry,
    /// A record under `item:` does not decode.
    UndecodableRecord,
    /// The index itself does not decode.
    UndecodableIndex,
}

/// A single inconsistency.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// Ledger key the violation was found at.
    pub key: String,
    pub kind: ViolationKind,
    pub description: String,
}

/// Result of an audit.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct AuditReport {
    /// Number of `item:` records, decodable or not.
    pub item_count: usize,
    /// Number of entries in the index, duplicates included.
    pub indexed_count: usize,
    pub violations: Vec<Violation>,
}

impl AuditReport {
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    /// Violations of one kind.
    pub fn of_kind(&self, kind: ViolationKind) -> impl Iterator<Item = &Violation> {
        self.violations.iter().filter(move |v| v.kind == kind)
    }

    fn push(&mut self, key: impl Into<String>, kind: ViolationKind, description: String) {
        self.violations.push(Violation {
            key: key.into(),
            kind,
            description,
        });
    }
}

/// Checks the record/index duality of a registry.
pub struct RegistryAuditor;

impl RegistryAuditor {
    /// Audit committed state. Only storage failures are errors; every
    /// inconsistency is reported in the returned [`AuditReport`].
    pub fn audit(backend: &dyn KvBackend) -> ContractResult<AuditReport> {
        let mut report = AuditReport::default();

        // `None` for records that fail to decode.
        let mut records: BTreeMap<String, Option<ItemId>> = BTreeMap::new();
        for key in backend.keys_with_prefix(ITEM_KEY_PREFIX)? {
            let Some(key_id) = id_from_item_key(&key).map(str::to_string) else {
                continue;
            };
            report.item_count += 1;
            let Some(bytes) = backend.get(&key)? else {
                continue;
            };
            match ItemCodec::decode(&bytes) {
                Ok(item) => {
                    if item.id.as_str() != key_id {
                        report.push(
                            &key,
                            ViolationKind::IdMismatch,
                            format!("record holds id {:?}", item.id.as_str()),
                        );
                    }
                    records.insert(key_id, Some(item.id));
                }
                Err(err) => {
                    report.push(&key, ViolationKind::UndecodableRecord, err.to_string());
                    records.insert(key_id, None);
                }
            }
        }

        let index = match backend.get(ITEM_INDEX_KEY)? {
            None => Some(Vec::new()),
            Some(bytes) => match IndexCodec::decode(&bytes) {
                Ok(ids) => Some(ids),
                Err(err) => {
                    report.push(ITEM_INDEX_KEY, ViolationKind::UndecodableIndex, err.to_string());
                    None
                }
            },
        };

        if let Some(ids) = index {
            report.indexed_count = ids.len();
            let mut seen = BTreeSet::new();
            for id in &ids {
                if !seen.insert(id.as_str()) {
                    report.push(
                        ITEM_INDEX_KEY,
                        ViolationKind::DuplicateIndexEntry,
                        format!("id {:?} listed more than once", id.as_str()),
                    );
                    continue;
                }
                if !records.contains_key(id.as_str()) {
                    report.push(
                        item_key(id),
                        ViolationKind::MissingRecord,
                        format!("indexed id {:?} has no record", id.as_str()),
                    );
                }
            }
            for (key_id, decoded) in &records {
                if decoded.is_some() && !seen.contains(key_id.as_str()) {
                    report.push(
                        format!("{ITEM_KEY_PREFIX}{key_id}"),
                        ViolationKind::Unindexed,
                        format!("id {key_id:?} is not in the index"),
                    );
                }
            }
        }

        for violation in &report.violations {
            tracing::warn!(key = %violation.key, kind = ?violation.kind, "{}", violation.description);
        }
        tracing::info!(
            items = report.item_count,
            indexed = report.indexed_count,
            violations = report.violations.len(),
            "audit complete"
        );
        Ok(report)
    }
}
