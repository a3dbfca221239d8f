//! Ledger key layout.
//!
//! - `abc` -- ASCII decimal of the seed written by `init`
//! - `__item_index__` -- JSON array of live item ids, in creation order
//! - `item:<id>` -- canonical JSON of one [`Item`](crate::Item)

use crate::item::ItemId;

/// Diagnostic key written by `init`.
pub const SEED_KEY: &str = "abc";

/// Key holding the ordered list of live item ids.
pub const ITEM_INDEX_KEY: &str = "__item_index__";

/// Prefix of every per-item record key.
pub const ITEM_KEY_PREFIX: &str = "item:";

/// Ledger key for the record of `id`.
pub fn item_key(id: &ItemId) -> String {
    format!("{ITEM_KEY_PREFIX}{}", id.as_str())
}

/// Extract the id embedded in an `item:<id>` key.
pub fn id_from_item_key(key: &str) -> Option<&str> {
    key.strip_prefix(ITEM_KEY_PREFIX)
}
