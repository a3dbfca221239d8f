use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::temporal::TxTimestamp;

/// Primary key of an [`Item`].
///
/// Always case-folded to lower case and never empty when built through
/// [`ItemId::parse`]. Ids read back from the ledger are wrapped verbatim
/// with [`ItemId::from_stored`] so that legacy data is never silently renamed.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    /// Case-fold and validate a caller-supplied id.
    pub fn parse(raw: &str) -> Result<Self, TypeError> {
        fold_field("id", raw).map(Self)
    }

    /// Case-fold a lookup id without validating it. Used where an empty id
    /// simply addresses nothing.
    pub fn fold(raw: &str) -> Self {
        Self(raw.to_lowercase())
    }

    /// Wrap an id exactly as it was persisted.
    pub fn from_stored(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume and return the inner string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Debug for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ItemId({})", self.0)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ItemId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// An owned asset record.
///
/// Field declaration order is the canonical JSON field order:
/// `id, name, owner, price, purchase_date, warranty_validity, review`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub owner: String,
    /// Non-negative, fits in 63 bits.
    pub price: i64,
    /// Milliseconds since epoch, set once at creation.
    pub purchase_date: i64,
    /// Warranty expiry, milliseconds since epoch.
    pub warranty_validity: i64,
    /// Caret-joined review notes. Empty at creation.
    pub review: String,
}

impl Item {
    /// Build a freshly created item. The purchase date is the creating
    /// transaction's timestamp and the review starts empty.
    pub fn new(
        id: ItemId,
        name: impl Into<String>,
        owner: impl Into<String>,
        price: i64,
        purchased_at: TxTimestamp,
        warranty_validity: i64,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            owner: owner.into(),
            price,
            purchase_date: purchased_at.as_millis(),
            warranty_validity,
            review: String::new(),
        }
    }

    /// Transfer the item to a new owner at a new price.
    pub fn transfer(&mut self, owner: impl Into<String>, price: i64) {
        self.owner = owner.into();
        self.price = price;
    }

    /// Append a review note, prefixed by `separator`. Existing notes are
    /// never rewritten.
    pub fn append_review(&mut self, separator: char, note: &str) {
        self.review.push(separator);
        self.review.push_str(note);
    }

    /// Individual review notes, in the order they were appended.
    pub fn review_notes(&self, separator: char) -> impl Iterator<Item = &str> {
        self.review
            .split(separator)
            .enumerate()
            .filter(|(i, note)| !(*i == 0 && note.is_empty()))
            .map(|(_, note)| note)
    }
}

/// Lower-case `raw` and reject the result if it is empty.
pub fn fold_field(field: &'static str, raw: &str) -> Result<String, TypeError> {
    let folded = raw.to_lowercase();
    if folded.is_empty() {
        return Err(TypeError::EmptyField { field });
    }
    Ok(folded)
}

/// Parse a decimal integer that must be `>= 0`.
pub fn parse_non_negative(field: &'static str, raw: &str) -> Result<i64, TypeError> {
    let value: i64 = raw.parse().map_err(|_| TypeError::InvalidInteger {
        field,
        value: raw.to_string(),
    })?;
    if value < 0 {
        return Err(TypeError::Negative { field, value });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn phone() -> Item {
        Item::new(
            ItemId::parse("A1").unwrap(),
            "phone",
            "alice",
            499,
            TxTimestamp::from_millis(1_700_000_000_000),
            1_735_689_600_000,
        )
    }

    #[test]
    fn parse_folds_case() {
        let id = ItemId::parse("AbC123").unwrap();
        assert_eq!(id.as_str(), "abc123");
    }

    #[test]
    fn parse_rejects_empty() {
        assert_eq!(
            ItemId::parse("").unwrap_err(),
            TypeError::EmptyField { field: "id" }
        );
    }

    #[test]
    fn from_stored_keeps_case() {
        assert_eq!(ItemId::from_stored("Legacy").as_str(), "Legacy");
    }

    #[test]
    fn new_item_has_empty_review_and_purchase_date() {
        let item = phone();
        assert_eq!(item.review, "");
        assert_eq!(item.purchase_date, 1_700_000_000_000);
        assert_eq!(item.id.as_str(), "a1");
    }

    #[test]
    fn transfer_leaves_dates_alone() {
        let mut item = phone();
        item.transfer("bob", 550);
        assert_eq!(item.owner, "bob");
        assert_eq!(item.price, 550);
        assert_eq!(item.purchase_date, 1_700_000_000_000);
        assert_eq!(item.warranty_validity, 1_735_689_600_000);
    }

    #[test]
    fn reviews_accumulate_with_separator() {
        let mut item = phone();
        item.append_review('^', "screen replaced");
        item.append_review('^', "battery swapped");
        assert_eq!(item.review, "^screen replaced^battery swapped");
        let notes: Vec<_> = item.review_notes('^').collect();
        assert_eq!(notes, vec!["screen replaced", "battery swapped"]);
    }

    #[test]
    fn parse_non_negative_accepts_zero_and_plus_sign() {
        assert_eq!(parse_non_negative("price", "0").unwrap(), 0);
        assert_eq!(parse_non_negative("price", "+12").unwrap(), 12);
    }

    #[test]
    fn parse_non_negative_rejects_garbage_and_negatives() {
        assert!(matches!(
            parse_non_negative("price", "cheap"),
            Err(TypeError::InvalidInteger { field: "price", .. })
        ));
        assert!(matches!(
            parse_non_negative("price", "-1"),
            Err(TypeError::Negative { value: -1, .. })
        ));
        assert!(parse_non_negative("price", " 5").is_err());
        assert!(parse_non_negative("price", "9223372036854775808").is_err());
    }

    #[test]
    fn fold_field_reports_field_name() {
        assert_eq!(
            fold_field("owner", "").unwrap_err(),
            TypeError::EmptyField { field: "owner" }
        );
        assert_eq!(fold_field("owner", "ALICE").unwrap(), "alice");
    }
}
