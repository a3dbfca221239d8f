//! Record codec for the asset registry.
//!
//! Every write goes through the canonical encoder: compact JSON with the
//! fixed field order `id, name, owner, price, purchase_date,
//! warranty_validity, review` and integers emitted as bare JSON numbers.
//!
//! Decoding is tolerant of the legacy shape, where numeric fields were
//! written as quoted decimal strings and `review` could be missing. The
//! legacy shape never escapes this crate: decoded values are plain
//! [`Item`](asreg_types::Item)s and re-encoding always yields the canonical
//! form.

pub mod error;
pub mod index;
pub mod item;

pub use error::{CodecError, CodecResult};
pub use index::IndexCodec;
pub use item::{DecodedItem, ItemCodec, RecordForm};
