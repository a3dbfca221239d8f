//! Foundation types for the asset registry.
//!
//! This crate provides the entity, identity, and key-layout types shared by
//! every other `asreg` crate.
//!
//! # Key Types
//!
//! - [`Item`] -- An owned asset record stored under `item:<id>`
//! - [`ItemId`] -- Case-folded, non-empty primary key of an item
//! - [`TxTimestamp`] -- Host-injected transaction time in milliseconds
//! - [`keys`] -- Bit-exact ledger key layout

pub mod error;
pub mod item;
pub mod keys;
pub mod temporal;

pub use error::TypeError;
pub use item::{fold_field, parse_non_negative, Item, ItemId};
pub use keys::{item_key, ITEM_INDEX_KEY, ITEM_KEY_PREFIX, SEED_KEY};
pub use temporal::TxTimestamp;
