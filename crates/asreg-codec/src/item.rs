use serde::Deserialize;

use asreg_types::{Item, ItemId};

use crate::error::{CodecError, CodecResult};

/// An integer as it may appear on the wire: a bare number (canonical) or a
/// quoted decimal string (legacy).
#[derive(Deserialize)]
#[serde(untagged)]
enum WireInt {
    Number(i64),
    Text(String),
}

impl WireInt {
    fn resolve(self, field: &'static str, form: &mut RecordForm) -> CodecResult<i64> {
        match self {
            Self::Number(n) => Ok(n),
            Self::Text(text) => {
                *form = RecordForm::Legacy;
                text.parse().map_err(|_| CodecError::InvalidInteger {
                    field,
                    value: text,
                })
            }
        }
    }
}

#[derive(Deserialize)]
struct WireItem {
    id: String,
    name: String,
    owner: String,
    price: WireInt,
    purchase_date: WireInt,
    warranty_validity: WireInt,
    #[serde(default)]
    review: Option<String>,
}

/// Which shape a stored record was in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordForm {
    /// All integers unquoted and every field present.
    Canonical,
    /// At least one quoted integer or a missing `review`.
    Legacy,
}

/// A decoded item together with the shape it was stored in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedItem {
    pub item: Item,
    pub form: RecordForm,
}

/// Canonical encoder and tolerant decoder for [`Item`] records.
pub struct ItemCodec;

impl ItemCodec {
    /// Encode an item in canonical form.
    pub fn encode(item: &Item) -> CodecResult<Vec<u8>> {
        serde_json::to_vec(item).map_err(|e| CodecError::Encode(e.to_string()))
    }

    /// Decode an item, accepting both canonical and legacy records.
    pub fn decode(data: &[u8]) -> CodecResult<Item> {
        Self::decode_with_form(data).map(|decoded| decoded.item)
    }

    /// Decode an item and report whether the record was in legacy form.
    pub fn decode_with_form(data: &[u8]) -> CodecResult<DecodedItem> {
        let wire: WireItem = serde_json::from_slice(data).map_err(|e| CodecError::Malformed {
            record: "item",
            reason: e.to_string(),
        })?;

        let mut form = RecordForm::Canonical;
        let price = wire.price.resolve("price", &mut form)?;
        if price < 0 {
            return Err(CodecError::NegativePrice(price));
        }
        let purchase_date = wire.purchase_date.resolve("purchase_date", &mut form)?;
        let warranty_validity = wire.warranty_validity.resolve("warranty_validity", &mut form)?;
        let review = match wire.review {
            Some(review) => review,
            None => {
                form = RecordForm::Legacy;
                String::new()
            }
        };

        if form == RecordForm::Legacy {
            tracing::debug!(id = %wire.id, "decoded legacy item record");
        }

        Ok(DecodedItem {
            item: Item {
                id: ItemId::from_stored(wire.id),
                name: wire.name,
                owner: wire.owner,
                price,
                purchase_date,
                warranty_validity,
                review,
            },
            form,
        })
    }
}
