use asreg_types::ItemId;

use crate::error::{CodecError, CodecResult};

/// Codec for the persisted item index: a JSON array of id strings.
pub struct IndexCodec;

impl IndexCodec {
    /// Encode ids as a compact JSON array, e.g. `["a1","b2"]`.
    pub fn encode(ids: &[ItemId]) -> CodecResult<Vec<u8>> {
        serde_json::to_vec(ids).map_err(|e| CodecError::Encode(e.to_string()))
    }

    /// Decode a persisted index.
    ///
    /// A JSON `null` decodes to the empty sequence; older deployments wrote
    /// the empty index that way.
    pub fn decode(data: &[u8]) -> CodecResult<Vec<ItemId>> {
        let ids: Option<Vec<String>> =
            serde_json::from_slice(data).map_err(|e| CodecError::Malformed {
                record: "item index",
                reason: e.to_string(),
            })?;
        Ok(ids
            .unwrap_or_default()
            .into_iter()
            .map(ItemId::from_stored)
            .collect())
    }
}
