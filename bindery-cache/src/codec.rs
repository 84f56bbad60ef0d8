//! Value codec: serde_json serialization wrapped by the optional zstd
//! compression hook and the optional [`ValueTransform`] hook.
//!
//! Hooks run before tier storage and are undone before any validity check
//! consumer sees the value.

use serde::de::DeserializeOwned;
use serde::Serialize;

use bindery_core::errors::{BinderyResult, CacheError};
use bindery_core::traits::ValueTransform;

const ZSTD_LEVEL: i32 = 3;

/// Encoded payload plus bookkeeping for entry metadata.
pub struct Encoded {
    pub bytes: Vec<u8>,
    pub compressed: bool,
    /// blake3 hex of the serialized value, pre-hooks.
    pub content_hash: String,
}

pub fn encode<T: Serialize>(
    value: &T,
    compression_threshold: Option<usize>,
    transform: Option<&dyn ValueTransform>,
) -> BinderyResult<Encoded> {
    let serialized = serde_json::to_vec(value)?;
    let content_hash = blake3::hash(&serialized).to_hex().to_string();

    let (mut bytes, compressed) = match compression_threshold {
        Some(threshold) if serialized.len() >= threshold => {
            let packed = zstd::encode_all(serialized.as_slice(), ZSTD_LEVEL).map_err(|e| {
                CacheError::Codec {
                    reason: format!("zstd encode: {e}"),
                }
            })?;
            (packed, true)
        }
        _ => (serialized, false),
    };

    if let Some(t) = transform {
        bytes = t.encode(bytes)?;
    }

    Ok(Encoded {
        bytes,
        compressed,
        content_hash,
    })
}

pub fn decode<T: DeserializeOwned>(
    bytes: &[u8],
    compressed: bool,
    transform: Option<&dyn ValueTransform>,
) -> BinderyResult<T> {
    let mut bytes = bytes.to_vec();
    if let Some(t) = transform {
        bytes = t.decode(bytes)?;
    }
    if compressed {
        bytes = zstd::decode_all(bytes.as_slice()).map_err(|e| CacheError::Codec {
            reason: format!("zstd decode: {e}"),
        })?;
    }
    Ok(serde_json::from_slice(&bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_uncompressed() {
        let value = vec!["alpha".to_string(), "beta".to_string()];
        let encoded = encode(&value, None, None).unwrap();
        assert!(!encoded.compressed);
        let back: Vec<String> = decode(&encoded.bytes, encoded.compressed, None).unwrap();
        assert_eq!(back, value);
    }

    #[test]
    fn large_values_get_compressed() {
        let value = "repetition ".repeat(1_000);
        let encoded = encode(&value, Some(64), None).unwrap();
        assert!(encoded.compressed);
        assert!(encoded.bytes.len() < value.len());
        let back: String = decode(&encoded.bytes, encoded.compressed, None).unwrap();
        assert_eq!(back, value);
    }

    #[test]
    fn content_hash_ignores_compression() {
        let value = "repetition ".repeat(1_000);
        let plain = encode(&value, None, None).unwrap();
        let packed = encode(&value, Some(64), None).unwrap();
        assert_eq!(plain.content_hash, packed.content_hash);
    }
}
