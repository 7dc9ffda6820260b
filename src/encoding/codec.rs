//! Identifier codec
//!
//! Maps a dense, non-negative key to its representation under an
//! [`IdEncoding`]. Every mode hashes the key's decimal text, so the mapping is
//! stable across processes and platforms and data generated in separate runs
//! joins correctly.

use super::id_encoding::{EngineType, IdEncoding};
use super::uuid_v7::uuid_v7_string;
use crate::common::constants::INT63_MASK;
use crate::common::error::{KeyBenchError, KeyBenchResult};
use crate::config::ParallelContext;
use base64::{engine::general_purpose, Engine as _};
use blake2::digest::consts::U8;
use blake2::Blake2b;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use uuid::Uuid;

type Blake2b64 = Blake2b<U8>;

/// An encoded key; the variant follows [`IdEncoding::engine_type`]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EncodedId {
    Int(i64),
    Text(String),
}

impl EncodedId {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            EncodedId::Int(v) => Some(*v),
            EncodedId::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            EncodedId::Int(_) => None,
            EncodedId::Text(s) => Some(s),
        }
    }

    pub fn engine_type(&self) -> EngineType {
        match self {
            EncodedId::Int(_) => EngineType::BigInt,
            EncodedId::Text(_) => EngineType::Varchar,
        }
    }
}

impl fmt::Display for EncodedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncodedId::Int(v) => write!(f, "{}", v),
            EncodedId::Text(s) => f.write_str(s),
        }
    }
}

/// Convert a key to the given encoding
pub fn convert_id(original_id: i64, encoding: IdEncoding) -> KeyBenchResult<EncodedId> {
    if original_id < 0 {
        return Err(KeyBenchError::InvalidArgument(format!(
            "identifier must be non-negative, got {}",
            original_id
        )));
    }
    let key = original_id as u64;

    let encoded = match encoding {
        IdEncoding::Int64Sorted => EncodedId::Int(original_id),
        IdEncoding::Int64Random => EncodedId::Int(random_int64(key)),
        IdEncoding::UuidV4 => EncodedId::Text(hashed_uuid(key).hyphenated().to_string()),
        IdEncoding::UuidV7 => EncodedId::Text(uuid_v7_string(key)),
        IdEncoding::Base64_16Bytes => EncodedId::Text(base64_digest(key, 16)),
        IdEncoding::Base64_32Bytes => EncodedId::Text(base64_digest(key, 32)),
    };
    Ok(encoded)
}

/// Convert a key, naming the encoding as text (as benchmark parameters do)
pub fn convert_id_named(original_id: i64, encoding: &str) -> KeyBenchResult<EncodedId> {
    convert_id(original_id, encoding.parse()?)
}

/// Convert many keys, preserving input order
pub fn convert_batch(
    ids: &[i64],
    encoding: IdEncoding,
    ctx: &ParallelContext,
) -> KeyBenchResult<Vec<EncodedId>> {
    if ctx.parallel_enabled && ids.len() > 1 {
        ctx.install(|| {
            ids.par_iter()
                .map(|&id| convert_id(id, encoding))
                .collect::<KeyBenchResult<Vec<_>>>()
        })?
    } else {
        ids.iter().map(|&id| convert_id(id, encoding)).collect()
    }
}

/// 8-byte BLAKE2b digest as a big-endian integer with the sign bit cleared
fn random_int64(key: u64) -> i64 {
    let digest = Blake2b64::digest(key.to_string().as_bytes());
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest);
    (u64::from_be_bytes(bytes) & INT63_MASK) as i64
}

/// MD5 digest taken verbatim as UUID bytes; version/variant nibbles are not patched
fn hashed_uuid(key: u64) -> Uuid {
    let digest = md5::compute(key.to_string().as_bytes());
    Uuid::from_bytes(digest.0)
}

fn base64_digest(key: u64, n_bytes: usize) -> String {
    let digest = Sha256::digest(key.to_string().as_bytes());
    general_purpose::URL_SAFE_NO_PAD.encode(&digest[..n_bytes])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(id: i64, encoding: IdEncoding) -> String {
        convert_id(id, encoding).unwrap().as_text().unwrap().to_string()
    }

    #[test]
    fn test_sorted_is_identity() {
        for id in [0, 1, 17, 6_000_000, i64::MAX] {
            assert_eq!(
                convert_id(id, IdEncoding::Int64Sorted).unwrap(),
                EncodedId::Int(id)
            );
        }
    }

    #[test]
    fn test_random_int64_known_values() {
        let random = |id| convert_id(id, IdEncoding::Int64Random).unwrap().as_int().unwrap();
        assert_eq!(random(0), 300471914551172981);
        assert_eq!(random(1), 8573800373938698102);
        assert_eq!(random(42), 6319743179241711738);
    }

    #[test]
    fn test_uuid_v4_keeps_raw_md5_bytes() {
        assert_eq!(text(0, IdEncoding::UuidV4), "cfcd2084-95d5-65ef-66e7-dff9f98764da");
        assert_eq!(text(1, IdEncoding::UuidV4), "c4ca4238-a0b9-2382-0dcc-509a6f75849b");
        // md5("42") has version nibble 7, not 4
        assert_eq!(text(42, IdEncoding::UuidV4), "a1d0c6e8-3f02-7327-d846-1063f4ac58a6");
    }

    #[test]
    fn test_base64_known_values() {
        assert_eq!(text(0, IdEncoding::Base64_16Bytes), "X-zrZv_IbzjZUnhsbWlseQ");
        assert_eq!(
            text(0, IdEncoding::Base64_32Bytes),
            "X-zrZv_IbzjZUnhsbWlsecLbwjndTpG0ZynXOif7V-k"
        );
        assert_eq!(text(123456789, IdEncoding::Base64_16Bytes), "FeKw08M4keuw8e9gnsQZQg");
    }

    #[test]
    fn test_base64_decodes_to_digest_width() {
        for (encoding, width) in [
            (IdEncoding::Base64_16Bytes, 16usize),
            (IdEncoding::Base64_32Bytes, 32usize),
        ] {
            let encoded = text(99, encoding);
            assert!(!encoded.contains('='));
            let raw = general_purpose::URL_SAFE_NO_PAD.decode(encoded).unwrap();
            assert_eq!(raw.len(), width);
        }
    }

    #[test]
    fn test_negative_id_rejected() {
        for encoding in IdEncoding::ALL {
            assert!(matches!(
                convert_id(-1, encoding),
                Err(KeyBenchError::InvalidArgument(_))
            ));
        }
    }

    #[test]
    fn test_named_encoding() {
        assert_eq!(
            convert_id_named(5, "int64_sorted").unwrap(),
            EncodedId::Int(5)
        );
        assert!(matches!(
            convert_id_named(5, "hex_8_bytes"),
            Err(KeyBenchError::UnknownEncoding(_))
        ));
    }

    #[test]
    fn test_output_type_matches_engine_type() {
        for encoding in IdEncoding::ALL {
            let value = convert_id(12, encoding).unwrap();
            assert_eq!(value.engine_type(), encoding.engine_type());
        }
    }

    #[test]
    fn test_batch_matches_single() {
        let ids: Vec<i64> = (0..500).collect();
        let parallel = convert_batch(&ids, IdEncoding::UuidV7, &ParallelContext::new(4)).unwrap();
        let sequential = convert_batch(&ids, IdEncoding::UuidV7, &ParallelContext::sequential()).unwrap();
        assert_eq!(parallel, sequential);
        assert_eq!(parallel[42], convert_id(42, IdEncoding::UuidV7).unwrap());
    }

    #[test]
    fn test_batch_propagates_errors() {
        let result = convert_batch(&[1, -2, 3], IdEncoding::UuidV4, &ParallelContext::new(2));
        assert!(result.is_err());
    }
}
