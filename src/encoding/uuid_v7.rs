//! Deterministic, time-ordered UUIDv7 synthesis
//!
//! The 48-bit timestamp is `UUID_V7_BASE_TS_MS + id` (one millisecond per
//! key), so for every id below `2^48 - UUID_V7_BASE_TS_MS` the generated
//! UUIDs sort in the same order as the source keys. The remaining 74 random
//! bits come from a 16-byte BLAKE2b digest of the decimal key.
//!
//! Layout (RFC 9562):
//!
//! ```text
//!  0                   1                   2                   3
//! |          unix_ts_ms (32 high bits of 48)                      |
//! |  unix_ts_ms (16 low bits)     | ver=7 |      rand_a (12)      |
//! |var|             rand_b (62, high 14 bits shown)               |
//! |                       rand_b (low 48 bits)                    |
//! ```

use crate::common::constants::{UUID_V7_BASE_TS_MS, UUID_V7_TS_MASK};
use blake2::digest::consts::U16;
use blake2::{Blake2b, Digest};
use uuid::Uuid;

type Blake2b128 = Blake2b<U16>;

const RAND_A_MASK: u128 = 0x0FFF;
const RAND_B_MASK: u128 = (1 << 62) - 1;
const VERSION_7: u128 = 0x7;
const VARIANT_RFC: u128 = 0b10;

/// Synthetic millisecond timestamp for a key
pub fn synthetic_timestamp_ms(original_id: u64) -> u64 {
    UUID_V7_BASE_TS_MS + (original_id & UUID_V7_TS_MASK)
}

/// Build the UUIDv7 for a key
pub fn uuid_v7_from_id(original_id: u64) -> Uuid {
    let digest = Blake2b128::digest(original_id.to_string().as_bytes());

    let rand_a = u128::from(u16::from_be_bytes([digest[0], digest[1]])) & RAND_A_MASK;
    let mut rand_b_bytes = [0u8; 8];
    rand_b_bytes.copy_from_slice(&digest[2..10]);
    let rand_b = u128::from(u64::from_be_bytes(rand_b_bytes)) & RAND_B_MASK;

    // Bits above 48 fall off, matching the field widths of the layout.
    let ts = u128::from(synthetic_timestamp_ms(original_id)) & u128::from(UUID_V7_TS_MASK);

    let bits = (ts << 80) | (VERSION_7 << 76) | (rand_a << 64) | (VARIANT_RFC << 62) | rand_b;
    Uuid::from_u128(bits)
}

/// Canonical hyphenated lowercase text of the UUIDv7 for a key
pub fn uuid_v7_string(original_id: u64) -> String {
    uuid_v7_from_id(original_id).hyphenated().to_string()
}
