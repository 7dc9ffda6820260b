//! Identifier encodings under test

use crate::common::error::KeyBenchError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Representation substituted for primary/foreign key values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdEncoding {
    /// Original dense key, unchanged
    Int64Sorted,
    /// 63-bit BLAKE2b digest of the key
    Int64Random,
    /// MD5 digest rendered as a UUID
    UuidV4,
    /// Time-ordered UUID with a synthetic timestamp
    UuidV7,
    /// 16 bytes of SHA-256, URL-safe base64 without padding
    #[serde(rename = "base64_16_bytes")]
    Base64_16Bytes,
    /// 32 bytes of SHA-256, URL-safe base64 without padding
    #[serde(rename = "base64_32_bytes")]
    Base64_32Bytes,
}

/// SQL type of an encoded key column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineType {
    BigInt,
    Varchar,
}

impl EngineType {
    pub fn sql_name(&self) -> &'static str {
        match self {
            EngineType::BigInt => "BIGINT",
            EngineType::Varchar => "VARCHAR",
        }
    }
}

impl fmt::Display for EngineType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sql_name())
    }
}

impl IdEncoding {
    /// Every encoding, in the order benchmarks enumerate them
    pub const ALL: [IdEncoding; 6] = [
        IdEncoding::Int64Sorted,
        IdEncoding::Int64Random,
        IdEncoding::UuidV4,
        IdEncoding::UuidV7,
        IdEncoding::Base64_16Bytes,
        IdEncoding::Base64_32Bytes,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            IdEncoding::Int64Sorted => "int64_sorted",
            IdEncoding::Int64Random => "int64_random",
            IdEncoding::UuidV4 => "uuid_v4",
            IdEncoding::UuidV7 => "uuid_v7",
            IdEncoding::Base64_16Bytes => "base64_16_bytes",
            IdEncoding::Base64_32Bytes => "base64_32_bytes",
        }
    }

    /// Whether encoded values are 64-bit integers rather than text
    pub fn is_integer(&self) -> bool {
        matches!(self, IdEncoding::Int64Sorted | IdEncoding::Int64Random)
    }

    /// Return type of the conversion when registered as a scalar function
    pub fn engine_type(&self) -> EngineType {
        if self.is_integer() {
            EngineType::BigInt
        } else {
            EngineType::Varchar
        }
    }

    /// Whether the encoding keeps the relative order of source keys
    pub fn preserves_order(&self) -> bool {
        matches!(self, IdEncoding::Int64Sorted | IdEncoding::UuidV7)
    }

    /// Suffix appended to a benchmark's unique dataset name
    pub fn dataset_suffix(&self) -> String {
        format!("IdType_{}", self.name())
    }
}

impl fmt::Display for IdEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for IdEncoding {
    type Err = KeyBenchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        IdEncoding::ALL
            .iter()
            .copied()
            .find(|encoding| encoding.name() == s)
            .ok_or_else(|| KeyBenchError::UnknownEncoding(s.to_string()))
    }
}
