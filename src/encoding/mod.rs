//! Identifier encodings and the deterministic key codec

pub mod codec;
pub mod id_encoding;
pub mod tables;
pub mod uuid_v7;

pub use codec::{convert_batch, convert_id, convert_id_named, EncodedId};
pub use id_encoding::{EngineType, IdEncoding};
pub use tables::{is_key_column, key_columns, require_key_columns, Benchmark};
pub use uuid_v7::{synthetic_timestamp_ms, uuid_v7_from_id, uuid_v7_string};
