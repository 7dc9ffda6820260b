//! Properties of the identifier codec over sampled keys

use keybench::{convert_batch, convert_id, EncodedId, IdEncoding, KeyBenchResult, ParallelContext};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;

const SAMPLE: usize = 20_000;

fn sampled_ids(seed: u64) -> Vec<i64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut ids: HashSet<i64> = (0..1_000).collect();
    while ids.len() < SAMPLE {
        ids.insert(rng.random_range(0..60_000_000));
    }
    ids.into_iter().collect()
}

#[test]
fn test_injective_on_sample() -> KeyBenchResult<()> {
    let ids = sampled_ids(1);
    for encoding in IdEncoding::ALL {
        let encoded = convert_batch(&ids, encoding, &ParallelContext::new(4))?;
        let distinct: HashSet<&EncodedId> = encoded.iter().collect();
        assert_eq!(distinct.len(), ids.len(), "collision under {}", encoding);
    }
    Ok(())
}

#[test]
fn test_deterministic() -> KeyBenchResult<()> {
    for encoding in IdEncoding::ALL {
        for id in [0, 1, 2, 999_999, 59_999_999] {
            assert_eq!(convert_id(id, encoding)?, convert_id(id, encoding)?);
        }
    }
    Ok(())
}

#[test]
fn test_sorted_identity() -> KeyBenchResult<()> {
    for id in sampled_ids(2).into_iter().take(1_000) {
        assert_eq!(convert_id(id, IdEncoding::Int64Sorted)?, EncodedId::Int(id));
    }
    Ok(())
}

#[test]
fn test_uuid_v7_order_follows_keys() -> KeyBenchResult<()> {
    let mut ids = sampled_ids(3);
    ids.sort_unstable();
    let encoded = convert_batch(&ids, IdEncoding::UuidV7, &ParallelContext::new(4))?;
    for pair in encoded.windows(2) {
        let (a, b) = (pair[0].as_text().unwrap(), pair[1].as_text().unwrap());
        assert!(a < b, "{} !< {}", a, b);
        let (ua, ub) = (uuid::Uuid::parse_str(a).unwrap(), uuid::Uuid::parse_str(b).unwrap());
        assert!(ua < ub);
    }
    Ok(())
}

#[test]
fn test_value_shapes() -> KeyBenchResult<()> {
    use base64::{engine::general_purpose, Engine as _};

    for id in [0, 7, 123_456, 6_001_215] {
        let random = convert_id(id, IdEncoding::Int64Random)?;
        assert!(random.as_int().unwrap() >= 0);

        for encoding in [IdEncoding::UuidV4, IdEncoding::UuidV7] {
            let text = convert_id(id, encoding)?.as_text().unwrap().to_string();
            assert_eq!(text.len(), 36);
            assert!(uuid::Uuid::parse_str(&text).is_ok());
        }

        for (encoding, width, chars) in [
            (IdEncoding::Base64_16Bytes, 16, 22),
            (IdEncoding::Base64_32Bytes, 32, 43),
        ] {
            let text = convert_id(id, encoding)?.as_text().unwrap().to_string();
            assert_eq!(text.len(), chars);
            assert!(!text.contains('=') && !text.contains('+') && !text.contains('/'));
            assert_eq!(general_purpose::URL_SAFE_NO_PAD.decode(&text).unwrap().len(), width);
        }
    }
    Ok(())
}

#[test]
fn test_encoding_from_parameter_text() -> KeyBenchResult<()> {
    let encoding: IdEncoding = "base64_32_bytes".parse()?;
    assert!(!encoding.is_integer());
    assert!("uuid".parse::<IdEncoding>().is_err());
    Ok(())
}
