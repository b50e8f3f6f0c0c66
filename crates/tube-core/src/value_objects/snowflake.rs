//! Snowflake ids for users, videos, comments and reactions.
//!
//! Layout (63 bits used, sign bit always clear):
//! - bits 63-22: milliseconds since [`Snowflake::EPOCH`]
//! - bits 21-12: worker id (0-1023)
//! - bits 11-0:  per-millisecond sequence (0-4095)

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

const WORKER_BITS: u32 = 10;
const SEQUENCE_BITS: u32 = 12;
const MAX_WORKER_ID: u16 = (1 << WORKER_BITS) - 1;
const SEQUENCE_MASK: u64 = (1 << SEQUENCE_BITS) - 1;

/// Time-ordered 64-bit identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Snowflake(i64);

impl Snowflake {
    /// 2024-01-01 00:00:00 UTC in milliseconds.
    pub const EPOCH: i64 = 1_704_067_200_000;

    #[inline]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    #[inline]
    pub const fn into_inner(self) -> i64 {
        self.0
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Milliseconds since the Unix epoch at which this id was minted.
    #[inline]
    pub fn timestamp(&self) -> i64 {
        (self.0 >> (WORKER_BITS + SEQUENCE_BITS)) + Self::EPOCH
    }

    #[inline]
    pub fn worker_id(&self) -> u16 {
        ((self.0 >> SEQUENCE_BITS) & i64::from(MAX_WORKER_ID)) as u16
    }

    #[inline]
    pub fn sequence(&self) -> u16 {
        (self.0 as u64 & SEQUENCE_MASK) as u16
    }

    pub fn created_at(&self) -> chrono::DateTime<chrono::Utc> {
        chrono::DateTime::from_timestamp_millis(self.timestamp()).unwrap_or_default()
    }

    pub fn parse(s: &str) -> Result<Self, SnowflakeParseError> {
        match s.trim().parse::<i64>() {
            Ok(id) if id >= 0 => Ok(Self(id)),
            Ok(_) => Err(SnowflakeParseError::Negative),
            Err(_) => Err(SnowflakeParseError::InvalidFormat),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SnowflakeParseError {
    #[error("invalid snowflake format")]
    InvalidFormat,

    #[error("snowflake must not be negative")]
    Negative,
}

impl fmt::Display for Snowflake {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for Snowflake {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<Snowflake> for i64 {
    fn from(id: Snowflake) -> Self {
        id.0
    }
}

impl std::str::FromStr for Snowflake {
    type Err = SnowflakeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Snowflake::parse(s)
    }
}

// Serialized as a string so JavaScript clients keep full precision.
impl Serialize for Snowflake {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Snowflake {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};

        struct SnowflakeVisitor;

        impl Visitor<'_> for SnowflakeVisitor {
            type Value = Snowflake;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a string or integer id")
            }

            fn visit_i64<E: de::Error>(self, value: i64) -> Result<Snowflake, E> {
                Ok(Snowflake(value))
            }

            fn visit_u64<E: de::Error>(self, value: u64) -> Result<Snowflake, E> {
                i64::try_from(value)
                    .map(Snowflake)
                    .map_err(|_| E::custom("id out of range"))
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<Snowflake, E> {
                Snowflake::parse(value).map_err(E::custom)
            }
        }

        deserializer.deserialize_any(SnowflakeVisitor)
    }
}

/// Returned when a generator is configured with a worker id above 1023.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("worker id {0} exceeds {MAX_WORKER_ID}")]
pub struct InvalidWorkerId(pub u16);

/// Lock-free id generator.
///
/// The last issued `(timestamp, sequence)` pair is packed into one atomic word
/// so that concurrent callers never hand out the same id.
#[derive(Debug)]
pub struct SnowflakeGenerator {
    worker_id: u16,
    state: AtomicU64,
}

impl SnowflakeGenerator {
    pub fn new(worker_id: u16) -> Result<Self, InvalidWorkerId> {
        if worker_id > MAX_WORKER_ID {
            return Err(InvalidWorkerId(worker_id));
        }
        Ok(Self {
            worker_id,
            state: AtomicU64::new(0),
        })
    }

    pub fn generate(&self) -> Snowflake {
        let mut current = self.state.load(Ordering::Acquire);
        loop {
            let last_ms = current >> SEQUENCE_BITS;
            let now = now_since_epoch();

            // A clock that steps backwards keeps issuing from the last timestamp.
            let next = if now > last_ms {
                now << SEQUENCE_BITS
            } else if current & SEQUENCE_MASK < SEQUENCE_MASK {
                current + 1
            } else {
                // Sequence exhausted for this millisecond.
                (last_ms + 1) << SEQUENCE_BITS
            };

            match self
                .state
                .compare_exchange_weak(current, next, Ordering::AcqRel, Ordering::Acquire)
            {
                Ok(_) => {
                    let ms = next >> SEQUENCE_BITS;
                    let seq = next & SEQUENCE_MASK;
                    let id = (ms << (WORKER_BITS + SEQUENCE_BITS))
                        | (u64::from(self.worker_id) << SEQUENCE_BITS)
                        | seq;
                    return Snowflake::new(id as i64);
                }
                Err(observed) => current = observed,
            }
        }
    }

    pub fn worker_id(&self) -> u16 {
        self.worker_id
    }
}

fn now_since_epoch() -> u64 {
    let unix_ms = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(Snowflake::EPOCH);
    (unix_ms - Snowflake::EPOCH).max(0) as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_parse_rejects_garbage_and_negatives() {
        assert_eq!(Snowflake::parse("42").unwrap(), Snowflake::new(42));
        assert_eq!(
            Snowflake::parse("abc"),
            Err(SnowflakeParseError::InvalidFormat)
        );
        assert_eq!(Snowflake::parse("-5"), Err(SnowflakeParseError::Negative));
    }

    #[test]
    fn test_json_uses_string_and_accepts_both() {
        let sf = Snowflake::new(123_456_789_012_345_678);
        assert_eq!(
            serde_json::to_string(&sf).unwrap(),
            "\"123456789012345678\""
        );

        let from_str: Snowflake = serde_json::from_str("\"77\"").unwrap();
        let from_num: Snowflake = serde_json::from_str("77").unwrap();
        assert_eq!(from_str, from_num);
    }

    #[test]
    fn test_worker_id_bounds() {
        assert!(SnowflakeGenerator::new(1023).is_ok());
        assert_eq!(
            SnowflakeGenerator::new(1024).unwrap_err(),
            InvalidWorkerId(1024)
        );
    }

    #[test]
    fn test_generated_ids_are_increasing_and_carry_worker() {
        let gen = SnowflakeGenerator::new(7).unwrap();
        let mut last = Snowflake::default();
        for _ in 0..5000 {
            let id = gen.generate();
            assert!(id > last);
            assert_eq!(id.worker_id(), 7);
            last = id;
        }
    }

    #[test]
    fn test_generated_timestamp_is_recent() {
        let gen = SnowflakeGenerator::new(1).unwrap();
        let id = gen.generate();
        let drift = (chrono::Utc::now() - id.created_at()).num_seconds().abs();
        assert!(drift < 5);
    }

    #[test]
    fn test_concurrent_generation_is_unique() {
        let gen = Arc::new(SnowflakeGenerator::new(3).unwrap());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let gen = Arc::clone(&gen);
                thread::spawn(move || (0..2000).map(|_| gen.generate()).collect::<Vec<_>>())
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            for id in handle.join().unwrap() {
                assert!(seen.insert(id));
            }
        }
        assert_eq!(seen.len(), 8000);
    }
}
