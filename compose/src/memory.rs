//! Memory sizes written the way operators write them (`512m`, `2g`).

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A memory amount in bytes.
///
/// Deserializes from either a plain integer or a human-readable size string,
/// and always serializes back as the integer byte count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConfigMemory(i64);

impl ConfigMemory {
    pub fn from_bytes(bytes: i64) -> Self {
        Self(bytes)
    }

    pub fn bytes(self) -> i64 {
        self.0
    }
}

impl fmt::Display for ConfigMemory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ConfigMemory {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        parse_size(s).map(Self)
    }
}

const KIB: i64 = 1024;
const MIB: i64 = 1024 * KIB;
const GIB: i64 = 1024 * MIB;

/// Two-letter forms come first so `2gb` is not read as `2g` + `b`.
const SUFFIXES: &[(&str, i64)] = &[
    ("gb", GIB),
    ("mb", MIB),
    ("kb", KIB),
    ("g", GIB),
    ("m", MIB),
    ("k", KIB),
    ("b", 1),
];

/// Parse a human-readable size string (e.g., "10m", "1g", "4096") into bytes.
///
/// `-1` is accepted as-is so `memory_swap: -1` (unlimited swap) survives.
fn parse_size(s: &str) -> std::result::Result<i64, String> {
    let s = s.trim().to_lowercase();
    if let Ok(n) = s.parse::<i64>() {
        return Ok(n);
    }
    let (num, mult) = SUFFIXES
        .iter()
        .find_map(|&(suffix, mult)| s.strip_suffix(suffix).map(|num| (num, mult)))
        .ok_or_else(|| format!("unrecognized memory format: {s}"))?;
    let n: i64 = num
        .parse()
        .map_err(|_| format!("invalid memory amount: {num}"))?;
    n.checked_mul(mult)
        .ok_or_else(|| format!("memory amount out of range: {s}"))
}

impl Serialize for ConfigMemory {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.0)
    }
}

impl<'de> Deserialize<'de> for ConfigMemory {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct MemoryVisitor;

        impl<'de> de::Visitor<'de> for MemoryVisitor {
            type Value = ConfigMemory;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a byte count or a size string such as \"512m\"")
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<Self::Value, E> {
                Ok(ConfigMemory(v))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<Self::Value, E> {
                i64::try_from(v)
                    .map(ConfigMemory)
                    .map_err(|_| E::custom(format!("memory amount out of range: {v}")))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Self::Value, E> {
                v.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_any(MemoryVisitor)
    }
}
