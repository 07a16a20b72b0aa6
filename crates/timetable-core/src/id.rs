//! [`EntityId`] — the opaque row identifier shared by every table.
//!
//! Identifiers are integers internally (SQLite rowids) but always travel as
//! strings in JSON payloads, matching the wire format the frontend expects.
//! On input both `"42"` and `42` are accepted.

use std::{fmt, num::ParseIntError, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

/// Opaque identifier of a stored row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub i64);

impl fmt::Display for EntityId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

impl FromStr for EntityId {
  type Err = ParseIntError;

  fn from_str(s: &str) -> Result<Self, Self::Err> { Ok(EntityId(s.parse()?)) }
}

impl From<i64> for EntityId {
  fn from(v: i64) -> Self { EntityId(v) }
}

impl Serialize for EntityId {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&self.0)
  }
}

impl<'de> Deserialize<'de> for EntityId {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    struct IdVisitor;

    impl de::Visitor<'_> for IdVisitor {
      type Value = EntityId;

      fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an integer id, as a number or a string")
      }

      fn visit_i64<E: de::Error>(self, v: i64) -> Result<EntityId, E> {
        Ok(EntityId(v))
      }

      fn visit_u64<E: de::Error>(self, v: u64) -> Result<EntityId, E> {
        i64::try_from(v)
          .map(EntityId)
          .map_err(|_| E::custom(format!("id out of range: {v}")))
      }

      fn visit_str<E: de::Error>(self, v: &str) -> Result<EntityId, E> {
        v.parse()
          .map_err(|_| E::custom(format!("invalid id: {v:?}")))
      }
    }

    deserializer.deserialize_any(IdVisitor)
  }
}
