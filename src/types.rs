//! Primitive types shared by every resource model

use crate::table::Table;
use chrono::{DateTime, Utc};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Numeric identifier that survives JSON consumers which read numbers as doubles.
///
/// Always encoded as a quoted decimal string. Decodes from a quoted decimal
/// string or a bare integer; an empty string or `null` decodes to zero.
/// Fields that may be absent need `#[serde(default)]` to decode to zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Id(i64);

impl Id {
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    pub const fn as_i64(self) -> i64 {
        self.0
    }

    /// Decode a raw JSON value; an empty byte sequence yields zero
    pub fn decode(raw: &[u8]) -> serde_json::Result<Self> {
        if raw.is_empty() {
            return Ok(Self(0));
        }
        serde_json::from_slice(raw)
    }
}

impl From<i64> for Id {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<Id> for i64 {
    fn from(id: Id) -> Self {
        id.0
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Id {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

impl Serialize for Id {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

struct IdVisitor;

impl<'de> Visitor<'de> for IdVisitor {
    type Value = Id;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an integer or a decimal string")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Id, E> {
        Ok(Id(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Id, E> {
        i64::try_from(v)
            .map(Id)
            .map_err(|_| E::invalid_value(de::Unexpected::Unsigned(v), &self))
    }

    /// Only `-0` reaches here from JSON; any other float is not an integer
    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Id, E> {
        if v == 0.0 {
            return Ok(Id(0));
        }
        Err(E::invalid_type(de::Unexpected::Float(v), &self))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Id, E> {
        if v.is_empty() {
            return Ok(Id(0));
        }
        v.parse()
            .map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Id, E> {
        Ok(Id(0))
    }

    fn visit_none<E: de::Error>(self) -> Result<Id, E> {
        Ok(Id(0))
    }
}

impl<'de> Deserialize<'de> for Id {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(IdVisitor)
    }
}

/// Lifecycle state of a provisioned resource
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Pending,
    Success,
    Error,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Pending => "pending",
            Status::Success => "success",
            Status::Error => "error",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of an operation that returns nothing but success
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Empty {}

impl Table for Empty {
    fn table(&self) -> Vec<Vec<String>> {
        vec![vec!["Operation success".to_string()]]
    }
}

/// Compact age of a resource, e.g. `3d`, `5h`, `45m`, `12s`
pub fn age(created_at: DateTime<Utc>) -> String {
    age_since(created_at, Utc::now())
}

/// Age of `created_at` as seen at `now`, using the coarsest non-zero unit
pub fn age_since(created_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let d = now - created_at;
    let days = d.num_days();
    if days > 0 {
        return format!("{}d", days);
    }
    let hours = d.num_hours();
    if hours > 0 {
        return format!("{}h", hours);
    }
    let minutes = d.num_minutes();
    if minutes > 0 {
        return format!("{}m", minutes);
    }
    format!("{}s", d.num_seconds())
}
