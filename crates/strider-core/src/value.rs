// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Vertex and property value types.
use bytes::Bytes;

/// Closed value type for vertices and edge properties.
///
/// The derived [`Ord`] is the *natural ordering* every order-preserving
/// vertex codec must agree with: variant tag first, then payload order
/// (`Str` by `String` ordering, `U64` numerically, `Raw` bytewise).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Value {
    /// UTF-8 string value.
    Str(String),
    /// Unsigned 64-bit integer value.
    U64(u64),
    /// Opaque byte value.
    Raw(Bytes),
}

impl Value {
    /// Short tag name for diagnostics (`"str"`, `"u64"`, `"raw"`).
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Str(_) => "str",
            Self::U64(_) => "u64",
            Self::Raw(_) => "raw",
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Str(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        Self::U64(n)
    }
}

/// A vertex is any [`Value`]; the alias marks intent at API seams.
pub type Vertex = Value;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn natural_order_is_tag_then_payload() {
        assert!(Value::from("a") < Value::from("b"));
        assert!(Value::from("zz") < Value::U64(0));
        assert!(Value::U64(1) < Value::U64(2));
        assert!(Value::U64(u64::MAX) < Value::Raw(Bytes::from_static(b"")));
    }
}
