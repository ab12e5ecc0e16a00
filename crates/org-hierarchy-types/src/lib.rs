//! Shared Types for the Organization Hierarchy Engine
//!
//! This crate is the SINGLE SOURCE OF TRUTH for all types crossing the
//! directory-service boundary, plus the tagged tree the transformer emits.
//!
//! ## Boundaries
//!
//! ```text
//! ┌──────────────────┐  JSON   ┌──────────────────┐  OrgNode  ┌─────────────┐
//! │ Directory API    │ ──────► │ Transformer      │ ────────► │ Renderer    │
//! │ (REST)           │ ◄────── │ + Reassignment   │           │ (external)  │
//! └──────────────────┘  PATCH  └──────────────────┘           └─────────────┘
//! ```
//!
//! ## Rules
//!
//! 1. Wire types live in [`wire`] and are permissive: missing collections are empty
//! 2. Tree nodes carry an explicit kind tag, assigned once at ingestion
//! 3. Ids are strings on our side, numbers or strings on the wire

pub mod node;
pub mod wire;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use node::*;
pub use wire::*;

// ============================================================================
// IDENTIFIERS
// ============================================================================

/// Opaque directory identifier.
///
/// The directory sends numeric primary keys for most records, but some
/// deployments use string keys. Both deserialize into the same value, so
/// `1` and `"1"` compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for NodeId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<i32> for NodeId {
    fn from(value: i32) -> Self {
        Self(value.to_string())
    }
}

impl From<i64> for NodeId {
    fn from(value: i64) -> Self {
        Self(value.to_string())
    }
}

impl From<u64> for NodeId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl<'de> Deserialize<'de> for NodeId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de;

        struct NumberOrStringVisitor;

        impl<'de> de::Visitor<'de> for NumberOrStringVisitor {
            type Value = NodeId;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("an integer or string identifier")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                Ok(NodeId(v.to_string()))
            }

            fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
                Ok(NodeId(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                Ok(NodeId(v.to_string()))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                Ok(NodeId(v.to_string()))
            }
        }

        deserializer.deserialize_any(NumberOrStringVisitor)
    }
}
