// ── Core identity type ──
//
// Backend identifiers are opaque strings. Resource and resource-group ids
// are UUIDs, node and CXL switch ids are free-form. Text filters match
// against the display form, so the raw string is kept verbatim.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Canonical identifier for any inventory entity.
/// Defaults to the empty id, which matches no backend entity.
#[derive(
    Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for EntityId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<String> for EntityId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl AsRef<str> for EntityId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parsed_ids_keep_raw_form() {
        let id: EntityId = "node-rack1-03".parse().unwrap();
        assert_eq!(id.to_string(), "node-rack1-03");
        assert_eq!(id.as_str(), "node-rack1-03");
    }

    #[test]
    fn default_id_is_empty() {
        assert_eq!(EntityId::default().as_str(), "");
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = EntityId::from("CXL11");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"CXL11\"");
    }
}
