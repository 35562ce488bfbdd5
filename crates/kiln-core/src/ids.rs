//! Branded ID newtype for components.
//!
//! Component ids are caller-supplied names (`pkg/a`, `utils/left-pad`), not
//! generated values. The newtype prevents accidentally passing an arbitrary
//! string where a component id is expected, and gives the id a stable
//! serialized form (`#[serde(transparent)]`).

use std::fmt;

use serde::{Deserialize, Serialize};

/// Unique identifier for a component.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentId(String);

impl ComponentId {
    /// Create from an existing string value.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Return the inner string as a slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume self and return the inner `String`.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl AsRef<str> for ComponentId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ComponentId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ComponentId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<ComponentId> for String {
    fn from(id: ComponentId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_inner() {
        let id = ComponentId::new("pkg/a");
        assert_eq!(id.to_string(), "pkg/a");
        assert_eq!(id.as_str(), "pkg/a");
    }

    #[test]
    fn serde_is_transparent() {
        let id = ComponentId::new("utils/left-pad");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"utils/left-pad\"");
        let back: ComponentId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn usable_as_map_key() {
        let mut map = std::collections::HashMap::new();
        let _ = map.insert(ComponentId::new("pkg/a"), 1);
        assert_eq!(map.get(&ComponentId::new("pkg/a")), Some(&1));
    }
}
