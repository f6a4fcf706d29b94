//! Entity and faction identifiers

use std::fmt;

/// Entity identifier
///
/// Issued and recycled by the external entity store; the simulation core
/// never creates ids of its own. Ordering is derived so that deterministic
/// tie-breaks can sort on it directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityId {
    id: u32,
}

impl EntityId {
    /// Create an entity id wrapping the given raw value
    pub fn new(id: u32) -> Self {
        Self { id }
    }

    /// Get the raw id value
    pub fn id(&self) -> u32 {
        self.id
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{}", self.id)
    }
}

/// Faction (team) identifier
///
/// Used by target acquisition to exclude allied entities from candidate
/// sets. The mapping from factions to gameplay sides lives in the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FactionId {
    id: u32,
}

impl FactionId {
    /// Create a faction id wrapping the given raw value
    pub fn new(id: u32) -> Self {
        Self { id }
    }

    /// Get the raw id value
    pub fn id(&self) -> u32 {
        self.id
    }
}

impl fmt::Display for FactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "F{}", self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_id_ordering_matches_raw_value() {
        let a = EntityId::new(1);
        let b = EntityId::new(2);
        assert!(a < b);
        assert_eq!(a, EntityId::new(1));
        assert_eq!(a.id(), 1);
    }

    #[test]
    fn test_display() {
        assert_eq!(EntityId::new(7).to_string(), "E7");
        assert_eq!(FactionId::new(0).to_string(), "F0");
    }
}
