//! Store-assigned entity identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A sequential entity ID handed out by a team or match store.
///
/// The zero value means "not yet stored"; stores replace it with the next
/// free ID on `create` and keep any non-zero ID they are given.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(u32);

impl EntityId {
    /// Placeholder for entities that have not been stored yet.
    pub const UNASSIGNED: EntityId = EntityId(0);

    pub fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw numeric ID.
    pub fn get(&self) -> u32 {
        self.0
    }

    pub fn is_assigned(&self) -> bool {
        self.0 != 0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({})", self.0)
    }
}

/// Type alias for team IDs
pub type TeamId = EntityId;

/// Type alias for match IDs
pub type MatchId = EntityId;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_id_unassigned() {
        assert!(!EntityId::UNASSIGNED.is_assigned());
        assert!(EntityId::new(3).is_assigned());
        assert_eq!(EntityId::default(), EntityId::UNASSIGNED);
    }

    #[test]
    fn test_entity_id_serializes_as_number() {
        let id = EntityId::new(7);
        assert_eq!(serde_json::to_string(&id).unwrap(), "7");
        let parsed: EntityId = serde_json::from_str("7").unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_entity_id_display() {
        assert_eq!(format!("{}", EntityId::new(42)), "42");
    }

    #[test]
    fn test_entity_id_debug() {
        let debug_str = format!("{:?}", EntityId::new(5));
        assert!(debug_str.contains('5'));
    }

    #[test]
    fn test_entity_id_ordering() {
        assert!(EntityId::new(1) < EntityId::new(2));
    }
}
