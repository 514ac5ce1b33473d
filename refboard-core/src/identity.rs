//! Identity types for Refboard entities

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Integer identifier, unique within one entity collection.
///
/// `EntityId::UNASSIGNED` (zero) marks a record that has not been stored yet;
/// stores hand out ids starting at one.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct EntityId(u64);

impl EntityId {
    pub const UNASSIGNED: EntityId = EntityId(0);

    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u64 {
        self.0
    }

    pub fn is_assigned(self) -> bool {
        self.0 != 0
    }

    /// The id following this one, or `None` once the id space is used up.
    pub fn next(self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for EntityId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl FromStr for EntityId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<u64>().map(Self)
    }
}

/// Entity type discriminator used in errors and log fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    User,
    Notification,
    Video,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::User => "user",
            EntityKind::Notification => "notification",
            EntityKind::Video => "video",
        }
    }

    /// Human readable label used in console alerts.
    pub fn label(&self) -> &'static str {
        match self {
            EntityKind::User => "User",
            EntityKind::Notification => "Notification",
            EntityKind::Video => "Video",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_id_display_and_parse() {
        let id = EntityId::new(42);
        assert_eq!(id.to_string(), "42");
        assert_eq!(" 42 ".parse::<EntityId>(), Ok(id));
        assert!("abc".parse::<EntityId>().is_err());
    }

    #[test]
    fn test_unassigned_id() {
        assert!(!EntityId::UNASSIGNED.is_assigned());
        assert_eq!(EntityId::UNASSIGNED.next(), Some(EntityId::new(1)));
        assert_eq!(EntityId::default(), EntityId::UNASSIGNED);
    }

    #[test]
    fn test_next_stops_at_the_last_id() {
        assert_eq!(EntityId::new(u64::MAX - 1).next(), Some(EntityId::new(u64::MAX)));
        assert_eq!(EntityId::new(u64::MAX).next(), None);
    }

    #[test]
    fn test_entity_id_serializes_as_integer() {
        let json = serde_json::to_string(&EntityId::new(7)).unwrap();
        assert_eq!(json, "7");
    }
}
