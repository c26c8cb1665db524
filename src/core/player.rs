//! Player identification.
//!
//! The engine never interprets player IDs; the transport layer decides what
//! they are (a chat user ID, an account number, ...). They only key the
//! session registry.

use serde::{Deserialize, Serialize};

/// Opaque player identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(pub u64);

impl PlayerId {
    /// Create a new player ID.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl From<u64> for PlayerId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_id() {
        let id = PlayerId::new(123_456_789);
        assert_eq!(id.raw(), 123_456_789);
        assert_eq!(PlayerId::from(7), PlayerId::new(7));
        assert_eq!(format!("{}", PlayerId::new(42)), "Player 42");
    }

    #[test]
    fn test_player_id_serde() {
        let id = PlayerId::new(99);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "99");
        let back: PlayerId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
