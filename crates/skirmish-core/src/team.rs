//! Team membership.

use serde::{Deserialize, Serialize};

/// Side a unit fights for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Team {
    /// Controlled by the player
    Player,
    /// Hostile to the player
    Enemy,
}

impl Team {
    /// Whether a unit of this team may attack a unit of `other`.
    ///
    /// Teams never attack themselves.
    #[must_use]
    pub fn can_attack(self, other: Team) -> bool {
        self != other
    }
}
