//! Hero loadout: abilities and inventory.

use serde::{Deserialize, Serialize};

use crate::entity::{Item, ItemId};
use crate::usable::Usable;

/// What a hero carries. Both lists tick with the hero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HeroLoadout {
    /// Innate abilities, by slot
    pub abilities: Vec<Usable>,
    /// Picked-up items, by slot
    pub inventory: Vec<Item>,
}

impl HeroLoadout {
    /// Loadout with the given abilities and an empty inventory.
    #[must_use]
    pub fn with_abilities(abilities: Vec<Usable>) -> Self {
        Self {
            abilities,
            inventory: Vec::new(),
        }
    }

    /// Whether an item is already held.
    #[must_use]
    pub fn has_item(&self, id: ItemId) -> bool {
        self.inventory.iter().any(|item| item.id == id)
    }

    /// Advance every cooldown by `dt` milliseconds.
    pub fn tick(&mut self, dt: u32) {
        for ability in &mut self.abilities {
            ability.tick(dt);
        }
        for item in &mut self.inventory {
            item.usable.tick(dt);
        }
    }
}
