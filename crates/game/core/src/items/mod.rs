//! Item catalog: equipment, potions, tiers, slots and the shop.
//!
//! Equipment contributes stat modifiers while worn; potions are consumed.
//! Items never live in battle state, only on the player.

pub mod equipment;
pub mod inventory;
pub mod potion;
pub mod shop;
pub mod tier;

pub use equipment::{EquipError, Equipment, EquipmentKind, StatBonus};
pub use inventory::{InventoryError, Slots};
pub use potion::{Potion, StatBoost};
pub use shop::{ShopOffer, ShopStock};
pub use tier::{TIER_WEIGHTS, Tier, random_tier};

/// Identity of an item instance, unique within a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemId(pub u32);

impl core::fmt::Display for ItemId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Hands out fresh [`ItemId`]s.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemIdGen {
    next: u32,
}

impl ItemIdGen {
    pub fn next_id(&mut self) -> ItemId {
        let id = ItemId(self.next);
        self.next += 1;
        id
    }
}

/// Any item the player can receive.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Item {
    Potion(Potion),
    Equipment(Equipment),
}

impl Item {
    pub fn name(&self) -> String {
        match self {
            Item::Potion(potion) => potion.name(),
            Item::Equipment(equipment) => equipment.name(),
        }
    }
}
