//! Equipment items and their stat modifiers.

use arrayvec::ArrayVec;

use super::{ItemId, Tier, random_tier};
use crate::env::RngSource;
use crate::error::{ErrorSeverity, GameError};
use crate::stats::{Modifier, ModifierOp, ModifierSource, StatKind};

/// Equipment types. Each maps to exactly one base stat.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EquipmentKind {
    Sword,
    Shield,
    Armor,
    Fangs,
    Boots,
    Amulet,
    Gem,
    Thorns,
    Ring,
    Gloves,
    /// Decorative item from catalog data; carries no stat.
    Trinket,
}

impl EquipmentKind {
    /// Kinds that loot and the shop can produce.
    pub const LOOTABLE: [EquipmentKind; 10] = [
        EquipmentKind::Sword,
        EquipmentKind::Shield,
        EquipmentKind::Armor,
        EquipmentKind::Fangs,
        EquipmentKind::Boots,
        EquipmentKind::Amulet,
        EquipmentKind::Gem,
        EquipmentKind::Thorns,
        EquipmentKind::Ring,
        EquipmentKind::Gloves,
    ];

    pub const fn base_stat(self) -> Option<StatKind> {
        match self {
            EquipmentKind::Sword => Some(StatKind::Attack),
            EquipmentKind::Shield => Some(StatKind::Defence),
            EquipmentKind::Armor => Some(StatKind::MaxHp),
            EquipmentKind::Fangs => Some(StatKind::Lifesteal),
            EquipmentKind::Boots => Some(StatKind::DodgeChance),
            EquipmentKind::Amulet => Some(StatKind::CritChance),
            EquipmentKind::Gem => Some(StatKind::CritDamage),
            EquipmentKind::Thorns => Some(StatKind::ThornDamage),
            EquipmentKind::Ring => Some(StatKind::HealthRegen),
            EquipmentKind::Gloves => Some(StatKind::AttackSpeed),
            EquipmentKind::Trinket => None,
        }
    }
}

/// Errors raised while equipping or unequipping.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EquipError {
    #[error("equipment type {0} has no stat mapping")]
    UnmappedEquipmentType(EquipmentKind),

    #[error("item {0} is not equipped")]
    NotEquipped(ItemId),

    #[error("equipment slot {0} is out of range")]
    InvalidSlot(usize),
}

impl GameError for EquipError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::UnmappedEquipmentType(_) => ErrorSeverity::Internal,
            Self::NotEquipped(_) | Self::InvalidSlot(_) => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnmappedEquipmentType(_) => "EQUIP_UNMAPPED_TYPE",
            Self::NotEquipped(_) => "EQUIP_NOT_EQUIPPED",
            Self::InvalidSlot(_) => "EQUIP_INVALID_SLOT",
        }
    }
}

/// One fractional tier bonus on a stat.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatBonus {
    pub stat: StatKind,
    pub bonus: f64,
}

/// A piece of equipment.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Equipment {
    pub id: ItemId,
    pub kind: EquipmentKind,
    /// Number of base-stat upgrade steps the item grants.
    pub level: u32,
    pub tier: Tier,
    pub bonuses: ArrayVec<StatBonus, 2>,
}

impl Equipment {
    /// A Basic item with no bonuses.
    pub fn basic(id: ItemId, kind: EquipmentKind, level: u32) -> Self {
        Self {
            id,
            kind,
            level,
            tier: Tier::Basic,
            bonuses: ArrayVec::new(),
        }
    }

    pub fn with_bonus(mut self, stat: StatKind, bonus: f64) -> Self {
        if !self.bonuses.is_full() {
            self.bonuses.push(StatBonus { stat, bonus });
        }
        self
    }

    pub fn with_tier(mut self, tier: Tier) -> Self {
        self.tier = tier;
        self
    }

    /// Rolls a random lootable item for `room`.
    ///
    /// Level is uniform in `1..=1 + room / rooms_per_level`; tier comes from
    /// [`random_tier`]; bonus stats are distinct.
    pub fn roll(
        id: ItemId,
        room: u32,
        luck: u8,
        rooms_per_level: u32,
        rng: &mut dyn RngSource,
    ) -> Self {
        let kind = EquipmentKind::LOOTABLE[rng.index(EquipmentKind::LOOTABLE.len())];
        let max_level = 1 + room / rooms_per_level.max(1);
        let level = rng.range(1, max_level);
        let tier = random_tier(luck, rng);

        let mut item = Self::basic(id, kind, level).with_tier(tier);
        let (low, high) = tier.bonus_range();
        let mut pool: Vec<StatKind> = StatKind::LEVEL_UP_POOL.to_vec();
        for _ in 0..tier.bonus_count() {
            let stat = pool.remove(rng.index(pool.len()));
            let bonus = rng.range_f64(low, high);
            item = item.with_bonus(stat, bonus);
        }
        item
    }

    pub fn name(&self) -> String {
        format!("{} {} +{}", self.tier, self.kind, self.level)
    }

    /// Modifiers this item contributes while equipped, base steps first.
    pub fn modifiers(&self) -> Result<Vec<Modifier>, EquipError> {
        let base = self
            .kind
            .base_stat()
            .ok_or(EquipError::UnmappedEquipmentType(self.kind))?;
        let source = ModifierSource::Equipment(self.id);

        let mut modifiers = Vec::with_capacity(1 + self.bonuses.len());
        modifiers.push(Modifier::new(source, base, ModifierOp::Upgrade(self.level)));
        modifiers.extend(self.bonuses.iter().map(|b| {
            Modifier::new(source, b.stat, ModifierOp::Multiply(1.0 + b.bonus))
        }));
        Ok(modifiers)
    }

    /// Short bonus summary like "+12% attack, +30% max_hp".
    pub fn bonus_summary(&self) -> String {
        self.bonuses
            .iter()
            .map(|b| format!("+{:.0}% {}", b.bonus * 100.0, b.stat))
            .collect::<Vec<_>>()
            .join(", ")
    }
}
