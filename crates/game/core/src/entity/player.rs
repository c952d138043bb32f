//! The long-lived player character.

use std::collections::BTreeMap;

use crate::config::GameConfig;
use crate::error::{ErrorSeverity, GameError};
use crate::items::{
    EquipError, Equipment, EquipmentKind, InventoryError, ItemId, ItemIdGen, Potion, Slots,
    StatBoost,
};
use crate::skills::{PassiveFlags, Skill, SkillKind};
use crate::stats::{Modifier, ModifierOp, ModifierSource, ModifierStack, StatKind, Stats};

use super::effects::{EffectKind, TimedEffects};

/// Starting loadouts.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PlayerClass {
    /// Balanced; starts with a sword.
    #[default]
    Fighter,
    /// Fast and slippery; starts with boots.
    Rogue,
    /// Slow and sturdy; starts with a shield.
    Guardian,
}

/// Errors raised by equip and unequip on the player.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum LoadoutError {
    #[error(transparent)]
    Equip(#[from] EquipError),

    #[error(transparent)]
    Slots(#[from] InventoryError<Equipment>),
}

impl GameError for LoadoutError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Equip(e) => e.severity(),
            Self::Slots(e) => e.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Equip(e) => e.error_code(),
            Self::Slots(e) => e.error_code(),
        }
    }
}

/// What drinking a potion did.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PotionEffect {
    Healed(f64),
    Boosted(StatKind, StatBoost),
}

/// The player character.
///
/// Effective stats are always `base` folded through `modifiers`; anything
/// that changes either side goes through [`Player::refresh`] so the cached
/// value and current HP stay consistent.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Player {
    pub class: PlayerClass,
    pub level: u32,
    pub xp: u64,
    pub xp_to_next: u64,
    pub gold: u32,

    base: Stats,
    modifiers: ModifierStack,
    stats: Stats,
    hp: f64,

    pub potions: Slots<Potion, { GameConfig::POTION_SLOTS }>,
    equipment: Slots<Equipment, { GameConfig::EQUIPMENT_SLOTS }>,
    pub skills: Vec<Skill>,
    pub passives: PassiveFlags,
    effects: TimedEffects,

    /// Fractional lifesteal carried between hits of one battle.
    pub lifesteal_pool: f64,
    /// Stats boosted for the next battle by consumed stat potions.
    pub stat_boosts: BTreeMap<StatKind, StatBoost>,
}

impl Player {
    pub fn new(class: PlayerClass, ids: &mut ItemIdGen) -> Self {
        Self::with_xp_curve(class, ids, GameConfig::default().initial_xp_to_next)
    }

    /// Builds a level 1 character of `class` wearing its starting item.
    pub fn with_xp_curve(class: PlayerClass, ids: &mut ItemIdGen, xp_to_next: u64) -> Self {
        let mut base = Stats::default();
        let starter = match class {
            PlayerClass::Fighter => {
                base.set(StatKind::CritChance, 0.05);
                EquipmentKind::Sword
            }
            PlayerClass::Rogue => {
                base.set(StatKind::AttackSpeed, 1.2);
                base.set(StatKind::CritChance, 0.10);
                base.set(StatKind::MaxHp, 8.0);
                EquipmentKind::Boots
            }
            PlayerClass::Guardian => {
                base.set(StatKind::AttackSpeed, 0.8);
                base.set(StatKind::MaxHp, 16.0);
                EquipmentKind::Shield
            }
        };

        let mut player = Self {
            class,
            level: 1,
            xp: 0,
            xp_to_next,
            gold: 0,
            stats: base.clone(),
            hp: base.max_hp,
            base,
            modifiers: ModifierStack::default(),
            potions: Slots::new(),
            equipment: Slots::new(),
            skills: Vec::new(),
            passives: PassiveFlags::empty(),
            effects: TimedEffects::new(),
            lifesteal_pool: 0.0,
            stat_boosts: BTreeMap::new(),
        };
        // A fresh player always has a free slot and a mapped starter kind.
        if let Err(error) = player.equip(Equipment::basic(ids.next_id(), starter, 1)) {
            tracing::error!(%error, "starting equipment rejected");
        }
        player
    }

    // ===== stats =====

    /// Effective stats.
    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    pub fn base_stats(&self) -> &Stats {
        &self.base
    }

    pub fn modifiers(&self) -> &ModifierStack {
        &self.modifiers
    }

    /// Permanent upgrade of one base stat (level-up, passive skills).
    pub fn upgrade_base(&mut self, stat: StatKind) {
        self.base.upgrade(stat);
        self.refresh();
    }

    pub fn downgrade_base(&mut self, stat: StatKind) {
        self.base.downgrade(stat);
        self.refresh();
    }

    /// Overwrites one base stat, clamped to its bounds.
    pub fn set_base_stat(&mut self, stat: StatKind, value: f64) {
        self.base.set(stat, value);
        self.refresh();
    }

    /// Recomputes effective stats and carries current HP along with any
    /// change in max HP.
    fn refresh(&mut self) {
        let old_max = self.stats.max_hp;
        let was_full = self.hp >= old_max;
        let was_alive = self.hp > 0.0;

        self.stats = self.modifiers.apply(&self.base);
        let new_max = self.stats.max_hp;
        if new_max == old_max {
            return;
        }

        self.hp = if was_full && was_alive {
            new_max
        } else {
            (self.hp + new_max - old_max).min(new_max)
        };
        if was_alive {
            self.hp = self.hp.max(1.0);
        }
    }

    // ===== health =====

    pub fn hp(&self) -> f64 {
        self.hp
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0.0
    }

    /// Heals up to max HP and returns the amount actually restored.
    pub fn heal(&mut self, amount: f64) -> f64 {
        let before = self.hp;
        self.hp = (self.hp + amount.max(0.0)).min(self.stats.max_hp);
        self.hp - before
    }

    /// Lowers HP. HP may go below zero; death is `hp <= 0`.
    pub fn take_damage(&mut self, amount: f64) {
        self.hp -= amount.max(0.0);
    }

    pub fn restore_full(&mut self) {
        self.hp = self.stats.max_hp;
    }

    /// Experience multiplier from passive skills.
    pub fn xp_multiplier(&self) -> f64 {
        if self.passives.contains(PassiveFlags::SCHOLAR) {
            1.25
        } else {
            1.0
        }
    }

    pub fn knows(&self, kind: SkillKind) -> bool {
        self.skills.iter().any(|s| s.kind == kind)
    }

    // ===== equipment =====

    pub fn equipment(&self) -> &Slots<Equipment, { GameConfig::EQUIPMENT_SLOTS }> {
        &self.equipment
    }

    /// Wears `item` in the first free equipment slot.
    ///
    /// A full set of slots hands the item back inside
    /// [`InventoryError::Full`].
    pub fn equip(&mut self, item: Equipment) -> Result<usize, LoadoutError> {
        let modifiers = item.modifiers()?;
        let slot = self.equipment.insert(item)?;
        self.modifiers.extend(modifiers);
        self.refresh();
        Ok(slot)
    }

    /// Removes the item in `slot` and every modifier it contributed.
    pub fn unequip(&mut self, slot: usize) -> Result<Equipment, LoadoutError> {
        let item = self.equipment.take(slot)?;
        self.modifiers.remove_source(ModifierSource::Equipment(item.id));
        self.refresh();
        Ok(item)
    }

    pub fn unequip_item(&mut self, id: ItemId) -> Result<Equipment, LoadoutError> {
        let slot = self
            .equipment
            .occupied()
            .find(|(_, item)| item.id == id)
            .map(|(slot, _)| slot)
            .ok_or(EquipError::NotEquipped(id))?;
        self.unequip(slot)
    }

    /// Swaps `item` into `slot`, returning the previous occupant.
    pub fn replace_equipment(
        &mut self,
        slot: usize,
        item: Equipment,
    ) -> Result<Option<Equipment>, LoadoutError> {
        if slot >= self.equipment.capacity() {
            return Err(EquipError::InvalidSlot(slot).into());
        }
        let modifiers = item.modifiers()?;
        let previous = if self.equipment.get(slot).is_some() {
            Some(self.unequip(slot)?)
        } else {
            None
        };
        self.equipment.replace(slot, item)?;
        self.modifiers.extend(modifiers);
        self.refresh();
        Ok(previous)
    }

    // ===== potions =====

    /// Drinks the potion in `slot`.
    ///
    /// Healing applies at once. A stat potion records a boost that the next
    /// battle applies and reverts.
    pub fn drink(&mut self, slot: usize) -> Result<PotionEffect, InventoryError<Potion>> {
        let potion = self.potions.take(slot)?;
        Ok(match potion {
            Potion::Healing { percent } => {
                PotionEffect::Healed(self.heal(self.stats.max_hp * percent))
            }
            Potion::Stat(stat) => {
                let boost = StatBoost::for_value(self.stats.get(stat));
                self.stat_boosts.insert(stat, boost);
                PotionEffect::Boosted(stat, boost)
            }
        })
    }

    /// Turns recorded stat boosts into modifiers for the coming battle.
    pub fn apply_stat_boosts(&mut self) {
        if self.stat_boosts.is_empty() {
            return;
        }
        self.modifiers.remove_source(ModifierSource::StatBoost);
        let boosts: Vec<Modifier> = self
            .stat_boosts
            .iter()
            .map(|(&stat, boost)| {
                let op = match boost {
                    StatBoost::AddOne => ModifierOp::Add(1.0),
                    StatBoost::Double => ModifierOp::Multiply(2.0),
                };
                Modifier::new(ModifierSource::StatBoost, stat, op)
            })
            .collect();
        self.modifiers.extend(boosts);
        self.refresh();
    }

    /// Drops all stat boosts and their modifiers.
    pub fn clear_stat_boosts(&mut self) {
        self.stat_boosts.clear();
        if self.modifiers.remove_source(ModifierSource::StatBoost) > 0 {
            self.refresh();
        }
    }

    // ===== timed effects =====

    pub fn effects(&self) -> &TimedEffects {
        &self.effects
    }

    pub fn has_effect(&self, kind: EffectKind) -> bool {
        self.effects.is_active(kind)
    }

    /// Starts a timed effect; an attack speed buff also becomes a modifier.
    pub fn apply_effect(&mut self, kind: EffectKind, magnitude: f64, duration: f64) {
        self.effects.apply(kind, magnitude, duration);
        if kind == EffectKind::AttackSpeed {
            let source = ModifierSource::Effect(kind);
            self.modifiers.remove_source(source);
            self.modifiers.push(Modifier::new(
                source,
                StatKind::AttackSpeed,
                ModifierOp::Add(magnitude),
            ));
            self.refresh();
        }
    }

    /// Counts effects down by `dt`, reverting whatever expired.
    pub fn tick_effects(&mut self, dt: f64) -> Vec<EffectKind> {
        let expired = self.effects.tick(dt);
        let mut changed = false;
        for kind in &expired {
            changed |= self.modifiers.remove_source(ModifierSource::Effect(*kind)) > 0;
        }
        if changed {
            self.refresh();
        }
        expired.into_iter().collect()
    }

    /// Soaks damage into an active shield; returns `(remaining, absorbed)`.
    pub fn absorb(&mut self, damage: f64) -> (f64, f64) {
        self.effects.absorb(damage)
    }

    pub fn clear_effects(&mut self) {
        self.effects.clear();
        let removed: usize = [EffectKind::Shield, EffectKind::AttackSpeed, EffectKind::Invincible]
            .into_iter()
            .map(|kind| self.modifiers.remove_source(ModifierSource::Effect(kind)))
            .sum();
        if removed > 0 {
            self.refresh();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::Tier;

    fn fighter(ids: &mut ItemIdGen) -> Player {
        Player::new(PlayerClass::Fighter, ids)
    }

    #[test]
    fn fighter_starts_with_sword() {
        let mut ids = ItemIdGen::default();
        let player = fighter(&mut ids);
        assert_eq!(player.stats().attack, 2.2);
        assert_eq!(player.base_stats().attack, 1.0);
        assert_eq!(player.equipment().count(), 1);
        assert_eq!(player.hp(), 10.0);
    }

    #[test]
    fn armor_raises_current_hp_with_max() {
        let mut ids = ItemIdGen::default();
        let mut player = fighter(&mut ids);
        player.take_damage(4.0);
        let armor = Equipment::basic(ids.next_id(), EquipmentKind::Armor, 1);
        let slot = player.equip(armor).unwrap();
        assert_eq!(player.stats().max_hp, 16.0);
        assert_eq!(player.hp(), 12.0);

        player.unequip(slot).unwrap();
        assert_eq!(player.stats().max_hp, 10.0);
        assert_eq!(player.hp(), 6.0);
    }

    #[test]
    fn full_slots_hand_item_back() {
        let mut ids = ItemIdGen::default();
        let mut player = fighter(&mut ids);
        for _ in 0..3 {
            player
                .equip(Equipment::basic(ids.next_id(), EquipmentKind::Ring, 1))
                .unwrap();
        }
        let extra = Equipment::basic(ids.next_id(), EquipmentKind::Gem, 2).with_tier(Tier::Good);
        let err = player.equip(extra.clone()).unwrap_err();
        assert_eq!(
            err,
            LoadoutError::Slots(InventoryError::Full {
                item: extra,
                capacity: 4
            })
        );
        assert_eq!(err.error_code(), "INVENTORY_FULL");
    }

    #[test]
    fn replace_swaps_modifiers() {
        let mut ids = ItemIdGen::default();
        let mut player = fighter(&mut ids);
        let boots = Equipment::basic(ids.next_id(), EquipmentKind::Boots, 2);
        let old = player.replace_equipment(0, boots).unwrap().unwrap();
        assert_eq!(old.kind, EquipmentKind::Sword);
        assert_eq!(player.stats().attack, 1.0);
        assert!((player.stats().dodge_chance - 0.1).abs() < 1e-12);
        assert_eq!(
            player.replace_equipment(9, old),
            Err(LoadoutError::Equip(EquipError::InvalidSlot(9)))
        );
    }

    #[test]
    fn unmapped_item_is_rejected() {
        let mut ids = ItemIdGen::default();
        let mut player = fighter(&mut ids);
        let trinket = Equipment::basic(ids.next_id(), EquipmentKind::Trinket, 1);
        assert_eq!(
            player.equip(trinket),
            Err(LoadoutError::Equip(EquipError::UnmappedEquipmentType(
                EquipmentKind::Trinket
            )))
        );
        assert_eq!(player.equipment().count(), 1);
    }

    #[test]
    fn stat_potion_boost_is_temporary() {
        let mut ids = ItemIdGen::default();
        let mut player = fighter(&mut ids);
        player.potions.insert(Potion::Stat(StatKind::Attack)).unwrap();
        assert_eq!(
            player.drink(0),
            Ok(PotionEffect::Boosted(StatKind::Attack, StatBoost::Double))
        );
        player.apply_stat_boosts();
        assert_eq!(player.stats().attack, 4.4);
        player.clear_stat_boosts();
        assert_eq!(player.stats().attack, 2.2);
        assert!(player.stat_boosts.is_empty());
    }

    #[test]
    fn healing_potion_caps_at_max() {
        let mut ids = ItemIdGen::default();
        let mut player = fighter(&mut ids);
        player.take_damage(2.0);
        player
            .potions
            .insert(Potion::Healing {
                percent: Potion::LARGE_HEAL,
            })
            .unwrap();
        assert_eq!(player.drink(0), Ok(PotionEffect::Healed(2.0)));
        assert_eq!(player.hp(), 10.0);
        assert_eq!(player.drink(0), Err(InventoryError::EmptySlot(0)));
    }

    #[test]
    fn attack_speed_effect_expires() {
        let mut ids = ItemIdGen::default();
        let mut player = fighter(&mut ids);
        player.apply_effect(EffectKind::AttackSpeed, 0.5, 0.05);
        assert_eq!(player.stats().attack_speed, 1.5);
        assert_eq!(player.tick_effects(0.05), vec![EffectKind::AttackSpeed]);
        assert_eq!(player.stats().attack_speed, 1.0);
    }
}
