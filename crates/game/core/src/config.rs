//! Balance configuration.

/// Game configuration constants and tunable parameters.
///
/// Every balance knob the battle engine and the run controller read lives
/// here. Loaders deserialize this from TOML; missing fields fall back to the
/// canonical defaults.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameConfig {
    /// Simulated seconds advanced by one battle tick.
    pub tick_seconds: f64,
    /// Seconds between 1 HP heals at `health_regen == 1`.
    pub regen_base_interval: f64,
    /// Per-point shrink factor of the regen interval.
    pub regen_decay: f64,

    /// Experience required for the first level-up.
    pub initial_xp_to_next: u64,
    /// Growth factor of `xp_to_next` per level (floored).
    pub xp_growth: f64,
    /// Multiplier applied to XP earned from a boss battle.
    pub boss_xp_multiplier: f64,

    /// A battle still running after this many ticks is aborted.
    pub max_battle_ticks: u64,

    pub loot: LootConfig,
    pub gates: GateConfig,
    pub skills: SkillConfig,
    pub shop: ShopConfig,
    pub summon: SummonConfig,
}

/// Post-battle loot roll parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LootConfig {
    pub potion_chance: f64,
    pub equipment_chance: f64,
    pub gold_chance: f64,
    /// Added to every chance per point of luck.
    pub luck_bonus: f64,
    /// Added to every chance when the player knows Treasure Hunter.
    pub treasure_hunter_bonus: f64,
    /// Gold drops are uniform in `1..=gold_base + room`.
    pub gold_base: u32,
    /// Rooms per extra equipment level cap (`1 + room / rooms_per_level`).
    pub rooms_per_equipment_level: u32,
}

/// Shop and boss gating parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GateConfig {
    /// Shop probability starts growing after this room.
    pub shop_after_room: u32,
    pub shop_increment: f64,
    /// Boss probability starts growing after this room.
    pub boss_after_room: u32,
    pub boss_increment: f64,
    /// Rooms on which the enemy count cap grows by one.
    pub rooms_per_extra_enemy: u32,
    pub max_enemies: usize,
}

/// Skill unlock parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SkillConfig {
    pub unlock_chance: f64,
    pub unlock_luck_bonus: f64,
    pub offer_count: usize,
}

/// Shop pricing in gold.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ShopConfig {
    pub healing_potion_price: u32,
    pub stat_potion_price: u32,
    /// Equipment price is `equipment_price * tier rank`.
    pub equipment_price: u32,
}

/// Final boss minion summoning.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SummonConfig {
    pub interval_seconds: f64,
    pub max_alive: usize,
    /// Fraction of a regular room enemy's hp/attack a minion keeps.
    pub weakening: f64,
}

impl GameConfig {
    // ===== compile-time constants used as type parameters =====
    pub const POTION_SLOTS: usize = 4;
    pub const EQUIPMENT_SLOTS: usize = 4;
    pub const LEVEL_UP_OPTIONS: usize = 3;
    pub const MAX_LUCK: u8 = 10;
    pub const MAX_TIMED_EFFECTS: usize = 4;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_TICK_SECONDS: f64 = 0.05;

    pub fn new() -> Self {
        Self {
            tick_seconds: Self::DEFAULT_TICK_SECONDS,
            regen_base_interval: 1.0,
            regen_decay: 0.95,
            initial_xp_to_next: 10,
            xp_growth: 1.5,
            boss_xp_multiplier: 2.0,
            max_battle_ticks: 24_000,
            loot: LootConfig::default(),
            gates: GateConfig::default(),
            skills: SkillConfig::default(),
            shop: ShopConfig::default(),
            summon: SummonConfig::default(),
        }
    }

    /// Returns a copy with every out-of-range value pulled back into range.
    ///
    /// A non-positive tick would stall the battle clock, so it is reset to the
    /// default.
    pub fn sanitized(mut self) -> Self {
        if self.tick_seconds.is_nan() || self.tick_seconds <= 0.0 {
            tracing::warn!(
                "tick_seconds {} is not positive, using {}",
                self.tick_seconds,
                Self::DEFAULT_TICK_SECONDS
            );
            self.tick_seconds = Self::DEFAULT_TICK_SECONDS;
        }
        if self.regen_base_interval.is_nan() || self.regen_base_interval <= 0.0 {
            tracing::warn!("regen_base_interval must be positive, using 1.0");
            self.regen_base_interval = 1.0;
        }
        self.regen_decay = self.regen_decay.clamp(0.01, 1.0);
        self.xp_growth = self.xp_growth.max(1.0);
        self.initial_xp_to_next = self.initial_xp_to_next.max(1);
        self.max_battle_ticks = self.max_battle_ticks.max(1);
        self.gates.max_enemies = self.gates.max_enemies.max(1);
        self.gates.rooms_per_extra_enemy = self.gates.rooms_per_extra_enemy.max(1);
        self.loot.rooms_per_equipment_level = self.loot.rooms_per_equipment_level.max(1);
        self.skills.offer_count = self.skills.offer_count.max(1);
        if self.summon.interval_seconds.is_nan() || self.summon.interval_seconds <= 0.0 {
            self.summon.interval_seconds = SummonConfig::default().interval_seconds;
        }
        self
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for LootConfig {
    fn default() -> Self {
        Self {
            potion_chance: 0.30,
            equipment_chance: 0.20,
            gold_chance: 0.50,
            luck_bonus: 0.02,
            treasure_hunter_bonus: 0.10,
            gold_base: 5,
            rooms_per_equipment_level: 10,
        }
    }
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            shop_after_room: 5,
            shop_increment: 0.10,
            boss_after_room: 10,
            boss_increment: 0.05,
            rooms_per_extra_enemy: 5,
            max_enemies: 4,
        }
    }
}

impl Default for SkillConfig {
    fn default() -> Self {
        Self {
            unlock_chance: 0.35,
            unlock_luck_bonus: 0.01,
            offer_count: 3,
        }
    }
}

impl Default for ShopConfig {
    fn default() -> Self {
        Self {
            healing_potion_price: 15,
            stat_potion_price: 20,
            equipment_price: 30,
        }
    }
}

impl Default for SummonConfig {
    fn default() -> Self {
        Self {
            interval_seconds: 7.0,
            max_alive: 3,
            weakening: 0.5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_resets_broken_tick() {
        let mut config = GameConfig::default();
        config.tick_seconds = 0.0;
        config.regen_decay = 3.0;
        config.gates.max_enemies = 0;
        let config = config.sanitized();
        assert_eq!(config.tick_seconds, GameConfig::DEFAULT_TICK_SECONDS);
        assert_eq!(config.regen_decay, 1.0);
        assert_eq!(config.gates.max_enemies, 1);
    }

    #[test]
    fn defaults_survive_sanitize() {
        assert_eq!(GameConfig::default().sanitized(), GameConfig::default());
    }
}
