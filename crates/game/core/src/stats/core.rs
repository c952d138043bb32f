//! The stat bundle every combatant carries.
//!
//! `Stats` is plain data. Current HP is not part of the bundle: it is live
//! battle state owned by the entity, while `max_hp` is a stat that equipment
//! and potions modify.

use crate::config::GameConfig;
use crate::error::{ErrorSeverity, GameError};

/// Names of the individual stats.
///
/// Parsing accepts the snake_case name (`"attack_speed"`), case-insensitively.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum StatKind {
    Attack,
    AttackSpeed,
    CritChance,
    CritDamage,
    MaxHp,
    Defence,
    HealthRegen,
    ThornDamage,
    Lifesteal,
    DodgeChance,
    Luck,
}

impl StatKind {
    /// Stats offered on level-up. Luck joins the pool only while below its cap.
    pub const LEVEL_UP_POOL: [StatKind; 10] = [
        StatKind::Attack,
        StatKind::AttackSpeed,
        StatKind::CritChance,
        StatKind::CritDamage,
        StatKind::MaxHp,
        StatKind::Defence,
        StatKind::HealthRegen,
        StatKind::ThornDamage,
        StatKind::Lifesteal,
        StatKind::DodgeChance,
    ];

    /// Size of one upgrade step.
    pub const fn step(self) -> f64 {
        match self {
            StatKind::Attack => 1.2,
            StatKind::AttackSpeed => 0.12,
            StatKind::CritChance => 0.05,
            StatKind::CritDamage => 0.1,
            StatKind::MaxHp => 6.0,
            StatKind::Defence => 1.0,
            StatKind::HealthRegen => 1.0,
            StatKind::ThornDamage => 1.0,
            StatKind::Lifesteal => 0.05,
            StatKind::DodgeChance => 0.05,
            StatKind::Luck => 1.0,
        }
    }

    /// Lowest value the stat may take.
    pub const fn floor(self) -> f64 {
        match self {
            StatKind::Attack | StatKind::CritDamage | StatKind::MaxHp => 1.0,
            StatKind::AttackSpeed => 0.1,
            _ => 0.0,
        }
    }

    /// Highest value the stat may take.
    pub const fn cap(self) -> f64 {
        match self {
            StatKind::CritChance | StatKind::Lifesteal => 1.0,
            StatKind::DodgeChance => 0.7,
            StatKind::Luck => GameConfig::MAX_LUCK as f64,
            _ => f64::INFINITY,
        }
    }

    /// Whether values of this stat are fractions shown as percentages.
    pub const fn is_fraction(self) -> bool {
        matches!(
            self,
            StatKind::CritChance | StatKind::Lifesteal | StatKind::DodgeChance
        )
    }
}

/// Errors raised by stat operations addressed by name.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StatError {
    #[error("invalid stat name '{0}'")]
    InvalidStatName(String),
}

impl GameError for StatError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidStatName(_) => "STAT_INVALID_NAME",
        }
    }
}

/// Attribute bundle shared by the player and enemies.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Stats {
    pub attack: f64,
    /// Attacks per second.
    pub attack_speed: f64,
    pub crit_chance: f64,
    /// Damage multiplier on a critical hit.
    pub crit_damage: f64,
    pub max_hp: f64,
    /// Flat damage reduction.
    pub defence: f64,
    pub health_regen: f64,
    /// Flat damage reflected to an attacker on every landed hit.
    pub thorn_damage: f64,
    pub lifesteal: f64,
    pub dodge_chance: f64,
    pub luck: u8,
}

impl Stats {
    pub fn get(&self, kind: StatKind) -> f64 {
        match kind {
            StatKind::Attack => self.attack,
            StatKind::AttackSpeed => self.attack_speed,
            StatKind::CritChance => self.crit_chance,
            StatKind::CritDamage => self.crit_damage,
            StatKind::MaxHp => self.max_hp,
            StatKind::Defence => self.defence,
            StatKind::HealthRegen => self.health_regen,
            StatKind::ThornDamage => self.thorn_damage,
            StatKind::Lifesteal => self.lifesteal,
            StatKind::DodgeChance => self.dodge_chance,
            StatKind::Luck => self.luck as f64,
        }
    }

    /// Sets a stat, clamped into `[floor, cap]`. Luck is rounded.
    pub fn set(&mut self, kind: StatKind, value: f64) {
        let value = if value.is_nan() {
            kind.floor()
        } else {
            value.clamp(kind.floor(), kind.cap())
        };
        match kind {
            StatKind::Attack => self.attack = value,
            StatKind::AttackSpeed => self.attack_speed = value,
            StatKind::CritChance => self.crit_chance = value,
            StatKind::CritDamage => self.crit_damage = value,
            StatKind::MaxHp => self.max_hp = value,
            StatKind::Defence => self.defence = value,
            StatKind::HealthRegen => self.health_regen = value,
            StatKind::ThornDamage => self.thorn_damage = value,
            StatKind::Lifesteal => self.lifesteal = value,
            StatKind::DodgeChance => self.dodge_chance = value,
            StatKind::Luck => self.luck = value.round() as u8,
        }
    }

    /// Applies one upgrade step, respecting the stat's cap.
    pub fn upgrade(&mut self, kind: StatKind) {
        let next = self.get(kind) + kind.step();
        self.set(kind, next);
    }

    /// Reverses one upgrade step, respecting the stat's floor.
    pub fn downgrade(&mut self, kind: StatKind) {
        let next = self.get(kind) - kind.step();
        self.set(kind, next);
    }

    /// Upgrades a stat addressed by its snake_case name.
    pub fn upgrade_named(&mut self, name: &str) -> Result<StatKind, StatError> {
        let kind = parse_stat(name)?;
        self.upgrade(kind);
        Ok(kind)
    }

    /// Downgrades a stat addressed by its snake_case name.
    pub fn downgrade_named(&mut self, name: &str) -> Result<StatKind, StatError> {
        let kind = parse_stat(name)?;
        self.downgrade(kind);
        Ok(kind)
    }

    /// True when every stat lies within its documented range.
    pub fn within_bounds(&self) -> bool {
        use strum::IntoEnumIterator;
        StatKind::iter().all(|kind| {
            let v = self.get(kind);
            v >= kind.floor() && v <= kind.cap()
        })
    }
}

impl Default for Stats {
    /// A bare combatant: one attack per second, no extras.
    fn default() -> Self {
        Self {
            attack: 1.0,
            attack_speed: 1.0,
            crit_chance: 0.0,
            crit_damage: 1.5,
            max_hp: 10.0,
            defence: 0.0,
            health_regen: 0.0,
            thorn_damage: 0.0,
            lifesteal: 0.0,
            dodge_chance: 0.0,
            luck: 0,
        }
    }
}

/// Parses a stat name, mapping failures to [`StatError::InvalidStatName`].
pub fn parse_stat(name: &str) -> Result<StatKind, StatError> {
    name.trim()
        .parse::<StatKind>()
        .map_err(|_| StatError::InvalidStatName(name.to_string()))
}
