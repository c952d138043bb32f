//! Consumable potions.

use crate::env::RngSource;
use crate::stats::StatKind;

/// A consumable potion.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Potion {
    /// Restores `percent` of max HP immediately, capped at max.
    Healing { percent: f64 },
    /// Boosts one stat for the next battle only.
    Stat(StatKind),
}

impl Potion {
    pub const SMALL_HEAL: f64 = 0.3;
    pub const LARGE_HEAL: f64 = 0.6;

    /// Rolls a random potion: 60% healing (one in four large), 40% stat.
    pub fn roll(rng: &mut dyn RngSource) -> Self {
        if rng.chance(0.6) {
            let percent = if rng.chance(0.25) {
                Self::LARGE_HEAL
            } else {
                Self::SMALL_HEAL
            };
            Potion::Healing { percent }
        } else {
            let pool = &StatKind::LEVEL_UP_POOL;
            Potion::Stat(pool[rng.index(pool.len())])
        }
    }

    pub fn name(&self) -> String {
        match self {
            Potion::Healing { percent } => {
                format!("Healing Potion ({:.0}%)", percent * 100.0)
            }
            Potion::Stat(stat) => format!("Potion of {stat}"),
        }
    }
}

/// How a consumed stat potion changes its stat for one battle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StatBoost {
    /// The stat was zero when the potion was drunk: `+1`.
    #[strum(to_string = "+1")]
    AddOne,
    /// The stat was non-zero: `×2`.
    #[strum(to_string = "x2")]
    Double,
}

impl StatBoost {
    /// Boost chosen for a stat currently at `value`.
    pub fn for_value(value: f64) -> Self {
        if value == 0.0 {
            StatBoost::AddOne
        } else {
            StatBoost::Double
        }
    }
}
