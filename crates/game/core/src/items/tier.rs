//! Equipment rarity tiers and luck-weighted tier selection.

use crate::env::RngSource;

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
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Tier {
    Basic,
    Good,
    Rare,
    Awesome,
    Legendary,
}

impl Tier {
    pub const ALL: [Tier; 5] = [
        Tier::Basic,
        Tier::Good,
        Tier::Rare,
        Tier::Awesome,
        Tier::Legendary,
    ];

    /// 1 for Basic through 5 for Legendary.
    pub const fn rank(self) -> u32 {
        match self {
            Tier::Basic => 1,
            Tier::Good => 2,
            Tier::Rare => 3,
            Tier::Awesome => 4,
            Tier::Legendary => 5,
        }
    }

    /// Number of random bonus stats an item of this tier rolls.
    pub const fn bonus_count(self) -> usize {
        match self {
            Tier::Basic => 0,
            Tier::Good | Tier::Rare => 1,
            Tier::Awesome | Tier::Legendary => 2,
        }
    }

    /// Range `[min, max)` of each fractional bonus.
    pub const fn bonus_range(self) -> (f64, f64) {
        match self {
            Tier::Basic => (0.0, 0.0),
            Tier::Good => (0.05, 0.10),
            Tier::Rare => (0.10, 0.20),
            Tier::Awesome => (0.15, 0.25),
            Tier::Legendary => (0.25, 0.40),
        }
    }
}

/// Tier probabilities per luck value (rows: luck 0..=10, columns: Basic..Legendary).
///
/// Each row sums to 1.0 and mass moves toward rarer tiers as luck grows.
pub const TIER_WEIGHTS: [[f64; 5]; 11] = [
    [0.60, 0.25, 0.10, 0.04, 0.01],
    [0.55, 0.27, 0.12, 0.05, 0.01],
    [0.50, 0.28, 0.14, 0.06, 0.02],
    [0.45, 0.29, 0.16, 0.07, 0.03],
    [0.40, 0.30, 0.18, 0.08, 0.04],
    [0.35, 0.30, 0.20, 0.10, 0.05],
    [0.30, 0.30, 0.22, 0.12, 0.06],
    [0.25, 0.30, 0.24, 0.14, 0.07],
    [0.20, 0.30, 0.26, 0.16, 0.08],
    [0.15, 0.30, 0.28, 0.17, 0.10],
    [0.10, 0.28, 0.30, 0.20, 0.12],
];

/// Picks a tier by weighted random choice from the row for `luck`.
///
/// Luck above 10 uses the last row.
pub fn random_tier(luck: u8, rng: &mut dyn RngSource) -> Tier {
    let row = &TIER_WEIGHTS[(luck as usize).min(TIER_WEIGHTS.len() - 1)];
    let roll = rng.next_f64();
    let mut cumulative = 0.0;
    for (tier, weight) in Tier::ALL.iter().zip(row.iter()) {
        cumulative += weight;
        if roll < cumulative {
            return *tier;
        }
    }
    // Rounding can leave the cumulative sum a hair under 1.0.
    Tier::Legendary
}
