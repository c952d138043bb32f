//! Modifier stack - structural stat layering.
//!
//! Effective stats are never edited in place by temporary sources. Instead
//! each source pushes [`Modifier`]s onto a [`ModifierStack`], and effective
//! stats are recomputed as `base` folded through the stack in insertion
//! order:
//!
//! ```text
//! effective = fold(base, stack, |stats, m| m.op applied to stats[m.stat])
//! ```
//!
//! Removing a source deletes its entries and recomputes from `base`, so the
//! result is bit-for-bit what it would have been had the source never been
//! added. Two items bonus-modifying the same stat therefore never share a
//! baseline.

use super::core::{StatKind, Stats};
use crate::entity::EffectKind;
use crate::items::ItemId;

/// Who owns a modifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ModifierSource {
    /// An equipped item, keyed by its identity.
    Equipment(ItemId),
    /// A single-battle stat potion boost.
    StatBoost,
    /// A timed effect active during battle.
    Effect(EffectKind),
}

/// How a modifier changes its stat.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ModifierOp {
    /// Repeat the stat's upgrade step `n` times.
    Upgrade(u32),
    /// Multiply the stat by the factor.
    Multiply(f64),
    /// Add a flat amount.
    Add(f64),
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Modifier {
    pub source: ModifierSource,
    pub stat: StatKind,
    pub op: ModifierOp,
}

impl Modifier {
    pub fn new(source: ModifierSource, stat: StatKind, op: ModifierOp) -> Self {
        Self { source, stat, op }
    }

    fn apply_to(&self, stats: &mut Stats) {
        match self.op {
            ModifierOp::Upgrade(levels) => {
                for _ in 0..levels {
                    stats.upgrade(self.stat);
                }
            }
            ModifierOp::Multiply(factor) => {
                let value = stats.get(self.stat) * factor;
                stats.set(self.stat, value);
            }
            ModifierOp::Add(amount) => {
                let value = stats.get(self.stat) + amount;
                stats.set(self.stat, value);
            }
        }
    }
}

/// Ordered list of active modifiers.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModifierStack {
    entries: Vec<Modifier>,
}

impl ModifierStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, modifier: Modifier) {
        self.entries.push(modifier);
    }

    pub fn extend(&mut self, modifiers: impl IntoIterator<Item = Modifier>) {
        self.entries.extend(modifiers);
    }

    /// Removes every modifier owned by `source`, returning how many were removed.
    pub fn remove_source(&mut self, source: ModifierSource) -> usize {
        let before = self.entries.len();
        self.entries.retain(|m| m.source != source);
        before - self.entries.len()
    }

    pub fn has_source(&self, source: ModifierSource) -> bool {
        self.entries.iter().any(|m| m.source == source)
    }

    /// Folds `base` through the stack.
    pub fn apply(&self, base: &Stats) -> Stats {
        let mut stats = base.clone();
        for modifier in &self.entries {
            modifier.apply_to(&mut stats);
        }
        stats
    }

    pub fn iter(&self) -> impl Iterator<Item = &Modifier> {
        self.entries.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
