//! Timed effects carried by the player during a battle.
//!
//! Durations are simulated seconds and count down once per tick. An effect
//! that reaches zero is removed and reported to the caller so any stat
//! modifier it owns can be dropped.

use arrayvec::ArrayVec;

use crate::config::GameConfig;

/// Kinds of timed effect.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::Display, strum::EnumIter,
)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EffectKind {
    /// Absorbs incoming damage up to `magnitude`.
    Shield,
    /// Adds `magnitude` attacks per second.
    AttackSpeed,
    /// Zeroes all incoming damage.
    Invincible,
}

/// One active effect.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimedEffect {
    pub kind: EffectKind,
    pub magnitude: f64,
    /// Seconds left before expiry.
    pub remaining: f64,
}

/// Active timed effects, at most one per kind.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimedEffects {
    effects: ArrayVec<TimedEffect, { GameConfig::MAX_TIMED_EFFECTS }>,
}

impl TimedEffects {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts `kind`, replacing any running effect of the same kind.
    pub fn apply(&mut self, kind: EffectKind, magnitude: f64, duration: f64) {
        let effect = TimedEffect {
            kind,
            magnitude,
            remaining: duration,
        };
        if let Some(existing) = self.effects.iter_mut().find(|e| e.kind == kind) {
            *existing = effect;
        } else if !self.effects.is_full() {
            self.effects.push(effect);
        }
    }

    pub fn get(&self, kind: EffectKind) -> Option<&TimedEffect> {
        self.effects.iter().find(|e| e.kind == kind)
    }

    pub fn is_active(&self, kind: EffectKind) -> bool {
        self.get(kind).is_some()
    }

    /// Counts every effect down by `dt` and returns the kinds that expired.
    pub fn tick(&mut self, dt: f64) -> ArrayVec<EffectKind, { GameConfig::MAX_TIMED_EFFECTS }> {
        let mut expired = ArrayVec::new();
        for effect in &mut self.effects {
            effect.remaining -= dt;
            if effect.remaining <= 1e-9 {
                expired.push(effect.kind);
            }
        }
        self.effects.retain(|e| !expired.contains(&e.kind));
        expired
    }

    /// Soaks `damage` into an active shield and returns `(remaining, absorbed)`.
    ///
    /// A shield drained to zero is removed.
    pub fn absorb(&mut self, damage: f64) -> (f64, f64) {
        let Some(position) = self
            .effects
            .iter()
            .position(|e| e.kind == EffectKind::Shield)
        else {
            return (damage, 0.0);
        };

        let shield = &mut self.effects[position];
        let absorbed = damage.min(shield.magnitude);
        shield.magnitude -= absorbed;
        if shield.magnitude <= 0.0 {
            self.effects.remove(position);
        }
        (damage - absorbed, absorbed)
    }

    pub fn remove(&mut self, kind: EffectKind) -> Option<TimedEffect> {
        let position = self.effects.iter().position(|e| e.kind == kind)?;
        Some(self.effects.remove(position))
    }

    pub fn clear(&mut self) {
        self.effects.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &TimedEffect> {
        self.effects.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}
