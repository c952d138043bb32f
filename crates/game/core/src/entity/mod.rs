//! Combatants: the persistent player and per-room enemies.
mod boss;
mod effects;
mod enemy;
mod player;

pub use boss::{BossAction, BossBehaviour};
pub use effects::{EffectKind, TimedEffect, TimedEffects};
pub use enemy::{Enemy, EnemyKind, EnemyTemplate, Scaling, random_living};
pub use player::{LoadoutError, Player, PlayerClass, PotionEffect};
