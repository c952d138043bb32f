//! Stat system.
//!
//! # Architecture
//!
//! ```text
//! [ Base Stats ]  permanent, changed by level-ups and passive skills
//!      ↓
//! [ Modifier Stack ]  equipment, stat potions, timed effects
//!      ↓
//! [ Effective Stats ]  what combat reads
//! ```
//!
//! Base stats are the single source of truth; effective stats are a cache
//! recomputed whenever the stack changes.

pub mod core;
pub mod modifiers;

pub use core::{StatError, StatKind, Stats, parse_stat};
pub use modifiers::{Modifier, ModifierOp, ModifierSource, ModifierStack};
