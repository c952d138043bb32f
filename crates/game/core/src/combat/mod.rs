//! Battle simulation.
//!
//! # Architecture
//!
//! - **Pure rolls**: [`resolve_strike`] turns two stat bundles and the random
//!   source into a dodge or a raw hit; it touches no state
//! - **Battle loop**: [`Battle`] applies hits, skills, effects, regen and
//!   boss behaviour tick by tick and records a [`BattleEvent`] log
//! - **Deterministic**: the same seed and starting stats replay the same log

pub mod battle;
pub mod damage;
pub mod event;
pub mod hit;
pub mod regen;
pub mod result;

pub use battle::{Battle, BattleEnv, BattleError, BattleReport, BattleStatus};
pub use damage::{MIN_DAMAGE, calculate_damage, counter_damage};
pub use event::{Actor, BattleEvent, Side, SkillHit};
pub use hit::{check_crit, check_dodge};
pub use regen::{regen_interval, regen_ticks};
pub use result::{StrikeOutcome, resolve_strike};
