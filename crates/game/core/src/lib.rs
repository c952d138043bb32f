//! Deterministic rules for the Descent auto-battler.
//!
//! `descent-core` owns stats, items, skills, combatants, the fixed-timestep
//! battle loop and the room-by-room run controller. It performs no I/O: the
//! caller supplies a seeded [`RngSource`], an [`EnemyOracle`], a [`Chooser`]
//! for decision points and a [`FrameSink`] for snapshots. All state for one
//! battle flows through [`combat::Battle`]; all state for one game flows
//! through [`run::Run`].
pub mod combat;
pub mod config;
pub mod entity;
pub mod env;
pub mod error;
pub mod items;
pub mod progression;
pub mod run;
pub mod skills;
pub mod stats;
pub mod view;

pub use combat::{
    Actor, Battle, BattleEnv, BattleError, BattleEvent, BattleReport, BattleStatus, Side,
    StrikeOutcome, calculate_damage, resolve_strike,
};
pub use config::{GameConfig, GateConfig, LootConfig, ShopConfig, SkillConfig, SummonConfig};
pub use entity::{
    BossAction, BossBehaviour, EffectKind, Enemy, EnemyKind, EnemyTemplate, LoadoutError, Player,
    PlayerClass, PotionEffect, Scaling, TimedEffect, TimedEffects,
};
pub use env::{BuiltinEnemies, EnemyOracle, PcgRng, RngSource, ScriptedRng, builtin_template};
pub use error::{ErrorSeverity, GameError};
pub use items::{
    EquipError, Equipment, EquipmentKind, InventoryError, Item, ItemId, ItemIdGen, Potion,
    ShopOffer, ShopStock, Slots, StatBoost, Tier, random_tier,
};
pub use progression::{BossStage, Gates, Loot, gain_xp, level_up_options, roll_loot, skill_offer};
pub use run::{
    ChoiceKind, ChoiceOption, Decision, Progress, Run, RunError, RunOutcome, RunSummary, drive,
};
pub use skills::{PassiveFlags, Skill, SkillKind, SkillTarget, acquire, trigger};
pub use stats::{Modifier, ModifierOp, ModifierSource, ModifierStack, StatError, StatKind, Stats};
pub use view::{Chooser, Frame, FrameSink, NullSink, Overlay, RecordingSink, ScriptedChooser};
