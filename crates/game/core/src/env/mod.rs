//! Inputs the rules consume but do not own.
//!
//! The random source and enemy templates come from outside the simulation.
//! Swapping either for a scripted stand-in makes runs reproducible in tests.
mod enemies;
mod rng;

pub use enemies::{BuiltinEnemies, EnemyOracle, builtin_template};
pub use rng::{PcgRng, RngSource, ScriptedRng, mix_seed};
