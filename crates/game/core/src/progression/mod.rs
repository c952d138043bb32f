//! Between-battle rules: experience, level-up choices, loot and room gates.
//!
//! These are plain functions over the player and the RNG. The run
//! controller sequences them and turns every player choice into a decision
//! point.

mod choices;
mod gates;
mod loot;
mod xp;

pub use choices::{level_up_options, skill_offer};
pub use gates::{BossStage, Gates, room_enemies};
pub use loot::{Loot, roll_loot};
pub use xp::gain_xp;
