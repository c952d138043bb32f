//! Player skills.
//!
//! Skills form a closed set. Active skills carry a cooldown and are cast
//! automatically by the battle loop through [`trigger`]. Passive skills have a
//! zero cooldown: their effect is applied once by [`acquire`] and they are
//! never triggered.
mod trigger;

pub use trigger::{SkillContext, trigger};

use bitflags::bitflags;

use crate::entity::Player;
use crate::stats::StatKind;

/// Every learnable skill.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::EnumIter,
    strum::EnumString,
    strum::AsRefStr,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SkillKind {
    Fireball,
    Whirlwind,
    SecondWind,
    Barrier,
    Frenzy,
    DivineGuard,
    Shockwave,
    Counter,
    FirstStrike,
    Scholar,
    TreasureHunter,
    Toughness,
    Vampirism,
}

/// Who a skill affects when cast.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkillTarget {
    SingleEnemy,
    AllEnemies,
    SelfOnly,
}

bitflags! {
    /// One-time skill effects that battle and loot code query.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct PassiveFlags: u8 {
        const COUNTER = 1 << 0;
        const FIRST_STRIKE = 1 << 1;
        const SCHOLAR = 1 << 2;
        const TREASURE_HUNTER = 1 << 3;
        const TOUGHNESS = 1 << 4;
        const VAMPIRISM = 1 << 5;
    }
}

impl SkillKind {
    /// Seconds between casts. Zero marks a passive.
    pub const fn cooldown(self) -> f64 {
        match self {
            SkillKind::Fireball => 6.0,
            SkillKind::Whirlwind => 8.0,
            SkillKind::SecondWind => 10.0,
            SkillKind::Barrier => 12.0,
            SkillKind::Frenzy => 15.0,
            SkillKind::DivineGuard => 25.0,
            SkillKind::Shockwave => 9.0,
            SkillKind::Counter
            | SkillKind::FirstStrike
            | SkillKind::Scholar
            | SkillKind::TreasureHunter
            | SkillKind::Toughness
            | SkillKind::Vampirism => 0.0,
        }
    }

    pub const fn is_passive(self) -> bool {
        self.cooldown() == 0.0
    }

    pub const fn target(self) -> SkillTarget {
        match self {
            SkillKind::Fireball | SkillKind::Shockwave => SkillTarget::SingleEnemy,
            SkillKind::Whirlwind => SkillTarget::AllEnemies,
            _ => SkillTarget::SelfOnly,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            SkillKind::Fireball => "Fireball",
            SkillKind::Whirlwind => "Whirlwind",
            SkillKind::SecondWind => "Second Wind",
            SkillKind::Barrier => "Barrier",
            SkillKind::Frenzy => "Frenzy",
            SkillKind::DivineGuard => "Divine Guard",
            SkillKind::Shockwave => "Shockwave",
            SkillKind::Counter => "Counter",
            SkillKind::FirstStrike => "First Strike",
            SkillKind::Scholar => "Scholar",
            SkillKind::TreasureHunter => "Treasure Hunter",
            SkillKind::Toughness => "Toughness",
            SkillKind::Vampirism => "Vampirism",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            SkillKind::Fireball => "Hurls a fireball at one enemy for double attack damage",
            SkillKind::Whirlwind => "Strikes every enemy at once",
            SkillKind::SecondWind => "Recovers 20% of max HP",
            SkillKind::Barrier => "Absorbs damage equal to 25% of max HP for 4s",
            SkillKind::Frenzy => "Attack speed +0.5 for 5s",
            SkillKind::DivineGuard => "Immune to all damage for 2s",
            SkillKind::Shockwave => "Stuns one enemy for 2s",
            SkillKind::Counter => "50% chance to strike back after dodging",
            SkillKind::FirstStrike => "The first hit of each battle deals double damage",
            SkillKind::Scholar => "Gain 25% more experience",
            SkillKind::TreasureHunter => "Better odds of finding loot",
            SkillKind::Toughness => "Permanently gain 18 max HP",
            SkillKind::Vampirism => "Permanently gain 10% lifesteal",
        }
    }

    /// Passive flag granted on acquisition, if any.
    pub const fn passive_flag(self) -> PassiveFlags {
        match self {
            SkillKind::Counter => PassiveFlags::COUNTER,
            SkillKind::FirstStrike => PassiveFlags::FIRST_STRIKE,
            SkillKind::Scholar => PassiveFlags::SCHOLAR,
            SkillKind::TreasureHunter => PassiveFlags::TREASURE_HUNTER,
            SkillKind::Toughness => PassiveFlags::TOUGHNESS,
            SkillKind::Vampirism => PassiveFlags::VAMPIRISM,
            _ => PassiveFlags::empty(),
        }
    }
}

impl core::fmt::Display for SkillKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// A learned skill and its cooldown progress.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Skill {
    pub kind: SkillKind,
    /// Seconds since the last cast.
    pub cooldown_timer: f64,
}

impl Skill {
    pub fn new(kind: SkillKind) -> Self {
        Self {
            kind,
            cooldown_timer: 0.0,
        }
    }

    pub fn advance(&mut self, dt: f64) {
        if !self.kind.is_passive() {
            self.cooldown_timer += dt;
        }
    }

    pub fn is_ready(&self) -> bool {
        !self.kind.is_passive() && self.cooldown_timer + 1e-9 >= self.kind.cooldown()
    }

    pub fn reset(&mut self) {
        self.cooldown_timer = 0.0;
    }
}

/// Teaches `kind` to the player, applying a passive's effect at once.
///
/// Returns false if the skill was already known.
pub fn acquire(player: &mut Player, kind: SkillKind) -> bool {
    if player.knows(kind) {
        return false;
    }
    player.skills.push(Skill::new(kind));
    player.passives |= kind.passive_flag();

    match kind {
        SkillKind::Toughness => {
            for _ in 0..3 {
                player.upgrade_base(StatKind::MaxHp);
            }
        }
        SkillKind::Vampirism => {
            player.upgrade_base(StatKind::Lifesteal);
            player.upgrade_base(StatKind::Lifesteal);
        }
        _ => {}
    }
    tracing::debug!(skill = kind.name(), "skill learned");
    true
}

/// Skills the player does not know yet.
pub fn unlearned(player: &Player) -> Vec<SkillKind> {
    use strum::IntoEnumIterator;
    SkillKind::iter().filter(|kind| !player.knows(*kind)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::PlayerClass;
    use crate::items::ItemIdGen;

    fn fighter() -> Player {
        Player::new(PlayerClass::Fighter, &mut ItemIdGen::default())
    }

    #[test]
    fn toughness_applies_once() {
        let mut player = fighter();
        let before = player.stats().max_hp;
        assert!(acquire(&mut player, SkillKind::Toughness));
        assert_eq!(player.stats().max_hp, before + 18.0);
        assert_eq!(player.hp(), player.stats().max_hp);
        assert!(!acquire(&mut player, SkillKind::Toughness));
        assert_eq!(player.stats().max_hp, before + 18.0);
        assert!(player.passives.contains(PassiveFlags::TOUGHNESS));
    }

    #[test]
    fn passives_never_ready() {
        let mut counter = Skill::new(SkillKind::Counter);
        counter.advance(100.0);
        assert!(!counter.is_ready());

        let mut fireball = Skill::new(SkillKind::Fireball);
        for _ in 0..119 {
            fireball.advance(0.05);
        }
        assert!(!fireball.is_ready());
        fireball.advance(0.05);
        assert!(fireball.is_ready());
    }

    #[test]
    fn unlearned_excludes_known() {
        let mut player = fighter();
        let all = unlearned(&player).len();
        acquire(&mut player, SkillKind::Scholar);
        let rest = unlearned(&player);
        assert_eq!(rest.len(), all - 1);
        assert!(!rest.contains(&SkillKind::Scholar));
    }
}
