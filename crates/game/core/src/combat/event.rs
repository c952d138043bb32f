//! Battle log entries.
//!
//! Every entry renders as one human-readable line through `Display`; the
//! structured fields let presenters build overlays without parsing text.

use core::fmt;

use crate::entity::{EffectKind, Enemy};
use crate::skills::SkillKind;

/// Which side of the battle an actor is on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Side {
    Player,
    /// Index into the battle's enemy list.
    Enemy(usize),
}

/// A named participant in an event.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Actor {
    pub side: Side,
    pub name: String,
}

impl Actor {
    pub const PLAYER_NAME: &'static str = "Player";

    pub fn player() -> Self {
        Self {
            side: Side::Player,
            name: Self::PLAYER_NAME.to_owned(),
        }
    }

    pub fn enemy(index: usize, enemy: &Enemy) -> Self {
        Self {
            side: Side::Enemy(index),
            name: enemy.name.clone(),
        }
    }
}

/// One target struck by a damaging skill.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillHit {
    pub target: Actor,
    pub damage: f64,
}

/// Something that happened during a battle.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BattleEvent {
    /// A landed strike.
    Hit {
        attacker: Actor,
        defender: Actor,
        /// Damage dealt to HP after shields.
        damage: f64,
        crit: bool,
        first_strike: bool,
        /// Damage soaked by a shield.
        absorbed: f64,
        /// Damage reflected onto the attacker.
        thorns: f64,
    },
    Dodge {
        attacker: Actor,
        defender: Actor,
    },
    /// The player took no damage thanks to invincibility.
    Invulnerable {
        attacker: Actor,
    },
    /// The player struck back after dodging.
    Counter {
        target: Actor,
        damage: f64,
    },
    Lifesteal {
        actor: Actor,
        healed: f64,
    },
    SkillHit {
        skill: SkillKind,
        hits: Vec<SkillHit>,
    },
    SkillHeal {
        skill: SkillKind,
        healed: f64,
    },
    SkillEffect {
        skill: SkillKind,
        effect: EffectKind,
        magnitude: f64,
        duration: f64,
    },
    Stunned {
        skill: SkillKind,
        target: Actor,
        duration: f64,
    },
    EffectExpired {
        effect: EffectKind,
    },
    Enraged {
        boss: Actor,
    },
    Siphon {
        boss: Actor,
        damage: f64,
    },
    Summoned {
        boss: Actor,
        minion: Actor,
    },
    Defeated {
        actor: Actor,
    },
    Victory,
    Defeat,
}

impl BattleEvent {
    /// Overlay text for the row of the actor this event highlights.
    pub fn flash(&self) -> Option<(Side, &'static str)> {
        match self {
            BattleEvent::Hit {
                defender,
                crit: true,
                ..
            } => Some((defender.side, "CRIT!")),
            BattleEvent::Dodge { defender, .. } => Some((defender.side, "DODGE!")),
            _ => None,
        }
    }
}

fn amount(value: f64) -> String {
    if value.fract().abs() < 1e-9 {
        format!("{value:.0}")
    } else {
        format!("{value:.1}")
    }
}

impl fmt::Display for BattleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BattleEvent::Hit {
                attacker,
                defender,
                damage,
                crit,
                first_strike,
                absorbed,
                thorns,
            } => {
                write!(
                    f,
                    "{} hits {} for {}",
                    attacker.name,
                    defender.name,
                    amount(*damage)
                )?;
                if *crit {
                    f.write_str(" (crit)")?;
                }
                if *first_strike {
                    f.write_str(" (first strike)")?;
                }
                if *absorbed > 0.0 {
                    write!(f, ", {} absorbed", amount(*absorbed))?;
                }
                if *thorns > 0.0 {
                    write!(f, ", thorns deal {} back", amount(*thorns))?;
                }
                Ok(())
            }
            BattleEvent::Dodge { attacker, defender } => {
                write!(f, "{} dodges {}'s attack", defender.name, attacker.name)
            }
            BattleEvent::Invulnerable { attacker } => {
                write!(f, "{}'s attack is blocked by Divine Guard", attacker.name)
            }
            BattleEvent::Counter { target, damage } => {
                write!(f, "Player counters {} for {}", target.name, amount(*damage))
            }
            BattleEvent::Lifesteal { actor, healed } => {
                write!(f, "{} drains {} HP", actor.name, amount(*healed))
            }
            BattleEvent::SkillHit { skill, hits } => {
                write!(f, "{skill}: ")?;
                let parts: Vec<String> = hits
                    .iter()
                    .map(|hit| format!("{} takes {}", hit.target.name, amount(hit.damage)))
                    .collect();
                f.write_str(&parts.join(", "))
            }
            BattleEvent::SkillHeal { skill, healed } => {
                write!(f, "{skill}: Player recovers {} HP", amount(*healed))
            }
            BattleEvent::SkillEffect {
                skill,
                effect,
                magnitude,
                duration,
            } => match effect {
                EffectKind::Shield => write!(
                    f,
                    "{skill}: shield of {} for {}s",
                    amount(*magnitude),
                    amount(*duration)
                ),
                EffectKind::AttackSpeed => write!(
                    f,
                    "{skill}: attack speed +{} for {}s",
                    amount(*magnitude),
                    amount(*duration)
                ),
                EffectKind::Invincible => {
                    write!(f, "{skill}: invincible for {}s", amount(*duration))
                }
            },
            BattleEvent::Stunned {
                skill,
                target,
                duration,
            } => write!(
                f,
                "{skill}: {} is stunned for {}s",
                target.name,
                amount(*duration)
            ),
            BattleEvent::EffectExpired { effect } => write!(f, "{effect} wears off"),
            BattleEvent::Enraged { boss } => write!(f, "{} becomes enraged!", boss.name),
            BattleEvent::Siphon { boss, damage } => {
                write!(f, "{} siphons {} HP from Player", boss.name, amount(*damage))
            }
            BattleEvent::Summoned { boss, minion } => {
                write!(f, "{} summons a {}", boss.name, minion.name)
            }
            BattleEvent::Defeated { actor } => write!(f, "{} is defeated", actor.name),
            BattleEvent::Victory => f.write_str("Victory!"),
            BattleEvent::Defeat => f.write_str("You have fallen..."),
        }
    }
}
