//! Render snapshots.

use crate::combat::{Battle, BattleEvent, Side};
use crate::entity::{EffectKind, Enemy, Player};
use crate::progression::Gates;
use crate::skills::SkillKind;
use crate::stats::Stats;

/// Log lines a frame carries by default.
pub const LOG_TAIL: usize = 5;

/// Everything a presenter needs to draw one moment of a run.
///
/// Rows are fixed: row 0 is the player, row `i + 1` is enemy `i`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Frame {
    pub room: u32,
    /// Battle clock in seconds, 0 outside battle.
    pub clock: f64,
    pub player: PlayerSnapshot,
    pub enemies: Vec<EnemySnapshot>,
    /// Most recent log lines, oldest first.
    pub log: Vec<String>,
    pub shop_probability: f64,
    pub boss_probability: f64,
    pub overlays: Vec<Overlay>,
}

/// Transient text drawn over one row.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Overlay {
    pub row: usize,
    pub text: String,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerSnapshot {
    pub level: u32,
    pub xp: u64,
    pub xp_to_next: u64,
    pub gold: u32,
    /// Never negative.
    pub hp: f64,
    pub stats: Stats,
    /// Active effects with seconds remaining.
    pub effects: Vec<(EffectKind, f64)>,
    /// Learned skills with cooldown progress in `[0, 1]`; passives read 1.
    pub skills: Vec<(SkillKind, f64)>,
    pub potions: Vec<String>,
    pub equipment: Vec<String>,
}

impl PlayerSnapshot {
    pub fn from_player(player: &Player) -> Self {
        Self {
            level: player.level,
            xp: player.xp,
            xp_to_next: player.xp_to_next,
            gold: player.gold,
            hp: player.hp().max(0.0),
            stats: player.stats().clone(),
            effects: player
                .effects()
                .iter()
                .map(|effect| (effect.kind, effect.remaining))
                .collect(),
            skills: player
                .skills
                .iter()
                .map(|skill| {
                    let cooldown = skill.kind.cooldown();
                    let progress = if cooldown > 0.0 {
                        (skill.cooldown_timer / cooldown).min(1.0)
                    } else {
                        1.0
                    };
                    (skill.kind, progress)
                })
                .collect(),
            potions: player.potions.occupied().map(|(_, p)| p.name()).collect(),
            equipment: player
                .equipment()
                .occupied()
                .map(|(_, item)| item.name())
                .collect(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnemySnapshot {
    pub name: String,
    pub glyph: char,
    pub x: i32,
    /// Never negative.
    pub hp: f64,
    pub max_hp: f64,
    pub alive: bool,
    pub stunned: bool,
}

impl EnemySnapshot {
    pub fn from_enemy(enemy: &Enemy) -> Self {
        Self {
            name: enemy.name.clone(),
            glyph: enemy.glyph,
            x: enemy.x,
            hp: enemy.hp().max(0.0),
            max_hp: enemy.stats.max_hp,
            alive: enemy.is_alive(),
            stunned: enemy.is_stunned(),
        }
    }
}

impl Frame {
    /// Snapshot of a running battle. Overlays come from the last tick.
    pub fn from_battle(battle: &Battle<'_>, room: u32, gates: &Gates, log_limit: usize) -> Self {
        let mut frame = Self::from_player(battle.player(), room, gates, core::iter::empty(), log_limit);
        frame.clock = battle.clock();
        frame.enemies = battle.enemies().iter().map(EnemySnapshot::from_enemy).collect();
        frame.log = tail(battle.log(), log_limit);
        frame.overlays = overlays(battle.last_tick_events());
        frame
    }

    /// Snapshot outside battle, with `log` as the recent history.
    pub fn from_player<'a, L>(
        player: &Player,
        room: u32,
        gates: &Gates,
        log: L,
        log_limit: usize,
    ) -> Self
    where
        L: IntoIterator<Item = &'a String>,
        L::IntoIter: ExactSizeIterator,
    {
        let log = log.into_iter();
        let skip = log.len().saturating_sub(log_limit);
        Self {
            room,
            clock: 0.0,
            player: PlayerSnapshot::from_player(player),
            enemies: Vec::new(),
            log: log.skip(skip).cloned().collect(),
            shop_probability: gates.shop_probability,
            boss_probability: gates.boss_probability,
            overlays: Vec::new(),
        }
    }
}

/// Row a side is drawn on.
pub fn row_of(side: Side) -> usize {
    match side {
        Side::Player => 0,
        Side::Enemy(index) => index + 1,
    }
}

/// Flash overlays for `events`, one per row, later events winning.
pub fn overlays(events: &[BattleEvent]) -> Vec<Overlay> {
    let mut overlays: Vec<Overlay> = Vec::new();
    for (side, text) in events.iter().filter_map(BattleEvent::flash) {
        let row = row_of(side);
        match overlays.iter_mut().find(|overlay| overlay.row == row) {
            Some(overlay) => overlay.text = text.to_owned(),
            None => overlays.push(Overlay {
                row,
                text: text.to_owned(),
            }),
        }
    }
    overlays.sort_by_key(|overlay| overlay.row);
    overlays
}

fn tail(log: &[BattleEvent], limit: usize) -> Vec<String> {
    let skip = log.len().saturating_sub(limit);
    log[skip..].iter().map(ToString::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::Actor;

    fn actor(side: Side) -> Actor {
        Actor {
            side,
            name: "x".into(),
        }
    }

    #[test]
    fn rows_follow_sides() {
        assert_eq!(row_of(Side::Player), 0);
        assert_eq!(row_of(Side::Enemy(2)), 3);
    }

    #[test]
    fn last_flash_per_row_wins() {
        let events = vec![
            BattleEvent::Dodge {
                attacker: actor(Side::Player),
                defender: actor(Side::Enemy(0)),
            },
            BattleEvent::Hit {
                attacker: actor(Side::Player),
                defender: actor(Side::Enemy(0)),
                damage: 4.0,
                crit: true,
                first_strike: false,
                absorbed: 0.0,
                thorns: 0.0,
            },
            BattleEvent::Dodge {
                attacker: actor(Side::Enemy(0)),
                defender: actor(Side::Player),
            },
            BattleEvent::Victory,
        ];
        assert_eq!(
            overlays(&events),
            vec![
                Overlay {
                    row: 0,
                    text: "DODGE!".into(),
                },
                Overlay {
                    row: 1,
                    text: "CRIT!".into(),
                },
            ]
        );
    }
}
