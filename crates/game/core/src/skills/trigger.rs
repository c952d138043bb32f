//! Active skill effects.
//!
//! Passives do their work through `acquire` and the battle loop, so
//! triggering one is a no-op.

use super::SkillKind;
use crate::combat::{Actor, BattleEvent, SkillHit, calculate_damage};
use crate::entity::{EffectKind, Enemy, Player, random_living};
use crate::env::RngSource;

const BARRIER_FRACTION: f64 = 0.25;
const BARRIER_SECONDS: f64 = 4.0;
const SECOND_WIND_FRACTION: f64 = 0.20;
const FRENZY_SPEED: f64 = 0.5;
const FRENZY_SECONDS: f64 = 5.0;
const DIVINE_GUARD_SECONDS: f64 = 2.0;
const SHOCKWAVE_SECONDS: f64 = 2.0;

/// Everything a skill may touch when cast.
pub struct SkillContext<'a> {
    pub player: &'a mut Player,
    pub enemies: &'a mut [Enemy],
    pub rng: &'a mut dyn RngSource,
}

/// Casts `kind`.
///
/// Returns `None` when the skill had nothing to act on (no living target,
/// already at full HP) or is passive; the caller leaves its cooldown
/// untouched in that case.
pub fn trigger(kind: SkillKind, ctx: &mut SkillContext<'_>) -> Option<BattleEvent> {
    match kind {
        SkillKind::Fireball => {
            let index = random_living(ctx.enemies, ctx.rng)?;
            let attack = ctx.player.stats().attack * 2.0;
            let hit = strike_enemy(&mut ctx.enemies[index], index, attack);
            Some(BattleEvent::SkillHit {
                skill: kind,
                hits: vec![hit],
            })
        }
        SkillKind::Whirlwind => {
            let attack = ctx.player.stats().attack;
            let hits: Vec<SkillHit> = ctx
                .enemies
                .iter_mut()
                .enumerate()
                .filter(|(_, enemy)| enemy.is_alive())
                .map(|(index, enemy)| strike_enemy(enemy, index, attack))
                .collect();
            if hits.is_empty() {
                return None;
            }
            Some(BattleEvent::SkillHit { skill: kind, hits })
        }
        SkillKind::SecondWind => {
            let max_hp = ctx.player.stats().max_hp;
            if ctx.player.hp() >= max_hp {
                return None;
            }
            let healed = ctx.player.heal(max_hp * SECOND_WIND_FRACTION);
            Some(BattleEvent::SkillHeal {
                skill: kind,
                healed,
            })
        }
        SkillKind::Barrier => {
            let shield = ctx.player.stats().max_hp * BARRIER_FRACTION;
            ctx.player
                .apply_effect(EffectKind::Shield, shield, BARRIER_SECONDS);
            Some(BattleEvent::SkillEffect {
                skill: kind,
                effect: EffectKind::Shield,
                magnitude: shield,
                duration: BARRIER_SECONDS,
            })
        }
        SkillKind::Frenzy => {
            ctx.player
                .apply_effect(EffectKind::AttackSpeed, FRENZY_SPEED, FRENZY_SECONDS);
            Some(BattleEvent::SkillEffect {
                skill: kind,
                effect: EffectKind::AttackSpeed,
                magnitude: FRENZY_SPEED,
                duration: FRENZY_SECONDS,
            })
        }
        SkillKind::DivineGuard => {
            ctx.player
                .apply_effect(EffectKind::Invincible, 1.0, DIVINE_GUARD_SECONDS);
            Some(BattleEvent::SkillEffect {
                skill: kind,
                effect: EffectKind::Invincible,
                magnitude: 1.0,
                duration: DIVINE_GUARD_SECONDS,
            })
        }
        SkillKind::Shockwave => {
            let candidates: Vec<usize> = ctx
                .enemies
                .iter()
                .enumerate()
                .filter(|(_, enemy)| enemy.is_alive() && !enemy.is_stunned())
                .map(|(index, _)| index)
                .collect();
            if candidates.is_empty() {
                return None;
            }
            let index = candidates[ctx.rng.index(candidates.len())];
            let enemy = &mut ctx.enemies[index];
            enemy.stun(SHOCKWAVE_SECONDS);
            Some(BattleEvent::Stunned {
                skill: kind,
                target: Actor::enemy(index, enemy),
                duration: SHOCKWAVE_SECONDS,
            })
        }
        SkillKind::Counter
        | SkillKind::FirstStrike
        | SkillKind::Scholar
        | SkillKind::TreasureHunter
        | SkillKind::Toughness
        | SkillKind::Vampirism => None,
    }
}

fn strike_enemy(enemy: &mut Enemy, index: usize, attack: f64) -> SkillHit {
    let damage = calculate_damage(attack, enemy.stats.defence, None);
    enemy.take_damage(damage);
    SkillHit {
        target: Actor::enemy(index, enemy),
        damage,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{EnemyKind, PlayerClass};
    use crate::env::{BuiltinEnemies, EnemyOracle, ScriptedRng};
    use crate::items::ItemIdGen;

    fn setup() -> (Player, Vec<Enemy>) {
        let player = Player::new(PlayerClass::Fighter, &mut ItemIdGen::default());
        let oracle = BuiltinEnemies;
        let enemies = (0..2)
            .map(|x| {
                let template = oracle.template(EnemyKind::Slime).unwrap();
                Enemy::spawn(EnemyKind::Slime, &template, 1, x)
            })
            .collect();
        (player, enemies)
    }

    #[test]
    fn whirlwind_hits_every_living_enemy() {
        let (mut player, mut enemies) = setup();
        enemies[1].take_damage(100.0);
        let mut rng = ScriptedRng::constant(0.0);
        let mut ctx = SkillContext {
            player: &mut player,
            enemies: &mut enemies,
            rng: &mut rng,
        };
        let Some(BattleEvent::SkillHit { hits, .. }) = trigger(SkillKind::Whirlwind, &mut ctx)
        else {
            panic!("whirlwind should hit");
        };
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].target.name, "Slime");
    }

    #[test]
    fn second_wind_waits_for_damage() {
        let (mut player, mut enemies) = setup();
        let mut rng = ScriptedRng::constant(0.0);
        let mut ctx = SkillContext {
            player: &mut player,
            enemies: &mut enemies,
            rng: &mut rng,
        };
        assert!(trigger(SkillKind::SecondWind, &mut ctx).is_none());
        ctx.player.take_damage(5.0);
        assert!(matches!(
            trigger(SkillKind::SecondWind, &mut ctx),
            Some(BattleEvent::SkillHeal { healed, .. }) if healed == 2.0
        ));
    }

    #[test]
    fn frenzy_raises_attack_speed() {
        let (mut player, mut enemies) = setup();
        let before = player.stats().attack_speed;
        let mut rng = ScriptedRng::constant(0.0);
        let mut ctx = SkillContext {
            player: &mut player,
            enemies: &mut enemies,
            rng: &mut rng,
        };
        trigger(SkillKind::Frenzy, &mut ctx);
        assert_eq!(player.stats().attack_speed, before + FRENZY_SPEED);
    }

    #[test]
    fn passives_do_nothing_when_triggered() {
        let (mut player, mut enemies) = setup();
        let mut rng = ScriptedRng::constant(0.0);
        let mut ctx = SkillContext {
            player: &mut player,
            enemies: &mut enemies,
            rng: &mut rng,
        };
        assert!(trigger(SkillKind::Counter, &mut ctx).is_none());
    }
}
