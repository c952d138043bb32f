//! Fixed-timestep battle loop.
//!
//! A [`Battle`] borrows the player for exactly one fight. Every tick runs the
//! same phases in the same order:
//!
//! 1. skill cooldowns advance
//! 2. timed effects and stuns count down
//! 3. bosses run their scripted behaviour
//! 4. ready skills are cast
//! 5. the player attacks if due
//! 6. each enemy attacks if due, in list order
//! 7. regeneration
//! 8. termination: all enemies dead wins before a dead player loses
//!
//! The loop never blocks and never reads a clock; callers drive it with
//! [`Battle::tick`], [`Battle::step`] or [`Battle::run_to_end`].

use crate::config::GameConfig;
use crate::entity::{BossAction, EffectKind, Enemy, EnemyKind, Player, random_living};
use crate::env::{EnemyOracle, RngSource};
use crate::error::{ErrorSeverity, GameError};
use crate::skills::{PassiveFlags, SkillContext, trigger};
use crate::stats::StatKind;

use super::damage::counter_damage;
use super::event::{Actor, BattleEvent};
use super::regen::regen_ticks;
use super::result::{StrikeOutcome, resolve_strike};

const EPSILON: f64 = 1e-9;
const COUNTER_CHANCE: f64 = 0.5;

/// Battle state machine. `Won` and `Lost` are terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BattleStatus {
    Running,
    Won,
    Lost,
}

impl BattleStatus {
    pub fn is_over(self) -> bool {
        self != BattleStatus::Running
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BattleError {
    #[error("battle still running after {ticks} ticks")]
    TickLimit { ticks: u64 },
}

impl GameError for BattleError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Internal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::TickLimit { .. } => "BATTLE_TICK_LIMIT",
        }
    }
}

/// Read-only inputs plus the random source a battle draws from.
pub struct BattleEnv<'a> {
    pub config: &'a GameConfig,
    pub oracle: &'a dyn EnemyOracle,
    pub rng: &'a mut dyn RngSource,
    /// Room number, used to scale summoned minions.
    pub room: u32,
}

/// Summary handed back when a battle is finished.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleReport {
    pub status: BattleStatus,
    pub ticks: u64,
    /// Simulated seconds.
    pub duration: f64,
    pub log: Vec<BattleEvent>,
    /// Kinds of every enemy that died, summoned minions included.
    pub defeated: Vec<EnemyKind>,
    /// Sum of the defeated enemies' experience rewards.
    pub xp: u64,
}

/// One battle between the player and a set of enemies.
pub struct Battle<'a> {
    player: &'a mut Player,
    enemies: Vec<Enemy>,
    config: &'a GameConfig,
    oracle: &'a dyn EnemyOracle,
    rng: &'a mut dyn RngSource,
    room: u32,

    status: BattleStatus,
    ticks: u64,
    clock: f64,
    accumulator: f64,
    player_next_attack: f64,
    player_regen_timer: f64,
    first_strike_spent: bool,
    announced: Vec<bool>,
    log: Vec<BattleEvent>,
    tick_log_start: usize,
    concluded: bool,
}

impl<'a> Battle<'a> {
    /// Starts a battle. Pending stat potion boosts take effect here.
    pub fn new(player: &'a mut Player, mut enemies: Vec<Enemy>, env: BattleEnv<'a>) -> Self {
        player.apply_stat_boosts();
        player.lifesteal_pool = 0.0;
        for skill in &mut player.skills {
            skill.reset();
        }

        for (index, enemy) in enemies.iter_mut().enumerate() {
            enemy.x = index as i32;
            enemy.next_attack = 1.0 / enemy.stats.attack_speed;
            enemy.regen_timer = 0.0;
        }
        tracing::debug!(
            room = env.room,
            enemies = ?enemies.iter().map(|e| e.name.as_str()).collect::<Vec<_>>(),
            "battle started"
        );

        let player_next_attack = 1.0 / player.stats().attack_speed;
        Self {
            announced: vec![false; enemies.len()],
            player,
            enemies,
            config: env.config,
            oracle: env.oracle,
            rng: env.rng,
            room: env.room,
            status: BattleStatus::Running,
            ticks: 0,
            clock: 0.0,
            accumulator: 0.0,
            player_next_attack,
            player_regen_timer: 0.0,
            first_strike_spent: false,
            log: Vec::new(),
            tick_log_start: 0,
            concluded: false,
        }
    }

    // ===== accessors =====

    pub fn status(&self) -> BattleStatus {
        self.status
    }

    pub fn player(&self) -> &Player {
        &*self.player
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    /// Simulated seconds elapsed.
    pub fn clock(&self) -> f64 {
        self.clock
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn log(&self) -> &[BattleEvent] {
        &self.log
    }

    /// Events emitted by the most recent tick.
    pub fn last_tick_events(&self) -> &[BattleEvent] {
        &self.log[self.tick_log_start..]
    }

    // ===== driving =====

    /// Advances the simulation by one fixed tick.
    pub fn tick(&mut self) -> BattleStatus {
        if self.status.is_over() {
            return self.status;
        }

        let dt = self.config.tick_seconds;
        self.ticks += 1;
        self.clock = self.ticks as f64 * dt;
        self.tick_log_start = self.log.len();

        for skill in &mut self.player.skills {
            skill.advance(dt);
        }

        for effect in self.player.tick_effects(dt) {
            self.log.push(BattleEvent::EffectExpired { effect });
        }
        for enemy in &mut self.enemies {
            enemy.tick_stun(dt);
        }

        self.update_bosses(dt);
        self.cast_ready_skills();

        if self.player.is_alive() && self.player_next_attack <= self.clock + EPSILON {
            if let Some(target) = random_living(&self.enemies, self.rng) {
                self.player_attack(target);
                self.player_next_attack += 1.0 / self.player.stats().attack_speed;
            }
        }

        for index in 0..self.enemies.len() {
            if !self.player.is_alive() {
                break;
            }
            let enemy = &self.enemies[index];
            if !enemy.is_alive() || enemy.next_attack > self.clock + EPSILON {
                continue;
            }
            // A stunned enemy loses its turn but keeps its rhythm.
            if !enemy.is_stunned() {
                self.enemy_attack(index);
            }
            let enemy = &mut self.enemies[index];
            enemy.next_attack += 1.0 / enemy.stats.attack_speed;
        }

        self.regenerate(dt);
        self.announce_deaths();

        if self.enemies.iter().all(|e| !e.is_alive()) {
            self.status = BattleStatus::Won;
            self.log.push(BattleEvent::Victory);
        } else if !self.player.is_alive() {
            self.status = BattleStatus::Lost;
            self.log.push(BattleEvent::Defeat);
        }

        if self.status.is_over() {
            tracing::info!(
                status = %self.status,
                ticks = self.ticks,
                seconds = self.clock,
                "battle finished"
            );
            self.conclude();
        }
        self.status
    }

    /// Feeds `dt` seconds into the fixed-step accumulator, running as many
    /// whole ticks as fit.
    pub fn step(&mut self, dt: f64) -> BattleStatus {
        let tick = self.config.tick_seconds;
        self.accumulator += dt.max(0.0);
        while self.status == BattleStatus::Running && self.accumulator + EPSILON >= tick {
            self.accumulator -= tick;
            self.tick();
        }
        self.status
    }

    /// Ticks until the battle ends or `max_ticks` have run.
    pub fn run_to_end(&mut self, max_ticks: u64) -> Result<BattleStatus, BattleError> {
        while self.status == BattleStatus::Running {
            if self.ticks >= max_ticks {
                return Err(BattleError::TickLimit { ticks: self.ticks });
            }
            self.tick();
        }
        Ok(self.status)
    }

    /// Ends the battle, reverting single-battle state on the player.
    pub fn finish(mut self) -> BattleReport {
        self.conclude();
        let defeated: Vec<EnemyKind> = self
            .enemies
            .iter()
            .filter(|e| !e.is_alive())
            .map(|e| e.kind)
            .collect();
        let xp = self
            .enemies
            .iter()
            .filter(|e| !e.is_alive())
            .map(|e| u64::from(e.xp_reward))
            .sum();
        BattleReport {
            status: self.status,
            ticks: self.ticks,
            duration: self.clock,
            log: core::mem::take(&mut self.log),
            defeated,
            xp,
        }
    }

    // ===== phases =====

    fn update_bosses(&mut self, dt: f64) {
        let summon_interval = self.config.summon.interval_seconds;
        let count = self.enemies.len();
        for index in 0..count {
            let enemy = &mut self.enemies[index];
            if !enemy.is_alive() {
                continue;
            }
            let hp_fraction = enemy.hp() / enemy.stats.max_hp;
            let Some(action) = enemy.behaviour.update(dt, hp_fraction, summon_interval) else {
                continue;
            };

            match action {
                BossAction::Enrage { multiplier } => {
                    let attack = enemy.stats.attack * multiplier;
                    enemy.stats.set(StatKind::Attack, attack);
                    let boss = Actor::enemy(index, enemy);
                    self.log.push(BattleEvent::Enraged { boss });
                }
                BossAction::Siphon { fraction } => {
                    if self.player.has_effect(EffectKind::Invincible) {
                        continue;
                    }
                    let damage = self.player.stats().max_hp * fraction;
                    self.player.take_damage(damage);
                    enemy.heal(damage);
                    let boss = Actor::enemy(index, enemy);
                    self.log.push(BattleEvent::Siphon { boss, damage });
                }
                BossAction::Summon => self.summon_minion(index),
            }
        }
    }

    fn summon_minion(&mut self, boss_index: usize) {
        let alive = self
            .enemies
            .iter()
            .filter(|e| e.kind == EnemyKind::Minion && e.is_alive())
            .count();
        if alive >= self.config.summon.max_alive {
            return;
        }
        let Some(template) = self.oracle.template(EnemyKind::Minion) else {
            tracing::warn!("no minion template, summon skipped");
            return;
        };

        let index = self.enemies.len();
        let mut minion = Enemy::spawn(EnemyKind::Minion, &template, self.room, index as i32)
            .weakened(self.config.summon.weakening);
        minion.next_attack = self.clock + 1.0 / minion.stats.attack_speed;

        let boss = Actor::enemy(boss_index, &self.enemies[boss_index]);
        let summoned = Actor::enemy(index, &minion);
        tracing::debug!(minion = index, "minion summoned");
        self.enemies.push(minion);
        self.announced.push(false);
        self.log.push(BattleEvent::Summoned {
            boss,
            minion: summoned,
        });
    }

    fn cast_ready_skills(&mut self) {
        for index in 0..self.player.skills.len() {
            if !self.player.skills[index].is_ready() {
                continue;
            }
            let kind = self.player.skills[index].kind;
            let mut ctx = SkillContext {
                player: &mut *self.player,
                enemies: &mut self.enemies,
                rng: &mut *self.rng,
            };
            if let Some(event) = trigger(kind, &mut ctx) {
                self.player.skills[index].reset();
                tracing::debug!(skill = kind.name(), "skill triggered");
                self.log.push(event);
            }
        }
    }

    fn player_attack(&mut self, target: usize) {
        let outcome = resolve_strike(self.player.stats(), &self.enemies[target].stats, self.rng);
        let attacker = Actor::player();
        let defender = Actor::enemy(target, &self.enemies[target]);

        let (mut damage, crit) = match outcome {
            StrikeOutcome::Dodged => {
                self.log.push(BattleEvent::Dodge { attacker, defender });
                return;
            }
            StrikeOutcome::Hit { damage, crit } => (damage, crit),
        };

        let first_strike =
            self.player.passives.contains(PassiveFlags::FIRST_STRIKE) && !self.first_strike_spent;
        if first_strike {
            damage *= 2.0;
            self.first_strike_spent = true;
        }

        let lifesteal = self.player.stats().lifesteal;
        if lifesteal > 0.0 {
            self.player.lifesteal_pool += damage * lifesteal;
            let mut healed = 0.0;
            while self.player.lifesteal_pool >= 1.0 && self.player.hp() < self.player.stats().max_hp
            {
                self.player.lifesteal_pool -= 1.0;
                healed += self.player.heal(1.0);
            }
            if healed > 0.0 {
                self.log.push(BattleEvent::Lifesteal {
                    actor: attacker.clone(),
                    healed,
                });
            }
        }

        let enemy = &mut self.enemies[target];
        enemy.take_damage(damage);

        let mut reflected = 0.0;
        if enemy.stats.thorn_damage > 0.0 && !self.player.has_effect(EffectKind::Invincible) {
            reflected = enemy.stats.thorn_damage;
            self.player.take_damage(reflected);
        }

        self.log.push(BattleEvent::Hit {
            attacker,
            defender,
            damage,
            crit,
            first_strike,
            absorbed: 0.0,
            thorns: reflected,
        });
    }

    fn enemy_attack(&mut self, index: usize) {
        let outcome = resolve_strike(&self.enemies[index].stats, self.player.stats(), self.rng);
        let attacker = Actor::enemy(index, &self.enemies[index]);
        let defender = Actor::player();

        let (damage, crit) = match outcome {
            StrikeOutcome::Dodged => {
                self.log.push(BattleEvent::Dodge {
                    attacker: attacker.clone(),
                    defender,
                });
                if self.player.passives.contains(PassiveFlags::COUNTER)
                    && self.rng.chance(COUNTER_CHANCE)
                {
                    let enemy = &mut self.enemies[index];
                    let damage = counter_damage(self.player.stats().attack, enemy.stats.defence);
                    enemy.take_damage(damage);
                    self.log.push(BattleEvent::Counter {
                        target: attacker,
                        damage,
                    });
                }
                return;
            }
            StrikeOutcome::Hit { damage, crit } => (damage, crit),
        };

        let enemy = &mut self.enemies[index];
        let lifesteal = enemy.stats.lifesteal;
        if lifesteal > 0.0 {
            let healed = enemy.heal((damage * lifesteal).floor());
            if healed > 0.0 {
                self.log.push(BattleEvent::Lifesteal {
                    actor: attacker.clone(),
                    healed,
                });
            }
        }

        if self.player.has_effect(EffectKind::Invincible) {
            self.log.push(BattleEvent::Invulnerable { attacker });
            return;
        }

        let (remaining, absorbed) = self.player.absorb(damage);
        self.player.take_damage(remaining);

        let thorns = self.player.stats().thorn_damage;
        if thorns > 0.0 {
            self.enemies[index].take_damage(thorns);
        }

        self.log.push(BattleEvent::Hit {
            attacker,
            defender,
            damage: remaining,
            crit,
            first_strike: false,
            absorbed,
            thorns,
        });
    }

    fn regenerate(&mut self, dt: f64) {
        let base = self.config.regen_base_interval;
        let decay = self.config.regen_decay;

        let stats = self.player.stats();
        let (regen, max_hp) = (stats.health_regen, stats.max_hp);
        if self.player.is_alive() && self.player.hp() < max_hp {
            let heals = regen_ticks(&mut self.player_regen_timer, dt, regen, base, decay);
            if heals > 0 {
                self.player.heal(f64::from(heals));
            }
        } else {
            self.player_regen_timer = 0.0;
        }

        for enemy in &mut self.enemies {
            if enemy.is_alive() && enemy.hp() < enemy.stats.max_hp {
                let regen = enemy.stats.health_regen;
                let heals = regen_ticks(&mut enemy.regen_timer, dt, regen, base, decay);
                if heals > 0 {
                    enemy.heal(f64::from(heals));
                }
            } else {
                enemy.regen_timer = 0.0;
            }
        }
    }

    fn announce_deaths(&mut self) {
        for (index, enemy) in self.enemies.iter().enumerate() {
            if !enemy.is_alive() && !self.announced[index] {
                self.announced[index] = true;
                self.log.push(BattleEvent::Defeated {
                    actor: Actor::enemy(index, enemy),
                });
            }
        }
    }

    /// Reverts stat boosts, clears timed effects and empties the lifesteal
    /// pool. Runs once.
    fn conclude(&mut self) {
        if self.concluded {
            return;
        }
        self.concluded = true;
        self.player.clear_stat_boosts();
        self.player.clear_effects();
        self.player.lifesteal_pool = 0.0;
    }
}

impl Drop for Battle<'_> {
    fn drop(&mut self) {
        self.conclude();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::PlayerClass;
    use crate::env::{BuiltinEnemies, PcgRng, ScriptedRng};
    use crate::items::ItemIdGen;
    use crate::skills::{SkillKind, acquire};

    fn slimes(count: usize, room: u32) -> Vec<Enemy> {
        let template = BuiltinEnemies.template(EnemyKind::Slime).unwrap();
        (0..count)
            .map(|x| Enemy::spawn(EnemyKind::Slime, &template, room, x as i32))
            .collect()
    }

    fn fighter() -> Player {
        Player::new(PlayerClass::Fighter, &mut ItemIdGen::default())
    }

    #[test]
    fn terminal_state_is_sticky() {
        let config = GameConfig::default();
        let mut player = fighter();
        let mut rng = ScriptedRng::constant(0.5);
        let mut battle = Battle::new(
            &mut player,
            slimes(1, 1),
            BattleEnv {
                config: &config,
                oracle: &BuiltinEnemies,
                rng: &mut rng,
                room: 1,
            },
        );
        let status = battle.run_to_end(10_000).unwrap();
        assert!(status.is_over());
        let ticks = battle.ticks();
        assert_eq!(battle.tick(), status);
        assert_eq!(battle.ticks(), ticks);
    }

    #[test]
    fn tick_limit_is_an_error() {
        let config = GameConfig::default();
        let mut player = fighter();
        let mut rng = PcgRng::seeded(1);
        let mut battle = Battle::new(
            &mut player,
            slimes(1, 1),
            BattleEnv {
                config: &config,
                oracle: &BuiltinEnemies,
                rng: &mut rng,
                room: 1,
            },
        );
        assert_eq!(
            battle.run_to_end(3),
            Err(BattleError::TickLimit { ticks: 3 })
        );
    }

    #[test]
    fn step_runs_whole_ticks() {
        let config = GameConfig::default();
        let mut player = fighter();
        let mut rng = PcgRng::seeded(1);
        let mut battle = Battle::new(
            &mut player,
            slimes(1, 1),
            BattleEnv {
                config: &config,
                oracle: &BuiltinEnemies,
                rng: &mut rng,
                room: 1,
            },
        );
        battle.step(0.12);
        assert_eq!(battle.ticks(), 2);
        battle.step(0.03);
        assert_eq!(battle.ticks(), 3);
    }

    #[test]
    fn thorns_hurt_attacker_on_landed_hit() {
        let config = GameConfig::default();
        let mut player = fighter();
        player.set_base_stat(StatKind::ThornDamage, 2.0);
        player.set_base_stat(StatKind::DodgeChance, 0.0);
        // no dodges, no crits
        let mut rng = ScriptedRng::constant(0.99);
        let mut battle = Battle::new(
            &mut player,
            slimes(1, 5),
            BattleEnv {
                config: &config,
                oracle: &BuiltinEnemies,
                rng: &mut rng,
                room: 5,
            },
        );
        battle.run_to_end(10_000).unwrap();
        let thorned = battle.log().iter().any(|event| {
            matches!(event, BattleEvent::Hit { defender, thorns, .. }
                if defender.name == Actor::PLAYER_NAME && *thorns == 2.0)
        });
        assert!(thorned);
    }

    #[test]
    fn invincible_player_takes_nothing() {
        let config = GameConfig::default();
        let mut player = fighter();
        player.set_base_stat(StatKind::ThornDamage, 3.0);
        let mut rng = ScriptedRng::constant(0.99);
        let mut battle = Battle::new(
            &mut player,
            slimes(1, 1),
            BattleEnv {
                config: &config,
                oracle: &BuiltinEnemies,
                rng: &mut rng,
                room: 1,
            },
        );
        battle.player.apply_effect(EffectKind::Invincible, 1.0, 100.0);
        battle.run_to_end(10_000).unwrap();
        assert_eq!(battle.status(), BattleStatus::Won);
        assert_eq!(battle.player().hp(), 10.0);
        assert!(
            battle
                .log()
                .iter()
                .any(|e| matches!(e, BattleEvent::Invulnerable { .. }))
        );
        let report = battle.finish();
        assert_eq!(report.defeated, vec![EnemyKind::Slime]);
        assert!(!player.has_effect(EffectKind::Invincible));
    }

    #[test]
    fn first_strike_doubles_once() {
        let config = GameConfig::default();
        let mut player = fighter();
        acquire(&mut player, SkillKind::FirstStrike);
        let mut rng = ScriptedRng::constant(0.99);
        let mut battle = Battle::new(
            &mut player,
            slimes(1, 1),
            BattleEnv {
                config: &config,
                oracle: &BuiltinEnemies,
                rng: &mut rng,
                room: 1,
            },
        );
        battle.run_to_end(10_000).unwrap();
        let doubled = battle
            .log()
            .iter()
            .filter(|e| matches!(e, BattleEvent::Hit { first_strike: true, .. }))
            .count();
        assert_eq!(doubled, 1);
    }

    #[test]
    fn stun_skips_enemy_turn() {
        let config = GameConfig::default();
        let mut player = fighter();
        player.set_base_stat(StatKind::DodgeChance, 0.0);
        let mut enemies = slimes(1, 1);
        enemies[0].stun(100.0);
        let mut rng = ScriptedRng::constant(0.99);
        let mut battle = Battle::new(
            &mut player,
            enemies,
            BattleEnv {
                config: &config,
                oracle: &BuiltinEnemies,
                rng: &mut rng,
                room: 1,
            },
        );
        battle.run_to_end(10_000).unwrap();
        assert_eq!(battle.player().hp(), 10.0);
    }

    #[test]
    fn final_boss_summons_minions() {
        let config = GameConfig::default();
        let mut player = fighter();
        // Hold the boss off so the summon timer runs.
        player.set_base_stat(StatKind::MaxHp, 5000.0);
        player.restore_full();
        let template = BuiltinEnemies.template(EnemyKind::DreadLord).unwrap();
        let boss = Enemy::spawn(EnemyKind::DreadLord, &template, 25, 0);
        let mut rng = PcgRng::seeded(8);
        let mut battle = Battle::new(
            &mut player,
            vec![boss],
            BattleEnv {
                config: &config,
                oracle: &BuiltinEnemies,
                rng: &mut rng,
                room: 25,
            },
        );
        for _ in 0..(20.0 / config.tick_seconds) as usize {
            battle.tick();
        }
        let minions = battle
            .enemies()
            .iter()
            .filter(|e| e.kind == EnemyKind::Minion)
            .count();
        assert!((1..=config.summon.max_alive + 2).contains(&minions));
        let alive = battle
            .enemies()
            .iter()
            .filter(|e| e.kind == EnemyKind::Minion && e.is_alive())
            .count();
        assert!(alive <= config.summon.max_alive);
    }
}
