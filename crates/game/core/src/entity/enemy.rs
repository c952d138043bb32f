//! Room enemies and the templates they are spawned from.

use crate::env::RngSource;
use crate::stats::{StatKind, Stats};

use super::boss::BossBehaviour;

/// Enemy types, regular and boss.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EnemyKind {
    /// The basic enemy.
    Slime,
    Rat,
    Brute,
    Archer,
    Shade,
    Bat,
    /// Summoned by the final boss.
    Minion,
    Golem,
    Lich,
    /// The final boss.
    DreadLord,
}

impl EnemyKind {
    /// Kinds that populate ordinary rooms.
    pub const REGULAR: [EnemyKind; 6] = [
        EnemyKind::Slime,
        EnemyKind::Rat,
        EnemyKind::Bat,
        EnemyKind::Archer,
        EnemyKind::Brute,
        EnemyKind::Shade,
    ];

    /// Bosses that must fall before the final boss appears, in order.
    pub const REGULAR_BOSSES: [EnemyKind; 2] = [EnemyKind::Golem, EnemyKind::Lich];

    pub const FINAL_BOSS: EnemyKind = EnemyKind::DreadLord;

    pub const fn is_boss(self) -> bool {
        matches!(self, EnemyKind::Golem | EnemyKind::Lich | EnemyKind::DreadLord)
    }

    /// First room in which a regular kind can appear.
    pub const fn first_room(self) -> u32 {
        match self {
            EnemyKind::Slime | EnemyKind::Rat => 1,
            EnemyKind::Bat => 3,
            EnemyKind::Archer => 5,
            EnemyKind::Brute => 7,
            EnemyKind::Shade => 9,
            EnemyKind::Minion | EnemyKind::Golem | EnemyKind::Lich | EnemyKind::DreadLord => {
                u32::MAX
            }
        }
    }

    /// Regular kinds unlocked by `room`.
    pub fn available_in(room: u32) -> impl Iterator<Item = EnemyKind> {
        Self::REGULAR
            .into_iter()
            .filter(move |kind| kind.first_room() <= room)
    }
}

/// A stat value that grows linearly with the room number.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Scaling {
    pub base: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub per_room: f64,
}

impl Scaling {
    pub const fn new(base: f64, per_room: f64) -> Self {
        Self { base, per_room }
    }

    pub const fn fixed(base: f64) -> Self {
        Self::new(base, 0.0)
    }

    /// Value for `room` (room 1 yields `base`).
    pub fn at(&self, room: u32) -> f64 {
        self.base + self.per_room * room.saturating_sub(1) as f64
    }
}

/// Spawn data for one enemy kind.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EnemyTemplate {
    pub name: String,
    pub glyph: char,
    /// Experience before the per-room bonus.
    pub xp: u32,
    pub hp: Scaling,
    pub attack: Scaling,
    pub attack_speed: Scaling,
    pub defence: Scaling,
    pub dodge_chance: Scaling,
    pub crit_chance: f64,
    pub crit_damage: f64,
    pub lifesteal: f64,
    pub thorn_damage: f64,
    pub health_regen: f64,
}

impl Default for EnemyTemplate {
    fn default() -> Self {
        Self {
            name: String::from("Enemy"),
            glyph: 'e',
            xp: 1,
            hp: Scaling::fixed(5.0),
            attack: Scaling::fixed(1.0),
            attack_speed: Scaling::fixed(1.0),
            defence: Scaling::default(),
            dodge_chance: Scaling::default(),
            crit_chance: 0.0,
            crit_damage: 1.5,
            lifesteal: 0.0,
            thorn_damage: 0.0,
            health_regen: 0.0,
        }
    }
}

impl EnemyTemplate {
    /// Stats for `room`, clamped to each stat's bounds.
    pub fn stats_at(&self, room: u32) -> Stats {
        let mut stats = Stats::default();
        stats.set(StatKind::MaxHp, self.hp.at(room));
        stats.set(StatKind::Attack, self.attack.at(room));
        stats.set(StatKind::AttackSpeed, self.attack_speed.at(room));
        stats.set(StatKind::Defence, self.defence.at(room));
        stats.set(StatKind::DodgeChance, self.dodge_chance.at(room));
        stats.set(StatKind::CritChance, self.crit_chance);
        stats.set(StatKind::CritDamage, self.crit_damage);
        stats.set(StatKind::Lifesteal, self.lifesteal);
        stats.set(StatKind::ThornDamage, self.thorn_damage);
        stats.set(StatKind::HealthRegen, self.health_regen);
        stats
    }
}

/// One enemy in a battle.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Enemy {
    pub kind: EnemyKind,
    pub name: String,
    pub glyph: char,
    /// Horizontal position for display.
    pub x: i32,
    pub stats: Stats,
    hp: f64,
    pub xp_reward: u32,
    /// Seconds of stun left.
    stun: f64,
    /// Clock time of the next scheduled attack.
    pub next_attack: f64,
    pub regen_timer: f64,
    pub behaviour: BossBehaviour,
}

impl Enemy {
    /// Spawns `kind` for `room`. Bosses ignore room scaling of their stats.
    pub fn spawn(kind: EnemyKind, template: &EnemyTemplate, room: u32, x: i32) -> Self {
        let stat_room = if kind.is_boss() { 1 } else { room };
        let stats = template.stats_at(stat_room);
        Self {
            kind,
            name: template.name.clone(),
            glyph: template.glyph,
            x,
            hp: stats.max_hp,
            next_attack: 1.0 / stats.attack_speed,
            stats,
            xp_reward: template.xp + room,
            stun: 0.0,
            regen_timer: 0.0,
            behaviour: BossBehaviour::for_kind(kind),
        }
    }

    /// Scales hp and attack down by `factor`, keeping them above their floors.
    pub fn weakened(mut self, factor: f64) -> Self {
        let max_hp = self.stats.max_hp * factor;
        self.stats.set(StatKind::MaxHp, max_hp);
        let attack = self.stats.attack * factor;
        self.stats.set(StatKind::Attack, attack);
        self.hp = self.stats.max_hp;
        self
    }

    pub fn hp(&self) -> f64 {
        self.hp
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0.0
    }

    pub fn take_damage(&mut self, amount: f64) {
        self.hp -= amount.max(0.0);
    }

    /// Heals up to max HP and returns the amount restored.
    pub fn heal(&mut self, amount: f64) -> f64 {
        let before = self.hp;
        self.hp = (self.hp + amount.max(0.0)).min(self.stats.max_hp);
        self.hp - before
    }

    pub fn stun(&mut self, seconds: f64) {
        self.stun = self.stun.max(seconds);
    }

    pub fn is_stunned(&self) -> bool {
        self.stun > 1e-9
    }

    pub fn tick_stun(&mut self, dt: f64) {
        if self.stun > 0.0 {
            self.stun = (self.stun - dt).max(0.0);
        }
    }
}

/// Picks a uniformly random living enemy.
pub fn random_living(enemies: &[Enemy], rng: &mut dyn RngSource) -> Option<usize> {
    let living: Vec<usize> = enemies
        .iter()
        .enumerate()
        .filter(|(_, enemy)| enemy.is_alive())
        .map(|(index, _)| index)
        .collect();
    if living.is_empty() {
        return None;
    }
    Some(living[rng.index(living.len())])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{BuiltinEnemies, EnemyOracle, ScriptedRng};

    fn slime(room: u32) -> Enemy {
        let template = BuiltinEnemies.template(EnemyKind::Slime).unwrap();
        Enemy::spawn(EnemyKind::Slime, &template, room, 0)
    }

    #[test]
    fn basic_enemy_room_one() {
        let enemy = slime(1);
        assert_eq!(enemy.hp(), 8.0);
        assert_eq!(enemy.stats.attack, 2.0);
        assert_eq!(enemy.stats.dodge_chance, 0.05);
        assert_eq!(enemy.stats.defence, 0.0);
        assert_eq!(enemy.xp_reward, 4);
    }

    #[test]
    fn stats_grow_with_room() {
        let early = slime(1);
        let late = slime(11);
        assert!(late.stats.max_hp > early.stats.max_hp);
        assert!(late.stats.attack > early.stats.attack);
        assert!(late.stats.dodge_chance <= 0.7);
    }

    #[test]
    fn bosses_ignore_room_scaling() {
        let template = BuiltinEnemies.template(EnemyKind::Golem).unwrap();
        let a = Enemy::spawn(EnemyKind::Golem, &template, 11, 0);
        let b = Enemy::spawn(EnemyKind::Golem, &template, 30, 0);
        assert_eq!(a.stats, b.stats);
        assert!(a.xp_reward < b.xp_reward);
    }

    #[test]
    fn random_living_skips_dead() {
        let mut enemies = vec![slime(1), slime(1), slime(1)];
        enemies[0].take_damage(50.0);
        enemies[2].take_damage(50.0);
        let mut rng = ScriptedRng::constant(0.99);
        assert_eq!(random_living(&enemies, &mut rng), Some(1));
        enemies[1].take_damage(50.0);
        assert_eq!(random_living(&enemies, &mut rng), None);
    }

    #[test]
    fn unlocks_by_room() {
        assert_eq!(EnemyKind::available_in(1).count(), 2);
        assert_eq!(EnemyKind::available_in(9).count(), 6);
        assert!(EnemyKind::available_in(50).all(|kind| !kind.is_boss()));
    }
}
