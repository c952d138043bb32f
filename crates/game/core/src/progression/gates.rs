//! Room gating: shop visits, boss encounters and room enemy rolls.

use crate::config::GateConfig;
use crate::entity::EnemyKind;
use crate::env::RngSource;

/// Which boss the next boss room holds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BossStage {
    /// No regular boss defeated yet.
    #[default]
    First,
    /// One regular boss defeated.
    Second,
    /// Both regular bosses defeated; the final boss is eligible.
    Final,
    /// The final boss has fallen.
    Cleared,
}

/// Growing shop and boss probabilities.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Gates {
    pub shop_probability: f64,
    pub boss_probability: f64,
    pub stage: BossStage,
}

impl Gates {
    /// Called on entering `room`: grows both probabilities past their
    /// thresholds, then rolls the shop gate. A hit resets the shop chance.
    pub fn roll_shop(&mut self, room: u32, config: &GateConfig, rng: &mut dyn RngSource) -> bool {
        if room > config.shop_after_room {
            self.shop_probability = (self.shop_probability + config.shop_increment).min(1.0);
        }
        if room > config.boss_after_room {
            self.boss_probability = (self.boss_probability + config.boss_increment).min(1.0);
        }
        if self.stage == BossStage::Final {
            self.boss_probability = 1.0;
        }

        if self.shop_probability > 0.0 && rng.chance(self.shop_probability) {
            self.shop_probability = 0.0;
            return true;
        }
        false
    }

    /// Rolls the boss gate. A hit resets the boss chance and yields the boss
    /// for the current stage.
    pub fn roll_boss(&mut self, rng: &mut dyn RngSource) -> Option<EnemyKind> {
        let kind = self.next_boss()?;
        if self.boss_probability <= 0.0 || !rng.chance(self.boss_probability) {
            return None;
        }
        self.boss_probability = 0.0;
        Some(kind)
    }

    /// Boss the next boss room would hold.
    pub fn next_boss(&self) -> Option<EnemyKind> {
        match self.stage {
            BossStage::First => Some(EnemyKind::REGULAR_BOSSES[0]),
            BossStage::Second => Some(EnemyKind::REGULAR_BOSSES[1]),
            BossStage::Final => Some(EnemyKind::FINAL_BOSS),
            BossStage::Cleared => None,
        }
    }

    /// Records a boss kill and moves to the next stage.
    ///
    /// Killing the final boss returns `true`.
    pub fn boss_defeated(&mut self, kind: EnemyKind) -> bool {
        self.stage = match (self.stage, kind) {
            (BossStage::First, _) => BossStage::Second,
            (BossStage::Second, _) => BossStage::Final,
            (BossStage::Final, EnemyKind::DreadLord) => BossStage::Cleared,
            (stage, _) => stage,
        };
        if self.stage == BossStage::Final {
            self.boss_probability = 1.0;
        }
        tracing::info!(stage = %self.stage, boss = %kind, "boss defeated");
        self.stage == BossStage::Cleared
    }
}

/// Rolls the regular enemies for `room`.
///
/// Count is uniform in `1..=min(1 + room / rooms_per_extra_enemy,
/// max_enemies)`; each kind is uniform among those available in `room`.
pub fn room_enemies(room: u32, config: &GateConfig, rng: &mut dyn RngSource) -> Vec<EnemyKind> {
    let cap = (1 + room / config.rooms_per_extra_enemy.max(1)) as usize;
    let cap = cap.min(config.max_enemies.max(1));
    let count = rng.range(1, cap as u32) as usize;

    let pool: Vec<EnemyKind> = EnemyKind::available_in(room).collect();
    if pool.is_empty() {
        return vec![EnemyKind::REGULAR[0]; count];
    }
    (0..count).map(|_| pool[rng.index(pool.len())]).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{PcgRng, ScriptedRng};

    #[test]
    fn shop_grows_after_threshold_and_resets() {
        let config = GateConfig::default();
        let mut gates = Gates::default();
        let mut rng = ScriptedRng::constant(0.99);
        for room in 1..=5 {
            assert!(!gates.roll_shop(room, &config, &mut rng));
        }
        assert_eq!(gates.shop_probability, 0.0);
        gates.roll_shop(6, &config, &mut rng);
        assert!((gates.shop_probability - 0.1).abs() < 1e-12);

        assert!(gates.roll_shop(7, &config, &mut ScriptedRng::constant(0.0)));
        assert_eq!(gates.shop_probability, 0.0);
    }

    #[test]
    fn boss_progression() {
        let mut gates = Gates::default();
        assert_eq!(gates.next_boss(), Some(EnemyKind::Golem));
        assert_eq!(gates.roll_boss(&mut ScriptedRng::constant(0.0)), None);

        gates.boss_probability = 0.5;
        assert_eq!(
            gates.roll_boss(&mut ScriptedRng::constant(0.4)),
            Some(EnemyKind::Golem)
        );
        assert_eq!(gates.boss_probability, 0.0);

        assert!(!gates.boss_defeated(EnemyKind::Golem));
        assert_eq!(gates.next_boss(), Some(EnemyKind::Lich));
        assert!(!gates.boss_defeated(EnemyKind::Lich));
        assert_eq!(gates.boss_probability, 1.0);
        assert_eq!(
            gates.roll_boss(&mut ScriptedRng::constant(0.99)),
            Some(EnemyKind::DreadLord)
        );

        // Pinned again on the next room.
        gates.roll_shop(30, &GateConfig::default(), &mut ScriptedRng::constant(0.99));
        assert_eq!(gates.boss_probability, 1.0);
        assert!(gates.boss_defeated(EnemyKind::DreadLord));
        assert_eq!(gates.next_boss(), None);
    }

    #[test]
    fn room_one_enemies() {
        let mut rng = PcgRng::seeded(2);
        for _ in 0..100 {
            let enemies = room_enemies(1, &GateConfig::default(), &mut rng);
            assert_eq!(enemies.len(), 1);
            assert!(matches!(enemies[0], EnemyKind::Slime | EnemyKind::Rat));
        }
    }

    #[test]
    fn enemy_count_is_capped() {
        let mut rng = PcgRng::seeded(9);
        for _ in 0..100 {
            let enemies = room_enemies(50, &GateConfig::default(), &mut rng);
            assert!((1..=4).contains(&enemies.len()));
        }
    }
}
