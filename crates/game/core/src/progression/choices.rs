//! Level-up stat options and skill offers.

use crate::config::{GameConfig, SkillConfig};
use crate::entity::Player;
use crate::env::RngSource;
use crate::skills::{SkillKind, unlearned};
use crate::stats::StatKind;

/// Samples `count` distinct stats to offer on level-up.
///
/// Luck joins the pool until it is maxed out.
pub fn level_up_options(luck: u8, count: usize, rng: &mut dyn RngSource) -> Vec<StatKind> {
    let mut pool: Vec<StatKind> = StatKind::LEVEL_UP_POOL.to_vec();
    if luck < GameConfig::MAX_LUCK {
        pool.push(StatKind::Luck);
    }
    sample(pool, count, rng)
}

/// Rolls the skill unlock chance and, on a hit, samples distinct unknown
/// skills to offer.
///
/// Returns `None` when the roll misses or every skill is known.
pub fn skill_offer(
    player: &Player,
    config: &SkillConfig,
    rng: &mut dyn RngSource,
) -> Option<Vec<SkillKind>> {
    let chance = config.unlock_chance + config.unlock_luck_bonus * f64::from(player.stats().luck);
    if !rng.chance(chance) {
        return None;
    }
    let pool = unlearned(player);
    if pool.is_empty() {
        return None;
    }
    Some(sample(pool, config.offer_count, rng))
}

/// Partial Fisher-Yates draw of up to `count` items.
fn sample<T>(mut pool: Vec<T>, count: usize, rng: &mut dyn RngSource) -> Vec<T> {
    let count = count.min(pool.len());
    let mut picked = Vec::with_capacity(count);
    for _ in 0..count {
        picked.push(pool.swap_remove(rng.index(pool.len())));
    }
    picked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::PlayerClass;
    use crate::env::{PcgRng, ScriptedRng};
    use crate::items::ItemIdGen;
    use crate::skills::acquire;
    use strum::IntoEnumIterator;

    #[test]
    fn options_are_distinct() {
        let mut rng = PcgRng::seeded(4);
        for _ in 0..200 {
            let options = level_up_options(0, 3, &mut rng);
            assert_eq!(options.len(), 3);
            assert_ne!(options[0], options[1]);
            assert_ne!(options[1], options[2]);
            assert_ne!(options[0], options[2]);
        }
    }

    #[test]
    fn maxed_luck_leaves_pool() {
        let mut rng = PcgRng::seeded(4);
        for _ in 0..200 {
            assert!(!level_up_options(10, 10, &mut rng).contains(&StatKind::Luck));
        }
        assert_eq!(level_up_options(3, 20, &mut rng).len(), 11);
    }

    #[test]
    fn skill_offer_respects_roll() {
        let player = Player::new(PlayerClass::Fighter, &mut ItemIdGen::default());
        let config = SkillConfig::default();
        assert!(skill_offer(&player, &config, &mut ScriptedRng::constant(0.36)).is_none());
        let offer = skill_offer(&player, &config, &mut ScriptedRng::constant(0.34)).unwrap();
        assert_eq!(offer.len(), 3);
    }

    #[test]
    fn offer_shrinks_to_unknown_skills() {
        let mut player = Player::new(PlayerClass::Fighter, &mut ItemIdGen::default());
        for kind in SkillKind::iter().skip(1) {
            acquire(&mut player, kind);
        }
        let offer =
            skill_offer(&player, &SkillConfig::default(), &mut ScriptedRng::constant(0.0)).unwrap();
        assert_eq!(offer, vec![SkillKind::Fireball]);
        acquire(&mut player, SkillKind::Fireball);
        assert!(
            skill_offer(&player, &SkillConfig::default(), &mut ScriptedRng::constant(0.0))
                .is_none()
        );
    }
}
