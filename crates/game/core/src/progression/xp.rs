//! Experience and level thresholds.

use crate::entity::Player;

/// Adds `amount * multiplier * player multiplier` experience (floored) and
/// levels up while the threshold is met.
///
/// Each level-up subtracts the threshold and grows it by `growth`, floored.
/// Returns the number of levels gained.
pub fn gain_xp(player: &mut Player, amount: u64, multiplier: f64, growth: f64) -> u32 {
    let gained = (amount as f64 * multiplier * player.xp_multiplier()).floor() as u64;
    player.xp += gained;

    let mut levels = 0;
    while player.xp >= player.xp_to_next {
        player.xp -= player.xp_to_next;
        player.level += 1;
        player.xp_to_next = ((player.xp_to_next as f64 * growth).floor() as u64).max(1);
        levels += 1;
    }
    if levels > 0 {
        tracing::info!(level = player.level, gained, "level up");
    }
    levels
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::PlayerClass;
    use crate::items::ItemIdGen;
    use crate::skills::{SkillKind, acquire};

    fn fresh() -> Player {
        Player::new(PlayerClass::Fighter, &mut ItemIdGen::default())
    }

    #[test]
    fn exact_threshold_levels_once() {
        let mut player = fresh();
        assert_eq!(gain_xp(&mut player, 10, 1.0, 1.5), 1);
        assert_eq!(player.level, 2);
        assert_eq!(player.xp, 0);
        assert_eq!(player.xp_to_next, 15);
    }

    #[test]
    fn overflow_carries_into_second_level() {
        let mut player = fresh();
        assert_eq!(gain_xp(&mut player, 25, 1.0, 1.5), 2);
        assert_eq!(player.level, 3);
        assert_eq!(player.xp_to_next, 22);
    }

    #[test]
    fn scholar_and_boss_multipliers_stack() {
        let mut player = fresh();
        acquire(&mut player, SkillKind::Scholar);
        // 4 * 2.0 * 1.25 = 10
        assert_eq!(gain_xp(&mut player, 4, 2.0, 1.5), 1);
        assert_eq!(player.xp, 0);
    }
}
