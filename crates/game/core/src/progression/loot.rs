//! Post-battle drops.

use crate::config::LootConfig;
use crate::entity::Player;
use crate::env::RngSource;
use crate::items::{Equipment, Item, ItemIdGen, Potion};
use crate::skills::PassiveFlags;

/// What a won battle dropped.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Loot {
    pub gold: u32,
    pub items: Vec<Item>,
}

impl Loot {
    pub fn is_empty(&self) -> bool {
        self.gold == 0 && self.items.is_empty()
    }
}

/// Rolls potion, equipment and gold independently.
///
/// Every chance gains `luck_bonus` per luck point and the Treasure Hunter
/// bonus when that passive is known. The draw order is potion, equipment,
/// gold.
pub fn roll_loot(
    player: &Player,
    room: u32,
    config: &LootConfig,
    ids: &mut ItemIdGen,
    rng: &mut dyn RngSource,
) -> Loot {
    let luck = player.stats().luck;
    let mut bonus = config.luck_bonus * f64::from(luck);
    if player.passives.contains(PassiveFlags::TREASURE_HUNTER) {
        bonus += config.treasure_hunter_bonus;
    }

    let mut loot = Loot::default();
    if rng.chance(config.potion_chance + bonus) {
        loot.items.push(Item::Potion(Potion::roll(rng)));
    }
    if rng.chance(config.equipment_chance + bonus) {
        let item = Equipment::roll(
            ids.next_id(),
            room,
            luck,
            config.rooms_per_equipment_level,
            rng,
        );
        loot.items.push(Item::Equipment(item));
    }
    if rng.chance(config.gold_chance + bonus) {
        loot.gold = rng.range(1, config.gold_base + room);
    }
    tracing::debug!(room, gold = loot.gold, items = loot.items.len(), "loot rolled");
    loot
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::PlayerClass;
    use crate::env::{PcgRng, ScriptedRng};
    use crate::skills::{SkillKind, acquire};

    fn player() -> (Player, ItemIdGen) {
        let mut ids = ItemIdGen::default();
        (Player::new(PlayerClass::Fighter, &mut ids), ids)
    }

    #[test]
    fn all_miss() {
        let (player, mut ids) = player();
        let loot = roll_loot(
            &player,
            3,
            &LootConfig::default(),
            &mut ids,
            &mut ScriptedRng::constant(0.99),
        );
        assert!(loot.is_empty());
    }

    #[test]
    fn treasure_hunter_widens_chances() {
        let (mut player, mut ids) = player();
        // 0.35 misses every base chance.
        let config = LootConfig::default();
        assert!(
            roll_loot(&player, 1, &config, &mut ids, &mut ScriptedRng::new([0.35, 0.35, 0.55]))
                .items
                .is_empty()
        );
        acquire(&mut player, SkillKind::TreasureHunter);
        let loot = roll_loot(
            &player,
            1,
            &config,
            &mut ids,
            &mut ScriptedRng::new([0.35, 0.99, 0.99, 0.99, 0.55, 0.0]),
        );
        assert_eq!(loot.items.len(), 1);
        assert!(matches!(loot.items[0], Item::Potion(_)));
        assert_eq!(loot.gold, 1);
    }

    #[test]
    fn gold_stays_in_range() {
        let (player, mut ids) = player();
        let mut rng = PcgRng::seeded(11);
        let config = LootConfig::default();
        for _ in 0..300 {
            let loot = roll_loot(&player, 7, &config, &mut ids, &mut rng);
            assert!(loot.gold <= config.gold_base + 7);
        }
    }
}
