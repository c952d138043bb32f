//! Automatic answers for decision points.

use descent_core::{ChoiceKind, ChoiceOption, Chooser, Decision, Frame, StatKind};

/// Stats the automatic chooser prefers on level-up, best first.
const STAT_PRIORITY: [StatKind; 11] = [
    StatKind::MaxHp,
    StatKind::Attack,
    StatKind::AttackSpeed,
    StatKind::Defence,
    StatKind::Lifesteal,
    StatKind::HealthRegen,
    StatKind::CritChance,
    StatKind::DodgeChance,
    StatKind::CritDamage,
    StatKind::ThornDamage,
    StatKind::Luck,
];

/// Simple greedy policy.
///
/// Drinks a healing potion when below `heal_below` of max HP, buys the first
/// affordable offer, discards loot that does not fit and takes the first
/// skill offered.
#[derive(Clone, Debug)]
pub struct AutoChooser {
    pub heal_below: f64,
}

impl Default for AutoChooser {
    fn default() -> Self {
        Self { heal_below: 0.5 }
    }
}

impl Chooser for AutoChooser {
    fn choose(&mut self, decision: &Decision, frame: &Frame) -> usize {
        let options = &decision.options;

        let index = match decision.kind {
            ChoiceKind::LevelUpStat => options
                .iter()
                .enumerate()
                .min_by_key(|(_, option)| match option {
                    ChoiceOption::Stat(stat) => STAT_PRIORITY
                        .iter()
                        .position(|s| s == stat)
                        .unwrap_or(STAT_PRIORITY.len()),
                    _ => STAT_PRIORITY.len(),
                })
                .map(|(index, _)| index),
            ChoiceKind::LearnSkill => Some(0),
            ChoiceKind::UsePotion => {
                let wounded = frame.player.hp < frame.player.stats.max_hp * self.heal_below;
                let heal = find(options, |option| {
                    matches!(option, ChoiceOption::Potion { name, .. } if name.starts_with("Healing"))
                });
                match heal {
                    Some(index) if wounded => Some(index),
                    _ => find(options, |option| matches!(option, ChoiceOption::Fight)),
                }
            }
            ChoiceKind::InventoryFull => {
                find(options, |option| matches!(option, ChoiceOption::Discard))
            }
            ChoiceKind::Shop => {
                let gold = frame.player.gold;
                find(options, |option| {
                    matches!(option, ChoiceOption::Buy { price, .. } if *price <= gold)
                })
                .or_else(|| find(options, |option| matches!(option, ChoiceOption::Leave)))
            }
        };

        let index = index.unwrap_or(0);
        if let Some(option) = options.get(index) {
            tracing::debug!(kind = %decision.kind, %option, "auto choice");
        }
        index
    }
}

fn find(options: &[ChoiceOption], want: impl Fn(&ChoiceOption) -> bool) -> Option<usize> {
    options.iter().position(want)
}

#[cfg(test)]
mod tests {
    use super::*;
    use descent_core::{GameConfig, PcgRng, PlayerClass, Run};

    fn frame() -> Frame {
        let run = Run::new(
            GameConfig::default(),
            PlayerClass::Fighter,
            descent_core::BuiltinEnemies,
            PcgRng::seeded(1),
        );
        run.frame()
    }

    #[test]
    fn prefers_max_hp_on_level_up() {
        let decision = Decision::new(
            ChoiceKind::LevelUpStat,
            "Level up",
            vec![
                ChoiceOption::Stat(StatKind::Luck),
                ChoiceOption::Stat(StatKind::Attack),
                ChoiceOption::Stat(StatKind::MaxHp),
            ],
        );
        assert_eq!(AutoChooser::default().choose(&decision, &frame()), 2);
    }

    #[test]
    fn fights_at_full_health() {
        let decision = Decision::new(
            ChoiceKind::UsePotion,
            "Potions",
            vec![
                ChoiceOption::Potion {
                    slot: 0,
                    name: "Healing Potion (30%)".into(),
                },
                ChoiceOption::Fight,
            ],
        );
        let mut frame = frame();
        assert_eq!(AutoChooser::default().choose(&decision, &frame), 1);

        frame.player.hp = 1.0;
        assert_eq!(AutoChooser::default().choose(&decision, &frame), 0);
    }

    #[test]
    fn leaves_shop_when_broke() {
        let decision = Decision::new(
            ChoiceKind::Shop,
            "Shop",
            vec![
                ChoiceOption::Buy {
                    index: 0,
                    name: "Sword".into(),
                    price: 30,
                },
                ChoiceOption::Leave,
            ],
        );
        let mut frame = frame();
        frame.player.gold = 10;
        assert_eq!(AutoChooser::default().choose(&decision, &frame), 1);
        frame.player.gold = 30;
        assert_eq!(AutoChooser::default().choose(&decision, &frame), 0);
    }
}
