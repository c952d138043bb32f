//! Strike resolution.

use crate::env::RngSource;
use crate::stats::Stats;

use super::damage::calculate_damage;
use super::hit::{check_crit, check_dodge};

/// Outcome of one strike before any defender-side effects.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StrikeOutcome {
    Dodged,
    Hit { damage: f64, crit: bool },
}

/// Rolls dodge, then crit, and computes raw damage.
///
/// A dodged strike consumes one draw; a landed strike consumes two.
pub fn resolve_strike(
    attacker: &Stats,
    defender: &Stats,
    rng: &mut dyn RngSource,
) -> StrikeOutcome {
    if check_dodge(defender.dodge_chance, rng) {
        return StrikeOutcome::Dodged;
    }

    let crit = check_crit(attacker.crit_chance, rng);
    let multiplier = crit.then_some(attacker.crit_damage);
    StrikeOutcome::Hit {
        damage: calculate_damage(attacker.attack, defender.defence, multiplier),
        crit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{PcgRng, ScriptedRng};

    fn stats(attack: f64, crit_chance: f64, crit_damage: f64, defence: f64) -> Stats {
        Stats {
            attack,
            crit_chance,
            crit_damage,
            defence,
            ..Stats::default()
        }
    }

    #[test]
    fn weak_attacker_deals_one_or_crit_two() {
        let attacker = stats(1.0, 0.5, 2.0, 0.0);
        let defender = stats(1.0, 0.0, 1.5, 5.0);
        let mut rng = PcgRng::seeded(5);
        for _ in 0..500 {
            match resolve_strike(&attacker, &defender, &mut rng) {
                StrikeOutcome::Hit { damage, crit } => {
                    assert_eq!(damage, if crit { 2.0 } else { 1.0 });
                }
                StrikeOutcome::Dodged => panic!("defender cannot dodge"),
            }
        }
    }

    #[test]
    fn dodge_short_circuits() {
        let attacker = stats(5.0, 1.0, 2.0, 0.0);
        let mut defender = Stats::default();
        defender.dodge_chance = 0.7;
        let mut rng = ScriptedRng::new(vec![0.1, 0.9]);
        assert_eq!(
            resolve_strike(&attacker, &defender, &mut rng),
            StrikeOutcome::Dodged
        );
        assert_eq!(rng.draws(), 1);
    }
}
