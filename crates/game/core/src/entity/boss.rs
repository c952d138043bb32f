//! Scripted per-tick boss behaviour.
//!
//! A boss only reports what it wants to do; the battle loop carries it out,
//! since summoning and siphoning touch state the enemy does not own.

use super::enemy::EnemyKind;

const ENRAGE_THRESHOLD: f64 = 0.5;
const ENRAGE_MULTIPLIER: f64 = 1.5;
const SIPHON_INTERVAL: f64 = 6.0;
const SIPHON_FRACTION: f64 = 0.05;

/// Special behaviour attached to an enemy.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BossBehaviour {
    #[default]
    None,
    /// Attack is multiplied once when HP first falls below the threshold.
    Enrage {
        threshold: f64,
        multiplier: f64,
        enraged: bool,
    },
    /// Periodically drains a fraction of the player's max HP.
    Siphon {
        interval: f64,
        fraction: f64,
        timer: f64,
    },
    /// Periodically calls in a minion.
    Summon { timer: f64 },
}

/// Something a boss asks the battle to do this tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BossAction {
    Enrage { multiplier: f64 },
    /// Drain this fraction of the player's max HP.
    Siphon { fraction: f64 },
    Summon,
}

impl BossBehaviour {
    pub fn for_kind(kind: EnemyKind) -> Self {
        match kind {
            EnemyKind::Golem => BossBehaviour::Enrage {
                threshold: ENRAGE_THRESHOLD,
                multiplier: ENRAGE_MULTIPLIER,
                enraged: false,
            },
            EnemyKind::Lich => BossBehaviour::Siphon {
                interval: SIPHON_INTERVAL,
                fraction: SIPHON_FRACTION,
                timer: 0.0,
            },
            EnemyKind::DreadLord => BossBehaviour::Summon { timer: 0.0 },
            _ => BossBehaviour::None,
        }
    }

    /// Advances timers by `dt` and returns at most one action.
    ///
    /// `hp_fraction` is the owner's current HP over max HP.
    pub fn update(
        &mut self,
        dt: f64,
        hp_fraction: f64,
        summon_interval: f64,
    ) -> Option<BossAction> {
        match self {
            BossBehaviour::None => None,
            BossBehaviour::Enrage {
                threshold,
                multiplier,
                enraged,
            } => {
                if *enraged || hp_fraction >= *threshold {
                    return None;
                }
                *enraged = true;
                Some(BossAction::Enrage {
                    multiplier: *multiplier,
                })
            }
            BossBehaviour::Siphon {
                interval,
                fraction,
                timer,
            } => {
                *timer += dt;
                if *timer + 1e-9 < *interval {
                    return None;
                }
                *timer -= *interval;
                Some(BossAction::Siphon {
                    fraction: *fraction,
                })
            }
            BossBehaviour::Summon { timer } => {
                *timer += dt;
                if *timer + 1e-9 < summon_interval {
                    return None;
                }
                *timer -= summon_interval;
                Some(BossAction::Summon)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn golem_enrages_once() {
        let mut behaviour = BossBehaviour::for_kind(EnemyKind::Golem);
        assert_eq!(behaviour.update(0.05, 0.9, 7.0), None);
        assert_eq!(
            behaviour.update(0.05, 0.4, 7.0),
            Some(BossAction::Enrage { multiplier: 1.5 })
        );
        assert_eq!(behaviour.update(0.05, 0.1, 7.0), None);
    }

    #[test]
    fn summon_on_interval() {
        let mut behaviour = BossBehaviour::for_kind(EnemyKind::DreadLord);
        let actions = (0..280)
            .filter_map(|_| behaviour.update(0.05, 1.0, 7.0))
            .count();
        assert_eq!(actions, 2);
    }

    #[test]
    fn regular_enemies_have_no_behaviour() {
        let mut behaviour = BossBehaviour::for_kind(EnemyKind::Rat);
        assert_eq!(behaviour, BossBehaviour::None);
        assert_eq!(behaviour.update(10.0, 0.0, 1.0), None);
    }
}
