//! Dodge and crit rolls.

use crate::env::RngSource;

/// Rolls the defender's dodge.
pub fn check_dodge(dodge_chance: f64, rng: &mut dyn RngSource) -> bool {
    rng.chance(dodge_chance)
}

/// Rolls the attacker's crit.
pub fn check_crit(crit_chance: f64, rng: &mut dyn RngSource) -> bool {
    rng.chance(crit_chance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::ScriptedRng;

    #[test]
    fn zero_chance_never_fires() {
        let mut rng = ScriptedRng::constant(0.0);
        assert!(!check_dodge(0.0, &mut rng));
        assert!(check_crit(0.01, &mut rng));
    }
}
