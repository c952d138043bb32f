//! Damage calculation.

/// No landed hit deals less than this before crit scaling.
pub const MIN_DAMAGE: f64 = 1.0;

/// Damage of one landed hit.
///
/// # Formula
///
/// ```text
/// base = max(MIN_DAMAGE, attack - defence)
/// damage = base * crit_damage   if critical
///        = base                 otherwise
/// ```
///
/// The floor applies before the crit multiplier, so a crit against an
/// impenetrable defender still deals `crit_damage`.
pub fn calculate_damage(attack: f64, defence: f64, crit_damage: Option<f64>) -> f64 {
    let base = (attack - defence).max(MIN_DAMAGE);
    match crit_damage {
        Some(multiplier) => base * multiplier,
        None => base,
    }
}

/// Damage of a counterattack: no floor of one, never negative.
pub fn counter_damage(attack: f64, defence: f64) -> f64 {
    (attack - defence).max(0.0)
}
