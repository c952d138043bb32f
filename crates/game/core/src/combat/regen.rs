//! Interval-based health regeneration.
//!
//! Each point of regen shrinks the wait between 1 HP heals:
//!
//! ```text
//! interval = base_interval * decay^(regen - 1)
//! ```

/// Seconds between heals at `regen`.
pub fn regen_interval(base_interval: f64, decay: f64, regen: f64) -> f64 {
    base_interval * decay.powf(regen - 1.0)
}

/// Advances `timer` by `dt` and returns how many 1 HP heals are due.
///
/// Callers reset the timer while the owner is at full HP so regen never
/// banks heals.
pub fn regen_ticks(timer: &mut f64, dt: f64, regen: f64, base_interval: f64, decay: f64) -> u32 {
    if regen <= 0.0 {
        *timer = 0.0;
        return 0;
    }
    let interval = regen_interval(base_interval, decay, regen);
    *timer += dt;
    let mut heals = 0;
    while *timer + 1e-9 >= interval {
        *timer -= interval;
        heals += 1;
    }
    heals
}
