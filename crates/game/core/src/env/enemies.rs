//! Enemy template lookup.
//!
//! The battle loop and the run controller ask an [`EnemyOracle`] for spawn
//! data. [`BuiltinEnemies`] carries the default tables; data-driven
//! catalogs live in the content crate.

use strum::IntoEnumIterator;

use crate::entity::{EnemyKind, EnemyTemplate, Scaling};

/// Read-only source of enemy templates.
pub trait EnemyOracle: Send + Sync {
    /// Template for `kind`, or `None` if this oracle does not define it.
    fn template(&self, kind: EnemyKind) -> Option<EnemyTemplate>;

    /// Kinds this oracle defines.
    fn kinds(&self) -> Vec<EnemyKind> {
        EnemyKind::iter()
            .filter(|kind| self.template(*kind).is_some())
            .collect()
    }
}

impl<T: EnemyOracle + ?Sized> EnemyOracle for &T {
    fn template(&self, kind: EnemyKind) -> Option<EnemyTemplate> {
        (**self).template(kind)
    }
}

/// Default enemy tables.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BuiltinEnemies;

impl EnemyOracle for BuiltinEnemies {
    fn template(&self, kind: EnemyKind) -> Option<EnemyTemplate> {
        Some(builtin_template(kind))
    }
}

/// Default template for `kind`.
pub fn builtin_template(kind: EnemyKind) -> EnemyTemplate {
    let base = EnemyTemplate::default();
    match kind {
        EnemyKind::Slime => EnemyTemplate {
            name: "Slime".into(),
            glyph: 's',
            xp: 3,
            hp: Scaling::new(8.0, 3.0),
            attack: Scaling::new(2.0, 0.5),
            attack_speed: Scaling::new(0.8, 0.02),
            defence: Scaling::new(0.0, 0.1),
            dodge_chance: Scaling::new(0.05, 0.005),
            ..base
        },
        EnemyKind::Rat => EnemyTemplate {
            name: "Rat".into(),
            glyph: 'r',
            xp: 3,
            hp: Scaling::new(5.0, 2.0),
            attack: Scaling::new(1.5, 0.4),
            attack_speed: Scaling::new(1.4, 0.03),
            defence: Scaling::new(0.0, 0.05),
            dodge_chance: Scaling::new(0.10, 0.005),
            ..base
        },
        EnemyKind::Brute => EnemyTemplate {
            name: "Brute".into(),
            glyph: 'B',
            xp: 5,
            hp: Scaling::new(14.0, 5.0),
            attack: Scaling::new(3.0, 0.7),
            attack_speed: Scaling::new(0.5, 0.01),
            defence: Scaling::new(1.0, 0.2),
            dodge_chance: Scaling::fixed(0.0),
            ..base
        },
        EnemyKind::Archer => EnemyTemplate {
            name: "Archer".into(),
            glyph: 'a',
            xp: 4,
            hp: Scaling::new(7.0, 2.5),
            attack: Scaling::new(2.5, 0.6),
            attack_speed: Scaling::new(0.9, 0.02),
            defence: Scaling::new(0.0, 0.05),
            dodge_chance: Scaling::new(0.05, 0.005),
            crit_chance: 0.2,
            crit_damage: 1.8,
            ..base
        },
        EnemyKind::Shade => EnemyTemplate {
            name: "Shade".into(),
            glyph: 'S',
            xp: 5,
            hp: Scaling::new(6.0, 2.0),
            attack: Scaling::new(2.0, 0.5),
            attack_speed: Scaling::new(1.0, 0.02),
            defence: Scaling::new(0.0, 0.05),
            dodge_chance: Scaling::new(0.25, 0.01),
            ..base
        },
        EnemyKind::Bat => EnemyTemplate {
            name: "Bat".into(),
            glyph: 'b',
            xp: 4,
            hp: Scaling::new(6.0, 2.0),
            attack: Scaling::new(1.8, 0.4),
            attack_speed: Scaling::new(1.2, 0.03),
            dodge_chance: Scaling::new(0.15, 0.005),
            lifesteal: 0.5,
            ..base
        },
        EnemyKind::Minion => EnemyTemplate {
            name: "Minion".into(),
            glyph: 'm',
            xp: 1,
            hp: Scaling::new(8.0, 3.0),
            attack: Scaling::new(2.0, 0.5),
            attack_speed: Scaling::new(0.8, 0.02),
            defence: Scaling::new(0.0, 0.1),
            ..base
        },
        EnemyKind::Golem => EnemyTemplate {
            name: "Stone Golem".into(),
            glyph: 'G',
            xp: 30,
            hp: Scaling::fixed(80.0),
            attack: Scaling::fixed(6.0),
            attack_speed: Scaling::fixed(0.6),
            defence: Scaling::fixed(3.0),
            thorn_damage: 1.0,
            ..base
        },
        EnemyKind::Lich => EnemyTemplate {
            name: "Lich".into(),
            glyph: 'L',
            xp: 35,
            hp: Scaling::fixed(60.0),
            attack: Scaling::fixed(8.0),
            attack_speed: Scaling::fixed(0.8),
            defence: Scaling::fixed(1.0),
            dodge_chance: Scaling::fixed(0.1),
            health_regen: 2.0,
            ..base
        },
        EnemyKind::DreadLord => EnemyTemplate {
            name: "Dread Lord".into(),
            glyph: 'D',
            xp: 60,
            hp: Scaling::fixed(150.0),
            attack: Scaling::fixed(10.0),
            attack_speed: Scaling::fixed(0.9),
            defence: Scaling::fixed(4.0),
            dodge_chance: Scaling::fixed(0.05),
            crit_chance: 0.1,
            crit_damage: 2.0,
            ..base
        },
    }
}
