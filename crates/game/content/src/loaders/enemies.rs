//! Enemy catalog loader.
//!
//! Loads enemy templates from a RON list of `(kind, template)` pairs. Kinds
//! the file leaves out fall back to the built-in tables.

use std::collections::BTreeMap;
use std::path::Path;

use descent_core::{EnemyKind, EnemyOracle, EnemyTemplate, StatKind, builtin_template};

use crate::loaders::{LoadResult, read_file};

/// Enemy templates keyed by kind.
#[derive(Clone, Debug, PartialEq)]
pub struct EnemyCatalog {
    templates: BTreeMap<EnemyKind, EnemyTemplate>,
    /// Serve built-in templates for kinds not in the catalog.
    fallback: bool,
}

impl EnemyCatalog {
    /// Catalog backed by the built-in tables for missing kinds.
    pub fn new(templates: BTreeMap<EnemyKind, EnemyTemplate>) -> Self {
        Self {
            templates,
            fallback: true,
        }
    }

    /// Only the templates given; other kinds are unknown.
    pub fn strict(templates: BTreeMap<EnemyKind, EnemyTemplate>) -> Self {
        Self {
            templates,
            fallback: false,
        }
    }

    /// Empty catalog serving only built-in templates.
    pub fn default_builtin() -> Self {
        Self::new(BTreeMap::new())
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn contains(&self, kind: EnemyKind) -> bool {
        self.templates.contains_key(&kind)
    }
}

impl Default for EnemyCatalog {
    fn default() -> Self {
        Self::default_builtin()
    }
}

impl EnemyOracle for EnemyCatalog {
    fn template(&self, kind: EnemyKind) -> Option<EnemyTemplate> {
        match self.templates.get(&kind) {
            Some(template) => Some(template.clone()),
            None if self.fallback => Some(builtin_template(kind)),
            None => None,
        }
    }
}

/// Loader for the enemy catalog from RON files.
pub struct EnemyLoader;

impl EnemyLoader {
    /// Load the enemy catalog from a RON file.
    ///
    /// RON format: `Vec<(EnemyKind, EnemyTemplate)>`. Template fields left
    /// out keep their defaults.
    pub fn load(path: &Path) -> LoadResult<EnemyCatalog> {
        let content = read_file(path)?;
        let templates = Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("{} ({})", e, path.display()))?;
        tracing::debug!(path = %path.display(), kinds = templates.len(), "enemy catalog loaded");
        Ok(EnemyCatalog::new(templates))
    }

    /// Parse and validate catalog entries from RON text.
    pub fn parse(content: &str) -> LoadResult<BTreeMap<EnemyKind, EnemyTemplate>> {
        let entries: Vec<(EnemyKind, EnemyTemplate)> = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse enemy catalog RON: {}", e))?;

        let mut templates = BTreeMap::new();
        for (kind, template) in entries {
            validate(kind, &template)?;
            if templates.insert(kind, template).is_some() {
                anyhow::bail!("Enemy '{}' is defined twice", kind);
            }
        }
        Ok(templates)
    }
}

fn validate(kind: EnemyKind, template: &EnemyTemplate) -> LoadResult<()> {
    if template.hp.base <= 0.0 {
        anyhow::bail!("Enemy '{}' must start with positive hp", kind);
    }
    if template.attack_speed.base <= 0.0 {
        anyhow::bail!("Enemy '{}' must have a positive attack_speed", kind);
    }
    if template.dodge_chance.base > StatKind::DodgeChance.cap() {
        tracing::warn!(%kind, dodge = template.dodge_chance.base, "dodge chance will be clamped");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const CATALOG: &str = r#"
        [
            (Slime, (
                name: "Ooze",
                glyph: 'o',
                xp: 2,
                hp: (base: 10.0, per_room: 4.0),
                attack: (base: 1.5),
                attack_speed: (base: 0.7, per_room: 0.01),
            )),
            (Golem, (
                name: "Iron Golem",
                glyph: 'I',
                xp: 40,
                hp: (base: 90.0),
                attack: (base: 7.0),
                attack_speed: (base: 0.5),
                thorn_damage: 2.0,
            )),
        ]
    "#;

    #[test]
    fn parses_partial_templates() {
        let templates = EnemyLoader::parse(CATALOG).unwrap();
        let slime = &templates[&EnemyKind::Slime];
        assert_eq!(slime.name, "Ooze");
        assert_eq!(slime.xp, 2);
        assert_eq!(slime.hp.at(3), 18.0);
        assert_eq!(slime.dodge_chance.base, 0.0);
        assert_eq!(templates[&EnemyKind::Golem].thorn_damage, 2.0);
    }

    #[test]
    fn missing_kinds_fall_back() {
        let catalog = EnemyCatalog::new(EnemyLoader::parse(CATALOG).unwrap());
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.template(EnemyKind::Slime).unwrap().name, "Ooze");
        assert_eq!(
            catalog.template(EnemyKind::Rat),
            Some(builtin_template(EnemyKind::Rat))
        );

        let strict = EnemyCatalog::strict(EnemyLoader::parse(CATALOG).unwrap());
        assert!(strict.template(EnemyKind::Rat).is_none());
        assert_eq!(strict.kinds(), vec![EnemyKind::Slime, EnemyKind::Golem]);
    }

    #[test]
    fn rejects_bad_templates() {
        let zero_hp = "[(Rat, (hp: (base: 0.0)))]";
        assert!(EnemyLoader::parse(zero_hp).is_err());

        let twice = "[(Rat, ()), (Rat, ())]";
        let message = EnemyLoader::parse(twice).unwrap_err().to_string();
        assert!(message.contains("twice"), "{message}");

        assert!(EnemyLoader::parse("[(Dragon, ())]").is_err());
    }

    #[test]
    fn load_from_disk() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("enemies.ron");
        std::fs::write(&path, CATALOG).unwrap();
        let catalog = EnemyLoader::load(&path).unwrap();
        assert!(catalog.contains(EnemyKind::Golem));
        assert!(!catalog.contains(EnemyKind::Lich));
    }
}
