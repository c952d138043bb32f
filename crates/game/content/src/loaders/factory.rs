//! Content factory for loading everything from one data directory.

use std::path::{Path, PathBuf};

use descent_core::GameConfig;

use crate::loaders::{ConfigLoader, EnemyCatalog, EnemyLoader, LoadResult};

/// Environment variable that overrides the default data directory.
pub const DATA_DIR_ENV: &str = "CONTENT_DATA_DIR";

/// Content factory that loads all game content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// └── enemies.ron
/// ```
///
/// Either file may be absent, in which case the built-in defaults apply.
#[derive(Clone, Debug)]
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Data directory from `CONTENT_DATA_DIR`, else `crates/game/content/data`
    /// under the current directory.
    pub fn default_paths() -> Self {
        let data_dir = match std::env::var(DATA_DIR_ENV) {
            Ok(dir) => PathBuf::from(dir),
            Err(_) => std::env::current_dir()
                .unwrap_or_else(|_| PathBuf::from("."))
                .join("crates/game/content/data"),
        };
        Self::new(data_dir)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Load game configuration from `config.toml`.
    pub fn load_config(&self) -> LoadResult<GameConfig> {
        let path = self.data_dir.join("config.toml");
        if !path.exists() {
            tracing::info!(path = %path.display(), "no config file, using defaults");
            return Ok(GameConfig::default());
        }
        ConfigLoader::load(&path)
    }

    /// Load the enemy catalog from `enemies.ron`.
    pub fn load_enemies(&self) -> LoadResult<EnemyCatalog> {
        let path = self.data_dir.join("enemies.ron");
        if !path.exists() {
            tracing::info!(path = %path.display(), "no enemy catalog, using built-in tables");
            return Ok(EnemyCatalog::default_builtin());
        }
        EnemyLoader::load(&path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use descent_core::{EnemyKind, EnemyOracle};
    use tempfile::TempDir;

    #[test]
    fn empty_dir_uses_defaults() {
        let temp = TempDir::new().unwrap();
        let factory = ContentFactory::new(temp.path());
        assert_eq!(factory.load_config().unwrap(), GameConfig::default());
        let enemies = factory.load_enemies().unwrap();
        assert!(enemies.is_empty());
        assert!(enemies.template(EnemyKind::DreadLord).is_some());
    }

    #[test]
    fn shipped_data_loads() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("data");
        let factory = ContentFactory::new(dir);
        let config = factory.load_config().unwrap();
        assert_eq!(config.tick_seconds, 0.05);
        let enemies = factory.load_enemies().unwrap();
        for kind in [EnemyKind::Slime, EnemyKind::Golem, EnemyKind::DreadLord] {
            assert!(enemies.contains(kind), "{kind}");
        }
    }
}
