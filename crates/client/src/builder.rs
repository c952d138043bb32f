//! Session builder.

use std::path::PathBuf;

use anyhow::{Context, Result};
use descent_content::{ConfigLoader, ContentFactory, EnemyCatalog, EnemyLoader};
use descent_core::{GameConfig, PcgRng, PlayerClass, Run};

use crate::{Args, Session};

/// Builder for a [`Session`].
///
/// Files named explicitly win over the data directory's; missing data files
/// fall back to built-in content.
#[derive(Debug, Default)]
pub struct SessionBuilder {
    seed: Option<u64>,
    class: PlayerClass,
    data_dir: Option<PathBuf>,
    config_path: Option<PathBuf>,
    enemies_path: Option<PathBuf>,
    config: Option<GameConfig>,
    max_rooms: u32,
    frame_every: u64,
}

impl SessionBuilder {
    pub fn new() -> Self {
        Self {
            max_rooms: 50,
            frame_every: 20,
            ..Self::default()
        }
    }

    /// Take every setting from parsed arguments.
    pub fn args(mut self, args: &Args) -> Self {
        self.seed = args.seed;
        self.class = args.class;
        self.data_dir = args.data_dir.clone();
        self.config_path = args.config.clone();
        self.enemies_path = args.enemies.clone();
        self.max_rooms = args.max_rooms;
        self.frame_every = args.frame_every;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn class(mut self, class: PlayerClass) -> Self {
        self.class = class;
        self
    }

    pub fn data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(dir.into());
        self
    }

    /// Use `config` as is instead of loading one.
    pub fn config(mut self, config: GameConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn max_rooms(mut self, rooms: u32) -> Self {
        self.max_rooms = rooms;
        self
    }

    /// Load content and create the run.
    ///
    /// # Errors
    ///
    /// Returns an error if a named or present content file cannot be read or
    /// parsed.
    pub fn build(self) -> Result<Session> {
        let factory = match &self.data_dir {
            Some(dir) => ContentFactory::new(dir),
            None => ContentFactory::default_paths(),
        };

        let config = match (self.config, &self.config_path) {
            (Some(config), _) => config,
            (None, Some(path)) => ConfigLoader::load(path)?,
            (None, None) => factory
                .load_config()
                .context("Failed to load game config")?,
        };
        let enemies: EnemyCatalog = match &self.enemies_path {
            Some(path) => EnemyLoader::load(path)?,
            None => factory
                .load_enemies()
                .context("Failed to load enemy catalog")?,
        };

        let seed = self.seed.unwrap_or_else(rand::random);
        let run = Run::new(config, self.class, enemies, PcgRng::seeded(seed))
            .with_frame_every(self.frame_every);

        Ok(Session {
            run,
            seed,
            max_rooms: self.max_rooms,
            data_dir: factory.data_dir().to_path_buf(),
        })
    }
}
