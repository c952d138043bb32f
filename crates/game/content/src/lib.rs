//! Data-driven content and loaders.
//!
//! This crate reads the balance config and the enemy catalog from disk:
//! - Game configuration (TOML)
//! - Enemy templates (RON), served to the core through [`EnemyCatalog`]
//!
//! Content feeds the run controller and never appears in battle state.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{ConfigLoader, ContentFactory, EnemyCatalog, EnemyLoader, LoadResult};
