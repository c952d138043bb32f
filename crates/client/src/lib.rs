//! Headless shell around the Descent rules.
//!
//! ```text
//! Args ─→ SessionBuilder ─→ Session ─┬─→ Run (descent-core)
//!                                    ├─→ Chooser (AutoChooser)
//!                                    └─→ FrameSink (LogSink)
//! ```
//!
//! Content comes from `descent-content`; the client only wires it up and
//! prints what the run reports.

mod builder;
mod chooser;
pub mod config;
pub mod logging;
mod presenter;

pub use builder::SessionBuilder;
pub use chooser::AutoChooser;
pub use config::Args;
pub use presenter::LogSink;

use std::path::{Path, PathBuf};

use anyhow::Result;
use descent_content::EnemyCatalog;
use descent_core::{Chooser, FrameSink, PcgRng, Run, RunSummary, drive};

/// One configured run, ready to play.
pub struct Session {
    run: Run<EnemyCatalog, PcgRng>,
    seed: u64,
    max_rooms: u32,
    data_dir: PathBuf,
}

impl Session {
    pub fn builder() -> SessionBuilder {
        SessionBuilder::new()
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn run(&self) -> &Run<EnemyCatalog, PcgRng> {
        &self.run
    }

    /// Play until the run ends or `max_rooms` rooms are cleared.
    pub fn play(
        &mut self,
        chooser: &mut dyn Chooser,
        sink: &mut dyn FrameSink,
    ) -> Result<RunSummary> {
        let summary = drive(&mut self.run, chooser, sink, self.max_rooms)?;
        Ok(summary)
    }
}
