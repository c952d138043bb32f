//! Presentation boundary.
//!
//! A [`Frame`] is a plain snapshot built from the run or the current battle,
//! with CRIT!/DODGE! flashes as explicit [`Overlay`] rows. Presenters
//! implement [`FrameSink`] and [`Chooser`]; the core never reaches back
//! into them.

mod boundary;
mod frame;

pub use boundary::{Chooser, FrameSink, NullSink, RecordingSink, ScriptedChooser};
pub use frame::{
    EnemySnapshot, Frame, LOG_TAIL, Overlay, PlayerSnapshot, overlays, row_of,
};
