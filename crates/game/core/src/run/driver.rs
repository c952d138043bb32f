//! Headless loop tying a run to a chooser and a sink.

use crate::env::{EnemyOracle, RngSource};
use crate::error::GameError;
use crate::view::{Chooser, FrameSink};

use super::{Progress, Run, RunError, RunOutcome};

/// How a driven run ended.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunSummary {
    pub outcome: RunOutcome,
    pub rooms: u32,
    pub level: u32,
    pub gold: u32,
    pub battles: u32,
    pub decisions: u32,
}

/// Plays `run` until it ends or `max_rooms` rooms are cleared.
///
/// Every decision goes to `chooser`. A recoverable rejection (such as an
/// unaffordable purchase) falls back to the decision's last option, which is
/// always the way out.
pub fn drive<O: EnemyOracle, R: RngSource>(
    run: &mut Run<O, R>,
    chooser: &mut dyn Chooser,
    sink: &mut dyn FrameSink,
    max_rooms: u32,
) -> Result<RunSummary, RunError> {
    let mut battles = 0;
    let mut decisions = 0;
    loop {
        if run.at_room_boundary() && run.room() >= max_rooms {
            break;
        }
        match run.advance(sink)? {
            Progress::Awaiting(decision) => {
                decisions += 1;
                let frame = run.frame();
                sink.render(&frame);
                let index = chooser.choose(&decision, &frame);
                match run.choose(index) {
                    Ok(()) => {}
                    Err(err) if err.severity().is_recoverable() => {
                        tracing::warn!(%err, "choice rejected, taking the last option");
                        run.choose(decision.options.len().saturating_sub(1))?;
                    }
                    Err(err) => return Err(err),
                }
            }
            Progress::BattleFinished(_) => battles += 1,
            Progress::GameOver | Progress::Victory => break,
        }
    }

    let summary = RunSummary {
        outcome: run.outcome(),
        rooms: run.room(),
        level: run.player().level,
        gold: run.player().gold,
        battles,
        decisions,
    };
    tracing::info!(?summary, "run stopped");
    Ok(summary)
}
