//! The two calls a presenter answers: render a frame, pick an option.

use crate::run::Decision;

use super::frame::Frame;

/// Consumes frames for display. The core ignores what happens to them.
pub trait FrameSink {
    fn render(&mut self, frame: &Frame);
}

/// Picks an option index for a pending decision.
///
/// Different implementations can handle:
/// - Player input
/// - Scripted answers for tests and replays
/// - Automatic policies for headless runs
pub trait Chooser {
    fn choose(&mut self, decision: &Decision, frame: &Frame) -> usize;
}

impl<T: FrameSink + ?Sized> FrameSink for &mut T {
    fn render(&mut self, frame: &Frame) {
        (**self).render(frame);
    }
}

impl<T: Chooser + ?Sized> Chooser for &mut T {
    fn choose(&mut self, decision: &Decision, frame: &Frame) -> usize {
        (**self).choose(decision, frame)
    }
}

/// Discards every frame.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl FrameSink for NullSink {
    fn render(&mut self, _frame: &Frame) {}
}

/// Keeps every frame, for tests that inspect what was drawn.
#[derive(Clone, Debug, Default)]
pub struct RecordingSink {
    pub frames: Vec<Frame>,
}

impl FrameSink for RecordingSink {
    fn render(&mut self, frame: &Frame) {
        self.frames.push(frame.clone());
    }
}

/// Answers decisions from a fixed list, then falls back to option 0.
#[derive(Clone, Debug, Default)]
pub struct ScriptedChooser {
    answers: Vec<usize>,
    cursor: usize,
}

impl ScriptedChooser {
    pub fn new(answers: impl Into<Vec<usize>>) -> Self {
        Self {
            answers: answers.into(),
            cursor: 0,
        }
    }

    /// Always picks the first option.
    pub fn first() -> Self {
        Self::default()
    }
}

impl Chooser for ScriptedChooser {
    fn choose(&mut self, decision: &Decision, _frame: &Frame) -> usize {
        let answer = self.answers.get(self.cursor).copied().unwrap_or(0);
        self.cursor += 1;
        answer.min(decision.options.len().saturating_sub(1))
    }
}
