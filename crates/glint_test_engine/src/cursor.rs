//! Resumable step cursor
//!
//! A running test never blocks. Each frame the engine resumes the cursor,
//! polls the current step once, and either moves on or suspends until the
//! next rendered frame.

use crate::item::ItemId;
use rustc_hash::FxHashSet;

/// Where the current step is in its lifecycle
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CursorState {
    #[default]
    NotStarted,
    /// Yielded to the render loop; resumes on the next frame
    AwaitingNextFrame,
    Done,
}

/// Position inside a scripted test plus per-step scratch state
#[derive(Debug, Default)]
pub struct StepCursor {
    index: usize,
    state: CursorState,
    frames_waited: u32,
    delay_frames: u32,
    /// Progress inside a multi-frame step (menu depth, capture wait, ...)
    pub(crate) phase: usize,
    /// Item the step acted on and is waiting to observe
    pub(crate) target: Option<ItemId>,
    /// Items already sent an action by this step
    pub(crate) requested: FxHashSet<ItemId>,
}

impl StepCursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of the current step
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn state(&self) -> CursorState {
        self.state
    }

    /// Frames the current step has spent suspended
    pub fn frames_waited(&self) -> u32 {
        self.frames_waited
    }

    /// Called once per frame before polling the current step
    pub(crate) fn resume(&mut self) {
        if self.state == CursorState::AwaitingNextFrame {
            self.frames_waited += 1;
        }
    }

    pub(crate) fn suspend(&mut self) {
        self.state = CursorState::AwaitingNextFrame;
    }

    pub(crate) fn complete(&mut self) {
        self.state = CursorState::Done;
    }

    /// Move to the next step, optionally idling `delay_frames` first
    pub(crate) fn advance(&mut self, delay_frames: u32) {
        self.index += 1;
        self.state = CursorState::NotStarted;
        self.frames_waited = 0;
        self.delay_frames = delay_frames;
        self.phase = 0;
        self.target = None;
        self.requested.clear();
    }

    /// Consume one idle frame, if any are pending
    pub(crate) fn take_delay_frame(&mut self) -> bool {
        if self.delay_frames == 0 {
            return false;
        }
        self.delay_frames -= 1;
        true
    }
}
