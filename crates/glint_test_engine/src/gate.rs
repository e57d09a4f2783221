//! Frame counter and the one-shot stabilization gate

use serde::{Deserialize, Serialize};

/// How rendered frames are numbered when compared against the threshold
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameIndexing {
    /// The first rendered frame is frame 0
    ZeroBased,
    /// The first rendered frame is frame 1
    #[default]
    OneBased,
}

/// Number of frames rendered while the engine is active; never reset
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameCounter {
    rendered: u64,
}

impl FrameCounter {
    /// Count one rendered frame and return the new total
    pub fn increment(&mut self) -> u64 {
        self.rendered += 1;
        self.rendered
    }

    pub fn rendered(&self) -> u64 {
        self.rendered
    }

    /// Index of the latest rendered frame under `indexing`
    pub fn index(&self, indexing: FrameIndexing) -> u64 {
        match indexing {
            FrameIndexing::OneBased => self.rendered,
            FrameIndexing::ZeroBased => self.rendered.saturating_sub(1),
        }
    }
}

/// Fires exactly once, on the frame whose index equals the threshold
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameGate {
    threshold: u64,
    fired: bool,
}

impl FrameGate {
    pub fn new(threshold: u64) -> Self {
        Self {
            threshold,
            fired: false,
        }
    }

    pub fn threshold(&self) -> u64 {
        self.threshold
    }

    pub fn has_fired(&self) -> bool {
        self.fired
    }

    /// True only for the first call with `frame == threshold`
    pub fn check(&mut self, frame: u64) -> bool {
        if self.fired || frame != self.threshold {
            return false;
        }
        self.fired = true;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_is_edge_triggered_once() {
        let mut gate = FrameGate::new(3);
        let fired: Vec<u64> = (0..10).filter(|&frame| gate.check(frame)).collect();
        assert_eq!(fired, vec![3]);
        assert!(!gate.check(3));
        assert!(gate.has_fired());
    }

    #[test]
    fn test_gate_skips_frames_past_threshold() {
        let mut gate = FrameGate::new(3);
        assert!(!gate.check(4));
        assert!(!gate.has_fired());
    }

    #[test]
    fn test_counter_indexing() {
        let mut counter = FrameCounter::default();
        assert_eq!(counter.increment(), 1);
        assert_eq!(counter.index(FrameIndexing::OneBased), 1);
        assert_eq!(counter.index(FrameIndexing::ZeroBased), 0);
        counter.increment();
        assert_eq!(counter.rendered(), 2);
    }
}
