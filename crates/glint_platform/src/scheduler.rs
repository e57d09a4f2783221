//! Host schedulers for asynchronous backends
//!
//! A browser cannot be blocked on a native loop, so asynchronous backends
//! hand their per-frame step to the host instead. The step returns
//! [`ControlFlow::Exit`] to ask the scheduler to drop the registration.

use crate::error::Result;
use crate::event::ControlFlow;

/// Per-frame unit of work handed to a host scheduler
pub type FrameStep = Box<dyn FnMut() -> ControlFlow>;

/// How often the host should invoke a registered step
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Cadence {
    /// Let the host decide (`requestAnimationFrame` in browsers)
    #[default]
    HostDefault,
    /// A fixed number of invocations per second
    PerSecond(u32),
}

impl Cadence {
    /// 0 means "host decides"
    pub fn from_fps(fps: u32) -> Self {
        if fps == 0 {
            Cadence::HostDefault
        } else {
            Cadence::PerSecond(fps)
        }
    }

    /// Delay between invocations for fixed cadences, in milliseconds
    pub fn interval_ms(self) -> Option<u32> {
        match self {
            Cadence::HostDefault => None,
            Cadence::PerSecond(fps) => Some((1000 / fps.max(1)).max(1)),
        }
    }
}

/// A host-owned scheduler that repeatedly invokes one registered step
pub trait HostScheduler {
    /// Register `step`, replacing any previous registration. Returns
    /// immediately; the host owns every later invocation.
    fn register_repeating_callback(&mut self, cadence: Cadence, step: FrameStep) -> Result<()>;

    /// Drop the current registration, if any
    fn cancel_repeating_callback(&mut self);

    /// Whether a step is registered and will be invoked again
    fn is_registered(&self) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cadence_from_fps() {
        assert_eq!(Cadence::from_fps(0), Cadence::HostDefault);
        assert_eq!(Cadence::from_fps(30), Cadence::PerSecond(30));
        assert_eq!(Cadence::PerSecond(60).interval_ms(), Some(16));
        assert_eq!(Cadence::PerSecond(5000).interval_ms(), Some(1));
        assert_eq!(Cadence::HostDefault.interval_ms(), None);
    }
}
