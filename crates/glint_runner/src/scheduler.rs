//! Host scheduler driven by hand
//!
//! Stands in for a browser's `requestAnimationFrame` queue in tests and
//! headless tools: registering a step does nothing until the owner calls
//! [`ManualScheduler::fire`].

use glint_platform::{Cadence, ControlFlow, FrameStep, HostScheduler, Result};
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Default)]
struct State {
    step: Option<FrameStep>,
    cadence: Option<Cadence>,
    invocations: u64,
    generation: u64,
}

/// Scheduler whose invocations are triggered explicitly; clones share the
/// registration
#[derive(Clone, Default)]
pub struct ManualScheduler {
    state: Rc<RefCell<State>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Invoke the registered step once; `None` if nothing is registered
    ///
    /// A step returning [`ControlFlow::Exit`] is dropped, as is one that was
    /// cancelled or replaced while it ran.
    pub fn fire(&self) -> Option<ControlFlow> {
        let (mut step, generation) = {
            let mut state = self.state.borrow_mut();
            let step = state.step.take()?;
            state.invocations += 1;
            (step, state.generation)
        };

        let flow = step();

        let mut state = self.state.borrow_mut();
        if flow == ControlFlow::Continue && state.generation == generation {
            state.step = Some(step);
        } else if state.generation == generation {
            state.cadence = None;
        }
        Some(flow)
    }

    /// Fire until the step unregisters itself or `limit` invocations ran;
    /// returns how many ran
    pub fn fire_until_cancelled(&self, limit: u64) -> u64 {
        let mut fired = 0;
        while fired < limit {
            match self.fire() {
                Some(_) => fired += 1,
                None => break,
            }
        }
        fired
    }

    /// Cadence of the current registration
    pub fn cadence(&self) -> Option<Cadence> {
        self.state.borrow().cadence
    }

    /// Total invocations across all registrations
    pub fn invocations(&self) -> u64 {
        self.state.borrow().invocations
    }
}

impl HostScheduler for ManualScheduler {
    fn register_repeating_callback(&mut self, cadence: Cadence, step: FrameStep) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.generation += 1;
        state.step = Some(step);
        state.cadence = Some(cadence);
        Ok(())
    }

    fn cancel_repeating_callback(&mut self) {
        let mut state = self.state.borrow_mut();
        state.generation += 1;
        state.step = None;
        state.cadence = None;
    }

    fn is_registered(&self) -> bool {
        let state = self.state.borrow();
        state.step.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_nothing_registered() {
        let scheduler = ManualScheduler::new();
        assert_eq!(scheduler.fire(), None);
        assert_eq!(scheduler.invocations(), 0);
    }

    #[test]
    fn test_step_runs_until_exit() {
        let mut scheduler = ManualScheduler::new();
        let count = Rc::new(Cell::new(0));
        let seen = Rc::clone(&count);
        scheduler
            .register_repeating_callback(
                Cadence::HostDefault,
                Box::new(move || {
                    seen.set(seen.get() + 1);
                    if seen.get() == 4 {
                        ControlFlow::Exit
                    } else {
                        ControlFlow::Continue
                    }
                }),
            )
            .unwrap();
        assert!(scheduler.is_registered());

        assert_eq!(scheduler.fire_until_cancelled(100), 4);
        assert_eq!(count.get(), 4);
        assert!(!scheduler.is_registered());
        assert_eq!(scheduler.cadence(), None);
    }

    #[test]
    fn test_cancel_from_a_clone() {
        let mut scheduler = ManualScheduler::new();
        let mut handle = scheduler.clone();
        scheduler
            .register_repeating_callback(Cadence::PerSecond(30), Box::new(|| ControlFlow::Continue))
            .unwrap();
        assert_eq!(handle.cadence(), Some(Cadence::PerSecond(30)));
        assert_eq!(scheduler.fire(), Some(ControlFlow::Continue));

        handle.cancel_repeating_callback();
        assert_eq!(scheduler.fire(), None);
        assert_eq!(scheduler.invocations(), 1);
    }
}
