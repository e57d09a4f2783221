//! Browser frame scheduling
//!
//! The registered step lives in a closure that re-arms itself after every
//! invocation, so the browser keeps the loop alive after `run` has returned.
//! The closure holds an `Rc` to its own slot; the cycle is broken when the
//! step returns [`ControlFlow::Exit`] or on cancel.

use glint_platform::{Cadence, ControlFlow, FrameStep, HostScheduler, PlatformError, Result};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Pending {
    AnimationFrame(i32),
    Timeout(i32),
}

#[derive(Default)]
struct Slot {
    closure: RefCell<Option<Closure<dyn FnMut()>>>,
    pending: Cell<Option<Pending>>,
    cadence: Cell<Cadence>,
}

impl Slot {
    fn release(&self) {
        self.pending.set(None);
        // Dropping from inside the running closure is deferred by wasm-bindgen
        // until the call returns.
        drop(self.closure.borrow_mut().take());
    }
}

/// `requestAnimationFrame` for [`Cadence::HostDefault`], `setTimeout` for
/// fixed cadences
#[derive(Default)]
pub struct BrowserScheduler {
    slot: Rc<Slot>,
}

impl BrowserScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cadence(&self) -> Cadence {
        self.slot.cadence.get()
    }
}

fn arm(slot: &Slot) -> Result<()> {
    let window = web_sys::window()
        .ok_or_else(|| PlatformError::Scheduler("no global window".to_string()))?;
    let closure = slot.closure.borrow();
    let Some(closure) = closure.as_ref() else {
        return Ok(());
    };
    let callback: &js_sys::Function = closure.as_ref().unchecked_ref();
    let pending = match slot.cadence.get().interval_ms() {
        None => window
            .request_animation_frame(callback)
            .map(Pending::AnimationFrame),
        Some(ms) => window
            .set_timeout_with_callback_and_timeout_and_arguments_0(callback, ms as i32)
            .map(Pending::Timeout),
    }
    .map_err(|e| PlatformError::Scheduler(format!("{:?}", e)))?;
    slot.pending.set(Some(pending));
    Ok(())
}

fn disarm(pending: Pending) {
    let Some(window) = web_sys::window() else {
        return;
    };
    match pending {
        Pending::AnimationFrame(id) => {
            if let Err(e) = window.cancel_animation_frame(id) {
                tracing::warn!("cancelAnimationFrame failed: {:?}", e);
            }
        }
        Pending::Timeout(id) => window.clear_timeout_with_handle(id),
    }
}

impl HostScheduler for BrowserScheduler {
    fn register_repeating_callback(&mut self, cadence: Cadence, mut step: FrameStep) -> Result<()> {
        self.cancel_repeating_callback();
        self.slot.cadence.set(cadence);

        let slot = Rc::clone(&self.slot);
        let closure = Closure::<dyn FnMut()>::new(move || {
            slot.pending.set(None);
            if step().is_exit() {
                tracing::debug!("Frame step finished; releasing browser callback");
                slot.release();
                return;
            }
            if let Err(e) = arm(&slot) {
                tracing::error!("Failed to schedule next frame: {}", e);
                slot.release();
            }
        });
        *self.slot.closure.borrow_mut() = Some(closure);

        if let Err(e) = arm(&self.slot) {
            self.slot.release();
            return Err(e);
        }
        tracing::debug!("Registered browser frame callback ({:?})", cadence);
        Ok(())
    }

    fn cancel_repeating_callback(&mut self) {
        if let Some(pending) = self.slot.pending.take() {
            disarm(pending);
        }
        self.slot.release();
    }

    fn is_registered(&self) -> bool {
        self.slot.closure.borrow().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_scheduler_is_idle() {
        let mut scheduler = BrowserScheduler::new();
        assert!(!scheduler.is_registered());
        assert_eq!(scheduler.cadence(), Cadence::HostDefault);
        scheduler.cancel_repeating_callback();
        assert!(!scheduler.is_registered());
    }
}
