//! Runner lifecycle state

use crate::error::{Result, RunnerError};

/// Runner lifecycle, ordered; it only ever moves forward
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RunnerState {
    #[default]
    Uninitialized,
    SettingUp,
    Running,
    ExitRequested,
    TornDown,
}

impl RunnerState {
    /// Move to `next`
    ///
    /// Moving to the current state is a no-op. Going backwards fails with
    /// [`RunnerError::StateRegression`]; reaching `TornDown` from anything
    /// but `Running` or `ExitRequested` fails with
    /// [`RunnerError::InvalidTransition`]. The state is untouched on error.
    pub fn transition(&mut self, next: RunnerState) -> Result<()> {
        let from = *self;
        if next == from {
            return Ok(());
        }
        if next < from {
            tracing::warn!("Rejected runner state regression {:?} -> {:?}", from, next);
            return Err(RunnerError::StateRegression { from, to: next });
        }
        let allowed = match next {
            RunnerState::TornDown => {
                matches!(from, RunnerState::Running | RunnerState::ExitRequested)
            }
            RunnerState::ExitRequested => from == RunnerState::Running,
            _ => true,
        };
        if !allowed {
            tracing::warn!("Rejected runner state transition {:?} -> {:?}", from, next);
            return Err(RunnerError::InvalidTransition { from, to: next });
        }
        tracing::debug!("Runner state {:?} -> {:?}", from, next);
        *self = next;
        Ok(())
    }

    pub fn is_running(self) -> bool {
        self == RunnerState::Running
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_path() {
        let mut state = RunnerState::default();
        for next in [
            RunnerState::SettingUp,
            RunnerState::Running,
            RunnerState::ExitRequested,
            RunnerState::TornDown,
        ] {
            state.transition(next).unwrap();
            assert_eq!(state, next);
        }
    }

    #[test]
    fn test_regression_is_rejected_and_state_kept() {
        let mut state = RunnerState::Running;
        let err = state.transition(RunnerState::SettingUp).unwrap_err();
        assert!(matches!(
            err,
            RunnerError::StateRegression {
                from: RunnerState::Running,
                to: RunnerState::SettingUp
            }
        ));
        assert_eq!(state, RunnerState::Running);
    }

    #[test]
    fn test_teardown_requires_running() {
        let mut state = RunnerState::SettingUp;
        assert!(matches!(
            state.transition(RunnerState::TornDown),
            Err(RunnerError::InvalidTransition { .. })
        ));
        assert_eq!(state, RunnerState::SettingUp);

        let mut running = RunnerState::Running;
        running.transition(RunnerState::TornDown).unwrap();
        assert!(running.transition(RunnerState::TornDown).is_ok());
    }
}
