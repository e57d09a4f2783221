//! Per-test status and the run report

use crate::capture::CaptureRecord;
use crate::error::StepError;
use crate::registry::TestId;
use std::fmt;

/// How a completed test ended
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TestOutcome {
    Success,
    Failure,
}

/// Lifecycle of one registered test
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TestStatus {
    Registered,
    Queued,
    Running,
    Completed(TestOutcome),
    /// The runner exited while the test was queued or running
    Abandoned,
}

impl TestStatus {
    pub fn is_finished(self) -> bool {
        matches!(self, TestStatus::Completed(_) | TestStatus::Abandoned)
    }
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TestStatus::Registered => "registered",
            TestStatus::Queued => "queued",
            TestStatus::Running => "running",
            TestStatus::Completed(TestOutcome::Success) => "success",
            TestStatus::Completed(TestOutcome::Failure) => "failure",
            TestStatus::Abandoned => "abandoned",
        };
        f.write_str(label)
    }
}

/// The step that ended a failed test
#[derive(Clone, Debug, PartialEq)]
pub struct StepFailure {
    pub index: usize,
    /// The step as written, e.g. `ItemClick(**/Exit)`
    pub step: String,
    pub error: StepError,
}

/// Result of one test
#[derive(Clone, Debug, PartialEq)]
pub struct TestResult {
    pub id: TestId,
    /// `Completed(..)` or `Abandoned`
    pub status: TestStatus,
    /// Frame the test started on; `None` when it never started
    pub started_frame: Option<u64>,
    pub finished_frame: u64,
    pub steps_completed: usize,
    pub failure: Option<StepFailure>,
    pub captures: Vec<CaptureRecord>,
}

impl TestResult {
    pub fn passed(&self) -> bool {
        self.status == TestStatus::Completed(TestOutcome::Success)
    }

    /// Frames spent running, counting the first and the last
    pub fn frames(&self) -> u64 {
        self.started_frame
            .map(|start| self.finished_frame.saturating_sub(start) + 1)
            .unwrap_or(0)
    }
}

/// Results in completion order
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TestReport {
    results: Vec<TestResult>,
}

impl TestReport {
    pub(crate) fn push(&mut self, result: TestResult) {
        self.results.push(result);
    }

    pub fn results(&self) -> &[TestResult] {
        &self.results
    }

    pub fn get(&self, id: &TestId) -> Option<&TestResult> {
        self.results.iter().rev().find(|result| &result.id == id)
    }

    pub fn passed(&self) -> usize {
        self.count(|status| status == TestStatus::Completed(TestOutcome::Success))
    }

    pub fn failed(&self) -> usize {
        self.count(|status| status == TestStatus::Completed(TestOutcome::Failure))
    }

    pub fn abandoned(&self) -> usize {
        self.count(|status| status == TestStatus::Abandoned)
    }

    /// At least one result and every result a success
    pub fn all_passed(&self) -> bool {
        !self.results.is_empty() && self.results.iter().all(TestResult::passed)
    }

    fn count(&self, pred: impl Fn(TestStatus) -> bool) -> usize {
        self.results.iter().filter(|r| pred(r.status)).count()
    }
}

impl fmt::Display for TestReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} passed, {} failed, {} abandoned",
            self.passed(),
            self.failed(),
            self.abandoned()
        )?;
        for result in &self.results {
            write!(f, "  {:<40} {}", result.id.to_string(), result.status)?;
            if let Some(failure) = &result.failure {
                write!(f, " (step {} {}: {})", failure.index, failure.step, failure.error)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(name: &str, status: TestStatus) -> TestResult {
        TestResult {
            id: TestId::new("demo", name),
            status,
            started_frame: Some(3),
            finished_frame: 5,
            steps_completed: 1,
            failure: None,
            captures: Vec::new(),
        }
    }

    #[test]
    fn test_counts_and_summary() {
        let mut report = TestReport::default();
        assert!(!report.all_passed());
        report.push(result("a", TestStatus::Completed(TestOutcome::Success)));
        report.push(result("b", TestStatus::Abandoned));
        assert_eq!(report.passed(), 1);
        assert_eq!(report.abandoned(), 1);
        assert!(!report.all_passed());
        assert_eq!(report.results()[0].frames(), 3);

        let summary = report.to_string();
        assert!(summary.starts_with("1 passed, 0 failed, 1 abandoned"));
        assert!(summary.contains("demo/b"));
    }
}
