//! End-to-end CI automation: the demo app driven by its own scripted tests

use anyhow::{Context, Result};
use glint_app::demo::{ci_automation_config, DEMO_WINDOW};
use glint_app::{AbstractRunner, AppRunner, HeadlessBackend, RunnerSettings, RunnerState};
use glint_runner::ManualScheduler;
use glint_test_engine::{RunSpeed, TestId, TestReport};
use std::path::Path;

fn settings(speed: RunSpeed, capture_dir: Option<&Path>) -> RunnerSettings {
    let mut settings = RunnerSettings::default();
    settings.test_engine.enabled = true;
    settings.test_engine.threshold = 3;
    settings.test_engine.run_speed = speed;
    settings.test_engine.capture_dir = capture_dir.map(Path::to_path_buf);
    settings
}

fn demo_test(name: &str) -> TestId {
    TestId::new("demo_tests", name)
}

fn assert_all_passed(report: &TestReport) {
    for result in report.results() {
        assert!(
            result.passed(),
            "{} did not pass: {:?} {:?}",
            result.id,
            result.status,
            result.failure
        );
    }
    assert_eq!(report.results().len(), 3);
    assert!(report.all_passed());
}

#[test]
fn ci_automation_blocking_fast() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let config = ci_automation_config(&settings(RunSpeed::Fast, Some(dir.path())));
    let backend = HeadlessBackend::new(1280, 720);
    let probe = backend.probe();
    let mut runner = AppRunner::new(config, Box::new(backend));
    assert!(!runner.is_async());

    runner.run()?;
    assert_eq!(runner.state(), RunnerState::TornDown);
    assert!(probe.destroyed());

    let report = runner.test_report().context("engine was enabled")?;
    assert_all_passed(&report);

    // FIFO in registration order, nothing before the threshold frame
    let order: Vec<&TestId> = report.results().iter().map(|r| &r.id).collect();
    assert_eq!(
        order,
        [&demo_test("open_metrics"), &demo_test("capture_screenshot"), &demo_test("exit")]
    );
    let first = report.get(&demo_test("open_metrics")).context("open_metrics ran")?;
    assert_eq!(first.started_frame, Some(3));
    for pair in report.results().windows(2) {
        assert!(pair[1].started_frame > Some(pair[0].finished_frame));
    }

    // the exit test ends the run on the frame it completes
    let exit = report.get(&demo_test("exit")).context("exit ran")?;
    assert_eq!(exit.finished_frame, runner.frame_index());
    assert_eq!(probe.presented(), runner.frame_index());

    let capture = report
        .get(&demo_test("capture_screenshot"))
        .and_then(|r| r.captures.first())
        .context("one capture")?;
    assert_eq!(capture.window, DEMO_WINDOW);
    let path = capture.path.as_ref().context("capture written to disk")?;
    assert!(path.starts_with(dir.path()));
    let bytes = std::fs::read(path)?;
    assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    Ok(())
}

#[test]
fn ci_automation_async_host() -> Result<()> {
    let config = ci_automation_config(&settings(RunSpeed::Fast, None));
    let scheduler = ManualScheduler::new();
    let backend = HeadlessBackend::new(1280, 720).with_scheduler(scheduler.clone());
    let mut runner = AppRunner::new(config, Box::new(backend));
    assert!(runner.is_async());

    runner.run()?;
    assert_eq!(runner.state(), RunnerState::Running);
    assert_eq!(runner.frame_index(), 0);

    let fired = scheduler.fire_until_cancelled(1_000);
    assert_eq!(fired, runner.frame_index());
    assert_eq!(runner.state(), RunnerState::TornDown);

    let report = runner.test_report().context("engine was enabled")?;
    assert_all_passed(&report);
    Ok(())
}

#[test]
fn ci_automation_normal_speed_takes_longer() -> Result<()> {
    let mut frames = Vec::new();
    for speed in [RunSpeed::Fast, RunSpeed::Normal] {
        let config = ci_automation_config(&settings(speed, None));
        let mut runner = AppRunner::new(config, Box::new(HeadlessBackend::new(1280, 720)));
        runner.run()?;
        let report = runner.test_report().context("engine was enabled")?;
        assert_all_passed(&report);
        frames.push(runner.frame_index());
    }
    assert!(frames[1] > frames[0], "normal {} vs fast {}", frames[1], frames[0]);
    Ok(())
}
