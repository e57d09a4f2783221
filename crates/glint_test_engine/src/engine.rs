//! The test engine
//!
//! Owns the registry, the FIFO queue, the frame counter and the one-shot
//! gate. The runner calls [`TestEngine::on_frame_rendered`] once per frame
//! after the frame callback; everything else happens inside that call.

use crate::capture::{
    CaptureFlags, CaptureRecord, CaptureSink, MemoryCaptureSink, PngCaptureSink,
};
use crate::config::{RunSpeed, TestEngineConfig};
use crate::cursor::StepCursor;
use crate::driver::{EngineUi, UiDriver};
use crate::error::{Result, StepError, TestEngineError};
use crate::gate::{FrameCounter, FrameGate};
use crate::item::{ItemAction, ItemInfo, ItemKind};
use crate::path::{join_segments, split_segments, ItemPath};
use crate::queue::TestQueue;
use crate::registry::{TestId, TestRegistry};
use crate::report::{StepFailure, TestOutcome, TestReport, TestResult, TestStatus};
use crate::step::Step;
use glint_platform::{RasterOptions, Rect};
use rustc_hash::FxHashMap;
use tracing::{debug, info, warn};

/// Title of the window drawn by [`TestEngine::show_windows`]
pub const ENGINE_WINDOW_TITLE: &str = "Glint Test Engine";

/// Result of polling a step once
enum StepPoll {
    Done,
    Pending(Wait),
    Failed(StepError),
}

/// What a pending step is waiting for
enum Wait {
    Item(String),
    Condition(String),
}

impl Wait {
    fn into_error(self, frames: u32) -> StepError {
        match self {
            Wait::Item(pattern) => StepError::ItemNotFound { pattern },
            Wait::Condition(reason) => StepError::Timeout { frames, reason },
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum MenuGoal {
    Check,
    Uncheck,
    Toggle,
}

/// The test currently executing
struct ActiveTest {
    id: TestId,
    steps: Vec<Step>,
    cursor: StepCursor,
    /// Path that relative patterns resolve against; reset per test
    reference: Vec<String>,
    started_frame: u64,
    captures: Vec<CaptureRecord>,
}

/// Scripted UI test orchestrator
pub struct TestEngine {
    config: TestEngineConfig,
    registry: TestRegistry,
    queue: TestQueue,
    statuses: FxHashMap<TestId, TestStatus>,
    counter: FrameCounter,
    gate: FrameGate,
    batch_speed: RunSpeed,
    active: Option<ActiveTest>,
    report: TestReport,
    sink: Box<dyn CaptureSink>,
    capture_count: u32,
    registration_open: bool,
}

impl TestEngine {
    /// Create an engine; screenshots go to `config.capture_dir` when set,
    /// otherwise they are kept in memory
    pub fn new(config: TestEngineConfig) -> Result<Self> {
        config.validate()?;
        let sink: Box<dyn CaptureSink> = match &config.capture_dir {
            Some(dir) => Box::new(PngCaptureSink::new(dir.clone())),
            None => Box::new(MemoryCaptureSink::new()),
        };
        Ok(Self {
            gate: FrameGate::new(config.stabilization_threshold),
            batch_speed: config.run_speed,
            config,
            registry: TestRegistry::new(),
            queue: TestQueue::new(),
            statuses: FxHashMap::default(),
            counter: FrameCounter::default(),
            active: None,
            report: TestReport::default(),
            sink,
            capture_count: 0,
            registration_open: true,
        })
    }

    /// Replace the capture sink
    pub fn with_capture_sink(mut self, sink: impl CaptureSink + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    pub fn config(&self) -> &TestEngineConfig {
        &self.config
    }

    // =========================================================================
    // Registration and queueing
    // =========================================================================

    /// Register a scripted test under a unique `(category, name)`
    ///
    /// Fails with [`TestEngineError::RegistrationClosed`] once
    /// [`TestEngine::seal_registration`] has been called.
    pub fn register_test(
        &mut self,
        category: impl Into<String>,
        name: impl Into<String>,
        steps: Vec<Step>,
    ) -> Result<TestId> {
        let id = TestId::new(category, name);
        if !self.registration_open {
            warn!("Rejected registration of {} after setup", id);
            return Err(TestEngineError::RegistrationClosed(id));
        }
        let test = self.registry.register(id.clone(), steps)?;
        debug!("Registered test {} ({} steps)", id, test.steps().len());
        self.statuses.insert(id.clone(), TestStatus::Registered);
        Ok(id)
    }

    /// Close the registry; the runner calls this when setup ends
    pub fn seal_registration(&mut self) {
        self.registration_open = false;
    }

    pub fn is_registration_open(&self) -> bool {
        self.registration_open
    }

    /// Append a test to the queue
    ///
    /// Returns `Ok(false)` without changing anything when the test is already
    /// queued or running.
    pub fn enqueue(&mut self, id: &TestId) -> Result<bool> {
        if !self.registry.contains(id) {
            return Err(TestEngineError::UnknownTest(id.clone()));
        }
        if self.queue.is_empty() {
            self.batch_speed = self.config.run_speed;
        }
        if !self.queue.enqueue(id.clone()) {
            debug!("Test {} already queued", id);
            return Ok(false);
        }
        self.statuses.insert(id.clone(), TestStatus::Queued);
        Ok(true)
    }

    /// Queue every registered test in registration order; returns how many
    /// were added
    pub fn queue_all(&mut self) -> usize {
        self.batch_speed = self.config.run_speed;
        let ids: Vec<TestId> = self.registry.ids().cloned().collect();
        let mut added = 0;
        for id in ids {
            if self.queue.enqueue(id.clone()) {
                self.statuses.insert(id, TestStatus::Queued);
                added += 1;
            }
        }
        added
    }

    /// Speed used for the next batch
    pub fn set_run_speed(&mut self, speed: RunSpeed) {
        self.config.run_speed = speed;
    }

    pub fn run_speed(&self) -> RunSpeed {
        self.config.run_speed
    }

    /// Speed latched for the batch that is running
    pub fn batch_run_speed(&self) -> RunSpeed {
        self.batch_speed
    }

    // =========================================================================
    // Frame driving
    // =========================================================================

    /// Gate check for `frame`; queues every registered test the one time
    /// `frame` equals the threshold
    pub fn tick(&mut self, frame: u64) -> bool {
        if !self.gate.check(frame) {
            return false;
        }
        let added = self.queue_all();
        info!(
            "Frame {} reached the stabilization threshold, queued {} tests ({:?})",
            frame, added, self.batch_speed
        );
        true
    }

    /// Count a rendered frame, run the gate, then advance the running test
    pub fn on_frame_rendered(&mut self, driver: &mut dyn UiDriver) {
        self.counter.increment();
        self.tick(self.counter.index(self.config.indexing));
        self.advance(driver);
    }

    /// Advance the running test by one frame, starting the next queued test
    /// when none is running
    ///
    /// Nothing runs before the gate has fired. At most one test runs per
    /// frame; a test that finishes hands over on the next frame.
    pub fn advance(&mut self, driver: &mut dyn UiDriver) {
        if !self.gate.has_fired() {
            return;
        }

        let mut test = match self.active.take() {
            Some(test) => test,
            None => match self.start_next() {
                Some(test) => test,
                None => return,
            },
        };

        match self.run_steps(&mut test, driver) {
            None => self.active = Some(test),
            Some(result) => self.finish(test, result),
        }
    }

    fn start_next(&mut self) -> Option<ActiveTest> {
        let id = self.queue.start_next()?.clone();
        let steps = self
            .registry
            .get(&id)
            .map(|test| test.steps().to_vec())
            .unwrap_or_default();
        info!("Running test {}", id);
        self.statuses.insert(id.clone(), TestStatus::Running);
        Some(ActiveTest {
            id,
            steps,
            cursor: StepCursor::new(),
            reference: Vec::new(),
            started_frame: self.counter.rendered(),
            captures: Vec::new(),
        })
    }

    /// Poll steps until one suspends; `Some` once the test is over
    fn run_steps(
        &mut self,
        test: &mut ActiveTest,
        driver: &mut dyn UiDriver,
    ) -> Option<std::result::Result<(), StepFailure>> {
        loop {
            if test.cursor.take_delay_frame() {
                return None;
            }
            let index = test.cursor.index();
            let step = match test.steps.get(index) {
                Some(step) => step.clone(),
                None => return Some(Ok(())),
            };
            test.cursor.resume();

            let failure = |error| StepFailure {
                index,
                step: step.to_string(),
                error,
            };

            match self.poll_step(test, &step, driver) {
                StepPoll::Done => {
                    debug!("{}: step {} {} done", test.id, index, step);
                    test.cursor.complete();
                    // Idle only between steps; the last one finishes the test this frame
                    let delay = match self.batch_speed {
                        RunSpeed::Normal if index + 1 < test.steps.len() => {
                            self.config.normal_step_delay_frames
                        }
                        _ => 0,
                    };
                    test.cursor.advance(delay);
                }
                StepPoll::Pending(wait) => {
                    let waited = test.cursor.frames_waited();
                    if let Some(limit) = self.config.step_timeout_frames {
                        if step.is_conditional() && waited >= limit {
                            return Some(Err(failure(wait.into_error(waited))));
                        }
                    }
                    test.cursor.suspend();
                    return None;
                }
                StepPoll::Failed(error) => return Some(Err(failure(error))),
            }
        }
    }

    fn finish(&mut self, test: ActiveTest, result: std::result::Result<(), StepFailure>) {
        self.queue.finish_running();
        let frame = self.counter.rendered();
        let (outcome, failure) = match result {
            Ok(()) => {
                info!("Test {} passed", test.id);
                (TestOutcome::Success, None)
            }
            Err(failure) => {
                warn!(
                    "Test {} failed at step {} {}: {}",
                    test.id, failure.index, failure.step, failure.error
                );
                (TestOutcome::Failure, Some(failure))
            }
        };
        let status = TestStatus::Completed(outcome);
        self.statuses.insert(test.id.clone(), status);
        self.report.push(TestResult {
            id: test.id,
            status,
            started_frame: Some(test.started_frame),
            finished_frame: frame,
            steps_completed: test.cursor.index(),
            failure,
            captures: test.captures,
        });
    }

    /// Drop the running test and everything queued, recording them as
    /// abandoned
    pub fn abandon(&mut self) {
        let frame = self.counter.rendered();
        if let Some(test) = self.active.take() {
            self.queue.finish_running();
            warn!("Abandoning running test {}", test.id);
            self.statuses.insert(test.id.clone(), TestStatus::Abandoned);
            self.report.push(TestResult {
                id: test.id,
                status: TestStatus::Abandoned,
                started_frame: Some(test.started_frame),
                finished_frame: frame,
                steps_completed: test.cursor.index(),
                failure: None,
                captures: test.captures,
            });
        }
        for id in self.queue.drain() {
            warn!("Abandoning queued test {}", id);
            self.statuses.insert(id.clone(), TestStatus::Abandoned);
            self.report.push(TestResult {
                id,
                status: TestStatus::Abandoned,
                started_frame: None,
                finished_frame: frame,
                steps_completed: 0,
                failure: None,
                captures: Vec::new(),
            });
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn status(&self, id: &TestId) -> Option<TestStatus> {
        self.statuses.get(id).copied()
    }

    pub fn report(&self) -> &TestReport {
        &self.report
    }

    /// Frames rendered since the engine was created
    pub fn frame_count(&self) -> u64 {
        self.counter.rendered()
    }

    pub fn gate_fired(&self) -> bool {
        self.gate.has_fired()
    }

    pub fn running_test(&self) -> Option<&TestId> {
        self.active.as_ref().map(|test| &test.id)
    }

    /// Nothing running and nothing queued
    pub fn is_idle(&self) -> bool {
        self.active.is_none() && self.queue.is_empty()
    }

    pub fn registered_tests(&self) -> impl Iterator<Item = &TestId> {
        self.registry.ids()
    }

    /// Draw the engine's status window
    pub fn show_windows(&self, ui: &mut dyn EngineUi) {
        if !self.config.show_windows {
            return;
        }
        ui.begin_window(ENGINE_WINDOW_TITLE);
        ui.text(&format!(
            "Frame {}  speed {:?}",
            self.counter.rendered(),
            self.batch_speed
        ));
        for id in self.registry.ids() {
            let status = self.status(id).unwrap_or(TestStatus::Registered);
            ui.text(&format!("{}: {}", id, status));
        }
        ui.end_window();
    }

    // =========================================================================
    // Steps
    // =========================================================================

    fn poll_step(
        &mut self,
        test: &mut ActiveTest,
        step: &Step,
        driver: &mut dyn UiDriver,
    ) -> StepPoll {
        match step {
            Step::SetRef(name) => {
                let name = name.strip_prefix("//").unwrap_or(name);
                match split_segments(name) {
                    Ok(segments) => {
                        test.reference = segments;
                        StepPoll::Done
                    }
                    Err(e) => StepPoll::Failed(e),
                }
            }
            Step::ItemClick(pattern) => poll_click(test, pattern, driver),
            Step::ItemOpen(pattern) => poll_open(test, pattern, true, driver),
            Step::ItemClose(pattern) => poll_open(test, pattern, false, driver),
            Step::ItemOpenAll(pattern) => poll_open_all(test, pattern, driver),
            Step::MenuCheck(pattern) => poll_menu(test, pattern, MenuGoal::Check, driver),
            Step::MenuUncheck(pattern) => poll_menu(test, pattern, MenuGoal::Uncheck, driver),
            Step::MenuToggle(pattern) => poll_menu(test, pattern, MenuGoal::Toggle, driver),
            Step::CaptureScreenshotWindow { window, flags } => {
                self.poll_capture(test, window, *flags, driver)
            }
            Step::Yield(frames) => {
                if test.cursor.frames_waited() >= *frames {
                    StepPoll::Done
                } else {
                    StepPoll::Pending(Wait::Condition(format!("yielding {frames} frames")))
                }
            }
        }
    }

    fn poll_capture(
        &mut self,
        test: &mut ActiveTest,
        window: &str,
        flags: CaptureFlags,
        driver: &mut dyn UiDriver,
    ) -> StepPoll {
        if !flags.contains(CaptureFlags::INSTANT) && test.cursor.phase == 0 {
            test.cursor.phase = 1;
            return StepPoll::Pending(Wait::Condition("settling before capture".to_string()));
        }

        let name = window.strip_prefix("//").unwrap_or(window);
        let rect = match driver
            .items()
            .iter()
            .find(|item| item.kind == ItemKind::Window && item.label() == name)
        {
            Some(item) => item.rect,
            None => return StepPoll::Pending(Wait::Item(window.to_string())),
        };

        let region = if flags.contains(CaptureFlags::STITCH_ALL) {
            rect
        } else {
            let (width, height) = driver.surface_size();
            rect.intersect(&Rect::new(0.0, 0.0, width as f32, height as f32))
        };
        if region.is_empty() {
            return StepPoll::Failed(
                crate::error::CaptureError::EmptyRegion(window.to_string()).into(),
            );
        }

        let options = RasterOptions {
            draw_cursor: !flags.contains(CaptureFlags::HIDE_MOUSE_CURSOR),
            draw_background: !flags.contains(CaptureFlags::NO_BACKGROUND),
        };
        let image = driver.rasterize(region, options);

        self.capture_count += 1;
        let mut record = CaptureRecord {
            test: test.id.clone(),
            window: name.to_string(),
            index: self.capture_count,
            frame: self.counter.rendered(),
            width: image.width(),
            height: image.height(),
            path: None,
        };
        match self.sink.save(&record, &image) {
            Ok(path) => {
                record.path = path;
                debug!(
                    "{}: captured '{}' ({}x{})",
                    test.id, name, record.width, record.height
                );
                test.captures.push(record);
                StepPoll::Done
            }
            Err(e) => StepPoll::Failed(e.into()),
        }
    }
}

fn resolve(test: &ActiveTest, pattern: &str) -> std::result::Result<ItemPath, StepError> {
    Ok(ItemPath::parse(pattern)?.resolve(&test.reference))
}

/// First item, in submission order, matching `path`
fn find(driver: &dyn UiDriver, path: &ItemPath) -> Option<ItemInfo> {
    driver
        .items()
        .iter()
        .find(|item| path.matches(&item.path))
        .cloned()
}

fn find_exact(driver: &dyn UiDriver, path: &[String]) -> Option<ItemInfo> {
    driver.items().iter().find(|item| item.path == path).cloned()
}

fn poll_click(test: &mut ActiveTest, pattern: &str, driver: &mut dyn UiDriver) -> StepPoll {
    if let Some(target) = test.cursor.target {
        if driver.was_activated(target) {
            return StepPoll::Done;
        }
        return StepPoll::Pending(Wait::Condition(format!("'{pattern}' to be clicked")));
    }

    let path = match resolve(test, pattern) {
        Ok(path) => path,
        Err(e) => return StepPoll::Failed(e),
    };
    let Some(item) = find(driver, &path) else {
        return StepPoll::Pending(Wait::Item(pattern.to_string()));
    };
    driver.inject(item.id, ItemAction::Click);
    test.cursor.target = Some(item.id);
    StepPoll::Pending(Wait::Condition(format!("'{pattern}' to be clicked")))
}

fn poll_open(
    test: &mut ActiveTest,
    pattern: &str,
    open: bool,
    driver: &mut dyn UiDriver,
) -> StepPoll {
    let path = match resolve(test, pattern) {
        Ok(path) => path,
        Err(e) => return StepPoll::Failed(e),
    };
    let Some(item) = find(driver, &path) else {
        return StepPoll::Pending(Wait::Item(pattern.to_string()));
    };
    if !item.kind.is_openable() {
        return StepPoll::Failed(StepError::InvalidItem {
            path: item.display_path(),
            action: if open { "opened" } else { "closed" },
        });
    }
    if item.open == Some(open) {
        return StepPoll::Done;
    }
    if test.cursor.requested.insert(item.id) {
        let action = if open { ItemAction::Open } else { ItemAction::Close };
        driver.inject(item.id, action);
    }
    StepPoll::Pending(Wait::Condition(format!(
        "'{}' to {}",
        pattern,
        if open { "open" } else { "close" }
    )))
}

fn poll_open_all(test: &mut ActiveTest, pattern: &str, driver: &mut dyn UiDriver) -> StepPoll {
    let path = match resolve(test, pattern) {
        Ok(path) => path,
        Err(e) => return StepPoll::Failed(e),
    };
    let Some(root) = find(driver, &path) else {
        return StepPoll::Pending(Wait::Item(pattern.to_string()));
    };
    if !root.kind.is_openable() {
        return StepPoll::Failed(StepError::InvalidItem {
            path: root.display_path(),
            action: "opened",
        });
    }

    let closed: Vec<_> = std::iter::once(&root)
        .chain(
            driver
                .items()
                .iter()
                .filter(|item| item.is_descendant_of(&root.path)),
        )
        .filter(|item| item.kind.is_openable() && item.open == Some(false))
        .map(|item| item.id)
        .collect();
    if closed.is_empty() {
        return StepPoll::Done;
    }
    for id in closed {
        if test.cursor.requested.insert(id) {
            driver.inject(id, ItemAction::Open);
        }
    }
    StepPoll::Pending(Wait::Condition(format!("everything under '{pattern}' to open")))
}

fn poll_menu(
    test: &mut ActiveTest,
    pattern: &str,
    goal: MenuGoal,
    driver: &mut dyn UiDriver,
) -> StepPoll {
    let full = match resolve(test, pattern) {
        Ok(path) => match path.literal() {
            Some(full) if full.len() >= 2 => full,
            _ => return StepPoll::Failed(StepError::InvalidPath(pattern.to_string())),
        },
        Err(e) => return StepPoll::Failed(e),
    };

    // Open each menu on the way down, one level per frame
    for depth in 2..full.len() {
        let prefix = &full[..depth];
        let Some(menu) = find_exact(driver, prefix) else {
            return StepPoll::Pending(Wait::Item(join_segments(prefix)));
        };
        if menu.open != Some(true) {
            if menu.kind != ItemKind::Menu {
                return StepPoll::Failed(StepError::InvalidItem {
                    path: menu.display_path(),
                    action: "opened as a menu",
                });
            }
            if test.cursor.requested.insert(menu.id) {
                driver.inject(menu.id, ItemAction::Open);
            }
            return StepPoll::Pending(Wait::Condition(format!(
                "menu '{}' to open",
                menu.label()
            )));
        }
    }

    let Some(leaf) = find_exact(driver, &full) else {
        return StepPoll::Pending(Wait::Item(pattern.to_string()));
    };
    if leaf.kind != ItemKind::MenuItem
        || (goal != MenuGoal::Toggle && leaf.checked.is_none())
    {
        return StepPoll::Failed(StepError::InvalidItem {
            path: leaf.display_path(),
            action: "checked",
        });
    }

    let satisfied = match goal {
        MenuGoal::Check => leaf.checked == Some(true),
        MenuGoal::Uncheck => leaf.checked == Some(false),
        MenuGoal::Toggle => test.cursor.target.is_some() && driver.was_activated(leaf.id),
    };
    if satisfied {
        return StepPoll::Done;
    }
    if test.cursor.target.is_none() {
        driver.inject(leaf.id, ItemAction::Click);
        test.cursor.target = Some(leaf.id);
    }
    StepPoll::Pending(Wait::Condition(format!("'{pattern}' to change")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::MemoryCaptureSink;
    use crate::item::ItemId;
    use glint_platform::Framebuffer;
    use rustc_hash::FxHashSet;

    /// A tiny fake UI: a static item tree whose visibility follows the open
    /// state of its ancestors
    #[derive(Default)]
    struct FakeUi {
        all: Vec<ItemInfo>,
        visible: Vec<ItemInfo>,
        pending: Vec<(ItemId, ItemAction)>,
        activated: FxHashSet<ItemId>,
        clicks: Vec<ItemId>,
    }

    impl FakeUi {
        fn add(&mut self, path: &[&str], kind: ItemKind) -> ItemId {
            let path: Vec<String> = path.iter().map(|s| s.to_string()).collect();
            let id = ItemId::from_path(&path);
            let y = self.all.len() as f32 * 20.0;
            self.all.push(ItemInfo {
                id,
                path,
                kind,
                open: kind.is_openable().then_some(false),
                checked: (kind == ItemKind::MenuItem).then_some(false),
                rect: if kind == ItemKind::Window {
                    Rect::new(10.0, 10.0, 100.0, 60.0)
                } else {
                    Rect::new(10.0, y, 80.0, 18.0)
                },
            });
            self.refresh();
            id
        }

        fn demo() -> Self {
            let mut ui = FakeUi::default();
            ui.add(&["Demo"], ItemKind::Window);
            ui.add(&["Demo", "Tools"], ItemKind::Menu);
            ui.add(&["Demo", "Tools", "Metrics/Debugger"], ItemKind::MenuItem);
            ui.add(&["Demo", "Basic"], ItemKind::TreeNode);
            ui.add(&["Demo", "Basic", "Inner"], ItemKind::TreeNode);
            ui.add(&["Demo", "Basic", "Inner", "Leaf"], ItemKind::Text);
            ui.add(&["Main"], ItemKind::Window);
            ui.add(&["Main", "Exit"], ItemKind::Button);
            ui
        }

        /// One rendered frame: apply injected actions, recompute visibility
        fn frame(&mut self) {
            self.activated.clear();
            for (id, action) in std::mem::take(&mut self.pending) {
                let Some(item) = self.all.iter_mut().find(|item| item.id == id) else {
                    continue;
                };
                match action {
                    ItemAction::Open => item.open = Some(true),
                    ItemAction::Close => item.open = Some(false),
                    ItemAction::Click => {
                        self.activated.insert(id);
                        self.clicks.push(id);
                        if let Some(checked) = item.checked.as_mut() {
                            *checked = !*checked;
                        }
                    }
                }
            }
            self.refresh();
        }

        fn refresh(&mut self) {
            let all = self.all.clone();
            self.visible = all
                .iter()
                .filter(|item| {
                    all.iter().all(|other| {
                        !(item.is_descendant_of(&other.path)
                            && other.kind.is_openable()
                            && other.open != Some(true))
                    })
                })
                .cloned()
                .collect();
        }
    }

    impl UiDriver for FakeUi {
        fn items(&self) -> &[ItemInfo] {
            &self.visible
        }

        fn was_activated(&self, id: ItemId) -> bool {
            self.activated.contains(&id)
        }

        fn inject(&mut self, id: ItemId, action: ItemAction) {
            self.pending.push((id, action));
        }

        fn surface_size(&self) -> (u32, u32) {
            (64, 64)
        }

        fn rasterize(&self, region: Rect, _options: RasterOptions) -> Framebuffer {
            Framebuffer::new(region.width.ceil() as u32, region.height.ceil() as u32)
        }
    }

    fn engine(config: TestEngineConfig) -> TestEngine {
        TestEngine::new(config).unwrap()
    }

    /// Render `frames` frames
    fn run(engine: &mut TestEngine, ui: &mut FakeUi, frames: usize) {
        for _ in 0..frames {
            ui.frame();
            engine.on_frame_rendered(ui);
        }
    }

    fn status(engine: &TestEngine, name: &str) -> Option<TestStatus> {
        engine.status(&TestId::new("demo", name))
    }

    const SUCCESS: Option<TestStatus> = Some(TestStatus::Completed(TestOutcome::Success));
    const FAILURE: Option<TestStatus> = Some(TestStatus::Completed(TestOutcome::Failure));

    #[test]
    fn test_duplicate_and_unknown_ids() {
        let mut engine = engine(TestEngineConfig::default());
        engine.register_test("demo", "a", vec![]).unwrap();
        assert_eq!(
            engine.register_test("demo", "a", vec![]),
            Err(TestEngineError::DuplicateTest(TestId::new("demo", "a")))
        );
        assert_eq!(
            engine.enqueue(&TestId::new("demo", "missing")),
            Err(TestEngineError::UnknownTest(TestId::new("demo", "missing")))
        );
    }

    #[test]
    fn test_double_enqueue_is_absorbed() {
        let mut engine = engine(TestEngineConfig::default());
        let id = engine.register_test("demo", "a", vec![]).unwrap();
        assert_eq!(engine.enqueue(&id), Ok(true));
        assert_eq!(engine.enqueue(&id), Ok(false));
        assert_eq!(engine.queue.len(), 1);
    }

    #[test]
    fn test_tick_queues_once_at_threshold() {
        let mut engine = engine(TestEngineConfig::default());
        engine.register_test("demo", "a", vec![]).unwrap();
        engine.register_test("demo", "b", vec![]).unwrap();

        assert!(!engine.tick(1));
        assert!(!engine.tick(2));
        assert_eq!(status(&engine, "a"), Some(TestStatus::Registered));
        assert!(engine.tick(3));
        assert_eq!(status(&engine, "b"), Some(TestStatus::Queued));
        assert!(!engine.tick(3));
        assert!(!engine.tick(4));
        assert_eq!(engine.queue.len(), 2);
    }

    #[test]
    fn test_zero_based_indexing_fires_one_frame_later() {
        let config = TestEngineConfig::default()
            .indexing(crate::gate::FrameIndexing::ZeroBased)
            .threshold(3);
        let mut engine = engine(config);
        engine.register_test("demo", "a", vec![]).unwrap();
        let mut ui = FakeUi::demo();
        run(&mut engine, &mut ui, 3);
        assert!(!engine.gate_fired());
        run(&mut engine, &mut ui, 1);
        assert!(engine.gate_fired());
        assert_eq!(status(&engine, "a"), SUCCESS);
    }

    #[test]
    fn test_nothing_runs_before_threshold() {
        let mut engine = engine(TestEngineConfig::default());
        let id = engine
            .register_test("demo", "click", vec![Step::item_click("**/Exit")])
            .unwrap();
        engine.enqueue(&id).unwrap();

        let mut ui = FakeUi::demo();
        run(&mut engine, &mut ui, 2);
        assert_eq!(engine.status(&id), Some(TestStatus::Queued));
        assert!(ui.clicks.is_empty());

        run(&mut engine, &mut ui, 1);
        assert_eq!(engine.status(&id), Some(TestStatus::Running));
        run(&mut engine, &mut ui, 1);
        assert_eq!(engine.status(&id), SUCCESS);
        assert_eq!(ui.clicks.len(), 1);
    }

    #[test]
    fn test_fifo_one_test_per_frame() {
        let mut engine = engine(TestEngineConfig::default());
        for name in ["a", "b", "c"] {
            engine
                .register_test("demo", name, vec![Step::set_ref("Demo")])
                .unwrap();
        }
        let mut ui = FakeUi::demo();
        run(&mut engine, &mut ui, 6);

        let results = engine.report().results();
        let order: Vec<_> = results.iter().map(|r| r.id.name.as_str()).collect();
        assert_eq!(order, vec!["a", "b", "c"]);
        let frames: Vec<_> = results.iter().map(|r| r.finished_frame).collect();
        assert_eq!(frames, vec![3, 4, 5]);
        assert!(engine.is_idle());
    }

    #[test]
    fn test_failed_step_stops_test_and_next_runs() {
        let sink = MemoryCaptureSink::new();
        let mut engine = engine(TestEngineConfig::default()).with_capture_sink(sink.clone());
        engine
            .register_test(
                "demo",
                "broken",
                vec![
                    Step::item_open("//Main/Exit"),
                    Step::capture_window("Demo", CaptureFlags::INSTANT),
                ],
            )
            .unwrap();
        engine
            .register_test("demo", "after", vec![Step::item_click("**/Exit")])
            .unwrap();

        let mut ui = FakeUi::demo();
        run(&mut engine, &mut ui, 6);

        assert_eq!(status(&engine, "broken"), FAILURE);
        assert!(sink.is_empty());
        let failure = engine.report().results()[0].failure.clone().unwrap();
        assert_eq!(failure.index, 0);
        assert!(matches!(failure.error, StepError::InvalidItem { .. }));
        assert_eq!(status(&engine, "after"), SUCCESS);
    }

    #[test]
    fn test_registration_rejected_after_seal() {
        let mut engine = engine(TestEngineConfig::default());
        engine.register_test("demo", "early", vec![]).unwrap();
        assert!(engine.is_registration_open());
        engine.seal_registration();
        assert!(!engine.is_registration_open());

        assert_eq!(
            engine.register_test("demo", "late", vec![]),
            Err(TestEngineError::RegistrationClosed(TestId::new("demo", "late")))
        );
        assert_eq!(engine.registered_tests().count(), 1);
        assert_eq!(status(&engine, "late"), None);

        // sealed tests still run at the gate
        let mut ui = FakeUi::demo();
        run(&mut engine, &mut ui, 4);
        assert_eq!(status(&engine, "early"), SUCCESS);
    }

    #[test]
    fn test_missing_item_times_out() {
        let config = TestEngineConfig::default().step_timeout(Some(3));
        let mut engine = engine(config);
        engine
            .register_test("demo", "missing", vec![Step::item_click("**/Nope")])
            .unwrap();
        let mut ui = FakeUi::demo();
        run(&mut engine, &mut ui, 5);
        assert_eq!(status(&engine, "missing"), Some(TestStatus::Running));
        run(&mut engine, &mut ui, 1);
        assert_eq!(status(&engine, "missing"), FAILURE);
        let failure = engine.report().results()[0].failure.clone().unwrap();
        assert_eq!(
            failure.error,
            StepError::ItemNotFound {
                pattern: "**/Nope".to_string()
            }
        );
    }

    #[test]
    fn test_missing_first_item_fails_and_next_test_runs() {
        let config = TestEngineConfig::default().step_timeout(Some(3));
        let mut engine = engine(config);
        engine
            .register_test(
                "demo",
                "missing",
                vec![Step::item_click("**/Nope"), Step::set_ref("Demo")],
            )
            .unwrap();
        engine
            .register_test("demo", "after", vec![Step::item_click("**/Exit")])
            .unwrap();
        let mut ui = FakeUi::demo();
        run(&mut engine, &mut ui, 12);

        assert_eq!(status(&engine, "missing"), FAILURE);
        let missing = &engine.report().results()[0];
        assert_eq!(missing.steps_completed, 0);
        let failure = missing.failure.clone().unwrap();
        assert_eq!(failure.index, 0);
        assert_eq!(
            failure.error,
            StepError::ItemNotFound {
                pattern: "**/Nope".to_string()
            }
        );
        assert_eq!(status(&engine, "after"), SUCCESS);
        assert!(engine.report().results()[1].started_frame > Some(missing.finished_frame));
    }

    #[test]
    fn test_without_timeout_a_step_stalls() {
        let config = TestEngineConfig::default().step_timeout(None);
        let mut engine = engine(config);
        engine
            .register_test("demo", "missing", vec![Step::item_click("**/Nope")])
            .unwrap();
        let mut ui = FakeUi::demo();
        run(&mut engine, &mut ui, 300);
        assert_eq!(status(&engine, "missing"), Some(TestStatus::Running));
    }

    #[test]
    fn test_menu_check_opens_menu_then_checks() {
        let mut engine = engine(TestEngineConfig::default());
        engine
            .register_test(
                "demo",
                "metrics",
                vec![
                    Step::set_ref("Demo"),
                    Step::menu_check("Tools/Metrics\\/Debugger"),
                    Step::menu_check("Tools/Metrics\\/Debugger"),
                ],
            )
            .unwrap();
        let mut ui = FakeUi::demo();
        run(&mut engine, &mut ui, 6);

        assert_eq!(status(&engine, "metrics"), SUCCESS);
        let leaf = ui
            .visible
            .iter()
            .find(|item| item.label() == "Metrics/Debugger")
            .unwrap();
        assert_eq!(leaf.checked, Some(true));
        // the second check is already satisfied and does not click again
        assert_eq!(ui.clicks.len(), 1);
    }

    #[test]
    fn test_menu_uncheck_and_toggle() {
        let mut engine = engine(TestEngineConfig::default());
        engine
            .register_test(
                "demo",
                "toggle",
                vec![
                    Step::menu_toggle("//Demo/Tools/Metrics\\/Debugger"),
                    Step::menu_uncheck("//Demo/Tools/Metrics\\/Debugger"),
                ],
            )
            .unwrap();
        let mut ui = FakeUi::demo();
        run(&mut engine, &mut ui, 10);
        assert_eq!(status(&engine, "toggle"), SUCCESS);
        assert_eq!(ui.clicks.len(), 2);
        assert_eq!(ui.all[2].checked, Some(false));
    }

    #[test]
    fn test_open_all_reaches_nested_nodes() {
        let mut engine = engine(TestEngineConfig::default());
        engine
            .register_test(
                "demo",
                "open_all",
                vec![Step::set_ref("Demo"), Step::item_open_all("Basic")],
            )
            .unwrap();
        let mut ui = FakeUi::demo();
        run(&mut engine, &mut ui, 8);
        assert_eq!(status(&engine, "open_all"), SUCCESS);
        assert!(ui.visible.iter().any(|item| item.label() == "Leaf"));
    }

    #[test]
    fn test_open_then_close() {
        let mut engine = engine(TestEngineConfig::default());
        engine
            .register_test(
                "demo",
                "open_close",
                vec![
                    Step::set_ref("Demo"),
                    Step::item_open("Basic"),
                    Step::item_close("Basic"),
                ],
            )
            .unwrap();
        let mut ui = FakeUi::demo();
        run(&mut engine, &mut ui, 8);
        assert_eq!(status(&engine, "open_close"), SUCCESS);
        assert_eq!(ui.all[3].open, Some(false));
    }

    #[test]
    fn test_capture_waits_a_frame_unless_instant() {
        let sink = MemoryCaptureSink::new();
        let mut engine = engine(TestEngineConfig::default()).with_capture_sink(sink.clone());
        engine
            .register_test(
                "demo",
                "capture",
                vec![Step::capture_window(
                    "Demo",
                    CaptureFlags::STITCH_ALL | CaptureFlags::HIDE_MOUSE_CURSOR,
                )],
            )
            .unwrap();
        let mut ui = FakeUi::demo();
        run(&mut engine, &mut ui, 3);
        assert!(sink.is_empty());
        run(&mut engine, &mut ui, 1);
        assert_eq!(sink.len(), 1);

        let (record, image) = &sink.captures()[0];
        assert_eq!(record.window, "Demo");
        assert_eq!(record.frame, 4);
        assert_eq!((image.width(), image.height()), (100, 60));
        assert_eq!(engine.report().results()[0].captures.len(), 1);
    }

    #[test]
    fn test_capture_clips_to_surface_without_stitch() {
        let sink = MemoryCaptureSink::new();
        let mut engine = engine(TestEngineConfig::default()).with_capture_sink(sink.clone());
        engine
            .register_test(
                "demo",
                "clip",
                vec![Step::capture_window("Demo", CaptureFlags::INSTANT)],
            )
            .unwrap();
        let mut ui = FakeUi::demo();
        run(&mut engine, &mut ui, 3);
        let (_, image) = &sink.captures()[0];
        assert_eq!((image.width(), image.height()), (54, 54));
    }

    #[test]
    fn test_normal_speed_idles_between_steps() {
        let config = TestEngineConfig::default().run_speed(RunSpeed::Normal);
        let mut engine = engine(config);
        engine
            .register_test(
                "demo",
                "slow",
                vec![Step::set_ref("Demo"), Step::set_ref("Main")],
            )
            .unwrap();
        let mut ui = FakeUi::demo();
        run(&mut engine, &mut ui, 10);
        let result = &engine.report().results()[0];
        assert!(result.passed());
        // one delay between the two steps, none after the last
        assert_eq!(result.frames(), 3);
        assert_eq!(engine.batch_run_speed(), RunSpeed::Normal);
    }

    #[test]
    fn test_normal_speed_last_step_finishes_in_its_frame() {
        let config = TestEngineConfig::default().run_speed(RunSpeed::Normal);
        let mut engine = engine(config);
        engine
            .register_test("demo", "single", vec![Step::set_ref("Demo")])
            .unwrap();
        let mut ui = FakeUi::demo();
        run(&mut engine, &mut ui, 3);
        let result = &engine.report().results()[0];
        assert!(result.passed());
        assert_eq!(result.frames(), 1);
    }

    #[test]
    fn test_yield_waits_exact_frames() {
        let mut engine = engine(TestEngineConfig::default());
        engine
            .register_test("demo", "yield", vec![Step::Yield(2)])
            .unwrap();
        let mut ui = FakeUi::demo();
        run(&mut engine, &mut ui, 4);
        assert_eq!(status(&engine, "yield"), Some(TestStatus::Running));
        run(&mut engine, &mut ui, 1);
        assert_eq!(status(&engine, "yield"), SUCCESS);
    }

    #[test]
    fn test_abandon_records_running_and_queued() {
        let mut engine = engine(TestEngineConfig::default());
        engine
            .register_test("demo", "long", vec![Step::Yield(100)])
            .unwrap();
        engine.register_test("demo", "next", vec![]).unwrap();
        let mut ui = FakeUi::demo();
        run(&mut engine, &mut ui, 4);
        engine.abandon();

        assert_eq!(status(&engine, "long"), Some(TestStatus::Abandoned));
        assert_eq!(status(&engine, "next"), Some(TestStatus::Abandoned));
        assert_eq!(engine.report().abandoned(), 2);
        assert!(engine.is_idle());
        assert_eq!(engine.report().results()[1].started_frame, None);
    }

    #[test]
    fn test_reference_resets_between_tests() {
        let mut engine = engine(TestEngineConfig::default());
        engine
            .register_test("demo", "first", vec![Step::set_ref("Main")])
            .unwrap();
        engine
            .register_test("demo", "second", vec![Step::item_click("Exit")])
            .unwrap();
        let config_timeout = engine.config().step_timeout_frames;
        assert_eq!(config_timeout, Some(120));

        let mut ui = FakeUi::demo();
        run(&mut engine, &mut ui, 8);
        // "Exit" alone does not match //Main/Exit once the reference is gone
        assert_eq!(status(&engine, "second"), Some(TestStatus::Running));
    }

    struct Lines(Vec<String>);

    impl EngineUi for Lines {
        fn begin_window(&mut self, title: &str) {
            self.0.push(format!("[{title}]"));
        }
        fn text(&mut self, text: &str) {
            self.0.push(text.to_string());
        }
        fn end_window(&mut self) {}
    }

    #[test]
    fn test_show_windows_lists_tests() {
        let mut engine = engine(TestEngineConfig::default());
        engine.register_test("demo", "a", vec![]).unwrap();
        let mut lines = Lines(Vec::new());
        engine.show_windows(&mut lines);
        assert_eq!(lines.0[0], format!("[{ENGINE_WINDOW_TITLE}]"));
        assert_eq!(lines.0[2], "demo/a: registered");

        let mut hidden = engine_with_hidden_windows();
        hidden.register_test("demo", "a", vec![]).unwrap();
        let mut lines = Lines(Vec::new());
        hidden.show_windows(&mut lines);
        assert!(lines.0.is_empty());
    }

    fn engine_with_hidden_windows() -> TestEngine {
        let config = TestEngineConfig {
            show_windows: false,
            ..TestEngineConfig::default()
        };
        engine(config)
    }
}
