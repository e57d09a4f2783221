//! Glint Test Engine
//!
//! Scripted UI tests that run inside the application's own render loop.
//!
//! Tests are registered once during setup as ordered lists of [`Step`]s. The
//! runner reports every rendered frame to the engine; when the frame index
//! reaches the stabilization threshold the engine queues every registered
//! test and then executes them one at a time, one frame at a time, through a
//! resumable [`StepCursor`]. Nothing ever blocks: a step that has to wait for
//! the UI to react returns control to the render loop and is polled again on
//! the next frame.
//!
//! # Example
//!
//! ```
//! use glint_test_engine::{CaptureFlags, Step, TestEngine, TestEngineConfig};
//!
//! let mut engine = TestEngine::new(TestEngineConfig::default())?;
//! engine.register_test("demo_tests", "open_metrics", vec![
//!     Step::set_ref("Glint Demo"),
//!     Step::menu_check("Tools/Metrics\\/Debugger"),
//! ])?;
//! engine.register_test("demo_tests", "capture_screenshot", vec![
//!     Step::set_ref("Glint Demo"),
//!     Step::capture_window("Glint Demo", CaptureFlags::STITCH_ALL),
//! ])?;
//! assert!(engine.tick(3));
//! # Ok::<(), glint_test_engine::TestEngineError>(())
//! ```

mod capture;
mod config;
mod cursor;
mod driver;
mod engine;
mod error;
mod gate;
mod item;
mod path;
mod queue;
mod registry;
mod report;
mod step;

pub use capture::{CaptureFlags, CaptureRecord, CaptureSink, MemoryCaptureSink, PngCaptureSink};
pub use config::{RunSpeed, TestEngineConfig};
pub use cursor::{CursorState, StepCursor};
pub use driver::{EngineUi, UiDriver};
pub use engine::{TestEngine, ENGINE_WINDOW_TITLE};
pub use error::{CaptureError, Result, StepError, TestEngineError};
pub use gate::{FrameCounter, FrameGate, FrameIndexing};
pub use item::{ItemAction, ItemId, ItemInfo, ItemKind};
pub use path::{join_segments, split_segments, ItemPath};
pub use queue::TestQueue;
pub use registry::{ScriptedTest, TestId, TestRegistry};
pub use report::{StepFailure, TestOutcome, TestReport, TestResult, TestStatus};
pub use step::Step;
