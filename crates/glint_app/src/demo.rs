//! Demo application and its scripted CI tests
//!
//! The frame shows a "Hello" line and an "Exit" button in the default
//! window, the "Glint Demo" window (menu bar, collapsing headers, tree
//! nodes) and, when enabled, the test engine's status window. The three
//! `demo_tests` drive it end to end: check a menu item, capture the demo
//! window, and press "Exit".

use glint_runner::{FrameContext, RunConfiguration, RunnerSettings, Ui};
use glint_test_engine::{CaptureFlags, Step, TestEngine, TestEngineError};

pub const DEMO_WINDOW: &str = "Glint Demo";
pub const METRICS_WINDOW: &str = "Glint Metrics/Debugger";

/// Frames after which the CI configuration gives up
const CI_FRAME_LIMIT: u64 = 600;

/// Per-application state kept across frames
#[derive(Debug, Default)]
pub struct DemoApp {
    show_metrics: bool,
    show_about: bool,
    clicks: u32,
    last_items: usize,
}

impl DemoApp {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show_metrics(&self) -> bool {
        self.show_metrics
    }

    /// Submit one frame
    pub fn frame(&mut self, cx: &mut FrameContext<'_>) {
        let frame_index = cx.frame_index();
        let ui = cx.ui();
        ui.text("Hello");
        let exit = ui.button("Exit");

        self.demo_window(ui);
        if self.show_metrics {
            let items = self.last_items;
            ui.window(METRICS_WINDOW, |ui| {
                ui.text(&format!("Frame {}", frame_index));
                ui.text(&format!("{} items last frame", items));
            });
        }
        self.last_items = ui.items().len();

        if exit {
            tracing::info!("Exit button pressed");
            cx.request_exit();
        }
        if cx.show_test_engine_windows() {
            cx.draw_test_engine_windows();
        }
    }

    fn demo_window(&mut self, ui: &mut Ui) {
        let show_metrics = &mut self.show_metrics;
        let show_about = &mut self.show_about;
        let clicks = &mut self.clicks;
        ui.window(DEMO_WINDOW, |ui| {
            ui.menu_bar(|ui| {
                ui.menu("Tools", |ui| {
                    ui.menu_item_toggle("Metrics/Debugger", show_metrics);
                    ui.menu_item_toggle("About Glint", show_about);
                });
            });
            ui.text("Glint says hello.");

            if ui.collapsing_header("Help") {
                ui.text("Menus, headers and tree nodes can be driven by tests.");
            }

            if ui.collapsing_header("Widgets") {
                ui.tree_node("Basic", |ui| {
                    if ui.button("Button") {
                        *clicks += 1;
                    }
                    ui.text(&format!("Clicked {} times", clicks));
                    ui.tree_node("Inputs", |ui| {
                        ui.text("Text input");
                        ui.text("Sliders");
                    });
                    ui.tree_node("Selectables", |ui| {
                        ui.text("Single selection");
                    });
                });
                ui.tree_node("Trees", |ui| {
                    ui.tree_node("Basic trees", |ui| {
                        ui.text("Child 0");
                        ui.text("Child 1");
                    });
                });
            }

            if ui.collapsing_header("Layout") {
                ui.text("Flow layout, one item per row.");
            }
        });

        if self.show_about {
            ui.window("About Glint", |ui| {
                ui.text(concat!("Glint ", env!("CARGO_PKG_VERSION")));
            });
        }
    }
}

/// Register `demo_tests/open_metrics`, `demo_tests/capture_screenshot` and
/// `demo_tests/exit`
pub fn register_demo_tests(engine: &mut TestEngine) -> Result<(), TestEngineError> {
    engine.register_test(
        "demo_tests",
        "open_metrics",
        vec![
            Step::set_ref(DEMO_WINDOW),
            Step::menu_check("Tools/Metrics\\/Debugger"),
        ],
    )?;
    engine.register_test(
        "demo_tests",
        "capture_screenshot",
        vec![
            Step::set_ref(DEMO_WINDOW),
            Step::item_open("Widgets"),
            Step::item_open_all("Basic"),
            Step::capture_window(
                DEMO_WINDOW,
                CaptureFlags::STITCH_ALL | CaptureFlags::HIDE_MOUSE_CURSOR,
            ),
        ],
    )?;
    engine.register_test("demo_tests", "exit", vec![Step::item_click("**/Exit")])?;
    Ok(())
}

/// The demo app with its tests registered, configured from `settings`
///
/// The test engine is always enabled. Without an explicit frame cap the run
/// stops after a fixed number of frames so a stuck test cannot hang CI.
pub fn ci_automation_config(settings: &RunnerSettings) -> RunConfiguration {
    let mut app = DemoApp::new();
    let config = RunConfiguration::from_settings(settings, move |cx| app.frame(cx))
        .with_tests(register_demo_tests);
    match settings.max_frames {
        Some(_) => config,
        None => config.max_frames(CI_FRAME_LIMIT),
    }
}
