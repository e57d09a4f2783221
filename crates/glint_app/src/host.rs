//! Host detection
//!
//! The backend is picked at compile time: browsers get the asynchronous web
//! backend, desktop builds with the `windowed` feature get winit + wgpu, and
//! everything else runs headless.

use glint_platform::{Backend, WindowConfig};
use glint_runner::{AbstractRunner, AppRunner, Result, RunConfiguration};
use glint_test_engine::TestReport;

#[cfg(target_arch = "wasm32")]
fn detect(_window: &WindowConfig) -> Box<dyn Backend> {
    Box::new(glint_platform_web::WebBackend::new())
}

#[cfg(all(not(target_arch = "wasm32"), feature = "windowed"))]
fn detect(_window: &WindowConfig) -> Box<dyn Backend> {
    Box::new(glint_platform_desktop::DesktopBackend::new())
}

#[cfg(all(not(target_arch = "wasm32"), not(feature = "windowed")))]
fn detect(window: &WindowConfig) -> Box<dyn Backend> {
    Box::new(glint_runner::HeadlessBackend::new(window.width, window.height))
}

/// The backend for the current host
pub fn default_backend(window: &WindowConfig) -> Box<dyn Backend> {
    let backend = detect(window);
    tracing::debug!("Detected host backend '{}'", backend.name());
    backend
}

/// Run on the detected host
///
/// Blocking hosts return after teardown with the final test report (when the
/// test engine ran). Asynchronous hosts return as soon as the frame loop is
/// handed to the host, so the report is still empty at that point.
pub fn run(config: RunConfiguration) -> Result<Option<TestReport>> {
    let backend = default_backend(&config.window);
    run_with_backend(config, backend)
}

/// Run on an explicit backend
pub fn run_with_backend(
    config: RunConfiguration,
    backend: Box<dyn Backend>,
) -> Result<Option<TestReport>> {
    let mut runner = AppRunner::new(config, backend);
    runner.run()?;
    Ok(runner.test_report())
}
