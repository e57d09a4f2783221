//! TOML runner settings
//!
//! ```toml
//! target_fps = 0          # host decides
//! swap_interval = "v_sync"
//!
//! [window]
//! title = "Glint App"
//! width = 1280
//! height = 720
//!
//! [test_engine]
//! enabled = true
//! threshold = 3
//! run_speed = "fast"
//! step_timeout_frames = 120   # 0 never times out
//!
//! [theme]
//! theme = "dark_colors"
//! tweaks = { rounding = 4.0 }
//! ```

use crate::error::{Result, RunnerError};
use glint_platform::{SwapInterval, WindowConfig};
use glint_test_engine::{FrameIndexing, RunSpeed, TestEngineConfig};
use glint_theme::TweakedTheme;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Runner settings as stored on disk
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerSettings {
    pub window: WindowConfig,
    pub swap_interval: SwapInterval,
    /// Frames per second for host-scheduled runners; 0 lets the host decide
    pub target_fps: u32,
    pub max_frames: Option<u64>,
    pub test_engine: TestEngineSettings,
    pub theme: TweakedTheme,
}

/// Test engine section of [`RunnerSettings`]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TestEngineSettings {
    pub enabled: bool,
    pub threshold: u64,
    pub indexing: FrameIndexing,
    pub run_speed: RunSpeed,
    /// 0 disables the timeout
    pub step_timeout_frames: u32,
    pub normal_step_delay_frames: u32,
    pub capture_dir: Option<PathBuf>,
    pub show_windows: bool,
}

impl Default for TestEngineSettings {
    fn default() -> Self {
        let config = TestEngineConfig::default();
        Self {
            enabled: false,
            threshold: config.stabilization_threshold,
            indexing: config.indexing,
            run_speed: config.run_speed,
            step_timeout_frames: config.step_timeout_frames.unwrap_or(0),
            normal_step_delay_frames: config.normal_step_delay_frames,
            capture_dir: config.capture_dir,
            show_windows: config.show_windows,
        }
    }
}

impl TestEngineSettings {
    pub fn to_config(&self) -> TestEngineConfig {
        TestEngineConfig {
            stabilization_threshold: self.threshold,
            indexing: self.indexing,
            run_speed: self.run_speed,
            step_timeout_frames: (self.step_timeout_frames > 0).then_some(self.step_timeout_frames),
            normal_step_delay_frames: self.normal_step_delay_frames,
            capture_dir: self.capture_dir.clone(),
            show_windows: self.show_windows,
        }
    }
}

impl RunnerSettings {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| RunnerError::Settings(e.to_string()))
    }

    /// Load settings from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| RunnerError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_toml_str(&content)?;
        tracing::debug!("Loaded runner settings from {}", path.display());
        Ok(settings)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| RunnerError::Settings(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glint_theme::ThemeId;

    #[test]
    fn test_empty_file_gives_defaults() {
        let settings = RunnerSettings::from_toml_str("").unwrap();
        assert_eq!(settings, RunnerSettings::default());
        assert_eq!(settings.test_engine.to_config(), TestEngineConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("glint.toml");
        fs::write(
            &path,
            r#"
            swap_interval = "immediate"
            [test_engine]
            enabled = true
            threshold = 5
            indexing = "zero_based"
            capture_dir = "shots"
            [theme]
            theme = "so_dark_accent_red"
            tweaks = { rounding = 2.0 }
            "#,
        )
        .unwrap();

        let settings = RunnerSettings::load(&path).unwrap();
        assert_eq!(settings.swap_interval, SwapInterval::Immediate);
        let config = settings.test_engine.to_config();
        assert_eq!(config.stabilization_threshold, 5);
        assert_eq!(config.indexing, FrameIndexing::ZeroBased);
        assert_eq!(config.capture_dir, Some(PathBuf::from("shots")));
        assert_eq!(settings.theme.theme, ThemeId::SoDarkAccentRed);
        assert_eq!(settings.theme.tweaks.rounding, 2.0);
    }

    #[test]
    fn test_bad_input() {
        assert!(matches!(
            RunnerSettings::from_toml_str("target_fps = \"fast\""),
            Err(RunnerError::Settings(_))
        ));
        assert!(matches!(
            RunnerSettings::load(Path::new("/definitely/not/here.toml")),
            Err(RunnerError::Io { .. })
        ));
    }

    #[test]
    fn test_round_trip_through_toml() {
        let mut settings = RunnerSettings::default();
        settings.test_engine.enabled = true;
        settings.target_fps = 30;
        let text = settings.to_toml_string().unwrap();
        assert_eq!(RunnerSettings::from_toml_str(&text).unwrap(), settings);
    }
}
