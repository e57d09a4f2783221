//! Test engine configuration

use crate::error::{Result, TestEngineError};
use crate::gate::FrameIndexing;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// How quickly scripted steps follow each other
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunSpeed {
    /// Idle a few frames between steps so a human can follow along
    Normal,
    /// Run steps back to back
    #[default]
    Fast,
}

/// Test engine configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TestEngineConfig {
    /// Frame index at which every registered test gets queued
    pub stabilization_threshold: u64,
    pub indexing: FrameIndexing,
    /// Speed latched for each queued batch
    pub run_speed: RunSpeed,
    /// Frames a step may wait for its condition; `None` waits forever
    pub step_timeout_frames: Option<u32>,
    /// Idle frames after each step at [`RunSpeed::Normal`]
    pub normal_step_delay_frames: u32,
    /// Where screenshots are written; in memory when unset
    pub capture_dir: Option<PathBuf>,
    /// Whether the engine's own windows should be drawn
    pub show_windows: bool,
}

impl Default for TestEngineConfig {
    fn default() -> Self {
        Self {
            stabilization_threshold: 3,
            indexing: FrameIndexing::OneBased,
            run_speed: RunSpeed::Fast,
            step_timeout_frames: Some(120),
            normal_step_delay_frames: 2,
            capture_dir: None,
            show_windows: true,
        }
    }
}

impl TestEngineConfig {
    pub fn threshold(mut self, threshold: u64) -> Self {
        self.stabilization_threshold = threshold;
        self
    }

    pub fn run_speed(mut self, speed: RunSpeed) -> Self {
        self.run_speed = speed;
        self
    }

    pub fn indexing(mut self, indexing: FrameIndexing) -> Self {
        self.indexing = indexing;
        self
    }

    pub fn step_timeout(mut self, frames: Option<u32>) -> Self {
        self.step_timeout_frames = frames;
        self
    }

    pub fn capture_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.capture_dir = Some(dir.into());
        self
    }

    /// Reject configurations whose gate could never fire
    pub fn validate(&self) -> Result<()> {
        if self.indexing == FrameIndexing::OneBased && self.stabilization_threshold == 0 {
            return Err(TestEngineError::InvalidConfig(
                "threshold 0 is never reached with one-based frame indexing".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TestEngineConfig::default();
        assert_eq!(config.stabilization_threshold, 3);
        assert_eq!(config.indexing, FrameIndexing::OneBased);
        assert_eq!(config.step_timeout_frames, Some(120));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_threshold_needs_zero_based_indexing() {
        let config = TestEngineConfig::default().threshold(0);
        assert!(matches!(
            config.validate(),
            Err(TestEngineError::InvalidConfig(_))
        ));
        assert!(config.indexing(FrameIndexing::ZeroBased).validate().is_ok());
    }

    #[test]
    fn test_parse_from_toml() {
        let config: TestEngineConfig = toml::from_str(
            r#"
            stabilization_threshold = 5
            run_speed = "normal"
            indexing = "zero_based"
            "#,
        )
        .unwrap();
        assert_eq!(config.stabilization_threshold, 5);
        assert_eq!(config.run_speed, RunSpeed::Normal);
        assert_eq!(config.indexing, FrameIndexing::ZeroBased);
        assert_eq!(config.normal_step_delay_frames, 2);
    }
}
