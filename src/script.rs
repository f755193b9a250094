use std::path::Path;

use anyhow::Context as _;

use crate::error::ShortreelResult;

/// The canonical timed-scene document produced by the generate stage and
/// consumed by the synthesis and assembly stages.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Script {
    pub title: String,
    pub duration_seconds: f64,
    pub scenes: Vec<ScriptScene>,
}

/// One timed segment within a [`Script`]: narration text (`voice`) plus the
/// on-screen overlay shown while it plays.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct ScriptScene {
    pub start: f64,
    pub end: f64,
    pub voice: String,
    pub overlay: String,
}

/// Script invariant violations, reported fail-fast in a fixed checking order
/// so the messages stay deterministic regardless of which invariant an
/// upstream generator breaks.
#[derive(thiserror::Error, Clone, Debug, PartialEq)]
pub enum ScriptError {
    #[error("script title must be a non-empty string")]
    MissingTitle,

    #[error("script duration_seconds must be a positive number")]
    InvalidDuration,

    #[error("script must contain at least one scene")]
    EmptySceneList,

    #[error("scene {index}: timing must satisfy 0 <= start < end <= duration_seconds")]
    InvalidSceneTiming { index: usize },

    #[error("scene {index}: '{field}' must be a non-empty string")]
    InvalidSceneField { index: usize, field: &'static str },

    #[error("scene {index} starts before the previous scene ends")]
    SceneOverlap { index: usize },
}

impl Script {
    /// Check every invariant, stopping at the first violation.
    ///
    /// Order: title, duration, scene list presence, each scene in stored
    /// order (timing, then text fields), then a pairwise overlap scan.
    pub fn validate(&self) -> Result<(), ScriptError> {
        if self.title.trim().is_empty() {
            return Err(ScriptError::MissingTitle);
        }
        if !self.duration_seconds.is_finite() || self.duration_seconds <= 0.0 {
            return Err(ScriptError::InvalidDuration);
        }
        if self.scenes.is_empty() {
            return Err(ScriptError::EmptySceneList);
        }

        for (index, scene) in self.scenes.iter().enumerate() {
            if !scene.start.is_finite()
                || !scene.end.is_finite()
                || scene.start < 0.0
                || scene.end > self.duration_seconds
                || scene.start >= scene.end
            {
                return Err(ScriptError::InvalidSceneTiming { index });
            }
            if scene.voice.trim().is_empty() {
                return Err(ScriptError::InvalidSceneField {
                    index,
                    field: "voice",
                });
            }
            if scene.overlay.trim().is_empty() {
                return Err(ScriptError::InvalidSceneField {
                    index,
                    field: "overlay",
                });
            }
        }

        // Individual scenes are sound; now reject overlapping neighbours.
        // Touching boundaries (start == previous end) are valid.
        for index in 1..self.scenes.len() {
            if self.scenes[index].start < self.scenes[index - 1].end {
                return Err(ScriptError::SceneOverlap { index });
            }
        }

        Ok(())
    }

    /// Read and parse a script document from disk.
    pub fn from_path(path: &Path) -> ShortreelResult<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read script '{}'", path.display()))?;
        let script: Self = serde_json::from_str(&data)
            .with_context(|| format!("failed to parse script '{}'", path.display()))?;
        Ok(script)
    }

    /// Persist the script as pretty-printed JSON, creating parent
    /// directories as needed.
    pub fn write_to(&self, path: &Path) -> ShortreelResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("failed to create output directory '{}'", parent.display())
            })?;
        }
        let file = std::fs::File::create(path)
            .with_context(|| format!("failed to create script file '{}'", path.display()))?;
        serde_json::to_writer_pretty(file, self)
            .with_context(|| format!("failed to write script '{}'", path.display()))?;
        Ok(())
    }
}
