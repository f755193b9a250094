use std::path::Path;

use anyhow::Context as _;

use crate::{error::ShortreelResult, script::Script};

/// Authoring catalog: a set of scene templates plus the id of the one the
/// generate stage should use by default. Read-only input to script generation.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct SceneCatalog {
    pub scenes: Vec<SceneTemplate>,
    #[serde(default)]
    pub default_scene: String,
}

/// One authoring template: descriptive metadata, voice and timing hints, and
/// a complete example script. Distinct from [`crate::ScriptScene`], which is a
/// timed segment inside a produced script.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct SceneTemplate {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub topic: String,
    #[serde(default)]
    pub style: String,
    #[serde(default)]
    pub hook_duration: f64,
    #[serde(default)]
    pub development_duration: f64,
    #[serde(default)]
    pub climax_duration: f64,
    #[serde(default)]
    pub max_words_per_scene: u32,
    #[serde(default)]
    pub voice: String,
    #[serde(default)]
    pub rate: String,
    pub example_script: Script,
}

impl SceneCatalog {
    /// Read and parse a scenes catalog document from disk.
    pub fn from_path(path: &Path) -> ShortreelResult<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read scenes catalog '{}'", path.display()))?;
        let catalog: Self = serde_json::from_str(&data)
            .with_context(|| format!("failed to parse scenes catalog '{}'", path.display()))?;
        Ok(catalog)
    }

    /// The template named by `default_scene`, or the first template when that
    /// id does not resolve. `None` only for an empty catalog.
    pub fn default_template(&self) -> Option<&SceneTemplate> {
        self.scenes
            .iter()
            .find(|s| s.id == self.default_scene)
            .or_else(|| self.scenes.first())
    }
}
