use std::{
    collections::BTreeMap,
    path::PathBuf,
    sync::{Arc, Mutex, PoisonError},
};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::{info, warn};

/// Process-wide video production configuration.
///
/// Always fully populated: every section falls back to built-in defaults when
/// the configuration document is missing or broken, so loading never fails
/// outward. Immutable once loaded and safely shared without synchronization.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ShortsConfig {
    pub script: ScriptDefaults,
    pub tts: TtsConfig,
    pub video: VideoConfig,
    pub llm: LlmConfig,
    pub output: OutputConfig,
    pub text_overlay: TextOverlayConfig,
}

/// Script generation defaults.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptDefaults {
    pub topic: String,
    pub style: String,
    pub duration_seconds: DurationSetting,
    pub hook_duration: f64,
    pub development_duration: f64,
    pub climax_duration: f64,
    pub max_words_per_scene: u32,
}

impl Default for ScriptDefaults {
    fn default() -> Self {
        Self {
            topic: "interesting facts".to_string(),
            style: "engaging and energetic".to_string(),
            duration_seconds: DurationSetting::Auto,
            hook_duration: 3.0,
            development_duration: 20.0,
            climax_duration: 7.0,
            max_words_per_scene: 30,
        }
    }
}

/// Target script length: a fixed number of seconds, or `"auto"` to let the
/// synthesized narration decide.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DurationSetting {
    Auto,
    Fixed(f64),
}

impl DurationSetting {
    /// The fixed duration, if one is configured.
    pub fn fixed(self) -> Option<f64> {
        match self {
            Self::Auto => None,
            Self::Fixed(secs) => Some(secs),
        }
    }
}

impl Serialize for DurationSetting {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Auto => serializer.serialize_str("auto"),
            Self::Fixed(secs) => serializer.serialize_f64(*secs),
        }
    }
}

impl<'de> Deserialize<'de> for DurationSetting {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        match value {
            serde_json::Value::String(s) if s == "auto" => Ok(Self::Auto),
            serde_json::Value::Number(n) => n
                .as_f64()
                .map(Self::Fixed)
                .ok_or_else(|| serde::de::Error::custom("duration_seconds is not a valid number")),
            _ => Err(serde::de::Error::custom(
                "duration_seconds must be a number or \"auto\"",
            )),
        }
    }
}

/// Speech synthesis parameters handed to the synth worker.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct TtsConfig {
    pub provider: String,
    pub voice: String,
    pub rate: String,
    pub volume: String,
    pub pitch: String,
    pub available_voices: Vec<String>,
    pub speed_presets: BTreeMap<String, String>,
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            provider: "edge-tts".to_string(),
            voice: "en-US-ChristopherNeural".to_string(),
            rate: "+0%".to_string(),
            volume: "+0%".to_string(),
            pitch: "+0Hz".to_string(),
            available_voices: [
                "en-US-ChristopherNeural",
                "en-US-EricNeural",
                "en-US-GuyNeural",
                "en-US-RogerNeural",
                "en-US-JennyNeural",
                "en-US-AriaNeural",
                "en-US-MichelleNeural",
            ]
            .into_iter()
            .map(str::to_string)
            .collect(),
            speed_presets: [
                ("slow", "-25%"),
                ("normal", "+0%"),
                ("fast", "+25%"),
                ("very_fast", "+50%"),
            ]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
        }
    }
}

/// Encoding parameters for the prepared background and the final video.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoConfig {
    pub background_video: PathBuf,
    pub resolution: Resolution,
    pub fps: u32,
    pub format: String,
    pub codec: String,
    pub audio_codec: String,
    pub crf: u32,
    pub preset: String,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            background_video: PathBuf::from("assets/background_loop.mp4"),
            resolution: Resolution {
                width: 720,
                height: 1280,
            },
            fps: 30,
            format: "mp4".to_string(),
            codec: "libx264".to_string(),
            audio_codec: "aac".to_string(),
            crf: 23,
            preset: "fast".to_string(),
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

/// Parameters for the (future) model-backed script generator.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
    pub use_gpu: bool,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "qwen2.5:7b".to_string(),
            temperature: 0.7,
            max_tokens: 1000,
            use_gpu: false,
        }
    }
}

/// Output directory and the fixed file names the stages hand to each other.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub directory: PathBuf,
    pub script_file: String,
    pub audio_file: String,
    pub background_file: String,
    pub final_video: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("output"),
            script_file: "script.json".to_string(),
            audio_file: "speech_all.wav".to_string(),
            background_file: "background.mp4".to_string(),
            final_video: "short.mp4".to_string(),
        }
    }
}

/// Subtitle overlay styling consumed by the assembly worker.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct TextOverlayConfig {
    pub enabled: bool,
    pub font: String,
    pub font_size: u32,
    pub font_color: String,
    pub position: String,
    pub background_color: String,
    pub border_width: u32,
}

impl Default for TextOverlayConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            font: "Arial".to_string(),
            font_size: 48,
            font_color: "white".to_string(),
            position: "center".to_string(),
            background_color: "black@0.7".to_string(),
            border_width: 5,
        }
    }
}

/// Memoized configuration loader.
///
/// Candidate paths are tried in order; the first existing file wins and is
/// parsed as the whole configuration document (no deep merge with the
/// defaults). A missing or unparsable document substitutes the built-in
/// defaults, so `load` never fails.
///
/// Constructed once at program start and passed by reference; `reset` exists
/// for test isolation instead of module-level caching.
pub struct ConfigStore {
    candidates: Vec<PathBuf>,
    cached: Mutex<Option<Arc<ShortsConfig>>>,
}

impl ConfigStore {
    pub fn new(candidates: Vec<PathBuf>) -> Self {
        Self {
            candidates,
            cached: Mutex::new(None),
        }
    }

    /// The conventional lookup locations relative to the working directory.
    pub fn with_default_candidates() -> Self {
        Self::new(vec![
            PathBuf::from("config.json"),
            PathBuf::from("../config.json"),
        ])
    }

    /// Return the configuration, reading it on first access and the cached
    /// instance afterwards.
    pub fn load(&self) -> Arc<ShortsConfig> {
        let mut cached = self.cached.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(config) = cached.as_ref() {
            return Arc::clone(config);
        }
        let config = Arc::new(self.read());
        *cached = Some(Arc::clone(&config));
        config
    }

    /// Drop the memoized configuration and load it again.
    pub fn reload(&self) -> Arc<ShortsConfig> {
        self.reset();
        self.load()
    }

    /// Drop the memoized configuration without reloading.
    pub fn reset(&self) {
        self.cached
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
    }

    fn read(&self) -> ShortsConfig {
        let Some(path) = self.candidates.iter().find(|p| p.is_file()) else {
            warn!("no configuration file found, using built-in defaults");
            return ShortsConfig::default();
        };

        let parsed = std::fs::read_to_string(path)
            .map_err(|err| err.to_string())
            .and_then(|data| serde_json::from_str(&data).map_err(|err| err.to_string()));

        match parsed {
            Ok(config) => {
                info!(path = %path.display(), "loaded configuration");
                config
            }
            Err(err) => {
                warn!(path = %path.display(), %err, "configuration unusable, using built-in defaults");
                ShortsConfig::default()
            }
        }
    }
}
