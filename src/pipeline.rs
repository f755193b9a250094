use std::{
    fmt,
    path::{Path, PathBuf},
    str::FromStr,
    sync::Arc,
};

use anyhow::Context as _;
use tracing::info;

use crate::{
    catalog::SceneCatalog,
    config::ShortsConfig,
    error::{ShortreelError, ShortreelResult},
    exec::WorkerExecutor,
    probe::{ProbedDuration, probe_audio_duration},
    script::Script,
};

/// One named unit of pipeline work with fixed input and output file roles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Generate,
    Synth,
    PrepareVideo,
    Assemble,
}

impl Stage {
    pub const ALL: [Stage; 4] = [
        Stage::Generate,
        Stage::Synth,
        Stage::PrepareVideo,
        Stage::Assemble,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Stage::Generate => "generate",
            Stage::Synth => "synth",
            Stage::PrepareVideo => "prepare-video",
            Stage::Assemble => "assemble",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Stage {
    type Err = ShortreelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Stage::ALL
            .into_iter()
            .find(|stage| stage.name() == s)
            .ok_or_else(|| ShortreelError::UnknownStage(s.to_string()))
    }
}

/// Sequences the production stages, threading one stage's output file into
/// the next stage's arguments.
///
/// Stages run strictly in order on a single logical thread; the only blocking
/// points are the worker invocations. On a stage failure the run aborts
/// immediately with no rollback, so files produced by earlier stages stay on
/// disk.
pub struct Pipeline<E> {
    config: Arc<ShortsConfig>,
    catalog: SceneCatalog,
    executor: E,
}

impl<E: WorkerExecutor> Pipeline<E> {
    pub fn new(config: Arc<ShortsConfig>, catalog: SceneCatalog, executor: E) -> Self {
        Self {
            config,
            catalog,
            executor,
        }
    }

    pub fn script_path(&self) -> PathBuf {
        self.config
            .output
            .directory
            .join(&self.config.output.script_file)
    }

    pub fn audio_path(&self) -> PathBuf {
        self.config
            .output
            .directory
            .join(&self.config.output.audio_file)
    }

    pub fn background_path(&self) -> PathBuf {
        self.config
            .output
            .directory
            .join(&self.config.output.background_file)
    }

    pub fn final_video_path(&self) -> PathBuf {
        self.config
            .output
            .directory
            .join(&self.config.output.final_video)
    }

    /// Run all four stages in order, failing fast on the first stage error.
    ///
    /// `input_video` overrides the configured default background source.
    /// Returns the path of the assembled video.
    #[tracing::instrument(skip(self))]
    pub fn run_full(&self, input_video: Option<&Path>) -> ShortreelResult<PathBuf> {
        info!("Step 1/4: generating script");
        let script = self.generate()?;
        info!(
            title = %script.title,
            scenes = script.scenes.len(),
            "script ready"
        );

        info!("Step 2/4: synthesizing narration");
        self.synth()?;

        info!("Step 3/4: preparing background video");
        let duration = probe_audio_duration(&self.executor, &self.audio_path());
        let input = input_video
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.config.video.background_video.clone());
        self.prepare_video(&input, duration)?;

        info!("Step 4/4: assembling final video");
        self.assemble()?;

        let final_path = self.final_video_path();
        info!(path = %final_path.display(), "pipeline complete");
        Ok(final_path)
    }

    /// Run exactly one named stage.
    ///
    /// `prepare-video` requires `input_video`; omitting it is a caller error,
    /// not a pipeline failure, and the configured default is deliberately not
    /// substituted here.
    #[tracing::instrument(skip(self))]
    pub fn run_stage(&self, stage: Stage, input_video: Option<&Path>) -> ShortreelResult<()> {
        match stage {
            Stage::Generate => self.generate().map(|_| ()),
            Stage::Synth => self.synth(),
            Stage::PrepareVideo => {
                let input = input_video.ok_or(ShortreelError::MissingArgument(
                    "input video (prepare-video needs a source file)",
                ))?;
                let duration = probe_audio_duration(&self.executor, &self.audio_path());
                self.prepare_video(input, duration)
            }
            Stage::Assemble => self.assemble(),
        }
    }

    /// Produce a validated script and persist it to the script file.
    ///
    /// Currently returns the catalog's default example script; the signature
    /// (catalog + configuration in, validated script out) is the contract a
    /// model-backed generator will implement behind the same call.
    pub fn generate(&self) -> ShortreelResult<Script> {
        let template = self
            .catalog
            .default_template()
            .ok_or_else(|| ShortreelError::config("scene catalog has no templates"))?;

        let script = template.example_script.clone();
        script.validate()?;

        std::fs::create_dir_all(&self.config.output.directory).with_context(|| {
            format!(
                "failed to create output directory '{}'",
                self.config.output.directory.display()
            )
        })?;

        let path = self.script_path();
        script.write_to(&path)?;
        info!(template = %template.id, path = %path.display(), "wrote script");
        Ok(script)
    }

    fn synth(&self) -> ShortreelResult<()> {
        let report = self.executor.execute(
            "synth",
            &[
                self.script_path().display().to_string(),
                self.audio_path().display().to_string(),
                self.config.tts.voice.clone(),
                self.config.tts.rate.clone(),
            ],
        )?;
        if !report.is_empty() {
            info!("{report}");
        }
        Ok(())
    }

    fn prepare_video(&self, input: &Path, duration: ProbedDuration) -> ShortreelResult<()> {
        let report = self.executor.execute(
            "prepare_video",
            &[
                input.display().to_string(),
                self.background_path().display().to_string(),
                duration.seconds().to_string(),
            ],
        )?;
        if !report.is_empty() {
            info!("{report}");
        }
        Ok(())
    }

    fn assemble(&self) -> ShortreelResult<()> {
        let report = self.executor.execute(
            "assemble",
            &[
                self.script_path().display().to_string(),
                self.background_path().display().to_string(),
                self.audio_path().display().to_string(),
                self.final_video_path().display().to_string(),
            ],
        )?;
        if !report.is_empty() {
            info!("{report}");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_names_roundtrip() {
        for stage in Stage::ALL {
            assert_eq!(stage.name().parse::<Stage>().unwrap(), stage);
        }
    }

    #[test]
    fn unknown_stage_name_is_rejected_with_the_full_list() {
        let err = "encode".parse::<Stage>().unwrap_err();
        let msg = err.to_string();
        assert!(matches!(err, ShortreelError::UnknownStage(ref name) if name == "encode"));
        assert!(msg.contains("generate, synth, prepare-video, assemble"));
    }

    #[test]
    fn display_matches_cli_names() {
        assert_eq!(Stage::PrepareVideo.to_string(), "prepare-video");
        assert_eq!(Stage::Generate.to_string(), "generate");
    }
}
