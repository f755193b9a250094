use crate::script::ScriptError;

/// Convenience result type used across shortreel.
pub type ShortreelResult<T> = Result<T, ShortreelError>;

/// Top-level error taxonomy for the pipeline core.
///
/// Validation and worker errors are never retried or swallowed internally; they
/// propagate through the owning stage to the top-level runner.
#[derive(thiserror::Error, Debug)]
pub enum ShortreelError {
    /// A generated or loaded script violated one of the timing invariants.
    #[error(transparent)]
    Script(#[from] ScriptError),

    /// A worker process could not be started at all (missing script,
    /// missing interpreter, permissions). Distinct from a worker that ran
    /// and reported failure.
    #[error("failed to spawn worker '{worker}': {source}")]
    WorkerSpawn {
        worker: String,
        #[source]
        source: std::io::Error,
    },

    /// A worker ran to completion but exited non-zero.
    #[error("worker '{worker}' exited with code {code}: {stderr}")]
    WorkerExit {
        worker: String,
        code: i32,
        stderr: String,
    },

    /// A stage name that is not one of the pipeline's stages.
    #[error("unknown stage '{0}' (valid stages: generate, synth, prepare-video, assemble)")]
    UnknownStage(String),

    /// A caller omitted an argument a stage cannot run without.
    #[error("missing required argument: {0}")]
    MissingArgument(&'static str),

    /// Broken catalog or input document, as opposed to a pipeline failure.
    #[error("config error: {0}")]
    Config(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ShortreelError {
    /// Build a [`ShortreelError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
