//! Shortreel is the orchestration core of a short-form video generator.
//!
//! It turns a scene catalog into a finished vertical video by sequencing four
//! stages, each handing its output file to the next:
//!
//! 1. **generate**: scene catalog + configuration -> validated [`Script`] on disk
//! 2. **synth**: script file -> narration audio (speech-synthesis worker)
//! 3. **prepare-video**: source video + probed narration length -> background video
//! 4. **assemble**: script + background + audio -> final video (assembly worker)
//!
//! The heavy lifting (TTS, encoding, cropping, overlay rendering) happens in
//! external worker processes invoked through [`WorkerExecutor`]; this crate
//! owns the script data model and its timing invariants, the configuration
//! store, and the fail-fast stage sequencing.
//!
//! Key design constraints:
//!
//! - **Deterministic validation**: invariants are checked in a fixed order so
//!   error messages are reproducible whatever an upstream generator emits.
//! - **Strictly sequential**: no parallel stages, no retries; a stage failure
//!   aborts the run and leaves earlier outputs on disk.
//! - **Injectable workers**: stages call the [`WorkerExecutor`] capability, so
//!   tests script worker outputs without spawning processes.
#![forbid(unsafe_code)]

pub mod catalog;
pub mod config;
pub mod error;
pub mod exec;
pub mod pipeline;
pub mod probe;
pub mod script;

pub use catalog::{SceneCatalog, SceneTemplate};
pub use config::{ConfigStore, DurationSetting, Resolution, ShortsConfig};
pub use error::{ShortreelError, ShortreelResult};
pub use exec::{ProcessExecutor, WorkerExecutor};
pub use pipeline::{Pipeline, Stage};
pub use probe::{
    FALLBACK_DURATION_SECS, PROBE_WORKER, ProbedDuration, parse_probe_output, probe_audio_duration,
};
pub use script::{Script, ScriptError, ScriptScene};
