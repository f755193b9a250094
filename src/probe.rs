use std::{path::Path, sync::LazyLock};

use regex::Regex;
use tracing::warn;

use crate::exec::WorkerExecutor;

/// Assumed narration length when the probe cannot report one.
pub const FALLBACK_DURATION_SECS: f64 = 30.0;

/// Worker that reports `Duration: <n> seconds` for an audio file.
pub const PROBE_WORKER: &str = "audio_utils";

static DURATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Duration:\s*([0-9]+(?:\.[0-9]+)?)\s*seconds").expect("duration pattern is valid")
});

/// Audio duration derived from the probe worker, tagged with how it was
/// obtained so strict callers can detect the silent fallback.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ProbedDuration {
    /// Parsed from the probe worker's report.
    Measured(f64),
    /// Probe missing, failed, or unparsable; the assumed default.
    Fallback(f64),
}

impl ProbedDuration {
    pub fn seconds(self) -> f64 {
        match self {
            Self::Measured(secs) | Self::Fallback(secs) => secs,
        }
    }

    pub fn is_fallback(self) -> bool {
        matches!(self, Self::Fallback(_))
    }
}

/// Extract the reported duration from probe output, if present.
pub fn parse_probe_output(text: &str) -> Option<f64> {
    let caps = DURATION_RE.captures(text)?;
    caps[1].parse().ok()
}

/// Ask the probe worker for the duration of `audio`.
///
/// Any probe problem (worker failure, missing pattern, bad number) degrades
/// to [`FALLBACK_DURATION_SECS`] with a warning rather than an error; the
/// probe is advisory and must not abort the pipeline.
pub fn probe_audio_duration<E>(executor: &E, audio: &Path) -> ProbedDuration
where
    E: WorkerExecutor + ?Sized,
{
    let report = match executor.execute(PROBE_WORKER, &[audio.display().to_string()]) {
        Ok(report) => report,
        Err(err) => {
            warn!(%err, "duration probe failed, assuming {FALLBACK_DURATION_SECS} seconds");
            return ProbedDuration::Fallback(FALLBACK_DURATION_SECS);
        }
    };

    match parse_probe_output(&report) {
        Some(secs) => ProbedDuration::Measured(secs),
        None => {
            warn!(
                "duration probe reported no 'Duration: <n> seconds' line, assuming {FALLBACK_DURATION_SECS} seconds"
            );
            ProbedDuration::Fallback(FALLBACK_DURATION_SECS)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ShortreelError, ShortreelResult};

    struct CannedProbe(ShortreelResult<String>);

    impl WorkerExecutor for CannedProbe {
        fn execute(&self, _worker: &str, _args: &[String]) -> ShortreelResult<String> {
            match &self.0 {
                Ok(text) => Ok(text.clone()),
                Err(_) => Err(ShortreelError::WorkerExit {
                    worker: PROBE_WORKER.to_string(),
                    code: 1,
                    stderr: "probe broke".to_string(),
                }),
            }
        }
    }

    #[test]
    fn parses_duration_from_report() {
        assert_eq!(
            parse_probe_output("Duration: 45.2 seconds"),
            Some(45.2)
        );
    }

    #[test]
    fn parses_duration_embedded_in_other_output() {
        let report = "Audio file: out/speech_all.wav\nDuration: 12.50 seconds\nChannels: 2";
        assert_eq!(parse_probe_output(report), Some(12.5));
    }

    #[test]
    fn missing_pattern_yields_none() {
        assert_eq!(parse_probe_output("length unknown"), None);
        assert_eq!(parse_probe_output(""), None);
    }

    #[test]
    fn measured_duration_is_tagged() {
        let probe = CannedProbe(Ok("Duration: 45.2 seconds".to_string()));
        let d = probe_audio_duration(&probe, Path::new("speech_all.wav"));
        assert_eq!(d, ProbedDuration::Measured(45.2));
        assert!(!d.is_fallback());
    }

    #[test]
    fn unparsable_report_falls_back_to_thirty_seconds() {
        let probe = CannedProbe(Ok("all good".to_string()));
        let d = probe_audio_duration(&probe, Path::new("speech_all.wav"));
        assert_eq!(d, ProbedDuration::Fallback(FALLBACK_DURATION_SECS));
        assert_eq!(d.seconds(), 30.0);
    }

    #[test]
    fn probe_worker_failure_also_falls_back() {
        let probe = CannedProbe(Err(ShortreelError::Config(String::new())));
        let d = probe_audio_duration(&probe, Path::new("speech_all.wav"));
        assert!(d.is_fallback());
    }
}
