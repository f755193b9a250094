use std::{
    path::PathBuf,
    process::{Command, Stdio},
};

use tracing::debug;

use crate::error::{ShortreelError, ShortreelResult};

/// Capability for invoking an external worker and collecting its output.
///
/// Stages depend on this trait rather than on [`ProcessExecutor`] directly so
/// tests can substitute scripted outputs and failures without spawning real
/// processes.
pub trait WorkerExecutor {
    /// Run the named worker with the given positional arguments and return
    /// its trimmed standard output. Blocks until the worker terminates; no
    /// timeout is imposed.
    fn execute(&self, worker: &str, args: &[String]) -> ShortreelResult<String>;
}

impl<E: WorkerExecutor + ?Sized> WorkerExecutor for &E {
    fn execute(&self, worker: &str, args: &[String]) -> ShortreelResult<String> {
        (**self).execute(worker, args)
    }
}

/// Production executor: runs `<worker>.py` from the worker home directory
/// through a configurable interpreter, with the working directory pinned to
/// that home so the workers' relative lookups (config, assets) resolve.
pub struct ProcessExecutor {
    worker_home: PathBuf,
    interpreter: String,
}

impl ProcessExecutor {
    pub fn new(worker_home: impl Into<PathBuf>) -> Self {
        Self {
            worker_home: worker_home.into(),
            interpreter: "python3".to_string(),
        }
    }

    pub fn with_interpreter(mut self, interpreter: impl Into<String>) -> Self {
        self.interpreter = interpreter.into();
        self
    }
}

impl WorkerExecutor for ProcessExecutor {
    fn execute(&self, worker: &str, args: &[String]) -> ShortreelResult<String> {
        let script = self.worker_home.join(format!("{worker}.py"));
        if !script.is_file() {
            return Err(ShortreelError::WorkerSpawn {
                worker: worker.to_string(),
                source: std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("worker script '{}' not found", script.display()),
                ),
            });
        }

        debug!(worker, ?args, "invoking worker");

        let output = Command::new(&self.interpreter)
            .arg(&script)
            .args(args)
            .current_dir(&self.worker_home)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|source| ShortreelError::WorkerSpawn {
                worker: worker.to_string(),
                source,
            })?;

        if !output.status.success() {
            return Err(ShortreelError::WorkerExit {
                worker: worker.to_string(),
                code: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // The tests drive the executor with `sh` instead of python so they only
    // depend on a POSIX shell.
    fn executor_with_worker(body: &str) -> (tempfile::TempDir, ProcessExecutor) {
        let home = tempfile::tempdir().unwrap();
        std::fs::write(home.path().join("fake.py"), body).unwrap();
        let exec = ProcessExecutor::new(home.path()).with_interpreter("sh");
        (home, exec)
    }

    #[test]
    fn successful_worker_resolves_with_trimmed_stdout() {
        let (_home, exec) = executor_with_worker("printf '  hello world \\n'\n");
        let out = exec.execute("fake", &[]).unwrap();
        assert_eq!(out, "hello world");
    }

    #[test]
    fn worker_sees_its_positional_arguments() {
        let (_home, exec) = executor_with_worker("echo \"$2\"\n");
        let out = exec
            .execute("fake", &["first".to_string(), "second".to_string()])
            .unwrap();
        assert_eq!(out, "second");
    }

    #[test]
    fn nonzero_exit_becomes_worker_exit_with_stderr() {
        let (_home, exec) = executor_with_worker("echo 'voice unavailable' >&2\nexit 3\n");
        let err = exec.execute("fake", &[]).unwrap_err();
        match err {
            ShortreelError::WorkerExit {
                worker,
                code,
                stderr,
            } => {
                assert_eq!(worker, "fake");
                assert_eq!(code, 3);
                assert_eq!(stderr, "voice unavailable");
            }
            other => panic!("expected WorkerExit, got {other:?}"),
        }
    }

    #[test]
    fn missing_worker_script_is_a_spawn_error() {
        let home = tempfile::tempdir().unwrap();
        let exec = ProcessExecutor::new(home.path()).with_interpreter("sh");
        let err = exec.execute("absent", &[]).unwrap_err();
        assert!(matches!(err, ShortreelError::WorkerSpawn { .. }));
    }

    #[test]
    fn missing_interpreter_is_a_spawn_error() {
        let (_home, exec0) = executor_with_worker("exit 0\n");
        let exec = ProcessExecutor::new(exec0.worker_home.clone())
            .with_interpreter("/definitely/not/an/interpreter");
        let err = exec.execute("fake", &[]).unwrap_err();
        assert!(matches!(err, ShortreelError::WorkerSpawn { .. }));
    }
}
