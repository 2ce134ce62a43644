//! Launching the external simulation engine.
//!
//! The engine is a black box: it reads one request on stdin, writes its
//! trajectory artifact into its working directory and reports success
//! through its exit status. Everything here is about getting the request in
//! and the status, stdout and stderr back out.

use std::io::{BufRead, BufReader, ErrorKind, Read, Write};
use std::path::PathBuf;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::config::EngineConfig;
use crate::error::{LaunchError, LaunchResult};
use crate::request::EngineRequest;

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Origin stream for captured engine output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LogStream {
    Stdout,
    Stderr,
}

impl LogStream {
    fn as_str(self) -> &'static str {
        match self {
            LogStream::Stdout => "stdout",
            LogStream::Stderr => "stderr",
        }
    }
}

/// Everything one engine process reported back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineResult {
    /// Process exit code; `-1` when the process was terminated by a signal.
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl EngineResult {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Turn a nonzero exit into [`LaunchError::EngineFailed`], forwarding stderr verbatim.
    pub fn into_success(self) -> LaunchResult<Self> {
        if self.success() {
            Ok(self)
        } else {
            Err(LaunchError::EngineFailed {
                exit_code: self.exit_code,
                stderr: self.stderr,
            })
        }
    }
}

/// Something that can execute a simulation request.
///
/// Implementations report the raw process outcome; a nonzero exit is not
/// an `Err` at this level.
pub trait SimulationBackend {
    fn run(&self, request: &EngineRequest) -> LaunchResult<EngineResult>;
}

/// Shared flag that aborts an in-flight engine run.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle(Arc<AtomicBool>);

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Find the engine executable: the first search path naming an existing file.
pub fn resolve_engine(config: &EngineConfig) -> LaunchResult<PathBuf> {
    let searched = config.search_paths();
    for candidate in &searched {
        if candidate.is_file() {
            // The child may run in another directory, so hand it an absolute path.
            return candidate
                .canonicalize()
                .map_err(|err| LaunchError::execution(format!("{}: {err}", candidate.display())));
        }
    }
    Err(LaunchError::EngineNotFound { searched })
}

/// Run `request` through the executable at `executable_path`.
///
/// Fails with [`LaunchError::EngineNotFound`] when the file does not exist
/// and with [`LaunchError::EngineFailed`] when the engine exits nonzero.
pub fn invoke(request: &EngineRequest, executable_path: impl Into<PathBuf>) -> LaunchResult<EngineResult> {
    ProcessBackend::new(EngineConfig::new(executable_path))?
        .run(request)?
        .into_success()
}

/// Backend that spawns the real engine binary once per request.
#[derive(Debug, Clone)]
pub struct ProcessBackend {
    binary: PathBuf,
    config: EngineConfig,
    cancel: Option<CancelHandle>,
}

impl ProcessBackend {
    /// Resolve the engine binary described by `config`.
    pub fn new(config: EngineConfig) -> LaunchResult<Self> {
        let binary = resolve_engine(&config)?;
        Ok(Self {
            binary,
            config,
            cancel: None,
        })
    }

    /// Allow the run to be aborted from another thread.
    pub fn with_cancel_handle(mut self, cancel: CancelHandle) -> Self {
        self.cancel = Some(cancel);
        self
    }
}

impl SimulationBackend for ProcessBackend {
    fn run(&self, request: &EngineRequest) -> LaunchResult<EngineResult> {
        let mut cmd = Command::new(&self.binary);
        if let Some(dir) = &self.config.working_directory {
            cmd.current_dir(dir);
        }
        cmd.envs(&self.config.env);
        cmd.stdin(Stdio::piped());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        debug!(binary = %self.binary.display(), "spawning engine");
        let child = cmd
            .spawn()
            .map_err(|err| LaunchError::execution(format!("{}: {err}", self.binary.display())))?;
        let mut process = EngineProcess::new(child);

        let stdout = process
            .child
            .stdout
            .take()
            .ok_or_else(|| LaunchError::execution("failed to capture stdout"))?;
        let stderr = process
            .child
            .stderr
            .take()
            .ok_or_else(|| LaunchError::execution("failed to capture stderr"))?;
        let stdout_reader = spawn_stream_reader(stdout, LogStream::Stdout);
        let stderr_reader = spawn_stream_reader(stderr, LogStream::Stderr);

        process.send_request(request)?;

        let status = if self.config.run_timeout.is_some() || self.cancel.is_some() {
            process.wait_bounded(self.config.run_timeout, self.cancel.as_ref())?
        } else {
            process.wait()?
        };

        Ok(EngineResult {
            exit_code: status.code().unwrap_or(-1),
            stdout: join_reader(stdout_reader, LogStream::Stdout),
            stderr: join_reader(stderr_reader, LogStream::Stderr),
        })
    }
}

/// Owned child process that is always reaped, killing it first if needed.
struct EngineProcess {
    child: Child,
    reaped: bool,
}

impl EngineProcess {
    fn new(child: Child) -> Self {
        Self {
            child,
            reaped: false,
        }
    }

    /// Deliver the whole request, then close stdin to signal end of input.
    fn send_request(&mut self, request: &EngineRequest) -> LaunchResult<()> {
        let mut stdin = self
            .child
            .stdin
            .take()
            .ok_or_else(|| LaunchError::execution("failed to capture stdin"))?;
        let written = stdin.write_all(request.as_bytes()).and_then(|()| stdin.flush());
        drop(stdin);

        match written {
            Ok(()) => Ok(()),
            // Engine exited before reading everything; its exit status tells the story.
            Err(err) if err.kind() == ErrorKind::BrokenPipe => {
                warn!("engine closed stdin before the request was fully written");
                Ok(())
            }
            Err(err) => Err(LaunchError::execution(format!("writing request: {err}"))),
        }
    }

    fn wait(&mut self) -> LaunchResult<ExitStatus> {
        let status = self
            .child
            .wait()
            .map_err(|err| LaunchError::execution(format!("waiting for engine: {err}")))?;
        self.reaped = true;
        Ok(status)
    }

    fn wait_bounded(
        &mut self,
        timeout: Option<Duration>,
        cancel: Option<&CancelHandle>,
    ) -> LaunchResult<ExitStatus> {
        let start = Instant::now();
        loop {
            let polled = self
                .child
                .try_wait()
                .map_err(|err| LaunchError::execution(format!("waiting for engine: {err}")))?;
            if let Some(status) = polled {
                self.reaped = true;
                return Ok(status);
            }

            if cancel.is_some_and(CancelHandle::is_cancelled) {
                warn!("engine run cancelled, terminating process");
                self.terminate();
                return Err(LaunchError::Cancelled);
            }
            if let Some(limit) = timeout {
                if start.elapsed() >= limit {
                    warn!(?limit, "engine exceeded its run timeout, terminating process");
                    self.terminate();
                    return Err(LaunchError::TimedOut(limit));
                }
            }

            thread::sleep(POLL_INTERVAL);
        }
    }

    fn terminate(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
        self.reaped = true;
    }
}

impl Drop for EngineProcess {
    fn drop(&mut self) {
        if !self.reaped {
            self.terminate();
        }
    }
}

fn spawn_stream_reader<R: Read + Send + 'static>(
    reader: R,
    stream: LogStream,
) -> thread::JoinHandle<String> {
    thread::spawn(move || {
        let mut buf_reader = BufReader::new(reader);
        let mut captured = String::new();
        let mut line = Vec::new();
        loop {
            line.clear();
            match buf_reader.read_until(b'\n', &mut line) {
                Ok(0) => break,
                Ok(_) => {
                    let text = String::from_utf8_lossy(&line);
                    debug!(stream = stream.as_str(), "engine: {}", text.trim_end());
                    captured.push_str(&text);
                }
                Err(err) => {
                    warn!(stream = stream.as_str(), %err, "failed reading engine output");
                    break;
                }
            }
        }
        captured
    })
}

fn join_reader(handle: thread::JoinHandle<String>, stream: LogStream) -> String {
    match handle.join() {
        Ok(captured) => captured,
        Err(_) => {
            warn!(stream = stream.as_str(), "engine output reader panicked; output lost");
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panicked_reader_yields_empty_output() {
        let handle = thread::spawn(|| -> String { panic!("reader failed") });
        assert_eq!(join_reader(handle, LogStream::Stderr), "");
    }

    #[test]
    fn finished_reader_yields_captured_output() {
        let handle = thread::spawn(|| String::from("Start: 2.00, 1.00\n"));
        assert_eq!(join_reader(handle, LogStream::Stdout), "Start: 2.00, 1.00\n");
    }
}
