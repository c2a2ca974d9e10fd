//! Running Vivado (or any batch tool) with its output streamed to the log.

use std::ffi::OsString;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::error::DriverError;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Log target for lines echoed from the tool.
const TOOL_TARGET: &str = "vivado";

/// How a tool run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolOutcome {
    /// Exited with status zero.
    Success,
    /// Exited with a non-zero status, or was terminated by a signal (`None`).
    Failed(Option<i32>),
    /// Still running when the timeout elapsed; it was killed.
    TimedOut(Duration),
}

impl ToolOutcome {
    fn from_status(status: ExitStatus) -> Self {
        if status.success() {
            ToolOutcome::Success
        } else {
            ToolOutcome::Failed(status.code())
        }
    }
}

/// A command line for an external tool.
#[derive(Debug, Clone)]
pub struct ToolCommand {
    program: PathBuf,
    args: Vec<OsString>,
    timeout: Option<Duration>,
}

impl ToolCommand {
    /// Creates a command with no arguments.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            timeout: None,
        }
    }

    /// `vivado -mode batch -source <script>`.
    pub fn vivado(executable: &Path, script: &Path) -> Self {
        Self::new(executable)
            .arg("-mode")
            .arg("batch")
            .arg("-source")
            .arg(script)
    }

    /// Appends an argument.
    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Kills the tool when it has not exited after `timeout`.
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Runs the tool to completion, logging each output line as it arrives.
    ///
    /// Stdout and stderr are drained on separate threads so neither pipe can
    /// fill up and stall the tool.
    pub fn run(&self) -> Result<ToolOutcome, DriverError> {
        let program = self.program.display().to_string();
        log::info!("running {program} {}", self.display_args());

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| DriverError::Launch {
                program: program.clone(),
                source,
            })?;

        let mut readers = Vec::with_capacity(2);
        if let Some(stdout) = child.stdout.take() {
            readers.push(drain(stdout));
        }
        if let Some(stderr) = child.stderr.take() {
            readers.push(drain(stderr));
        }

        let started = Instant::now();
        loop {
            let status = child.try_wait().map_err(|source| DriverError::Launch {
                program: program.clone(),
                source,
            })?;
            if let Some(status) = status {
                for reader in readers {
                    let _ = reader.join();
                }
                return Ok(ToolOutcome::from_status(status));
            }
            if let Some(limit) = self.timeout {
                let elapsed = started.elapsed();
                if elapsed >= limit {
                    log::error!(
                        "{program} still running after {}s, assuming it hung; killing it",
                        elapsed.as_secs()
                    );
                    if let Err(e) = child.kill() {
                        log::warn!("failed to kill {program}: {e}");
                    }
                    let _ = child.wait();
                    // Readers are left detached: grandchildren may still hold the pipes.
                    return Ok(ToolOutcome::TimedOut(elapsed));
                }
            }
            thread::sleep(POLL_INTERVAL);
        }
    }

    fn display_args(&self) -> String {
        self.args
            .iter()
            .map(|a| a.to_string_lossy())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Forwards every line of a pipe to the log until it closes.
fn drain<R: Read + Send + 'static>(pipe: R) -> JoinHandle<()> {
    thread::spawn(move || {
        for line in BufReader::new(pipe).lines().map_while(Result::ok) {
            log::log!(target: TOOL_TARGET, line_level(&line), "{line}");
        }
    })
}

/// The log level for one line of tool output.
pub fn line_level(line: &str) -> log::Level {
    let line = line.trim_start();
    if line.starts_with("ERROR") {
        log::Level::Error
    } else if line.starts_with("CRITICAL WARNING") || line.starts_with("WARNING") {
        log::Level::Warn
    } else {
        log::Level::Info
    }
}
