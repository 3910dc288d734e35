//! Build tool process execution.
//!
//! Runs one executable to completion with an explicit working directory and a
//! complete environment, capturing stdout and stderr as a single interleaved
//! stream. A single invocation is definitive: nothing is retried.

use std::future::Future;
use std::io::{self, PipeReader, Read};
use std::process::Stdio;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::process::Command;
use tokio::task::{JoinError, JoinHandle};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::execute::types::{CommandOutput, InvokeError, InvokeRequest};

/// How long to wait for the output pipe to drain after a timed-out child was killed.
const OUTPUT_GRACE: Duration = Duration::from_secs(2);

/// Runs build tool invocations.
///
/// The lifecycle is generic over this so tests can record invocations or
/// script failures without spawning processes.
pub trait CommandInvoker {
  fn run(&self, request: &InvokeRequest) -> impl Future<Output = Result<CommandOutput, InvokeError>> + Send;
}

/// Invoker backed by real OS processes.
///
/// On unix the child leads its own process group. A timeout kills the whole
/// group, so grandchildren (the real build tool behind the proxy, or anything
/// it left running in the background) go down with it.
#[derive(Debug, Clone, Default)]
pub struct ProcessInvoker {
  timeout: Option<Duration>,
}

impl ProcessInvoker {
  /// Invoker without a deadline: a hung child blocks until it exits.
  pub fn new() -> Self {
    Self::default()
  }

  /// Fail with [`InvokeError::TimedOut`] once `timeout` elapses, killing the
  /// child's process group.
  ///
  /// The deadline covers both the child's exit and draining its output.
  pub fn with_timeout(mut self, timeout: Duration) -> Self {
    self.timeout = Some(timeout);
    self
  }
}

type Collected = Arc<Mutex<Vec<u8>>>;

impl CommandInvoker for ProcessInvoker {
  async fn run(&self, request: &InvokeRequest) -> Result<CommandOutput, InvokeError> {
    let program = request.program.display().to_string();
    info!(
      command = %request.command_line(),
      working_dir = %request.working_dir.display(),
      "running build tool"
    );
    debug!(env_count = request.env.len(), timeout = ?self.timeout, "build tool invocation");

    let (reader, writer) = io::pipe()?;
    let stderr_writer = writer.try_clone()?;

    let mut command = Command::new(&request.program);
    command
      .args(&request.args)
      .current_dir(&request.working_dir)
      .env_clear()
      .envs(&request.env)
      .stdin(Stdio::null())
      .stdout(writer)
      .stderr(stderr_writer)
      .kill_on_drop(true);
    #[cfg(unix)]
    command.process_group(0);

    let deadline = self.timeout.map(|limit| (limit, Instant::now() + limit));

    let spawned = command.spawn();
    // Close the parent's write ends, otherwise the reader never sees EOF.
    drop(command);
    let mut child = spawned.map_err(|source| InvokeError::Spawn {
      program: program.clone(),
      source,
    })?;
    let pid = child.id();

    let collected: Collected = Arc::default();
    let sink = Arc::clone(&collected);
    let mut collector = tokio::task::spawn_blocking(move || drain(reader, &sink));

    let status = match deadline {
      None => child.wait().await?,
      Some((limit, at)) => match tokio::time::timeout_at(at, child.wait()).await {
        Ok(status) => status?,
        Err(_) => {
          warn!(program = %program, timeout = ?limit, "build tool timed out, killing it");
          kill_process_group(pid);
          child.kill().await?;
          return Err(expired(program, limit, collector, &collected).await);
        }
      },
    };

    match deadline {
      None => join_output(collector.await)?,
      Some((limit, at)) => match tokio::time::timeout_at(at, &mut collector).await {
        Ok(joined) => join_output(joined)?,
        Err(_) => {
          warn!(program = %program, timeout = ?limit, "build tool exited but its output stayed open, killing leftovers");
          kill_process_group(pid);
          return Err(expired(program, limit, collector, &collected).await);
        }
      },
    }
    let combined = take(&collected);

    if !status.success() {
      if !combined.is_empty() {
        debug!(output = %String::from_utf8_lossy(&combined), "build tool output");
      }
      return Err(InvokeError::Failed {
        program,
        status,
        output: combined,
      });
    }

    debug!(program = %program, output_len = combined.len(), "build tool finished");
    Ok(CommandOutput { combined })
  }
}

/// Read the merged output pipe to EOF, appending to `sink` as it arrives so a
/// timed-out run still reports what was printed.
fn drain(mut reader: PipeReader, sink: &Mutex<Vec<u8>>) -> io::Result<()> {
  let mut chunk = [0u8; 8192];
  loop {
    match reader.read(&mut chunk) {
      Ok(0) => return Ok(()),
      Ok(n) => sink
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .extend_from_slice(&chunk[..n]),
      Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
      Err(e) => return Err(e),
    }
  }
}

fn take(collected: &Collected) -> Vec<u8> {
  std::mem::take(&mut *collected.lock().unwrap_or_else(PoisonError::into_inner))
}

fn join_output(joined: Result<io::Result<()>, JoinError>) -> Result<(), InvokeError> {
  let read = joined.map_err(io::Error::other)?;
  Ok(read?)
}

/// Give the killed group a moment to release the pipe, then report the timeout
/// with whatever output was captured.
async fn expired(
  program: String,
  timeout: Duration,
  collector: JoinHandle<io::Result<()>>,
  collected: &Collected,
) -> InvokeError {
  if tokio::time::timeout(OUTPUT_GRACE, collector).await.is_err() {
    debug!(program = %program, "output pipe still open after kill");
  }
  InvokeError::TimedOut {
    program,
    timeout,
    output: take(collected),
  }
}

/// SIGKILL every process in the group led by `pid`.
#[cfg(unix)]
fn kill_process_group(pid: Option<u32>) {
  use rustix::process::{Pid, Signal};

  let Some(pgid) = pid.and_then(|pid| i32::try_from(pid).ok()).and_then(Pid::from_raw) else {
    return;
  };
  if let Err(e) = rustix::process::kill_process_group(pgid, Signal::KILL) {
    // ESRCH: every member already exited.
    debug!(pgid = ?pgid, error = %e, "could not kill process group");
  }
}

#[cfg(not(unix))]
fn kill_process_group(_pid: Option<u32>) {}
