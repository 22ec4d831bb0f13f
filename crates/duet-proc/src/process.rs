use std::process::Stdio;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::{Invocation, JobId};

/// Errors raised while starting a subprocess.
#[derive(Debug, thiserror::Error)]
pub enum ProcError {
    #[error("failed to spawn `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

/// Something that happened to a running job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessEvent {
    /// One stdout line, without its line terminator.
    Stdout(String),
    /// One stderr line, without its line terminator.
    Stderr(String),
    /// The process exited after all output was delivered.
    Closed { code: Option<i32> },
    /// Output could not be read or the exit status could not be collected.
    Errored(String),
}

impl ProcessEvent {
    /// `Closed` and `Errored` end a job; nothing follows them.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ProcessEvent::Closed { .. } | ProcessEvent::Errored(_))
    }
}

/// A [`ProcessEvent`] tagged with the job it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobEvent {
    pub job: JobId,
    pub event: ProcessEvent,
}

/// Starts subprocesses without waiting for them.
///
/// `spawn` returns as soon as the process is started (or failed to start).
/// Everything after that arrives later as [`JobEvent`]s for `job`: zero or
/// more output lines, then exactly one terminal event.
pub trait Spawner {
    fn spawn(&mut self, job: JobId, invocation: &Invocation) -> Result<(), ProcError>;
}

#[derive(Clone, Copy)]
enum Stream {
    Stdout,
    Stderr,
}

/// [`Spawner`] backed by `tokio::process`. Must be used inside a tokio runtime.
pub struct TokioSpawner {
    events: mpsc::UnboundedSender<JobEvent>,
}

impl TokioSpawner {
    pub fn new(events: mpsc::UnboundedSender<JobEvent>) -> Self {
        Self { events }
    }

    /// A spawner plus the receiving end its events are delivered to.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<JobEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }
}

impl Spawner for TokioSpawner {
    fn spawn(&mut self, job: JobId, invocation: &Invocation) -> Result<(), ProcError> {
        let mut child = Command::new(&invocation.program)
            .args(&invocation.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| ProcError::Spawn {
                program: invocation.program.clone(),
                source,
            })?;

        log::debug!("job {job}: spawned `{invocation}` (pid {:?})", child.id());

        let tx = self.events.clone();
        let stdout = child
            .stdout
            .take()
            .map(|out| tokio::spawn(pump_lines(job, out, Stream::Stdout, tx.clone())));
        let stderr = child
            .stderr
            .take()
            .map(|err| tokio::spawn(pump_lines(job, err, Stream::Stderr, tx.clone())));

        tokio::spawn(supervise(job, child, [stdout, stderr], tx));
        Ok(())
    }
}

/// Wait for both output pumps to drain, then for the exit status, and send
/// the single terminal event.
async fn supervise(
    job: JobId,
    mut child: Child,
    pumps: [Option<JoinHandle<std::io::Result<()>>>; 2],
    tx: mpsc::UnboundedSender<JobEvent>,
) {
    let mut failure: Option<String> = None;
    for pump in pumps.into_iter().flatten() {
        let outcome = match pump.await {
            Ok(Ok(())) => None,
            Ok(Err(e)) => Some(format!("failed to read output: {e}")),
            Err(e) => Some(format!("output reader stopped: {e}")),
        };
        if failure.is_none() {
            failure = outcome;
        }
    }

    let event = match (child.wait().await, failure) {
        (Ok(status), None) => {
            log::debug!("job {job}: exited with {status}");
            ProcessEvent::Closed {
                code: status.code(),
            }
        }
        (Ok(_), Some(message)) => ProcessEvent::Errored(message),
        (Err(e), _) => ProcessEvent::Errored(format!("failed to wait for process: {e}")),
    };

    let _ = tx.send(JobEvent { job, event });
}

/// Forward `reader` line by line. Invalid UTF-8 is replaced, not rejected.
async fn pump_lines<R>(
    job: JobId,
    reader: R,
    stream: Stream,
    tx: mpsc::UnboundedSender<JobEvent>,
) -> std::io::Result<()>
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            return Ok(());
        }

        let line = String::from_utf8_lossy(&buf)
            .trim_end_matches(|c: char| c == '\n' || c == '\r')
            .to_string();
        let event = match stream {
            Stream::Stdout => ProcessEvent::Stdout(line),
            Stream::Stderr => ProcessEvent::Stderr(line),
        };

        // Receiver gone means the session loop shut down; stop reading.
        if tx.send(JobEvent { job, event }).is_err() {
            return Ok(());
        }
    }
}
