//! Lifecycle of the single supervised child process.
//!
//! A [`Supervisor`] is either idle or running one child. Starting spawns the
//! executable with all three standard streams piped, one reader task per
//! output stream and one writer task for stdin. The first end-of-stream on
//! either output stream counts as the process ending.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use log::{debug, error, info, warn};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, Command};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

use crate::events::{OutputStream, ProcessEvent, Subscribers};

#[cfg(windows)]
const CREATE_NO_WINDOW: u32 = 0x0800_0000;

/// Handle to the supervised process. Clones share the same child.
#[derive(Clone)]
pub struct Supervisor {
    shared: Arc<Shared>,
}

struct Shared {
    state: Mutex<State>,
    events: Subscribers<ProcessEvent>,
}

#[derive(Default)]
struct State {
    executable_path: Option<PathBuf>,
    running: Option<Running>,
}

struct Running {
    child: Child,
    stdin: UnboundedSender<String>,
    readers: Vec<JoinHandle<()>>,
    writer: JoinHandle<()>,
    /// Set by whoever reports the end of this run first.
    ended: Arc<AtomicBool>,
}

impl Running {
    fn is_alive(&mut self) -> bool {
        matches!(self.child.try_wait(), Ok(None))
    }

    fn abort_readers(&self) {
        for reader in &self.readers {
            reader.abort();
        }
    }

    /// Kills the child if still alive. Output of a child that already exited
    /// is left for the readers to drain.
    async fn terminate(&mut self) {
        self.writer.abort();

        if self.is_alive() {
            self.abort_readers();
            if let Err(e) = self.child.start_kill() {
                warn!("Failed to signal process {:?}: {}", self.child.id(), e);
            }
        }

        match self.child.wait().await {
            Ok(status) => info!("Process terminated with {}", status),
            Err(e) => warn!("Failed waiting for killed process: {}", e),
        }
    }
}

impl State {
    fn is_running(&mut self) -> bool {
        self.running.as_mut().is_some_and(Running::is_alive)
    }
}

impl Shared {
    fn lock_state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn end_of_stream(&self, stream: OutputStream, ended: &Arc<AtomicBool>) {
        if ended.swap(true, Ordering::SeqCst) {
            debug!("{:?} closed after the process was already reported ended", stream);
            return;
        }

        info!("{:?} reached end of stream, treating the process as ended", stream);

        let detached = {
            let mut state = self.lock_state();
            let same_run = state
                .running
                .as_ref()
                .is_some_and(|running| Arc::ptr_eq(&running.ended, ended));
            if same_run {
                state.running.take()
            } else {
                None
            }
        };

        if let Some(running) = detached {
            tokio::spawn(reap(running));
        }

        self.events.publish(ProcessEvent::Ended);
    }
}

/// Waits for a child whose output has closed so it does not linger as a zombie.
async fn reap(mut running: Running) {
    drop(running.stdin);
    match running.child.wait().await {
        Ok(status) => info!("Process exited with {}", status),
        Err(e) => warn!("Failed waiting for process exit: {}", e),
    }
}

impl Supervisor {
    #[must_use]
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(State::default()),
                events: Subscribers::new(),
            }),
        }
    }

    pub fn subscribe(&self) -> UnboundedReceiver<ProcessEvent> {
        self.shared.events.subscribe()
    }

    /// Stores the executable used by the next [`Supervisor::start`].
    ///
    /// Ignored while a process is running, or when `path` is not an
    /// existing file.
    pub fn set_executable_path(&self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        let mut state = self.shared.lock_state();

        if state.is_running() {
            debug!("Ignoring executable path `{}` while running", path.display());
            return;
        }

        if !path.is_file() {
            debug!("Ignoring executable path `{}`: no such file", path.display());
            return;
        }

        state.executable_path = Some(path.to_path_buf());
    }

    /// Spawns the configured executable. Must be called within a Tokio runtime.
    ///
    /// Does nothing if a process is already running or no valid path is set.
    /// A failed spawn is reported as [`ProcessEvent::Ended`].
    pub fn start(&self) {
        let mut state = self.shared.lock_state();

        if state.is_running() {
            debug!("Start ignored: process already running");
            return;
        }

        let Some(path) = state.executable_path.clone().filter(|path| path.is_file()) else {
            debug!("Start ignored: no executable path set");
            return;
        };

        // The previous child exited but its output has not closed yet.
        if let Some(exited) = state.running.take() {
            debug!("Retiring exited process {:?} before starting", exited.child.id());
            exited.abort_readers();
            if !exited.ended.swap(true, Ordering::SeqCst) {
                self.shared.events.publish(ProcessEvent::Ended);
            }
            tokio::spawn(reap(exited));
        }

        let mut command = Command::new(&path);
        command
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        #[cfg(windows)]
        command.creation_flags(CREATE_NO_WINDOW);

        let mut child = match command.spawn() {
            Ok(child) => child,
            Err(e) => {
                error!("Failed to start `{}`: {}", path.display(), e);
                drop(state);
                self.shared.events.publish(ProcessEvent::Ended);
                return;
            }
        };

        info!("Started `{}` (pid={:?})", path.display(), child.id());
        // Published before the readers exist so no output can precede it.
        self.shared.events.publish(ProcessEvent::Started);

        let ended = Arc::new(AtomicBool::new(false));
        let weak = Arc::downgrade(&self.shared);
        let mut readers = Vec::with_capacity(2);
        if let Some(stdout) = child.stdout.take() {
            readers.push(spawn_reader(weak.clone(), stdout, OutputStream::Stdout, ended.clone()));
        }
        if let Some(stderr) = child.stderr.take() {
            readers.push(spawn_reader(weak, stderr, OutputStream::Stderr, ended.clone()));
        }

        let (stdin, lines) = mpsc::unbounded_channel();
        let writer = match child.stdin.take() {
            Some(child_stdin) => spawn_writer(child_stdin, lines),
            None => tokio::spawn(async {}),
        };

        state.running = Some(Running {
            child,
            stdin,
            readers,
            writer,
            ended,
        });
    }

    /// Forcibly terminates the running process and waits until it has exited.
    ///
    /// Safe to call repeatedly; does nothing once idle.
    pub async fn kill(&self) {
        let (was_running, mut running) = {
            let mut state = self.shared.lock_state();
            let was_running = state.is_running();
            let Some(running) = state.running.take() else {
                debug!("Kill ignored: no process");
                return;
            };
            (was_running, running)
        };

        self.shared
            .events
            .publish(ProcessEvent::Updating { running: was_running });

        running.terminate().await;

        self.shared
            .events
            .publish(ProcessEvent::Updating { running: false });

        if !running.ended.swap(true, Ordering::SeqCst) {
            self.shared.events.publish(ProcessEvent::Ended);
        }
    }

    /// Kills the process when running, otherwise starts `path`.
    pub async fn switch(&self, path: impl AsRef<Path>) {
        if self.is_running() {
            self.kill().await;
        } else {
            self.set_executable_path(path);
            self.start();
        }
    }

    /// Writes `line` and a newline to the process's stdin. Ignored while idle.
    pub fn execute(&self, line: &str) {
        let mut state = self.shared.lock_state();
        let Some(running) = state.running.as_mut() else {
            debug!("Dropping input `{}`: no process", line);
            return;
        };

        if !running.is_alive() {
            debug!("Dropping input `{}`: process has exited", line);
            return;
        }

        if running.stdin.send(format!("{line}\n")).is_err() {
            warn!("Stdin of the process is closed, dropping `{}`", line);
        }
    }

    pub fn is_running(&self) -> bool {
        self.shared.lock_state().is_running()
    }

    pub fn executable_path(&self) -> Option<PathBuf> {
        self.shared.lock_state().executable_path.clone()
    }

    /// The executable's file name without extension.
    pub fn process_name(&self) -> Option<String> {
        self.shared
            .lock_state()
            .executable_path
            .as_deref()
            .and_then(Path::file_stem)
            .map(|stem| stem.to_string_lossy().into_owned())
    }

    pub fn id(&self) -> Option<u32> {
        self.shared
            .lock_state()
            .running
            .as_ref()
            .and_then(|running| running.child.id())
    }
}

impl Default for Supervisor {
    fn default() -> Self {
        Self::new()
    }
}

fn spawn_reader<R>(
    shared: Weak<Shared>,
    reader: R,
    stream: OutputStream,
    ended: Arc<AtomicBool>,
) -> JoinHandle<()>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut reader = BufReader::new(reader);
        let mut buffer = Vec::new();

        loop {
            buffer.clear();
            match reader.read_until(b'\n', &mut buffer).await {
                Ok(0) => break,
                Ok(_) => {
                    let Some(shared) = shared.upgrade() else {
                        return;
                    };
                    shared.events.publish(ProcessEvent::Output {
                        stream,
                        line: decode_line(&buffer),
                    });
                }
                Err(e) => {
                    warn!("Failed reading {:?}: {}", stream, e);
                    break;
                }
            }
        }

        if let Some(shared) = shared.upgrade() {
            shared.end_of_stream(stream, &ended);
        }
    })
}

fn spawn_writer(mut stdin: ChildStdin, mut lines: UnboundedReceiver<String>) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(line) = lines.recv().await {
            let written = match stdin.write_all(line.as_bytes()).await {
                Ok(()) => stdin.flush().await,
                Err(e) => Err(e),
            };
            if let Err(e) = written {
                warn!("Failed writing to process stdin: {}", e);
                break;
            }
        }
    })
}

fn decode_line(raw: &[u8]) -> String {
    let raw = raw.strip_suffix(b"\n").unwrap_or(raw);
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    String::from_utf8_lossy(raw).into_owned()
}
