//! Renderer process management
//!
//! Spawns the renderer with a piped stdin and inherited stdout/stderr. The
//! launch and the wait for exit both run on a watcher thread, so the poll
//! loop never blocks on the process layer.

use std::io;
use std::os::unix::process::CommandExt;
use std::process::{Command, Stdio};
use std::thread;

use crossbeam_channel::Sender;
use nix::unistd::setsid;
use tracing::{debug, warn};

use super::{Invocation, Launcher, RendererEvent, RendererExit, RendererInput};

/// Launches renderers as detached operating system processes
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessLauncher;

impl ProcessLauncher {
    /// Create a launcher
    pub fn new() -> Self {
        Self
    }

    fn command(invocation: &Invocation) -> Command {
        let mut command = Command::new(&invocation.program);
        command
            .args(invocation.args())
            .stdin(Stdio::piped())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        // Own session: terminal signals aimed at the spooler must not take
        // a renderer down in the middle of a document.
        // SAFETY: the closure runs between fork and exec and only calls
        // setsid, which is async-signal-safe and allocates nothing.
        unsafe {
            command.pre_exec(|| setsid().map(drop).map_err(io::Error::from));
        }
        command
    }
}

impl Launcher for ProcessLauncher {
    fn launch(&mut self, invocation: &Invocation, events: Sender<RendererEvent>) {
        let command = Self::command(invocation);
        let fallback = events.clone();

        let spawned = thread::Builder::new()
            .name("renderer-watch".to_string())
            .spawn(move || watch(command, events));

        if let Err(err) = spawned {
            let _ = fallback.send(RendererEvent::SpawnFailed(err));
        }
    }
}

/// Launch the process, report readiness, then report its exit
fn watch(mut command: Command, events: Sender<RendererEvent>) {
    let mut child = match command.spawn() {
        Ok(child) => child,
        Err(err) => {
            let _ = events.send(RendererEvent::SpawnFailed(err));
            return;
        }
    };

    let pid = child.id();
    let Some(stdin) = child.stdin.take() else {
        let _ = events.send(RendererEvent::SpawnFailed(io::Error::new(
            io::ErrorKind::BrokenPipe,
            "renderer stdin was not captured",
        )));
        return;
    };
    let input = match RendererInput::spawn(stdin) {
        Ok(input) => input,
        Err(err) => {
            // Without a writer the job cannot be fed; stop the orphan
            let _ = child.kill();
            let _ = child.wait();
            let _ = events.send(RendererEvent::SpawnFailed(err));
            return;
        }
    };
    debug!(pid, "renderer spawned");

    let ready = RendererEvent::Ready { pid, input };
    if events.send(ready).is_err() {
        // Session gone; dropping the event closes the renderer's stdin
        return;
    }

    let exit = match child.wait() {
        Ok(status) => RendererExit::from(status),
        Err(err) => {
            warn!(pid, error = %err, "failed to wait for renderer");
            RendererExit { code: 1 }
        }
    };
    let _ = events.send(RendererEvent::Exited(exit));
}
