//! Renderer session state machine
//!
//! ```text
//!   Stopped --start()--> Starting --Ready--> Running --finish()--> Stopping
//!      ^                                                              |
//!      +--------------------------Exited(0)---------------------------+
//! ```
//!
//! `start` and `finish` are driven by the poll loop; `Ready` and `Exited`
//! arrive from the process layer and are applied by [`RendererSession::poll_events`]
//! at the start of each tick. A non-zero exit and a failed launch are fatal.

use std::io;
use std::path::{Path, PathBuf};

use crossbeam_channel::{Receiver, Sender};
use tracing::{debug, info, warn};

use super::{Invocation, Launcher, RendererEvent, RendererInput, RendererState};
use crate::error::{Error, Result};

/// Owns the renderer process for the current job
pub struct RendererSession<L> {
    launcher: L,
    state: RendererState,
    input: Option<RendererInput>,
    /// Invocation of the current or most recent job
    current: Option<Invocation>,
    pid: Option<u32>,
    events_tx: Sender<RendererEvent>,
    events_rx: Receiver<RendererEvent>,
}

impl<L: Launcher> RendererSession<L> {
    /// Create a session with no renderer running
    pub fn new(launcher: L) -> Self {
        let (events_tx, events_rx) = crossbeam_channel::unbounded();
        Self {
            launcher,
            state: RendererState::Stopped,
            input: None,
            current: None,
            pid: None,
            events_tx,
            events_rx,
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> RendererState {
        self.state
    }

    /// Process id of the live renderer, once it is running
    pub fn pid(&self) -> Option<u32> {
        self.pid
    }

    /// Document path of the current or most recent job
    pub fn output(&self) -> Option<&Path> {
        self.current.as_ref().map(|inv| inv.output.as_path())
    }

    /// Get a reference to the launcher
    pub fn launcher(&self) -> &L {
        &self.launcher
    }

    /// Launch a renderer for a new job
    ///
    /// Only valid while stopped; a second live renderer is never started.
    pub fn start(&mut self, invocation: Invocation) {
        if self.state != RendererState::Stopped {
            warn!(state = ?self.state, "renderer start requested while not stopped");
            return;
        }
        debug!(program = %invocation.program.display(), args = ?invocation.args(), "launching renderer");
        self.state = RendererState::Starting;
        self.launcher.launch(&invocation, self.events_tx.clone());
        self.current = Some(invocation);
    }

    /// Apply pending lifecycle events without blocking
    pub fn poll_events(&mut self) -> Result<()> {
        while let Ok(event) = self.events_rx.try_recv() {
            self.apply(event)?;
        }
        Ok(())
    }

    fn apply(&mut self, event: RendererEvent) -> Result<()> {
        match event {
            RendererEvent::Ready { pid, input } => {
                if self.state != RendererState::Starting {
                    warn!(pid, state = ?self.state, "unexpected renderer ready notification");
                    return Ok(());
                }
                info!(pid, "renderer running");
                self.pid = Some(pid);
                self.input = Some(input);
                self.state = RendererState::Running;
            }
            RendererEvent::SpawnFailed(source) => {
                self.state = RendererState::Stopped;
                return Err(Error::Spawn {
                    program: self.program(),
                    source,
                });
            }
            RendererEvent::Exited(exit) => {
                let previous = self.state;
                self.input = None;
                self.pid = None;
                self.state = RendererState::Stopped;
                info!(code = exit.code, "renderer terminated");
                if !exit.success() {
                    return Err(Error::RendererFailed { code: exit.code });
                }
                if previous == RendererState::Running {
                    warn!("renderer exited before the end of the job");
                }
            }
        }
        Ok(())
    }

    fn program(&self) -> PathBuf {
        self.current
            .as_ref()
            .map(|inv| inv.program.clone())
            .unwrap_or_default()
    }

    /// Queue decoded text for the running renderer
    ///
    /// Never blocks. `WouldBlock` means the renderer is behind and the text
    /// should be offered again later.
    pub fn write(&mut self, text: &[u8]) -> io::Result<()> {
        match (self.state, self.input.as_ref()) {
            (RendererState::Running, Some(input)) => input.try_write(text),
            _ => Err(io::Error::new(
                io::ErrorKind::NotConnected,
                "renderer is not accepting input",
            )),
        }
    }

    /// Close the renderer's input to end the job
    ///
    /// Text already queued is still delivered before the pipe closes.
    pub fn finish(&mut self) {
        self.input = None;
        if self.state == RendererState::Running {
            self.state = RendererState::Stopping;
        }
    }
}
