//! Spooler Engine
//!
//! Owns every piece of mutable spooler state (read cursor, partial line,
//! page counters, end-of-job counter and the renderer session) and
//! advances it one poll tick at a time:
//!
//! 1. Apply renderer lifecycle events that arrived since the last tick.
//! 2. Defer the tick while the renderer is starting or stopping.
//! 3. If the printer file grew and no renderer is running, start a job.
//! 4. Otherwise read one chunk, split it into lines, decode each line and
//!    write it to the renderer. A line the renderer cannot take rewinds the
//!    cursor to the start of that line so it is retried on a later tick.

use std::io;

use chrono::Local;
use tracing::{debug, info, warn};

use crate::decoder::PageState;
use crate::error::Result;
use crate::job::JobBoundaryTracker;
use crate::renderer::{Launcher, RendererCommand, RendererSession, RendererState};
use crate::stream::{Feed, LineAssembler, StreamCursor, LINE_TERMINATOR};

/// What a single tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// No unread bytes in the printer file
    Idle,
    /// Renderer is starting or stopping; nothing was read
    Deferred,
    /// The printer file could not be read; retried next tick
    Skipped,
    /// A renderer was launched for a new job
    JobStarted,
    /// A chunk was processed and the cursor moved by `advanced` bytes
    Progress { advanced: u64 },
}

/// Per-tick spooling pipeline
pub struct Engine<L> {
    cursor: StreamCursor,
    assembler: LineAssembler,
    page: PageState,
    jobs: JobBoundaryTracker,
    session: RendererSession<L>,
    command: RendererCommand,
    lines_per_page: u32,
}

impl<L: Launcher> Engine<L> {
    /// Create an engine reading from `cursor`
    pub fn new(
        cursor: StreamCursor,
        command: RendererCommand,
        lines_per_page: u32,
        launcher: L,
    ) -> Self {
        Self {
            cursor,
            assembler: LineAssembler::new(),
            page: PageState::new(),
            jobs: JobBoundaryTracker::new(),
            session: RendererSession::new(launcher),
            command,
            lines_per_page,
        }
    }

    /// Get a reference to the renderer session
    pub fn session(&self) -> &RendererSession<L> {
        &self.session
    }

    /// Get a reference to the read cursor
    pub fn cursor(&self) -> &StreamCursor {
        &self.cursor
    }

    /// Counters of the current job
    pub fn page(&self) -> PageState {
        self.page
    }

    /// End-of-job tracker of the current job
    pub fn jobs(&self) -> JobBoundaryTracker {
        self.jobs
    }

    /// Run one poll cycle
    ///
    /// Errors are fatal: a renderer that could not be launched or that
    /// exited with a non-zero status.
    pub fn tick(&mut self) -> Result<Tick> {
        self.session.poll_events()?;

        let state = self.session.state();
        if !state.accepts_work() {
            debug!(?state, "renderer busy, deferring tick");
            return Ok(Tick::Deferred);
        }

        let unread = match self.cursor.has_unread() {
            Ok(unread) => unread,
            Err(err) => {
                warn!(path = %self.cursor.path().display(), error = %err, "cannot access printer file");
                return Ok(Tick::Skipped);
            }
        };

        if state == RendererState::Stopped {
            // A partial line left behind by the last job already belongs
            // to the next one
            if !unread && self.assembler.pending().is_empty() {
                return Ok(Tick::Idle);
            }
            self.start_job();
            return Ok(Tick::JobStarted);
        }
        if !unread {
            return Ok(Tick::Idle);
        }

        self.pump()
    }

    fn start_job(&mut self) {
        let invocation = self.command.invocation(Local::now().naive_local());
        info!(output = %invocation.output.display(), "print job started");
        self.page.reset();
        self.jobs = JobBoundaryTracker::new();
        self.session.start(invocation);
    }

    /// Read one chunk and dispatch its complete lines
    fn pump(&mut self) -> Result<Tick> {
        let Self {
            cursor,
            assembler,
            page,
            jobs,
            session,
            lines_per_page,
            ..
        } = self;

        let before = cursor.offset();
        let chunk = match cursor.read_chunk() {
            Ok(chunk) => chunk,
            Err(err) => {
                warn!(path = %cursor.path().display(), error = %err, "cannot read printer file");
                return Ok(Tick::Skipped);
            }
        };
        let chunk_len = chunk.len();

        let feed = assembler.feed::<_, std::convert::Infallible>(chunk, |line| {
            Ok(dispatch_line(line, page, jobs, session, *lines_per_page))
        });

        match feed {
            Ok(Feed::Drained) => cursor.advance(chunk_len),
            Ok(Feed::Blocked { scanned, line_len }) => {
                cursor.advance(scanned);
                cursor.rewind(line_len);
                debug!(offset = cursor.offset(), "line deferred until renderer is ready");
            }
            Err(never) => match never {},
        }

        Ok(Tick::Progress {
            advanced: cursor.offset().saturating_sub(before),
        })
    }
}

/// Decode one line and hand it to the renderer
///
/// Returns `false` when the renderer cannot take the line; counters are
/// then left untouched so the retried line is accounted exactly once.
fn dispatch_line<L: Launcher>(
    line: &[u8],
    page: &mut PageState,
    jobs: &mut JobBoundaryTracker,
    session: &mut RendererSession<L>,
    lines_per_page: u32,
) -> bool {
    if line.is_empty() {
        return true;
    }
    if session.state() != RendererState::Running {
        return false;
    }

    let mut next_page = *page;
    let mut next_jobs = *jobs;
    let end_of_job = next_jobs.observe(line);

    let mut text = next_page.decode(line, lines_per_page).unwrap_or_default();
    if end_of_job {
        text.push(LINE_TERMINATOR);
    }

    if !text.is_empty() {
        if let Err(err) = session.write(&text) {
            if err.kind() == io::ErrorKind::WouldBlock {
                debug!("renderer is behind, retrying line later");
            } else {
                warn!(error = %err, "renderer did not take line, retrying later");
            }
            return false;
        }
    }

    *page = next_page;
    *jobs = next_jobs;

    if end_of_job {
        session.finish();
        info!(
            output = ?session.output().map(|p| p.display().to_string()),
            pages = page.page_count,
            "print job complete"
        );
    }
    true
}
