//! Document renderer subprocess
//!
//! Each print job is streamed to its own renderer process, which reads the
//! decoded text on stdin until it is closed and then writes the finished
//! document. Process creation sits behind [`Launcher`]; lifecycle
//! notifications come back as [`RendererEvent`]s over a channel and are
//! applied to the [`RendererSession`] state machine by the poll loop.

mod artifact;
mod input;
mod process;
mod session;

use std::ffi::OsString;
use std::fmt;
use std::io;
use std::path::PathBuf;

use chrono::NaiveDateTime;
use crossbeam_channel::Sender;

pub use artifact::{artifact_file_name, artifact_path};
pub use input::{RendererInput, INPUT_QUEUE};
pub use process::ProcessLauncher;
pub use session::RendererSession;

/// Lifecycle of the renderer process for the current job
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RendererState {
    /// No renderer process
    #[default]
    Stopped,
    /// Launch requested, waiting for confirmation
    Starting,
    /// Accepting decoded text
    Running,
    /// Input closed, waiting for the process to exit
    Stopping,
}

impl RendererState {
    /// Whether the poll loop may read the stream in this state
    pub fn accepts_work(self) -> bool {
        matches!(self, Self::Stopped | Self::Running)
    }
}

/// How a renderer process ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RendererExit {
    /// Exit status, or 128 + signal number when killed by a signal
    pub code: i32,
}

impl RendererExit {
    /// Whether the renderer finished its document
    pub fn success(self) -> bool {
        self.code == 0
    }
}

impl From<std::process::ExitStatus> for RendererExit {
    fn from(status: std::process::ExitStatus) -> Self {
        use std::os::unix::process::ExitStatusExt;

        let code = match (status.code(), status.signal()) {
            (Some(code), _) => code,
            (None, Some(signal)) => 128 + signal,
            (None, None) => 1,
        };
        Self { code }
    }
}

/// Notification from the process layer
pub enum RendererEvent {
    /// The process was launched and its input is ready
    Ready { pid: u32, input: RendererInput },
    /// The process could not be launched
    SpawnFailed(io::Error),
    /// The process terminated
    Exited(RendererExit),
}

impl fmt::Debug for RendererEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ready { pid, .. } => f.debug_struct("Ready").field("pid", pid).finish(),
            Self::SpawnFailed(err) => f.debug_tuple("SpawnFailed").field(err).finish(),
            Self::Exited(exit) => f.debug_tuple("Exited").field(exit).finish(),
        }
    }
}

/// Fully resolved command line for one job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Renderer executable
    pub program: PathBuf,
    /// Options forwarded ahead of the output path
    pub options: Vec<String>,
    /// Document the renderer writes
    pub output: PathBuf,
}

impl Invocation {
    /// Arguments passed to the program: options, `--`, output path
    pub fn args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = self.options.iter().map(OsString::from).collect();
        args.push(OsString::from("--"));
        args.push(self.output.clone().into_os_string());
        args
    }
}

/// Renderer settings shared by every job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RendererCommand {
    /// Renderer executable
    pub program: PathBuf,
    /// Options forwarded to every invocation
    pub options: Vec<String>,
    /// Directory receiving the documents
    pub spool_dir: PathBuf,
    /// Document file extension, without the dot
    pub extension: String,
}

impl RendererCommand {
    /// Build the invocation for a job started at `started`
    pub fn invocation(&self, started: NaiveDateTime) -> Invocation {
        Invocation {
            program: self.program.clone(),
            options: self.options.clone(),
            output: artifact_path(&self.spool_dir, &self.extension, started),
        }
    }
}

/// Creates renderer processes
///
/// Implementations report back exclusively through `events`: exactly one
/// of `Ready` or `SpawnFailed`, and after `Ready`, exactly one `Exited`.
pub trait Launcher {
    /// Start a renderer for `invocation`
    fn launch(&mut self, invocation: &Invocation, events: Sender<RendererEvent>);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_work() {
        assert!(RendererState::Stopped.accepts_work());
        assert!(RendererState::Running.accepts_work());
        assert!(!RendererState::Starting.accepts_work());
        assert!(!RendererState::Stopping.accepts_work());
    }

    #[test]
    fn test_invocation_args() {
        let invocation = Invocation {
            program: PathBuf::from("lpt2pdf"),
            options: vec!["-tof".to_string(), "3".to_string()],
            output: PathBuf::from("/spool/print_2024_01_02_03_04_05.pdf"),
        };
        let args: Vec<String> = invocation
            .args()
            .into_iter()
            .map(|arg| arg.into_string().unwrap())
            .collect();
        assert_eq!(
            args,
            vec!["-tof", "3", "--", "/spool/print_2024_01_02_03_04_05.pdf"]
        );
    }

    #[test]
    fn test_invocation_without_options() {
        let invocation = Invocation {
            program: PathBuf::from("lpt2pdf"),
            options: Vec::new(),
            output: PathBuf::from("out.pdf"),
        };
        assert_eq!(invocation.args(), vec![OsString::from("--"), OsString::from("out.pdf")]);
    }

    #[test]
    fn test_exit_from_status() {
        use std::os::unix::process::ExitStatusExt;

        let ok = RendererExit::from(std::process::ExitStatus::from_raw(0));
        assert!(ok.success());

        let failed = RendererExit::from(std::process::ExitStatus::from_raw(3 << 8));
        assert_eq!(failed.code, 3);

        // Raw wait status 9 is termination by SIGKILL
        let killed = RendererExit::from(std::process::ExitStatus::from_raw(9));
        assert_eq!(killed.code, 137);
        assert!(!killed.success());
    }
}
