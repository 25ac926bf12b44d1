//! Poll loop
//!
//! Drives the [`Engine`] from a periodic ticker. Ticks that fire while the
//! previous one is still running are dropped by the ticker, so two cycles
//! never overlap.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tracing::{debug, info, trace};

use crate::config::Config;
use crate::engine::{Engine, Tick};
use crate::error::{Error, Result};
use crate::pidfile;
use crate::renderer::{Launcher, ProcessLauncher};
use crate::signal;
use crate::stream::StreamCursor;

/// Tick `engine` every `period` until `stop` is raised or a tick fails
pub fn run_until<L: Launcher>(
    engine: &mut Engine<L>,
    period: Duration,
    stop: &AtomicBool,
) -> Result<()> {
    let ticker = crossbeam_channel::tick(period);

    while !stop.load(Ordering::SeqCst) {
        if ticker.recv().is_err() {
            break;
        }
        if stop.load(Ordering::SeqCst) {
            break;
        }

        match engine.tick()? {
            Tick::Idle => trace!("no new output"),
            Tick::Progress { advanced } => {
                debug!(advanced, offset = engine.cursor().offset(), "processed chunk")
            }
            other => debug!(tick = ?other, "poll cycle"),
        }
    }
    Ok(())
}

/// Run the spooler until terminated
///
/// Configuration is validated before the printer file is truncated. A
/// termination signal ends the loop without waiting for a renderer that is
/// still writing its document.
pub fn run(config: &Config) -> Result<()> {
    config.validate()?;
    if let Some(options) = &config.renderer_options {
        info!(%options, "renderer options");
    }

    let stop = signal::install().map_err(Error::Signal)?;

    let cursor = StreamCursor::create(&config.printer_file).map_err(|source| Error::Stream {
        path: config.printer_file.clone(),
        source,
    })?;
    let mut engine = Engine::new(
        cursor,
        config.renderer_command(),
        config.lines_per_page,
        ProcessLauncher::new(),
    );
    info!(path = %config.printer_file.display(), "watching printer file");

    pidfile::write(&config.pid_file)?;

    run_until(&mut engine, config.poll_interval(), stop)?;
    info!("termination requested, shutting down");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::{Invocation, RendererCommand, RendererEvent};
    use crossbeam_channel::Sender;
    use std::io;
    use std::path::PathBuf;
    use std::sync::Arc;
    use std::thread;

    const PERIOD: Duration = Duration::from_millis(10);

    /// Launcher whose renderer can never be started
    struct BrokenLauncher;

    impl Launcher for BrokenLauncher {
        fn launch(&mut self, _invocation: &Invocation, events: Sender<RendererEvent>) {
            events
                .send(RendererEvent::SpawnFailed(io::Error::new(
                    io::ErrorKind::NotFound,
                    "no such file",
                )))
                .unwrap();
        }
    }

    fn engine(dir: &tempfile::TempDir) -> (PathBuf, Engine<BrokenLauncher>) {
        let printer = dir.path().join("printer");
        let cursor = StreamCursor::create(&printer).unwrap();
        let command = RendererCommand {
            program: PathBuf::from("lpt2pdf"),
            options: Vec::new(),
            spool_dir: dir.path().to_path_buf(),
            extension: "pdf".to_string(),
        };
        (printer, Engine::new(cursor, command, 60, BrokenLauncher))
    }

    #[test]
    fn test_raised_flag_stops_immediately() {
        let dir = tempfile::tempdir().unwrap();
        let (_, mut engine) = engine(&dir);
        let stop = AtomicBool::new(true);
        run_until(&mut engine, PERIOD, &stop).unwrap();
    }

    #[test]
    fn test_stop_from_another_thread() {
        let dir = tempfile::tempdir().unwrap();
        let (_, mut engine) = engine(&dir);
        let stop = Arc::new(AtomicBool::new(false));

        let raiser = {
            let stop = Arc::clone(&stop);
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(100));
                stop.store(true, Ordering::SeqCst);
            })
        };

        run_until(&mut engine, PERIOD, &stop).unwrap();
        raiser.join().unwrap();
        assert_eq!(engine.cursor().offset(), 0);
    }

    #[test]
    fn test_spawn_failure_ends_loop() {
        let dir = tempfile::tempdir().unwrap();
        let (printer, mut engine) = engine(&dir);
        std::fs::write(&printer, b" job\n").unwrap();

        let stop = AtomicBool::new(false);
        let err = run_until(&mut engine, PERIOD, &stop).unwrap_err();
        assert!(matches!(err, Error::Spawn { .. }));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_run_rejects_bad_config_before_touching_stream() {
        let dir = tempfile::tempdir().unwrap();
        let printer = dir.path().join("printer");
        std::fs::write(&printer, b"keep me").unwrap();

        let config = <Config as clap::Parser>::try_parse_from([
            "lpt-spool",
            "-p",
            printer.to_str().unwrap(),
            "-s",
            dir.path().join("missing").to_str().unwrap(),
        ])
        .unwrap();

        assert!(matches!(run(&config), Err(Error::Config(_))));
        assert_eq!(std::fs::read(&printer).unwrap(), b"keep me");
    }
}
