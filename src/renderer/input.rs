//! Non-blocking renderer input
//!
//! The renderer's stdin is a blocking pipe. A dedicated writer thread owns
//! it and drains a bounded queue, so the poll loop only ever enqueues. A
//! full queue is reported as [`io::ErrorKind::WouldBlock`] and the caller
//! retries the line later. Dropping the [`RendererInput`] closes the queue;
//! the writer thread then finishes what was queued and closes the pipe.

use std::io::{self, Write};
use std::thread;

use crossbeam_channel::{Receiver, Sender, TrySendError};
use tracing::{debug, warn};

/// Decoded lines buffered between the poll loop and the renderer pipe
pub const INPUT_QUEUE: usize = 256;

/// Writable end of a renderer's input
#[derive(Debug)]
pub struct RendererInput {
    queue: Sender<Vec<u8>>,
}

impl RendererInput {
    /// Wrap the sending half of a queue drained elsewhere
    pub fn new(queue: Sender<Vec<u8>>) -> Self {
        Self { queue }
    }

    /// Start a writer thread feeding `sink` from a queue of [`INPUT_QUEUE`] lines
    pub fn spawn<W>(sink: W) -> io::Result<Self>
    where
        W: Write + Send + 'static,
    {
        let (tx, rx) = crossbeam_channel::bounded(INPUT_QUEUE);
        thread::Builder::new()
            .name("renderer-input".to_string())
            .spawn(move || drain(sink, rx))?;
        Ok(Self::new(tx))
    }

    /// Queue `text` without blocking
    ///
    /// Fails with `WouldBlock` when the renderer is behind and with
    /// `BrokenPipe` once the writer thread has given up on the pipe.
    pub fn try_write(&self, text: &[u8]) -> io::Result<()> {
        match self.queue.try_send(text.to_vec()) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => Err(io::Error::new(
                io::ErrorKind::WouldBlock,
                "renderer input queue is full",
            )),
            Err(TrySendError::Disconnected(_)) => Err(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "renderer input is closed",
            )),
        }
    }
}

/// Copy queued text into the pipe until the queue closes or a write fails
fn drain<W: Write>(mut sink: W, queue: Receiver<Vec<u8>>) {
    for text in queue {
        if let Err(err) = sink.write_all(&text) {
            warn!(error = %err, "failed to write to renderer");
            return;
        }
    }
    if let Err(err) = sink.flush() {
        warn!(error = %err, "failed to flush renderer input");
    }
    debug!("renderer input closed");
}
