//! Read cursor over the monitored printer file
//!
//! The emulator only ever appends to the printer file, so the cursor is a
//! plain byte offset. Reads are positional and bounded by one buffer.

use std::fs::{File, OpenOptions};
use std::io;
use std::os::unix::fs::FileExt;
use std::path::{Path, PathBuf};

/// Largest number of bytes fetched per poll
pub const MAX_CHUNK: usize = 64 * 1024;

/// Incremental reader over an append-only file
#[derive(Debug)]
pub struct StreamCursor {
    path: PathBuf,
    file: File,
    offset: u64,
    buffer: Vec<u8>,
}

impl StreamCursor {
    /// Truncate the stream to empty, then open it for tailing
    pub fn create(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;
        Self::open(path)
    }

    /// Open an existing stream for tailing from offset zero
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        Self::with_chunk_size(path, MAX_CHUNK)
    }

    /// Open a stream with a custom read ceiling
    pub fn with_chunk_size(path: impl AsRef<Path>, max_chunk: usize) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path)?;
        Ok(Self {
            path,
            file,
            offset: 0,
            buffer: vec![0; max_chunk.max(1)],
        })
    }

    /// Path of the monitored stream
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current read offset
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Current size of the stream
    pub fn stream_len(&self) -> io::Result<u64> {
        Ok(std::fs::metadata(&self.path)?.len())
    }

    /// Whether the stream has grown past the cursor
    pub fn has_unread(&self) -> io::Result<bool> {
        Ok(self.stream_len()? > self.offset)
    }

    /// Read the bytes in `[offset, min(offset + max_chunk, len))`
    ///
    /// The offset is not moved; callers advance it once the bytes have been
    /// handed on.
    pub fn read_chunk(&mut self) -> io::Result<&[u8]> {
        let len = self.stream_len()?;
        let available = len.saturating_sub(self.offset);
        let wanted = available.min(self.buffer.len() as u64) as usize;

        let mut filled = 0;
        while filled < wanted {
            let n = self
                .file
                .read_at(&mut self.buffer[filled..wanted], self.offset + filled as u64)?;
            if n == 0 {
                break;
            }
            filled += n;
        }
        Ok(&self.buffer[..filled])
    }

    /// Move the offset forward past handed-on bytes
    pub fn advance(&mut self, n: usize) {
        self.offset += n as u64;
    }

    /// Move the offset back so a rejected line is read again
    pub fn rewind(&mut self, n: usize) {
        self.offset = self.offset.saturating_sub(n as u64);
    }
}
