//! Line assembly across poll boundaries
//!
//! Chunks read from the printer file end wherever the emulator happened to
//! stop writing, so a line may span any number of polls. The assembler
//! keeps the unterminated tail until its terminator arrives.

/// Line terminator written by the emulator
pub const LINE_TERMINATOR: u8 = b'\n';

/// Result of feeding one chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feed {
    /// Every byte of the chunk was taken; the cursor moves past the chunk
    Drained,
    /// A complete line was refused
    ///
    /// `scanned` bytes of the chunk precede the refused line's terminator
    /// and `line_len` is the full length of that line, part of which may
    /// have come from earlier chunks. Moving the cursor forward by
    /// `scanned` and back by `line_len` puts it at the start of the line.
    Blocked { scanned: usize, line_len: usize },
}

/// Accumulates bytes into complete lines
#[derive(Debug, Default)]
pub struct LineAssembler {
    pending: Vec<u8>,
}

impl LineAssembler {
    /// Create an assembler with no pending bytes
    pub fn new() -> Self {
        Self {
            pending: Vec::with_capacity(256),
        }
    }

    /// Bytes of the unterminated line carried over from earlier chunks
    pub fn pending(&self) -> &[u8] {
        &self.pending
    }

    /// Drop any partial line
    pub fn clear(&mut self) {
        self.pending.clear();
    }

    /// Split `chunk` into lines and hand each complete one to `dispatch`
    ///
    /// `dispatch` returns whether it consumed the line. On the first refusal
    /// the pending buffer is cleared and feeding stops; the caller rewinds
    /// its cursor so the whole line is read again on a later poll.
    pub fn feed<F, E>(&mut self, chunk: &[u8], mut dispatch: F) -> Result<Feed, E>
    where
        F: FnMut(&[u8]) -> Result<bool, E>,
    {
        let mut rest = chunk;
        let mut scanned = 0;

        while let Some(pos) = rest.iter().position(|&b| b == LINE_TERMINATOR) {
            self.pending.extend_from_slice(&rest[..pos]);
            scanned += pos;

            let consumed = dispatch(&self.pending)?;
            let line_len = self.pending.len();
            self.pending.clear();
            if !consumed {
                return Ok(Feed::Blocked { scanned, line_len });
            }

            scanned += 1;
            rest = &rest[pos + 1..];
        }

        self.pending.extend_from_slice(rest);
        Ok(Feed::Drained)
    }
}
