//! Monitored printer stream
//!
//! Incremental reads from the emulator's printer file and reassembly of
//! the bytes into lines.

mod assembler;
mod cursor;

pub use assembler::{Feed, LineAssembler, LINE_TERMINATOR};
pub use cursor::{StreamCursor, MAX_CHUNK};
