//! Line Printer Spooler
//!
//! Tails the output file of an emulated line printer, decodes its
//! carriage-control column and streams each print job to its own document
//! renderer process.
//!
//! - `stream`: Cursor over the printer file and line assembly
//! - `decoder`: Carriage-control directives and page accounting
//! - `job`: End-of-job detection
//! - `renderer`: Renderer process lifecycle
//! - `engine`: One poll cycle over all of the above
//! - `poll`: Periodic driver, startup and shutdown

pub mod config;
pub mod decoder;
pub mod engine;
pub mod error;
pub mod job;
pub mod pidfile;
pub mod poll;
pub mod renderer;
pub mod signal;
pub mod stream;

pub use config::Config;
pub use decoder::{ControlDirective, PageState};
pub use engine::{Engine, Tick};
pub use error::{Error, Result};
pub use job::JobBoundaryTracker;
pub use renderer::{RendererSession, RendererState};
pub use stream::{LineAssembler, StreamCursor};
