//! Carriage-control decoder
//!
//! Turns raw printer records into the plain text stream the renderer
//! paginates. Based on the ASA carriage-control convention used by line
//! printers attached to mainframe operating systems.

mod directive;
mod page;

pub use directive::ControlDirective;
pub use page::{PageState, BANNER_PAGES};
