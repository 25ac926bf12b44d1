//! Page Accounting
//!
//! Applies carriage-control directives to the running line and page counters
//! of the current job and produces the text forwarded to the renderer.

use super::directive::ControlDirective;

/// Pages at the start of a job that do not get the double-space padding line
///
/// Renderer compatibility shim: the banner pages at the start of a job are
/// laid out one line short by the PDF renderer, so double spacing on those
/// pages is emitted without the extra line.
pub const BANNER_PAGES: u32 = 2;

/// Line and page counters for the job being rendered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageState {
    /// Lines emitted on the current page
    pub line_count: u32,
    /// Pages started in the current job
    pub page_count: u32,
}

impl PageState {
    /// Create counters for a fresh job
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset counters at job start
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Whether no page has been ejected yet in this job
    pub fn on_first_page(&self) -> bool {
        self.page_count == 0
    }

    /// Decode one raw line and update the counters
    ///
    /// Returns the bytes to forward, or `None` when the line is empty or
    /// carries an unrecognized control code.
    pub fn decode(&mut self, line: &[u8], lines_per_page: u32) -> Option<Vec<u8>> {
        let (directive, text) = ControlDirective::split(line)?;
        let mut out = Vec::with_capacity(text.len() + 4);
        self.apply(directive, lines_per_page, &mut out)?;
        out.extend_from_slice(text);
        Some(out)
    }

    /// Append the control sequence for `directive` to `out`
    fn apply(
        &mut self,
        directive: ControlDirective,
        lines_per_page: u32,
        out: &mut Vec<u8>,
    ) -> Option<()> {
        match directive {
            ControlDirective::SingleSpace => {
                out.push(b'\n');
                self.line_count = self.line_count.saturating_add(1);
            }
            ControlDirective::Eject => {
                if self.on_first_page() {
                    // No form feed on the first page. Text already on it
                    // still needs to end its line.
                    if self.line_count > 0 {
                        out.push(b'\n');
                    }
                } else {
                    out.push(b'\x0c');
                }
                self.page_count = self.page_count.saturating_add(1);
                self.line_count = 1;
            }
            ControlDirective::DoubleSpace => {
                out.extend_from_slice(b"\n\n");
                let mut advance = 2;
                if self.page_count > BANNER_PAGES {
                    out.push(b'\n');
                    advance = 3;
                }
                self.line_count = self.line_count.saturating_add(advance);
            }
            ControlDirective::AdvanceToLastLine => {
                let padding = lines_per_page.saturating_sub(self.line_count);
                out.resize(out.len() + padding as usize, b'\n');
                self.line_count = lines_per_page;
            }
            ControlDirective::NoAdvance => {
                out.push(b'\r');
            }
            ControlDirective::Ignore => return None,
        }
        Some(())
    }
}
