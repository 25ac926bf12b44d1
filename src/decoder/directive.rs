//! Carriage-Control Directives
//!
//! Line printers of the era took the first character of every record as a
//! carriage-control code telling the printer how far to advance the paper
//! before printing the rest of the record. The codes understood here are:
//!
//! | code  | directive           |
//! |-------|---------------------|
//! | space | single space        |
//! | `1`   | eject to new page   |
//! | `0`   | double space        |
//! | `C`   | advance to last line|
//! | `+`   | no advance          |
//!
//! Anything else marks a record that carries no printable text.

/// Paper movement requested by the first byte of a line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlDirective {
    /// Normal single line advance (space)
    SingleSpace,
    /// Top of form (`1`)
    Eject,
    /// Double line advance (`0`)
    DoubleSpace,
    /// Pad to the bottom line of the current page (`C`)
    AdvanceToLastLine,
    /// Overprint the previous line (`+`)
    NoAdvance,
    /// Unrecognized code, the whole line is dropped
    Ignore,
}

impl ControlDirective {
    /// The directive applied when a line has no explicit code
    pub const DEFAULT: Self = Self::SingleSpace;

    /// Decode a carriage-control byte
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            b' ' => Self::SingleSpace,
            b'1' => Self::Eject,
            b'0' => Self::DoubleSpace,
            b'C' => Self::AdvanceToLastLine,
            b'+' => Self::NoAdvance,
            _ => Self::Ignore,
        }
    }

    /// Split a raw line into its directive and the printable remainder
    ///
    /// Returns `None` for an empty line.
    pub fn split(line: &[u8]) -> Option<(Self, &[u8])> {
        let (&code, text) = line.split_first()?;
        Some((Self::from_byte(code), text))
    }

    /// Whether the line's text is forwarded to the renderer
    pub fn is_printable(self) -> bool {
        self != Self::Ignore
    }
}

impl Default for ControlDirective {
    fn default() -> Self {
        Self::DEFAULT
    }
}
