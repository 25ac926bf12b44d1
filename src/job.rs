//! End-of-job detection
//!
//! The operating system closes every job listing with a trailer line
//! carrying the end-of-list banner, printed twice. The second sighting is
//! the last line of the job.

/// Banner text the spooler prints at the end of every job listing
pub const END_OF_JOB_MARKER: &[u8] = b" //// END OF LIST ////  ";

/// Sightings of the marker that close a job
const MARKERS_PER_JOB: u8 = 2;

/// Counts end-of-job markers within the current job
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JobBoundaryTracker {
    end_marker_count: u8,
}

impl JobBoundaryTracker {
    /// Create a tracker with no markers seen
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of markers seen in the current job
    pub fn end_marker_count(&self) -> u8 {
        self.end_marker_count
    }

    /// Observe a raw line
    ///
    /// Returns `true` when this line completes the job, in which case the
    /// counter is already back at zero.
    pub fn observe(&mut self, line: &[u8]) -> bool {
        if !contains_marker(line) {
            return false;
        }
        self.end_marker_count += 1;
        if self.end_marker_count >= MARKERS_PER_JOB {
            self.end_marker_count = 0;
            return true;
        }
        false
    }
}

fn contains_marker(line: &[u8]) -> bool {
    line.windows(END_OF_JOB_MARKER.len())
        .any(|window| window == END_OF_JOB_MARKER)
}
