//! Output document naming

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;

/// File name for a job started at `started`: `print_YYYY_MM_DD_HH_MM_SS.ext`
pub fn artifact_file_name(extension: &str, started: NaiveDateTime) -> String {
    let stem = started.format("print_%Y_%m_%d_%H_%M_%S");
    if extension.is_empty() {
        stem.to_string()
    } else {
        format!("{stem}.{extension}")
    }
}

/// Path of the document for a job started at `started`
pub fn artifact_path(spool_dir: &Path, extension: &str, started: NaiveDateTime) -> PathBuf {
    spool_dir.join(artifact_file_name(extension, started))
}
