//! Process id record for the helper scripts that stop the spooler

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// Write this process's id to `path`
pub fn write(path: &Path) -> Result<()> {
    fs::write(path, std::process::id().to_string()).map_err(|source| Error::PidFile {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_pid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pdf.pid");
        write(&path).unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            std::process::id().to_string()
        );
    }

    #[test]
    fn test_unwritable_location() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("pdf.pid");
        assert!(matches!(write(&path), Err(Error::PidFile { .. })));
    }
}
