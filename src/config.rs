//! Spooler configuration
//!
//! Everything comes from the command line. Validation runs before the
//! printer file is touched so a bad invocation never truncates it.

use std::ops::RangeInclusive;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use thiserror::Error;

use crate::renderer::RendererCommand;

/// Accepted lines-per-page values
pub const LINES_PER_PAGE_RANGE: RangeInclusive<u32> = 40..=80;

/// Accepted poll periods in milliseconds
pub const POLL_INTERVAL_RANGE: RangeInclusive<u64> = 50..=5000;

/// Configuration problems detected at startup
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Spool directory is missing or not a directory
    #[error("spool directory {} does not exist", .0.display())]
    MissingSpoolDir(PathBuf),

    /// Lines per page outside the accepted range
    #[error("lines per page must be between 40 and 80, got {0}")]
    LinesPerPage(u32),

    /// Poll period outside the accepted range
    #[error("poll interval must be between 50 and 5000 ms, got {0}")]
    PollInterval(u64),

    /// Empty renderer program path
    #[error("renderer program must not be empty")]
    EmptyRenderer,
}

/// Splits emulated line printer output into one rendered document per job
#[derive(Debug, Clone, Parser)]
#[command(name = "lpt-spool", version, about)]
#[command(after_help = "Example: lpt-spool -p LP5xx_C12_E5 -s spool -o \"-tof 3\"")]
pub struct Config {
    /// Printer file written by the emulator (truncated at startup)
    #[arg(short = 'p', long = "printer-file", value_name = "PATH")]
    pub printer_file: PathBuf,

    /// Directory receiving the rendered documents
    #[arg(short = 's', long = "spool-dir", value_name = "DIR")]
    pub spool_dir: PathBuf,

    /// Options passed to the renderer ahead of the output path
    #[arg(
        short = 'o',
        long = "renderer-options",
        value_name = "OPTS",
        allow_hyphen_values = true
    )]
    pub renderer_options: Option<String>,

    /// Lines per page, used to pad to the bottom of a page
    #[arg(short = 'l', long = "lines-per-page", value_name = "N", default_value_t = 60)]
    pub lines_per_page: u32,

    /// Renderer executable
    #[arg(short = 'r', long = "renderer", value_name = "PROGRAM", default_value = "lpt2pdf")]
    pub renderer: PathBuf,

    /// Extension of the rendered documents
    #[arg(short = 'e', long = "extension", value_name = "EXT", default_value = "pdf")]
    pub extension: String,

    /// Poll period for the printer file in milliseconds
    #[arg(short = 'i', long = "interval", value_name = "MS", default_value_t = 250)]
    pub poll_interval_ms: u64,

    /// File receiving the spooler's process id
    #[arg(long = "pid-file", value_name = "PATH", default_value = "pdf.pid")]
    pub pid_file: PathBuf,
}

impl Config {
    /// Check values clap cannot check on its own
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !LINES_PER_PAGE_RANGE.contains(&self.lines_per_page) {
            return Err(ConfigError::LinesPerPage(self.lines_per_page));
        }
        if !POLL_INTERVAL_RANGE.contains(&self.poll_interval_ms) {
            return Err(ConfigError::PollInterval(self.poll_interval_ms));
        }
        if self.renderer.as_os_str().is_empty() {
            return Err(ConfigError::EmptyRenderer);
        }
        if !self.spool_dir.is_dir() {
            return Err(ConfigError::MissingSpoolDir(self.spool_dir.clone()));
        }
        Ok(())
    }

    /// Renderer options split on whitespace
    pub fn renderer_options(&self) -> Vec<String> {
        self.renderer_options
            .as_deref()
            .map(|opts| opts.split_whitespace().map(String::from).collect())
            .unwrap_or_default()
    }

    /// Poll period
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Renderer settings shared by every job
    pub fn renderer_command(&self) -> RendererCommand {
        RendererCommand {
            program: self.renderer.clone(),
            options: self.renderer_options(),
            spool_dir: self.spool_dir.clone(),
            extension: self.extension.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Config, clap::Error> {
        Config::try_parse_from(std::iter::once("lpt-spool").chain(args.iter().copied()))
    }

    #[test]
    fn test_defaults() {
        let config = parse(&["-p", "LP5xx_C12_E5", "-s", "spool"]).unwrap();
        assert_eq!(config.printer_file, PathBuf::from("LP5xx_C12_E5"));
        assert_eq!(config.spool_dir, PathBuf::from("spool"));
        assert_eq!(config.lines_per_page, 60);
        assert_eq!(config.renderer, PathBuf::from("lpt2pdf"));
        assert_eq!(config.extension, "pdf");
        assert_eq!(config.poll_interval(), Duration::from_millis(250));
        assert_eq!(config.pid_file, PathBuf::from("pdf.pid"));
        assert!(config.renderer_options().is_empty());
    }

    #[test]
    fn test_required_flags() {
        assert!(parse(&["-p", "printer"]).is_err());
        assert!(parse(&["-s", "spool"]).is_err());
    }

    #[test]
    fn test_hyphenated_renderer_options() {
        let config = parse(&["-p", "prt", "-s", "spool", "-o", "-tof 3  -lpi 8"]).unwrap();
        assert_eq!(config.renderer_options(), vec!["-tof", "3", "-lpi", "8"]);
    }

    #[test]
    fn test_validate_lines_per_page() {
        let dir = tempfile::tempdir().unwrap();
        let spool = dir.path().to_str().unwrap();

        assert!(parse(&["-p", "prt", "-s", spool, "-l", "40"]).unwrap().validate().is_ok());
        assert!(parse(&["-p", "prt", "-s", spool, "-l", "80"]).unwrap().validate().is_ok());
        assert_eq!(
            parse(&["-p", "prt", "-s", spool, "-l", "39"]).unwrap().validate(),
            Err(ConfigError::LinesPerPage(39))
        );
        assert_eq!(
            parse(&["-p", "prt", "-s", spool, "-l", "81"]).unwrap().validate(),
            Err(ConfigError::LinesPerPage(81))
        );
    }

    #[test]
    fn test_validate_spool_dir() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing");
        let config = parse(&["-p", "prt", "-s", missing.to_str().unwrap()]).unwrap();
        assert_eq!(config.validate(), Err(ConfigError::MissingSpoolDir(missing)));
    }

    #[test]
    fn test_validate_interval() {
        let dir = tempfile::tempdir().unwrap();
        let spool = dir.path().to_str().unwrap();
        let config = parse(&["-p", "prt", "-s", spool, "-i", "10"]).unwrap();
        assert_eq!(config.validate(), Err(ConfigError::PollInterval(10)));
    }

    #[test]
    fn test_renderer_command() {
        let config = parse(&["-p", "prt", "-s", "out", "-o", "-tof 3", "-e", "ps"]).unwrap();
        let command = config.renderer_command();
        assert_eq!(command.options, vec!["-tof", "3"]);
        assert_eq!(command.spool_dir, PathBuf::from("out"));
        assert_eq!(command.extension, "ps");
    }
}
