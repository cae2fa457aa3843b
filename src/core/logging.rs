//! Logger setup
//!
//! Every line goes to stderr and to the log file, so the admin `marvin log`
//! command can read back what the console showed.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0

use anyhow::Result;
use chrono::Local;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};

/// Name stamped on every log line
pub const LOGGER_NAME: &str = "MARVIN";

/// Writes each buffer to stderr and to the log file
struct TeeWriter {
    file: File,
}

impl Write for TeeWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let _ = io::stderr().write_all(buf);
        self.file.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        let _ = io::stderr().flush();
        self.file.flush()
    }
}

/// Format a single log line
pub fn format_line(level: log::Level, message: &std::fmt::Arguments<'_>) -> String {
    format!(
        "{} - {} - {} - {}",
        Local::now().format("%Y-%m-%d %H:%M:%S,%3f"),
        LOGGER_NAME,
        level,
        message
    )
}

/// Install the global logger. `RUST_LOG` overrides `default_level`.
pub fn init(default_level: &str, log_file: &str) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .map_err(|e| anyhow::anyhow!("Failed to open log file {}: {}", log_file, e))?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format(|buf, record| writeln!(buf, "{}", format_line(record.level(), record.args())))
        .target(env_logger::Target::Pipe(Box::new(TeeWriter { file })))
        .try_init()?;

    Ok(())
}

/// Read the whole log file
pub fn read_log(log_file: &str) -> Result<String> {
    std::fs::read_to_string(log_file)
        .map_err(|e| anyhow::anyhow!("Failed to read log file {}: {}", log_file, e))
}
