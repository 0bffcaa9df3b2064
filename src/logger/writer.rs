//! Log writer module
//!
//! Thread-safe line writer for standard error or an append-only file.
//! Every line carries the `staticy ` prefix and a local timestamp.

use chrono::Local;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Mutex, OnceLock};

/// Prefix of every log line
pub const PREFIX: &str = "staticy ";

/// Global log writer instance
static LOG_WRITER: OnceLock<LogWriter> = OnceLock::new();

/// Log output target
enum LogTarget {
    Stderr,
    File(File),
}

/// Thread-safe log writer
pub struct LogWriter {
    target: Mutex<LogTarget>,
}

impl LogWriter {
    /// Create a writer for `log_file`, or standard error when `None`
    pub fn new(log_file: Option<&Path>) -> io::Result<Self> {
        let target = match log_file {
            Some(path) => LogTarget::File(open_log_file(path)?),
            None => LogTarget::Stderr,
        };
        Ok(Self {
            target: Mutex::new(target),
        })
    }

    /// Write one decorated line; write failures are dropped
    pub fn write_line(&self, message: &str) {
        let line = decorate(message);
        let Ok(mut target) = self.target.lock() else {
            return;
        };
        match &mut *target {
            LogTarget::Stderr => {
                let _ = writeln!(io::stderr().lock(), "{line}");
            }
            LogTarget::File(file) => {
                let _ = writeln!(file, "{line}");
            }
        }
    }
}

/// Add prefix and timestamp, e.g. `staticy 2024/05/01 12:00:00 message`
pub fn decorate(message: &str) -> String {
    format!(
        "{PREFIX}{} {message}",
        Local::now().format("%Y/%m/%d %H:%M:%S")
    )
}

/// Open or create a log file for appending
fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    OpenOptions::new().create(true).append(true).open(path)
}

/// Initialize the global log writer
///
/// Should be called once at startup. Returns error if the log file cannot be
/// opened or a writer is already installed.
pub fn init(log_file: Option<&Path>) -> io::Result<()> {
    let writer = LogWriter::new(log_file)?;
    LOG_WRITER.set(writer).map_err(|_| {
        io::Error::new(
            io::ErrorKind::AlreadyExists,
            "Log writer already initialized",
        )
    })
}

/// Write through the global writer, or straight to stderr before `init`
pub fn write(message: &str) {
    match LOG_WRITER.get() {
        Some(writer) => writer.write_line(message),
        None => eprintln!("{}", decorate(message)),
    }
}
