//! Sample log output at every severity
//!
//! Each invocation writes one line per level to the console. The line is also
//! traced at TRACE under the `console` target, which the default filter drops,
//! so stderr shows it once. A failure on one level is reported and does not
//! stop the others.

use std::fmt;
use std::io::{self, Write};
use std::sync::Mutex;

use chrono::{SecondsFormat, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
    Log,
}

impl Level {
    pub const ALL: [Level; 5] = [Level::Debug, Level::Info, Level::Warn, Level::Error, Level::Log];

    pub fn as_str(self) -> &'static str {
        match self {
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
            Level::Log => "log",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Line-oriented console over any writer. Defaults to stderr, since stdout is
/// reserved for IPC frames.
pub struct Console {
    out: Mutex<Box<dyn Write + Send>>,
}

impl Console {
    pub fn new(out: Box<dyn Write + Send>) -> Self {
        Self { out: Mutex::new(out) }
    }

    pub fn stderr() -> Self {
        Self::new(Box::new(io::stderr()))
    }

    /// Write one message at `level`.
    pub fn write(&self, level: Level, message: &str) -> io::Result<()> {
        tracing::trace!(target: "console", %level, "{}", message);

        let mut out = self
            .out
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "console writer poisoned"))?;
        writeln!(
            out,
            "{} [{}] {}",
            Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            level,
            message
        )?;
        out.flush()
    }

    /// Emit `This is console.<level> message` at every level.
    ///
    /// Returns the number of levels that failed to write.
    pub fn emit_samples(&self) -> usize {
        let mut failures = 0;
        for level in Level::ALL {
            let message = format!("This is console.{} message", level);
            if let Err(e) = self.write(level, &message) {
                failures += 1;
                tracing::warn!(%level, "Console write failed: {}", e);
                eprintln!("console.{} failed: {}", level, e);
            }
        }
        failures
    }
}

impl Default for Console {
    fn default() -> Self {
        Self::stderr()
    }
}

impl fmt::Debug for Console {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Console").finish()
    }
}
