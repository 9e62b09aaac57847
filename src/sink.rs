use crate::error::IoFailure;
use std::io::{self, Write};

/// A destination for formatted log lines.
///
/// Implementations must be safe to call from multiple threads; each `write`
/// is one atomic unit per sink, so concurrent callers never interleave
/// partial lines.
pub trait Sink: Send + Sync {
    /// Short name used in failure reports ("file", "console", ...).
    fn name(&self) -> &str;

    fn write(&self, line: &str) -> Result<(), IoFailure>;

    fn flush(&self) -> Result<(), IoFailure> {
        Ok(())
    }
}

/// Writes lines to the process's standard output.
///
/// Best-effort: a failed write is retried once and then dropped, so console
/// loss never reaches the caller or the warning channel.
#[derive(Debug, Default)]
pub struct ConsoleSink;

impl Sink for ConsoleSink {
    fn name(&self) -> &str {
        "console"
    }

    fn write(&self, line: &str) -> Result<(), IoFailure> {
        let mut stdout = io::stdout().lock();
        if stdout.write_all(line.as_bytes()).is_err() {
            let _ = stdout.write_all(line.as_bytes());
        }
        Ok(())
    }

    fn flush(&self) -> Result<(), IoFailure> {
        let _ = io::stdout().lock().flush();
        Ok(())
    }
}
