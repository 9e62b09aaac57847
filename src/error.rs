use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Configuration problems surfaced synchronously from [`Registry::configure`].
///
/// [`Registry::configure`]: crate::Registry::configure
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("file appender is enabled but no log file path was given")]
    EmptyPath,

    #[error("max_file_size must be greater than zero")]
    ZeroFileSize,

    #[error("registry has been shut down")]
    AlreadyShutDown,

    #[error("failed to open log file {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A sink failed to accept a formatted line.
///
/// Never raised to the logging caller; delivered through the error handler
/// installed with [`Config::with_error_handler`] (or noted on stderr when
/// none is installed).
///
/// [`Config::with_error_handler`]: crate::Config::with_error_handler
#[derive(Debug, Error)]
#[error("sink {sink} failed to write")]
pub struct IoFailure {
    pub sink: String,
    #[source]
    pub source: io::Error,
}

impl IoFailure {
    pub(crate) fn new(sink: &str, source: io::Error) -> IoFailure {
        IoFailure {
            sink: sink.to_owned(),
            source,
        }
    }
}
