use crate::error::IoFailure;
use crate::record::Level;
use crate::sink::Sink;
use std::fmt;
use std::path::{Path, PathBuf};

pub(crate) type ErrorHandler = Box<dyn Fn(&IoFailure) + Send + Sync>;

/// Configuration for a [`Registry`](crate::Registry).
///
/// Defaults mirror a conventional rolling-file setup: 512 KiB per file,
/// five backups, immediate flush, console appender on, file appender off
/// until a path is given.
pub struct Config {
    pub(crate) root_level: Level,
    pub(crate) overrides: Vec<(String, Level)>,
    pub(crate) use_file_appender: bool,
    pub(crate) file_name: Option<PathBuf>,
    pub(crate) max_file_size: u64,
    pub(crate) max_backup_count: u32,
    pub(crate) immediate_flush: bool,
    pub(crate) file_pattern: String,
    pub(crate) use_console_appender: bool,
    pub(crate) console_pattern: String,
    pub(crate) filter: Option<env_filter::Filter>,
    pub(crate) error_handler: Option<ErrorHandler>,
    pub(crate) extra_sinks: Vec<(String, Box<dyn Sink>)>,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            root_level: Level::Info,
            overrides: Vec::new(),
            use_file_appender: false,
            file_name: None,
            max_file_size: 512 * 1024,
            max_backup_count: 5,
            immediate_flush: true,
            file_pattern: "%d - [%p::%c] - %m%n".to_owned(),
            use_console_appender: true,
            console_pattern: "%m%n".to_owned(),
            filter: None,
            error_handler: None,
            extra_sinks: Vec::new(),
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("root_level", &self.root_level)
            .field("overrides", &self.overrides)
            .field("use_file_appender", &self.use_file_appender)
            .field("file_name", &self.file_name)
            .field("max_file_size", &self.max_file_size)
            .field("max_backup_count", &self.max_backup_count)
            .field("immediate_flush", &self.immediate_flush)
            .field("file_pattern", &self.file_pattern)
            .field("use_console_appender", &self.use_console_appender)
            .field("console_pattern", &self.console_pattern)
            .field("filter", &self.filter)
            .field(
                "error_handler",
                match &self.error_handler {
                    Some(_) => &"Some(_)",
                    None => &"None",
                },
            )
            .field("extra_sinks", &self.extra_sinks.len())
            .finish()
    }
}

impl Config {
    /// Minimum level applied when no per-prefix override matches.
    pub fn with_root_level(mut self, level: Level) -> Self {
        self.root_level = level;
        self
    }

    /// Minimum level for loggers whose name starts with `prefix`.
    ///
    /// The longest matching prefix wins; registering the same prefix twice
    /// keeps the later entry.
    pub fn with_level(mut self, prefix: impl Into<String>, level: Level) -> Self {
        self.overrides.push((prefix.into(), level));
        self
    }

    /// Path of the active log file. Enables the file appender.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        self.file_name = Some(path.as_ref().to_owned());
        self.use_file_appender = true;
        self
    }

    pub fn with_file_appender(mut self, enabled: bool) -> Self {
        self.use_file_appender = enabled;
        self
    }

    /// Size threshold (bytes) that triggers rotation. Must be positive.
    pub fn with_max_file_size(mut self, bytes: u64) -> Self {
        self.max_file_size = bytes;
        self
    }

    /// Number of rotated backups to retain. Zero truncates with no history.
    pub fn with_max_backup_count(mut self, count: u32) -> Self {
        self.max_backup_count = count;
        self
    }

    /// Flush the file to durable storage after every write.
    pub fn with_immediate_flush(mut self, enabled: bool) -> Self {
        self.immediate_flush = enabled;
        self
    }

    /// Line pattern for the file appender, e.g.
    /// `"%d{yyyy-MM-dd HH:mm:ss,SSS} %-5p [%t] [%c{2}]-[%L] %m%n"`.
    pub fn with_file_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.file_pattern = pattern.into();
        self
    }

    pub fn with_console_appender(mut self, enabled: bool) -> Self {
        self.use_console_appender = enabled;
        self
    }

    /// Line pattern for the console appender.
    pub fn with_console_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.console_pattern = pattern.into();
        self
    }

    /// Additional filter applied to records arriving through the `log`
    /// facade, on top of the per-prefix level gate.
    pub fn with_filter(mut self, filter: env_filter::Filter) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Warning channel for sink failures. Logging calls themselves never
    /// fail; each sink error is delivered here instead.
    pub fn with_error_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&IoFailure) + Send + Sync + 'static,
    {
        self.error_handler = Some(Box::new(handler));
        self
    }

    /// Attaches a custom sink with its own line pattern.
    pub fn with_sink(mut self, pattern: impl Into<String>, sink: Box<dyn Sink>) -> Self {
        self.extra_sinks.push((pattern.into(), sink));
        self
    }

    /// Most verbose level anywhere in this configuration, used to seed
    /// `log::set_max_level` when the registry backs the `log` facade.
    pub(crate) fn most_verbose_level(&self) -> Level {
        self.overrides
            .iter()
            .map(|(_, level)| *level)
            .fold(self.root_level, Level::min)
    }
}
