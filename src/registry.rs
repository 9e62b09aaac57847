use crate::config::{Config, ErrorHandler};
use crate::error::{ConfigError, IoFailure};
use crate::filter::LevelMap;
use crate::format::Formatter;
use crate::record::{Level, LogRecord, Value};
use crate::rolling_file::RollingFileSink;
use crate::sink::{ConsoleSink, Sink};
use std::io::Write as _;
use std::sync::{Arc, OnceLock, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Process-wide mapping from logger names to configured sinks and levels.
///
/// Cheap to clone; all clones share one underlying state. The lifecycle is
/// `UNCONFIGURED -> CONFIGURED -> SHUTDOWN`: [`Registry::configure`] replaces
/// the full configuration, [`Registry::shutdown`] flushes and closes the
/// sinks. Before any configuration, loggers fall back to a console-only,
/// `Info`-level pipeline, so obtaining and using a logger is always safe.
#[derive(Clone, Default)]
pub struct Registry {
    inner: Arc<RwLock<State>>,
}

#[derive(Default)]
enum State {
    #[default]
    Unconfigured,
    Configured(Pipeline),
    Shutdown,
}

struct Pipeline {
    levels: LevelMap,
    filter: Option<env_filter::Filter>,
    error_handler: Option<ErrorHandler>,
    sinks: Vec<(Formatter, Box<dyn Sink>)>,
}

impl Pipeline {
    fn dispatch(&self, record: &LogRecord) {
        for (formatter, sink) in &self.sinks {
            let line = formatter.render(record);
            if let Err(failure) = sink.write(&line) {
                self.report(&failure);
            }
        }
    }

    fn flush(&self) {
        for (_, sink) in &self.sinks {
            if let Err(failure) = sink.flush() {
                self.report(&failure);
            }
        }
    }

    fn report(&self, failure: &IoFailure) {
        match &self.error_handler {
            Some(handler) => handler(failure),
            // Internal reporting must not recurse into logging; note the
            // failure on stderr, best-effort.
            None => {
                let _ = writeln!(std::io::stderr().lock(), "rolling_logger: {failure}");
            }
        }
    }

    fn filter_matches(&self, record: &log::Record) -> bool {
        match &self.filter {
            Some(filter) => filter.matches(record),
            None => true,
        }
    }
}

/// Pipeline used while the registry is unconfigured.
fn default_pipeline() -> &'static Pipeline {
    static DEFAULT: OnceLock<Pipeline> = OnceLock::new();
    DEFAULT.get_or_init(|| Pipeline {
        levels: LevelMap::default(),
        filter: None,
        error_handler: None,
        sinks: vec![(Formatter::new("%m%n"), Box::new(ConsoleSink))],
    })
}

impl Registry {
    pub fn new() -> Registry {
        Registry::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, State> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, State> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Installs `config`, replacing any previous configuration in full.
    ///
    /// The previous pipeline's sinks are flushed and closed first. Fails
    /// with [`ConfigError::AlreadyShutDown`] once [`Registry::shutdown`]
    /// has run; validation problems (missing path, zero size threshold,
    /// unopenable file) surface here rather than at the first log call.
    pub fn configure(&self, config: Config) -> Result<(), ConfigError> {
        let Config {
            root_level,
            overrides,
            use_file_appender,
            file_name,
            max_file_size,
            max_backup_count,
            immediate_flush,
            file_pattern,
            use_console_appender,
            console_pattern,
            filter,
            error_handler,
            extra_sinks,
        } = config;

        let mut state = self.write();
        if matches!(*state, State::Shutdown) {
            return Err(ConfigError::AlreadyShutDown);
        }

        let mut sinks: Vec<(Formatter, Box<dyn Sink>)> = Vec::new();
        if use_console_appender {
            sinks.push((Formatter::new(&console_pattern), Box::new(ConsoleSink)));
        }
        if use_file_appender {
            let path = match file_name {
                Some(path) if !path.as_os_str().is_empty() => path,
                _ => return Err(ConfigError::EmptyPath),
            };
            if max_file_size == 0 {
                return Err(ConfigError::ZeroFileSize);
            }
            let sink =
                RollingFileSink::new(&path, max_file_size, max_backup_count, immediate_flush)
                    .map_err(|source| ConfigError::Io { path, source })?;
            sinks.push((Formatter::new(&file_pattern), Box::new(sink)));
        }
        for (pattern, sink) in extra_sinks {
            sinks.push((Formatter::new(&pattern), sink));
        }

        if let State::Configured(old) = &*state {
            old.flush();
        }
        *state = State::Configured(Pipeline {
            levels: LevelMap::new(root_level, overrides),
            filter,
            error_handler,
            sinks,
        });
        Ok(())
    }

    /// Returns a named logger handle. Never fails; before `configure` the
    /// handle is backed by the console-only default pipeline.
    pub fn logger(&self, name: &str) -> Logger {
        Logger {
            registry: self.clone(),
            name: name.to_owned(),
        }
    }

    /// Whether a record for `name` at `level` would reach any sink.
    pub fn is_enabled(&self, name: &str, level: Level) -> bool {
        let state = self.read();
        match &*state {
            State::Configured(pipeline) => pipeline.levels.enabled(name, level),
            State::Unconfigured => default_pipeline().levels.enabled(name, level),
            State::Shutdown => false,
        }
    }

    /// Filters, formats and dispatches one record to every configured sink.
    ///
    /// Fire-and-forget: sink failures go to the warning channel, never to
    /// the caller. A shut-down registry drops the record silently.
    pub fn log(&self, name: &str, level: Level, template: &str, args: &[Value]) {
        let state = self.read();
        let pipeline = match &*state {
            State::Configured(pipeline) => pipeline,
            State::Unconfigured => default_pipeline(),
            State::Shutdown => return,
        };
        if !pipeline.levels.enabled(name, level) {
            return;
        }
        let record = LogRecord::new(name, level, template, args);
        pipeline.dispatch(&record);
    }

    /// Flushes every sink.
    pub fn flush(&self) {
        let state = self.read();
        match &*state {
            State::Configured(pipeline) => pipeline.flush(),
            State::Unconfigured | State::Shutdown => {}
        }
    }

    /// Flushes and closes all sinks and refuses further configuration.
    /// Idempotent; loggers obtained earlier become silent no-ops.
    pub fn shutdown(&self) {
        let mut state = self.write();
        if let State::Configured(pipeline) = &*state {
            pipeline.flush();
        }
        // Dropping the pipeline closes the file handles exactly once.
        *state = State::Shutdown;
    }
}

impl log::Log for Registry {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        self.is_enabled(metadata.target(), Level::from(metadata.level()))
    }

    fn log(&self, record: &log::Record) {
        let state = self.read();
        let pipeline = match &*state {
            State::Configured(pipeline) => pipeline,
            State::Unconfigured => default_pipeline(),
            State::Shutdown => return,
        };
        let level = Level::from(record.level());
        if !pipeline.levels.enabled(record.target(), level) {
            return;
        }
        if !pipeline.filter_matches(record) {
            return;
        }
        let record = LogRecord::from_facade(record);
        pipeline.dispatch(&record);
    }

    fn flush(&self) {
        Registry::flush(self);
    }
}

/// Lightweight view over a [`Registry`] bound to one logger name.
#[derive(Clone)]
pub struct Logger {
    registry: Registry,
    name: String,
}

impl Logger {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_enabled(&self, level: Level) -> bool {
        self.registry.is_enabled(&self.name, level)
    }

    pub fn log(&self, level: Level, template: &str, args: &[Value]) {
        self.registry.log(&self.name, level, template, args);
    }

    pub fn trace(&self, template: &str, args: &[Value]) {
        self.log(Level::Trace, template, args);
    }

    pub fn debug(&self, template: &str, args: &[Value]) {
        self.log(Level::Debug, template, args);
    }

    pub fn info(&self, template: &str, args: &[Value]) {
        self.log(Level::Info, template, args);
    }

    pub fn warn(&self, template: &str, args: &[Value]) {
        self.log(Level::Warn, template, args);
    }

    pub fn error(&self, template: &str, args: &[Value]) {
        self.log(Level::Error, template, args);
    }

    pub fn fatal(&self, template: &str, args: &[Value]) {
        self.log(Level::Fatal, template, args);
    }
}
