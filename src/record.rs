use chrono::{DateTime, Local};
use std::fmt;

/// Severity of a log record, ordered from most to least verbose.
///
/// `Fatal` has no `log::Level` counterpart; it is only reachable through
/// the native API and maps to `log::Level::Error` at the facade boundary.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Level {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
}

impl Level {
    pub fn as_str(self) -> &'static str {
        match self {
            Level::Trace => "TRACE",
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
            Level::Fatal => "FATAL",
        }
    }

    pub(crate) fn to_facade(self) -> log::Level {
        match self {
            Level::Trace => log::Level::Trace,
            Level::Debug => log::Level::Debug,
            Level::Info => log::Level::Info,
            Level::Warn => log::Level::Warn,
            Level::Error | Level::Fatal => log::Level::Error,
        }
    }

    pub(crate) fn to_facade_filter(self) -> log::LevelFilter {
        self.to_facade().to_level_filter()
    }
}

impl From<log::Level> for Level {
    fn from(level: log::Level) -> Level {
        match level {
            log::Level::Trace => Level::Trace,
            log::Level::Debug => Level::Debug,
            log::Level::Info => Level::Info,
            log::Level::Warn => Level::Warn,
            log::Level::Error => Level::Error,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An opaque message argument, substituted into the message template at
/// `%s`/`%d`/`%b` markers.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => f.write_str(s),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Value {
        Value::Str(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Value {
        Value::Str(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Value {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Value {
        Value::Int(i64::from(i))
    }
}

impl From<u32> for Value {
    fn from(i: u32) -> Value {
        Value::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Value {
        Value::Float(x)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Value {
        Value::Bool(b)
    }
}

/// A single log event, immutable once constructed.
#[derive(Clone, Debug)]
pub struct LogRecord {
    pub logger_name: String,
    pub level: Level,
    pub message_template: String,
    pub args: Vec<Value>,
    pub timestamp: DateTime<Local>,
    pub thread: String,
    /// Call-site line, when known. The `log` facade bridge fills this from
    /// `Record::line()`; the native API leaves it unset.
    pub line: Option<u32>,
}

impl LogRecord {
    pub fn new(logger_name: &str, level: Level, template: &str, args: &[Value]) -> LogRecord {
        LogRecord {
            logger_name: logger_name.to_owned(),
            level,
            message_template: template.to_owned(),
            args: args.to_vec(),
            timestamp: Local::now(),
            thread: current_thread_label(),
            line: None,
        }
    }

    pub(crate) fn from_facade(record: &log::Record) -> LogRecord {
        LogRecord {
            logger_name: record.target().to_owned(),
            level: Level::from(record.level()),
            // The facade already rendered the arguments; keep the message
            // verbatim by carrying no args of our own.
            message_template: record.args().to_string(),
            args: Vec::new(),
            timestamp: Local::now(),
            thread: current_thread_label(),
            line: record.line(),
        }
    }
}

fn current_thread_label() -> String {
    let current = std::thread::current();
    match current.name() {
        Some(name) => name.to_owned(),
        None => format!("{:?}", current.id()),
    }
}
