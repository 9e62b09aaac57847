use super::*;
use crate::error::IoFailure;
use std::io;
use std::path::Path;
use std::sync::{Arc, Mutex};

pub(crate) struct MemorySink {
    lines: Arc<Mutex<Vec<String>>>,
}

impl MemorySink {
    pub(crate) fn new() -> (MemorySink, Arc<Mutex<Vec<String>>>) {
        let lines = Arc::new(Mutex::new(Vec::new()));
        (
            MemorySink {
                lines: Arc::clone(&lines),
            },
            lines,
        )
    }
}

impl Sink for MemorySink {
    fn name(&self) -> &str {
        "memory"
    }

    fn write(&self, line: &str) -> Result<(), IoFailure> {
        self.lines.lock().unwrap().push(line.to_owned());
        Ok(())
    }
}

struct FailingSink;

impl Sink for FailingSink {
    fn name(&self) -> &str {
        "failing"
    }

    fn write(&self, _line: &str) -> Result<(), IoFailure> {
        Err(IoFailure::new(
            self.name(),
            io::Error::new(io::ErrorKind::Other, "boom"),
        ))
    }
}

#[test]
fn check_config_values() {
    let config = Config::default()
        .with_root_level(Level::Warn)
        .with_level("com.app", Level::Debug)
        .with_file("/tmp/app.log")
        .with_max_file_size(1024)
        .with_max_backup_count(3)
        .with_immediate_flush(false)
        .with_file_pattern("%m%n");

    assert_eq!(config.root_level, Level::Warn);
    assert_eq!(config.overrides, vec![("com.app".to_owned(), Level::Debug)]);
    assert!(config.use_file_appender);
    assert_eq!(config.file_name.as_deref(), Some(Path::new("/tmp/app.log")));
    assert_eq!(config.max_file_size, 1024);
    assert_eq!(config.max_backup_count, 3);
    assert!(!config.immediate_flush);
    assert_eq!(config.file_pattern, "%m%n");
}

#[test]
fn config_defaults_match_conventions() {
    let config = Config::default();
    assert_eq!(config.root_level, Level::Info);
    assert_eq!(config.max_file_size, 512 * 1024);
    assert_eq!(config.max_backup_count, 5);
    assert!(config.immediate_flush);
    assert!(config.use_console_appender);
    assert!(!config.use_file_appender);
}

#[test]
fn most_verbose_level_considers_overrides() {
    let config = Config::default()
        .with_root_level(Level::Warn)
        .with_level("com.app.net", Level::Trace);
    assert_eq!(config.most_verbose_level(), Level::Trace);
}

#[test]
fn unconfigured_registry_defaults_to_info() {
    let registry = Registry::new();
    assert!(registry.is_enabled("any.name", Level::Info));
    assert!(registry.is_enabled("any.name", Level::Fatal));
    assert!(!registry.is_enabled("any.name", Level::Debug));

    // Logging before configure must be safe.
    registry.logger("any.name").info("ok", &[]);
}

#[test]
fn level_gate_controls_sink_writes() {
    let (sink_a, lines_a) = MemorySink::new();
    let (sink_b, lines_b) = MemorySink::new();
    let registry = Registry::new();
    registry
        .configure(
            Config::default()
                .with_console_appender(false)
                .with_root_level(Level::Info)
                .with_sink("%-5p %m%n", Box::new(sink_a))
                .with_sink("%m%n", Box::new(sink_b)),
        )
        .expect("configure");

    let log = registry.logger("com.app");
    log.debug("dropped", &[]);
    assert!(lines_a.lock().unwrap().is_empty());
    assert!(lines_b.lock().unwrap().is_empty());

    log.info("hello", &[]);
    assert_eq!(
        *lines_a.lock().unwrap(),
        vec![format!("INFO  hello{}", crate::format::LINE_SEP)]
    );
    assert_eq!(
        *lines_b.lock().unwrap(),
        vec![format!("hello{}", crate::format::LINE_SEP)]
    );
}

#[test]
fn sink_failure_is_isolated_and_reported() {
    let (memory, lines) = MemorySink::new();
    let failures = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&failures);
    let registry = Registry::new();
    registry
        .configure(
            Config::default()
                .with_console_appender(false)
                .with_sink("%m%n", Box::new(FailingSink))
                .with_sink("%m%n", Box::new(memory))
                .with_error_handler(move |failure| {
                    seen.lock().unwrap().push(failure.sink.clone());
                }),
        )
        .expect("configure");

    registry.logger("com.app").info("still delivered", &[]);

    assert_eq!(lines.lock().unwrap().len(), 1);
    assert_eq!(*failures.lock().unwrap(), vec!["failing".to_owned()]);
}

#[test]
fn shutdown_is_idempotent_and_blocks_reconfiguration() {
    let registry = Registry::new();
    registry.configure(Config::default()).expect("configure");

    registry.shutdown();
    registry.shutdown();

    assert!(matches!(
        registry.configure(Config::default()),
        Err(ConfigError::AlreadyShutDown)
    ));
    // Logging after shutdown is a silent no-op.
    assert!(!registry.is_enabled("com.app", Level::Fatal));
    registry.logger("com.app").fatal("dropped", &[]);
}

#[test]
fn reconfigure_replaces_previous_set() {
    let registry = Registry::new();
    registry
        .configure(Config::default().with_level("com.app", Level::Trace))
        .expect("first configure");
    assert!(registry.is_enabled("com.app.main", Level::Trace));

    registry
        .configure(Config::default().with_root_level(Level::Error))
        .expect("second configure");
    // The override from the first call is gone, not merged.
    assert!(!registry.is_enabled("com.app.main", Level::Trace));
    assert!(!registry.is_enabled("com.app.main", Level::Warn));
    assert!(registry.is_enabled("com.app.main", Level::Error));
}

#[test]
fn configure_validates_file_settings() {
    let registry = Registry::new();
    assert!(matches!(
        registry.configure(Config::default().with_file_appender(true)),
        Err(ConfigError::EmptyPath)
    ));
    assert!(matches!(
        registry.configure(
            Config::default()
                .with_file("/tmp/app.log")
                .with_max_file_size(0)
        ),
        Err(ConfigError::ZeroFileSize)
    ));
}

#[test]
fn facade_enabled_threshold() {
    use log::Log as _;

    let registry = Registry::new();
    registry
        .configure(Config::default().with_root_level(Level::Info))
        .expect("configure");

    assert!(registry.enabled(&log::MetadataBuilder::new().level(log::Level::Warn).build()));
    assert!(registry.enabled(&log::MetadataBuilder::new().level(log::Level::Info).build()));
    assert!(!registry.enabled(&log::MetadataBuilder::new().level(log::Level::Debug).build()));
}

#[test]
fn facade_record_carries_call_site_line() {
    let (memory, lines) = MemorySink::new();
    let registry = Registry::new();
    registry
        .configure(
            Config::default()
                .with_console_appender(false)
                .with_sink("%c:%L %m%n", Box::new(memory)),
        )
        .expect("configure");

    log::Log::log(
        &registry,
        &log::Record::builder()
            .level(log::Level::Info)
            .target("com.app")
            .line(Some(7))
            .args(format_args!("hi"))
            .build(),
    );
    assert_eq!(
        *lines.lock().unwrap(),
        vec![format!("com.app:7 hi{}", crate::format::LINE_SEP)]
    );
}

// The filter itself is env_filter's business; this only checks it gates the
// facade path.
#[test]
fn facade_filter_matches() {
    use log::Log as _;

    let (memory, lines) = MemorySink::new();
    let registry = Registry::new();
    registry
        .configure(
            Config::default()
                .with_console_appender(false)
                .with_root_level(Level::Trace)
                .with_filter(FilterBuilder::new().parse("info").build())
                .with_sink("%m%n", Box::new(memory)),
        )
        .expect("configure");

    log::Log::log(
        &registry,
        &log::Record::builder()
            .level(log::Level::Debug)
            .target("com.app")
            .args(format_args!("filtered out"))
            .build(),
    );
    assert!(lines.lock().unwrap().is_empty());

    log::Log::log(
        &registry,
        &log::Record::builder()
            .level(log::Level::Info)
            .target("com.app")
            .args(format_args!("admitted"))
            .build(),
    );
    assert_eq!(
        *lines.lock().unwrap(),
        vec![format!("admitted{}", crate::format::LINE_SEP)]
    );
}
