use rolling_logger::{Config, Level, Registry};
use std::fs;

// The most specific (longest) matching prefix decides the effective level.
#[test]
fn longest_prefix_decides_effective_level() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("app.log");
    let registry = Registry::new();
    registry
        .configure(
            Config::default()
                .with_console_appender(false)
                .with_file(&path)
                .with_file_pattern("%c %-5p %m%n")
                .with_root_level(Level::Warn)
                .with_level("com.app", Level::Info)
                .with_level("com.app.net", Level::Debug),
        )
        .expect("configure");

    registry
        .logger("com.app.net.client")
        .debug("admitted by the com.app.net override", &[]);
    registry
        .logger("com.app.ui")
        .debug("dropped, com.app says Info", &[]);
    registry
        .logger("org.other")
        .info("dropped, root says Warn", &[]);
    registry.shutdown();

    let contents = fs::read_to_string(&path).expect("log file");
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].starts_with("com.app.net.client DEBUG"));
}
