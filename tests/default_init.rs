use rolling_logger::Level;

// Obtaining and using loggers before any configuration must be safe: the
// registry falls back to a console-only, Info-level pipeline.
#[test]
fn default_init() {
    let log = rolling_logger::logger("com.app.main");

    assert!(log.is_enabled(Level::Info));
    assert!(log.is_enabled(Level::Fatal));
    assert!(!log.is_enabled(Level::Debug));

    log.info("logged before any configure call", &[]);
    log.debug("filtered before any configure call", &[]);
}
