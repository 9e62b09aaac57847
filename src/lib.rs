// Copyright 2024 The rolling_logger Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! A logger with a size-rotating file appender, console output and
//! log4j-style pattern layouts.
//!
//! The core is an explicit [`Registry`]: it owns the sinks and the level
//! configuration, and hands out lightweight [`Logger`] views. Registries are
//! independent, so tests (or embedders) can run several side by side. For
//! the common single-logger process there is also a `log`-facade bridge.
//!
//! ## Example
//!
//! ```
//! use rolling_logger::{Config, Level, Registry, Value};
//!
//! let registry = Registry::new();
//! registry
//!     .configure(Config::default().with_root_level(Level::Debug))
//!     .expect("logging setup");
//!
//! let log = registry.logger("com.app.net");
//! log.info("connected to %s on %d", &[Value::from("peer-1"), Value::from(8080)]);
//!
//! registry.shutdown();
//! ```
//!
//! ## Example with a rotating log file
//!
//! ```no_run
//! use rolling_logger::{Config, Level, Registry};
//!
//! let registry = Registry::new();
//! registry
//!     .configure(
//!         Config::default()
//!             .with_file("/var/log/app/app.log")
//!             .with_max_file_size(2 * 1024 * 1024)
//!             .with_max_backup_count(21)
//!             .with_file_pattern("%d{yyyy-MM-dd HH:mm:ss,SSS} %-5p [%t] [%c{2}]-[%L] %m%n")
//!             .with_level("com.app.net", Level::Debug),
//!     )
//!     .expect("logging setup");
//! ```
//!
//! ## Example as the `log` facade backend
//!
//! ```
//! use rolling_logger::{Config, Level};
//!
//! rolling_logger::init(Config::default().with_root_level(Level::Trace))
//!     .expect("logging setup");
//!
//! log::debug!("this is a debug {}", "message");
//! log::error!("this is printed by default");
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::OnceLock;

pub use config::Config;
pub use env_filter::{Builder as FilterBuilder, Filter};
pub use error::{ConfigError, IoFailure};
pub use record::{Level, LogRecord, Value};
pub use registry::{Logger, Registry};
pub use rolling_file::RollingFileSink;
pub use sink::{ConsoleSink, Sink};

mod config;
mod error;
mod filter;
mod format;
mod record;
mod registry;
mod rolling_file;
mod sink;
#[cfg(test)]
mod tests;

static REGISTRY: OnceLock<Registry> = OnceLock::new();
static FACADE_INSTALLED: AtomicBool = AtomicBool::new(false);

/// The process-global registry used by [`init`] and [`logger`].
///
/// Usable before [`init`]: loggers then fall back to the console-only,
/// `Info`-level default pipeline.
pub fn registry() -> &'static Registry {
    REGISTRY.get_or_init(Registry::new)
}

/// Returns a named logger from the global registry.
pub fn logger(name: &str) -> Logger {
    registry().logger(name)
}

/// Configures the global registry and installs it as the `log` facade
/// backend.
///
/// Calling this again replaces the previous configuration in full (the
/// registry contract); the facade installation itself happens once and any
/// other logger already owning the facade is left alone.
pub fn init(config: Config) -> Result<(), ConfigError> {
    let max_level = config.most_verbose_level().to_facade_filter();
    let registry = registry();
    registry.configure(config)?;

    if log::set_logger(registry).is_ok() {
        FACADE_INSTALLED.store(true, Ordering::SeqCst);
    }
    if FACADE_INSTALLED.load(Ordering::SeqCst) {
        log::set_max_level(max_level);
    }
    Ok(())
}
