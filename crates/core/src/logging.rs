//! Logging plumbing for the emulator cores.
//!
//! Cores never print directly: each one holds a [`Logger`] handed to it at
//! construction, and the host decides where messages go by installing a
//! [`LogSink`]. The default sink writes to stderr, which is what the
//! headless CLI wants; a GUI shell would install its own terminal-window
//! sink instead.
//!
//! `warn_once` exists for pipeline paths that would otherwise flood the log
//! (unimplemented blend modes, degenerate blender multipliers, and the
//! like): the first occurrence of a key is logged at warn, the rest are
//! dropped.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Mutex};

/// Log level for controlling verbosity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum LogLevel {
    Off = 0,
    Error = 1,
    Warn = 2,
    Info = 3,
    Debug = 4,
    Trace = 5,
}

impl LogLevel {
    /// Parse log level from string (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "off" | "0" => Some(LogLevel::Off),
            "error" | "err" | "1" => Some(LogLevel::Error),
            "warn" | "warning" | "2" => Some(LogLevel::Warn),
            "info" | "3" => Some(LogLevel::Info),
            "debug" | "4" => Some(LogLevel::Debug),
            "trace" | "5" => Some(LogLevel::Trace),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Off => "off",
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }

    fn from_u8(val: u8) -> Self {
        match val {
            1 => LogLevel::Error,
            2 => LogLevel::Warn,
            3 => LogLevel::Info,
            4 => LogLevel::Debug,
            5 => LogLevel::Trace,
            _ => LogLevel::Off,
        }
    }
}

/// Host-provided message sink. Implementations must be callable from the
/// emulation thread.
pub trait LogSink: Send + Sync {
    fn log(&self, level: LogLevel, target: &str, message: &str);
}

/// Default sink: one line per message on stderr.
pub struct StderrSink;

impl LogSink for StderrSink {
    fn log(&self, level: LogLevel, target: &str, message: &str) {
        eprintln!("[{}] {}: {}", level.as_str(), target, message);
    }
}

/// A cheaply clonable logging handle owned by a core. Clones share the
/// sink, the level, and the once-key set.
#[derive(Clone)]
pub struct Logger {
    target: &'static str,
    sink: Arc<dyn LogSink>,
    level: Arc<AtomicU8>,
    once_keys: Arc<Mutex<HashSet<&'static str>>>,
}

impl Logger {
    /// Logger with the default stderr sink, enabled at Warn.
    pub fn new(target: &'static str) -> Self {
        Self::with_sink(target, Arc::new(StderrSink))
    }

    pub fn with_sink(target: &'static str, sink: Arc<dyn LogSink>) -> Self {
        Self {
            target,
            sink,
            level: Arc::new(AtomicU8::new(LogLevel::Warn as u8)),
            once_keys: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    pub fn set_level(&self, level: LogLevel) {
        self.level.store(level as u8, Ordering::Relaxed);
    }

    pub fn level(&self) -> LogLevel {
        LogLevel::from_u8(self.level.load(Ordering::Relaxed))
    }

    pub fn enabled(&self, level: LogLevel) -> bool {
        level != LogLevel::Off && level <= self.level()
    }

    pub fn warn(&self, message: &str) {
        if self.enabled(LogLevel::Warn) {
            self.sink.log(LogLevel::Warn, self.target, message);
        }
    }

    pub fn info(&self, message: &str) {
        if self.enabled(LogLevel::Info) {
            self.sink.log(LogLevel::Info, self.target, message);
        }
    }

    pub fn debug(&self, message: &str) {
        if self.enabled(LogLevel::Debug) {
            self.sink.log(LogLevel::Debug, self.target, message);
        }
    }

    /// Log `message` at warn the first time `key` is seen, then never again.
    pub fn warn_once(&self, key: &'static str, message: &str) {
        if !self.enabled(LogLevel::Warn) {
            return;
        }
        let mut seen = self.once_keys.lock().unwrap();
        if seen.insert(key) {
            self.sink.log(LogLevel::Warn, self.target, message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    struct CountingSink {
        count: AtomicUsize,
    }

    impl LogSink for CountingSink {
        fn log(&self, _level: LogLevel, _target: &str, _message: &str) {
            self.count.fetch_add(1, Ordering::Relaxed);
        }
    }

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(LogLevel::parse("off"), Some(LogLevel::Off));
        assert_eq!(LogLevel::parse("OFF"), Some(LogLevel::Off));
        assert_eq!(LogLevel::parse("0"), Some(LogLevel::Off));

        assert_eq!(LogLevel::parse("error"), Some(LogLevel::Error));
        assert_eq!(LogLevel::parse("ERR"), Some(LogLevel::Error));
        assert_eq!(LogLevel::parse("warn"), Some(LogLevel::Warn));
        assert_eq!(LogLevel::parse("WARNING"), Some(LogLevel::Warn));
        assert_eq!(LogLevel::parse("info"), Some(LogLevel::Info));
        assert_eq!(LogLevel::parse("debug"), Some(LogLevel::Debug));
        assert_eq!(LogLevel::parse("trace"), Some(LogLevel::Trace));
        assert_eq!(LogLevel::parse("5"), Some(LogLevel::Trace));

        assert_eq!(LogLevel::parse("invalid"), None);
    }

    #[test]
    fn test_log_level_ordering() {
        assert!(LogLevel::Off < LogLevel::Error);
        assert!(LogLevel::Error < LogLevel::Warn);
        assert!(LogLevel::Warn < LogLevel::Info);
        assert!(LogLevel::Info < LogLevel::Debug);
        assert!(LogLevel::Debug < LogLevel::Trace);
    }

    #[test]
    fn test_level_gating() {
        let sink = Arc::new(CountingSink {
            count: AtomicUsize::new(0),
        });
        let logger = Logger::with_sink("test", sink.clone());

        // Default level is Warn: warn passes, debug doesn't.
        logger.warn("a");
        logger.debug("b");
        assert_eq!(sink.count.load(Ordering::Relaxed), 1);

        logger.set_level(LogLevel::Debug);
        logger.debug("c");
        assert_eq!(sink.count.load(Ordering::Relaxed), 2);

        logger.set_level(LogLevel::Off);
        logger.warn("d");
        assert_eq!(sink.count.load(Ordering::Relaxed), 2);
    }

    #[test]
    fn test_warn_once() {
        let sink = Arc::new(CountingSink {
            count: AtomicUsize::new(0),
        });
        let logger = Logger::with_sink("test", sink.clone());

        logger.warn_once("key-a", "first");
        logger.warn_once("key-a", "second");
        logger.warn_once("key-a", "third");
        assert_eq!(sink.count.load(Ordering::Relaxed), 1);

        logger.warn_once("key-b", "other key still fires");
        assert_eq!(sink.count.load(Ordering::Relaxed), 2);
    }

    #[test]
    fn test_clones_share_once_set() {
        let sink = Arc::new(CountingSink {
            count: AtomicUsize::new(0),
        });
        let logger = Logger::with_sink("test", sink.clone());
        let clone = logger.clone();

        logger.warn_once("shared", "x");
        clone.warn_once("shared", "y");
        assert_eq!(sink.count.load(Ordering::Relaxed), 1);
    }
}
