use core::{
    fmt::{self, Arguments, Display},
    str::FromStr,
    sync::atomic::{self, AtomicU8},
};
use std::{
    fmt::Write as _,
    io::{self, Write as _},
    time::{Duration, Instant},
};
use once_cell::sync::Lazy;
use parking_lot::{const_mutex, const_rwlock, Mutex, RwLock};

// Only holds the address of the installed logger, the logger itself is internally synchronized
static LOGGER : RwLock<Option<&'static Logger>> = const_rwlock(None);

static START : Lazy<Instant> = Lazy::new(Instant::now);

/// Install the global logger used by the `log_*!` macros.
pub fn set_logger(logger: &'static Logger) {
    *LOGGER.write() = Some(logger);
}

/// Get the global logger.
///
/// # Panics
///
/// Panics when no logger was set using [`set_logger`].
pub fn get_logger() -> &'static Logger {
    match try_get_logger() {
        Some(logger) => logger,
        None => panic!("Logger was not set"),
    }
}

/// Get the global logger, if one was set.
pub fn try_get_logger() -> Option<&'static Logger> {
    *LOGGER.read()
}

/// Logging level
#[repr(u8)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub enum LogLevel {
    /// Severe error: will probably result in a crash
    Severe,
    /// Error: may not result in a crash
    Error,
    /// Warning: While not as bad as an error, it may result to something like a performance regression
    Warning,
    /// General info
    Info,
    /// Verbose info
    Verbose,
    /// Debug info (includes verbose info)
    Debug,
}

impl LogLevel {
    const ALL: [LogLevel; 6] = [LogLevel::Severe, LogLevel::Error, LogLevel::Warning, LogLevel::Info, LogLevel::Verbose, LogLevel::Debug];

    /// Lowercase name of the level, as accepted by [`LogLevel::from_str`].
    pub const fn name(self) -> &'static str {
        match self {
            LogLevel::Severe  => "severe",
            LogLevel::Error   => "error",
            LogLevel::Warning => "warning",
            LogLevel::Info    => "info",
            LogLevel::Verbose => "verbose",
            LogLevel::Debug   => "debug",
        }
    }

    fn from_u8(val: u8) -> Self {
        Self::ALL.get(val as usize).copied().unwrap_or(LogLevel::Debug)
    }
}

impl Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Severe  => f.write_str("\x1B[1m\x1B[41m\x1B[30m[SEVERE ]\x1B[0m"),
            LogLevel::Error   => f.write_str(               "\x1B[91m[ERROR  ]\x1B[0m"),
            LogLevel::Warning => f.write_str(               "\x1B[93m[WARNING]\x1B[0m"),
            LogLevel::Info    => f.write_str(               "\x1B[37m[INFO   ]\x1B[0m"),
            LogLevel::Verbose => f.write_str(               "\x1B[90m[VERBOSE]\x1B[0m"),
            LogLevel::Debug   => f.write_str(               "\x1B[94m[DEBUG  ]\x1B[0m"),
        }
    }
}

/// Error returned when a string does not name a [`LogLevel`]
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ParseLogLevelError(String);

impl Display for ParseLogLevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_fmt(format_args!("Unknown log level: '{}'", self.0))
    }
}

impl std::error::Error for ParseLogLevelError {}

impl FromStr for LogLevel {
    type Err = ParseLogLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL.iter()
            .copied()
            .find(|level| level.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ParseLogLevelError(trimmed.to_string()))
    }
}

/// Log category
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct LogCategory {
    category     : &'static str,
    sub_category : Option<&'static str>
}

impl LogCategory {
    pub const fn new(name: &'static str) -> Self {
        Self { category: name, sub_category: None }
    }

    pub const fn new_with_sub(name: &'static str, sub_name: &'static str) -> Self {
        Self { category: name, sub_category: Some(sub_name) }
    }
}

impl Display for LogCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.sub_category {
            Some(sub) => f.write_fmt(format_args!("{}({sub})", self.category)),
            None => f.write_str(self.category),
        }
    }
}

/// Time since the logging clock was first read
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub struct TimeStamp(Duration);

impl TimeStamp {
    pub fn now() -> Self {
        Self(START.elapsed())
    }
}

impl Display for TimeStamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_fmt(format_args!("[{:>6}.{:03}]", self.0.as_secs(), self.0.subsec_millis()))
    }
}

/// Source position and time of a log call, filled in by [`log_location!`]
pub struct LogLocation {
    file : &'static str,
    line : u32,
    time : TimeStamp,
}

impl LogLocation {
    pub const fn new(file: &'static str, line: u32, time: TimeStamp) -> Self {
        Self { file, line, time }
    }
}

struct LogLocationFormatter<'a> {
    loc   : &'a LogLocation,
    level : LogLevel
}

impl<'a> LogLocationFormatter<'a> {
    fn new(loc: &'a LogLocation, level: LogLevel) -> Self {
        Self { loc, level }
    }
}

impl Display for LogLocationFormatter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.level {
            LogLevel::Severe |
            LogLevel::Error |
            LogLevel::Debug => f.write_fmt(format_args!(" ({}:{})", self.loc.file, self.loc.line)),
            LogLevel::Warning |
            LogLevel::Info |
            LogLevel::Verbose => Ok(()),
        }
    }
}

#[macro_export]
macro_rules! log_location {
    () => {
        $crate::LogLocation::new(file!(), line!(), $crate::TimeStamp::now())
    };
}

pub type BoxedWriter = Box<dyn io::Write + Send>;

struct LoggerState {
    writers:        [Option<BoxedWriter>; Self::MAX_WRITERS],
    cache:          String,
    always_flush:   bool,
    log_to_console: bool,
}

impl LoggerState {
    const MAX_WRITERS: usize = 8;
    const CACHE_FLUSH_LIMIT: usize = 4 * 1024;

    const fn new() -> Self {
        // `Option<Box<_>>` is not `Copy`, so the repeat operand has to be a constant
        const NONE: Option<BoxedWriter> = None;

        Self {
            writers: [NONE; Self::MAX_WRITERS],
            cache: String::new(),
            always_flush: false,
            log_to_console: true,
        }
    }

    fn write_message(&mut self, message: &str) {
        self.cache.push_str(message);
    }

    fn format_message(&mut self, fmt_args: Arguments) {
        _ = self.cache.write_fmt(fmt_args);
    }

    fn flush_when_needed(&mut self) {
        if self.always_flush || self.cache.len() > Self::CACHE_FLUSH_LIMIT {
            self.flush();
        }
    }

    fn flush(&mut self) {
        if self.cache.is_empty() {
            return;
        }

        let log_to_console = self.log_to_console;
        let writers = &mut self.writers;
        // A panicking writer must not cause the same messages to be written again
        let cache = scopeguard::guard(&mut self.cache, |cache| cache.clear());

        if log_to_console {
            _ = io::stdout().write_all(cache.as_bytes());
        }

        for writer in writers.iter_mut().flatten() {
            _ = writer.write_all(cache.as_bytes());
            _ = writer.flush();
        }
    }
}

/// Logger
///
/// Supports up to 8 writers, e.g. terminal, file, external tool, etc
pub struct Logger {
    state: Mutex<LoggerState>,
    max_log_level: AtomicU8,
}

impl Logger {
    pub const fn new() -> Self {
        Self {
            state: const_mutex(LoggerState::new()),
            max_log_level: AtomicU8::new(LogLevel::Debug as u8),
        }
    }

    /// Set the maximum log level (severe == lowest, debug == highest)
    pub fn set_max_level(&self, level: LogLevel) {
        self.max_log_level.store(level as u8, atomic::Ordering::Relaxed)
    }

    /// Get the maximum log level
    pub fn max_level(&self) -> LogLevel {
        LogLevel::from_u8(self.max_log_level.load(atomic::Ordering::Relaxed))
    }

    /// Check whether messages at `level` would be logged
    pub fn is_enabled(&self, level: LogLevel) -> bool {
        level as u8 <= self.max_log_level.load(atomic::Ordering::Relaxed)
    }

    /// Set whether the logger should flush after each write
    pub fn set_always_flush(&self, always_flush: bool) {
        self.state.lock().always_flush = always_flush;
    }

    /// Set whether the logger should log it's output to console
    pub fn set_log_to_console(&self, log_to_console: bool) {
        let mut state = self.state.lock();

        // Make sure to flush first, cause all messages before wanted/didn't want to be log to be written to console
        state.flush();
        state.log_to_console = log_to_console;
    }

    /// Add a writer.
    ///
    /// Returns `Ok(index)` if space was available. This index can be used to remove the writer later on.
    ///
    /// Otherwise returns an `Err` with the provided writer
    pub fn add_writer(&self, writer: BoxedWriter) -> Result<usize, BoxedWriter> {
        let mut state = self.state.lock();

        let empty = state.writers.iter_mut().enumerate().find(|(_, slot)| slot.is_none());
        match empty {
            Some((id, slot)) => {
                *slot = Some(writer);
                Ok(id)
            },
            None => Err(writer),
        }
    }

    /// Remove a writer from the logger
    pub fn remove_writer(&self, index: usize) -> Option<BoxedWriter> {
        let mut state = self.state.lock();
        state.writers.get_mut(index).and_then(Option::take)
    }

    /// Log a plain message
    pub fn log(&self, category: LogCategory, level: LogLevel, loc: LogLocation, text: &str) {
        self.log_fmt(category, level, loc, format_args!("{text}"))
    }

    /// Log a formatted message
    pub fn log_fmt(&self, category: LogCategory, level: LogLevel, loc: LogLocation, format: Arguments) {
        if self.is_enabled(level) {
            let loc_formatter = LogLocationFormatter::new(&loc, level);
            let timestamp = loc.time;
            let mut state = self.state.lock();
            state.format_message(format_args!("\x1B[38m{timestamp}\x1B[0m {level} [{category}]{loc_formatter}: "));
            state.format_message(format);
            state.write_message("\n");
            state.flush_when_needed();
        }
    }

    pub fn flush(&self) {
        self.state.lock().flush()
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        self.flush();
    }
}

/// Log a message at the given level, does nothing if no global logger is installed.
#[macro_export]
macro_rules! log {
    ($category:expr, $level:expr, $($arg:tt)+) => {
        if let Some(logger) = $crate::try_get_logger() {
            logger.log_fmt($category, $level, $crate::log_location!(), format_args!($($arg)+));
        }
    };
}

#[macro_export]
macro_rules! log_severe {
    ($category:expr, $($arg:tt)+) => {
        $crate::log!($category, $crate::LogLevel::Severe, $($arg)+)
    };
}

#[macro_export]
macro_rules! log_error {
    ($category:expr, $($arg:tt)+) => {
        $crate::log!($category, $crate::LogLevel::Error, $($arg)+)
    };
}

#[macro_export]
macro_rules! log_warning {
    ($category:expr, $($arg:tt)+) => {
        $crate::log!($category, $crate::LogLevel::Warning, $($arg)+)
    };
}

#[macro_export]
macro_rules! log_info {
    ($category:expr, $($arg:tt)+) => {
        $crate::log!($category, $crate::LogLevel::Info, $($arg)+)
    };
}

#[macro_export]
macro_rules! log_verbose {
    ($category:expr, $($arg:tt)+) => {
        $crate::log!($category, $crate::LogLevel::Verbose, $($arg)+)
    };
}

#[macro_export]
macro_rules! log_debug {
    ($category:expr, $($arg:tt)+) => {
        $crate::log!($category, $crate::LogLevel::Debug, $($arg)+)
    };
}
