//! Leveled progress logging.
//!
//! Pipeline stages report progress through the helpers below. Entries are
//! forwarded to the [`log`] facade, so whatever logger the binary installs
//! (see [`init_logger`]) decides what reaches the terminal.

/// Log target used for all pipeline entries.
pub const LOG_TARGET: &str = "reformat";

/// Log level for progress display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
    Success,
    Warning,
    Error,
}

impl LogLevel {
    /// Facade level an entry is emitted at. Successes are plain `info`.
    pub fn as_log_level(self) -> log::Level {
        match self {
            LogLevel::Debug => log::Level::Debug,
            LogLevel::Info | LogLevel::Success => log::Level::Info,
            LogLevel::Warning => log::Level::Warn,
            LogLevel::Error => log::Level::Error,
        }
    }

    fn prefix(self) -> &'static str {
        match self {
            LogLevel::Debug | LogLevel::Info => "",
            LogLevel::Success => "✓ ",
            LogLevel::Warning => "⚠️ ",
            LogLevel::Error => "❌ ",
        }
    }
}

/// A single log entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    /// Nesting depth, rendered as leading spaces
    pub indent: u8,
}

impl LogEntry {
    pub fn debug(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Debug, message: message.into(), indent: 0 }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Info, message: message.into(), indent: 0 }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Success, message: message.into(), indent: 0 }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Warning, message: message.into(), indent: 0 }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Error, message: message.into(), indent: 0 }
    }

    pub fn with_indent(mut self, indent: u8) -> Self {
        self.indent = indent;
        self
    }

    /// Text as it appears in the log line.
    pub fn render(&self) -> String {
        format!(
            "{}{}{}",
            "   ".repeat(self.indent as usize),
            self.level.prefix(),
            self.message
        )
    }
}

/// Forward an entry to the `log` facade.
pub fn emit(entry: LogEntry) {
    let level = entry.level.as_log_level();
    if log::log_enabled!(target: LOG_TARGET, level) {
        log::log!(target: LOG_TARGET, level, "{}", entry.render());
    }
}

/// Install `env_logger` as the global logger.
///
/// Defaults to `info`; `RUST_LOG` overrides it (`RUST_LOG=debug` shows every
/// derived row). Calling it twice is harmless.
pub fn init_logger() {
    let env = env_logger::Env::default().default_filter_or("info");
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .format_target(false)
        .try_init();
}

pub fn log_debug(msg: impl Into<String>) {
    emit(LogEntry::debug(msg));
}

pub fn log_info(msg: impl Into<String>) {
    emit(LogEntry::info(msg));
}

pub fn log_success(msg: impl Into<String>) {
    emit(LogEntry::success(msg));
}

pub fn log_warning(msg: impl Into<String>) {
    emit(LogEntry::warning(msg));
}

pub fn log_error(msg: impl Into<String>) {
    emit(LogEntry::error(msg));
}

pub fn log_info_indent(msg: impl Into<String>, indent: u8) {
    emit(LogEntry::info(msg).with_indent(indent));
}
