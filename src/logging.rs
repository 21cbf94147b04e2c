use chrono::Local;
use log::{LevelFilter, Metadata, Record, SetLoggerError};
use std::collections::HashSet;
use std::io::{self, Write};
use std::sync::OnceLock;

// Debug topics understood by --debug-filter
pub const TOPICS: [&str; 5] = ["spawn", "balloon", "tower", "projectile", "wave"];

#[derive(Debug)]
struct DefenseLogger {
    level: LevelFilter,
    debug_filters: Option<HashSet<String>>,
}

impl log::Log for DefenseLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        if metadata.level() > self.level {
            return false;
        }
        // Debug filters only restrict debug/trace output
        if let Some(filters) = &self.debug_filters {
            if metadata.level() >= log::Level::Debug {
                return filters.contains(metadata.target())
                    || filters.iter().any(|f| metadata.target().starts_with(f.as_str()));
            }
        }
        true
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let level_color = match record.level() {
            log::Level::Error => "\x1B[31m", // Red
            log::Level::Warn => "\x1B[33m",  // Yellow
            log::Level::Info => "\x1B[32m",  // Green
            log::Level::Debug => "\x1B[36m", // Cyan
            log::Level::Trace => "\x1B[35m", // Magenta
        };
        let reset = "\x1B[0m";
        let timestamp = Local::now().format("%H:%M:%S%.3f");

        let message = record.args().to_string();
        let mut context = String::new();
        if let Some(wave) = number_after(&message, "Wave ") {
            context.push_str(&format!("[W{:02}]", wave));
        }
        if let Some(tick) = number_after(&message, "Tick ") {
            context.push_str(&format!("[T{:05}]", tick));
        }
        if !context.is_empty() {
            context.push(' ');
        }

        let mut output = format!(
            "{timestamp} {level_color}{level:5}{reset} {context}{target}: {message}",
            level = record.level(),
            target = record.target(),
        );

        if let Some(module_path) = record.module_path() {
            if module_path != record.target() {
                output.push_str(&format!(" [{}]", module_path));
            }
        }

        // A closed stdout is not worth panicking over
        let mut stdout = io::stdout().lock();
        let _ = writeln!(stdout, "{}", output);
        let _ = stdout.flush();
    }

    fn flush(&self) {
        let _ = io::stdout().flush();
    }
}

// Parses the run of digits following `prefix`, e.g. "Wave 3 complete" -> 3
fn number_after(message: &str, prefix: &str) -> Option<u64> {
    let start = message.find(prefix)? + prefix.len();
    let digits: String = message[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

static LOGGER: OnceLock<DefenseLogger> = OnceLock::new();

// Initialize the logger with optional comma separated debug topic filters
pub fn init_logger(level: LevelFilter, debug_filter: Option<String>) -> Result<(), SetLoggerError> {
    let debug_filters = debug_filter.map(|filter_str| {
        filter_str
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<HashSet<String>>()
    });

    let logger = LOGGER.get_or_init(|| DefenseLogger {
        level,
        debug_filters,
    });

    log::set_logger(logger).map(|()| log::set_max_level(level))
}

pub fn parse_level(name: &str) -> LevelFilter {
    match name.to_lowercase().as_str() {
        "off" => LevelFilter::Off,
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "info" => LevelFilter::Info,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => LevelFilter::Info,
    }
}

// Helper macros for specific debug topics
#[macro_export]
macro_rules! debug_spawn {
    ($($arg:tt)*) => {
        log::debug!(target: "spawn", $($arg)*)
    };
}

#[macro_export]
macro_rules! debug_balloon {
    ($($arg:tt)*) => {
        log::debug!(target: "balloon", $($arg)*)
    };
}

#[macro_export]
macro_rules! debug_tower {
    ($($arg:tt)*) => {
        log::debug!(target: "tower", $($arg)*)
    };
}

#[macro_export]
macro_rules! debug_projectile {
    ($($arg:tt)*) => {
        log::debug!(target: "projectile", $($arg)*)
    };
}

#[macro_export]
macro_rules! debug_wave {
    ($($arg:tt)*) => {
        log::debug!(target: "wave", $($arg)*)
    };
}
