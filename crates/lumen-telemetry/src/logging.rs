// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Logger initialization and runtime log control.
//!
//! The installed logger wraps two `env_logger` loggers sharing one format: one
//! honoring the configured filter, one letting everything through for the
//! targets whose level was overridden at runtime. Every emitted line is also
//! kept in a bounded history, read by the diagnostic overlay.

use log::{LevelFilter, Log, Metadata, Record};
use parking_lot::{Mutex, RwLock};
use std::collections::{HashMap, VecDeque};
use std::sync::{Once, OnceLock};

/// Logger configuration.
///
/// `env_filter` follows the `env_logger` filter syntax (e.g. "info",
/// "lumen_render=debug,lumen_graph=warn").
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Filter directives; `RUST_LOG` then `info` are used when absent.
    pub env_filter: Option<String>,
    /// ANSI coloring behavior.
    pub write_style: env_logger::WriteStyle,
    /// Number of recent lines kept in memory.
    pub history: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
            history: 256,
        }
    }
}

/// The process logger.
pub struct SceneLogger {
    filtered: env_logger::Logger,
    verbose: env_logger::Logger,
    overrides: RwLock<HashMap<String, LevelFilter>>,
    history: Mutex<VecDeque<String>>,
    capacity: usize,
}

impl SceneLogger {
    /// Builds a logger from `config`, without installing it.
    pub fn new(config: &LoggingConfig) -> Self {
        let mut filtered = env_logger::Builder::new();
        if let Some(filter) = &config.env_filter {
            filtered.parse_filters(filter);
        } else if let Ok(filter) = std::env::var("RUST_LOG") {
            filtered.parse_filters(&filter);
        } else {
            filtered.filter_level(LevelFilter::Info);
        }
        filtered.write_style(config.write_style);

        let mut verbose = env_logger::Builder::new();
        verbose
            .filter_level(LevelFilter::Trace)
            .write_style(config.write_style);

        Self {
            filtered: filtered.build(),
            verbose: verbose.build(),
            overrides: RwLock::new(HashMap::new()),
            history: Mutex::new(VecDeque::with_capacity(config.history)),
            capacity: config.history,
        }
    }

    /// Overrides the level of `target` and of every target below it.
    pub fn set_target_level(&self, target: &str, level: LevelFilter) {
        self.overrides.write().insert(target.to_string(), level);
    }

    /// The most permissive level any record may pass with.
    pub fn max_level(&self) -> LevelFilter {
        self.overrides
            .read()
            .values()
            .copied()
            .fold(self.filtered.filter(), std::cmp::max)
    }

    /// The recent lines, oldest first.
    pub fn recent_lines(&self) -> Vec<String> {
        self.history.lock().iter().cloned().collect()
    }

    // The longest overridden prefix of `target` wins.
    fn override_for(&self, target: &str) -> Option<LevelFilter> {
        let overrides = self.overrides.read();
        overrides
            .iter()
            .filter(|(prefix, _)| {
                target == prefix.as_str()
                    || (target.starts_with(prefix.as_str())
                        && target[prefix.len()..].starts_with("::"))
            })
            .max_by_key(|(prefix, _)| prefix.len())
            .map(|(_, level)| *level)
    }

    fn remember(&self, record: &Record<'_>) {
        if self.capacity == 0 {
            return;
        }
        let line = format!("[{} {}] {}", record.level(), record.target(), record.args());
        let mut history = self.history.lock();
        if history.len() == self.capacity {
            history.pop_front();
        }
        history.push_back(line);
    }
}

impl Log for SceneLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        match self.override_for(metadata.target()) {
            Some(level) => metadata.level() <= level,
            None => self.filtered.enabled(metadata),
        }
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        self.remember(record);
        if self.override_for(record.target()).is_some() {
            self.verbose.log(record);
        } else {
            self.filtered.log(record);
        }
    }

    fn flush(&self) {
        self.filtered.flush();
        self.verbose.flush();
    }
}

static INIT: Once = Once::new();
static LOGGER: OnceLock<&'static SceneLogger> = OnceLock::new();

/// Initializes the global logger once.
///
/// This function is idempotent; subsequent calls are ignored. If another
/// logger was installed first, runtime level control and history are disabled.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let logger: &'static SceneLogger = Box::leak(Box::new(SceneLogger::new(&config)));
        if log::set_logger(logger).is_err() {
            return;
        }
        log::set_max_level(logger.max_level());
        let _ = LOGGER.set(logger);
        log::debug!("logging initialized");
    });
}

/// Changes the level of `target` at runtime.
///
/// Returns `false` if logging was not initialized through [`init_logging`].
pub fn set_target_level(target: &str, level: LevelFilter) -> bool {
    let Some(logger) = LOGGER.get() else {
        return false;
    };
    logger.set_target_level(target, level);
    log::set_max_level(logger.max_level());
    true
}

/// The recent log lines, oldest first. Empty if logging is not initialized.
pub fn recent_lines() -> Vec<String> {
    LOGGER.get().map(|l| l.recent_lines()).unwrap_or_default()
}

/// Maps a numeric log priority of the control protocol to a level.
///
/// 0 is debug, 1 is info, 2 is warn, 3 is error and 4 turns logging off.
pub fn level_from_priority(priority: i64) -> Option<LevelFilter> {
    match priority {
        0 => Some(LevelFilter::Debug),
        1 => Some(LevelFilter::Info),
        2 => Some(LevelFilter::Warn),
        3 => Some(LevelFilter::Error),
        4 => Some(LevelFilter::Off),
        _ => None,
    }
}
