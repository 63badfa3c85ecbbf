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

//! Named frame timers.
//!
//! Each loop records how long its phases took under a fixed name
//! (`loop_scene`, `rendering`, `swap`, `loop_texture`, `textureUpload`, one
//! per rendering band). The last value wins; the controller may also override
//! a value, e.g. to share a reference duration between processes.

use lumen_core::utils::timer::Stopwatch;
use parking_lot::{Mutex, RwLock};
use std::collections::BTreeMap;
use std::time::Duration;

/// Wall clock of the controller, as last received.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MasterClock {
    /// Years.
    pub years: i64,
    /// Months.
    pub months: i64,
    /// Days.
    pub days: i64,
    /// Hours.
    pub hours: i64,
    /// Minutes.
    pub minutes: i64,
    /// Seconds.
    pub seconds: i64,
    /// Frame within the second.
    pub frame: i64,
    /// Whether the controller's clock is paused.
    pub paused: bool,
}

/// The last recorded duration of every named phase.
#[derive(Debug, Default)]
pub struct FrameTimers {
    durations: RwLock<BTreeMap<String, Duration>>,
    master_clock: Mutex<Option<MasterClock>>,
}

impl FrameTimers {
    /// Creates an empty set of timers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `duration` under `name`.
    pub fn record(&self, name: &str, duration: Duration) {
        self.durations.write().insert(name.to_string(), duration);
    }

    /// Times the current scope under `name`.
    pub fn scoped<'a>(&'a self, name: &'a str) -> ScopedTimer<'a> {
        ScopedTimer {
            stopwatch: Stopwatch::new(),
            timers: self,
            name,
        }
    }

    /// The last duration recorded under `name`.
    pub fn duration(&self, name: &str) -> Option<Duration> {
        self.durations.read().get(name).copied()
    }

    /// Every recorded duration, by name.
    pub fn snapshot(&self) -> Vec<(String, Duration)> {
        self.durations
            .read()
            .iter()
            .map(|(name, duration)| (name.clone(), *duration))
            .collect()
    }

    /// Stores the controller's clock.
    pub fn set_master_clock(&self, clock: MasterClock) {
        *self.master_clock.lock() = Some(clock);
    }

    /// The controller's clock, if one was received.
    pub fn master_clock(&self) -> Option<MasterClock> {
        *self.master_clock.lock()
    }
}

/// Records the time spent in a scope when dropped.
pub struct ScopedTimer<'a> {
    stopwatch: Stopwatch,
    timers: &'a FrameTimers,
    name: &'a str,
}

impl Drop for ScopedTimer<'_> {
    fn drop(&mut self) {
        self.timers.record(self.name, self.stopwatch.elapsed());
    }
}
