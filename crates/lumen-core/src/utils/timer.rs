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

use std::time::{Duration, Instant};

/// A monotonic stopwatch started at creation.
#[derive(Debug, Clone)]
pub struct Stopwatch {
    start_time: Instant,
}

impl Stopwatch {
    /// Creates a new stopwatch and starts it.
    #[inline]
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
        }
    }

    /// Restarts the stopwatch and returns the time elapsed before the restart.
    #[inline]
    pub fn restart(&mut self) -> Duration {
        let now = Instant::now();
        let elapsed = now.duration_since(self.start_time);
        self.start_time = now;
        elapsed
    }

    /// Returns the elapsed time since the stopwatch was started.
    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    const SLEEP_DURATION_MS: u64 = 20;

    #[test]
    fn stopwatch_measures_sleep() {
        let watch = Stopwatch::new();
        thread::sleep(Duration::from_millis(SLEEP_DURATION_MS));
        assert!(watch.elapsed() >= Duration::from_millis(SLEEP_DURATION_MS));
    }

    #[test]
    fn restart_resets_origin() {
        let mut watch = Stopwatch::new();
        thread::sleep(Duration::from_millis(SLEEP_DURATION_MS));
        let first = watch.restart();
        assert!(first >= Duration::from_millis(SLEEP_DURATION_MS));
        assert!(watch.elapsed() < first);
    }
}
