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

//! Process-wide settings mutated synchronously by attribute setters.
//!
//! Everything in here is read by the render thread but never structurally
//! shared with it: plain atomics and short-lived locks are enough, so setters
//! may write these values inline instead of going through the task queue.

use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, AtomicI32, AtomicU64, Ordering};
use std::time::Duration;

/// Runtime settings of a scene process.
#[derive(Debug)]
pub struct SceneSettings {
    swap_interval: AtomicI32,
    started: AtomicBool,
    running: AtomicBool,
    master: AtomicBool,
    run_in_background: AtomicBool,
    target_frame_duration_us: AtomicU64,
    configuration_path: RwLock<String>,
    media_path: RwLock<String>,
}

impl SceneSettings {
    /// Creates settings for a process that is running but not started.
    pub fn new() -> Self {
        Self {
            swap_interval: AtomicI32::new(1),
            started: AtomicBool::new(false),
            running: AtomicBool::new(true),
            master: AtomicBool::new(false),
            run_in_background: AtomicBool::new(false),
            target_frame_duration_us: AtomicU64::new(0),
            configuration_path: RwLock::new(String::new()),
            media_path: RwLock::new(String::new()),
        }
    }

    /// Interval between two presented frames: 1 synced, 0 unsynced, -1 adaptive.
    pub fn swap_interval(&self) -> i32 {
        self.swap_interval.load(Ordering::Acquire)
    }

    /// Sets the swap interval. Values below -1 are clamped to -1.
    pub fn set_swap_interval(&self, interval: i32) {
        self.swap_interval.store(interval.max(-1), Ordering::Release);
    }

    /// Whether the render loop is rendering frames.
    pub fn is_started(&self) -> bool {
        self.started.load(Ordering::Acquire)
    }

    /// Starts or pauses rendering. The loop keeps draining tasks while paused.
    pub fn set_started(&self, started: bool) {
        self.started.store(started, Ordering::Release);
    }

    /// Whether the process loops at all.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Stops rendering and asks every loop of the process to exit.
    pub fn request_quit(&self) {
        self.started.store(false, Ordering::Release);
        self.running.store(false, Ordering::Release);
    }

    /// Whether this process coordinates the others.
    pub fn is_master(&self) -> bool {
        self.master.load(Ordering::Acquire)
    }

    /// Marks this process as the coordinating master.
    pub fn set_master(&self, master: bool) {
        self.master.store(master, Ordering::Release);
    }

    /// Whether the process runs without any visible window.
    pub fn run_in_background(&self) -> bool {
        self.run_in_background.load(Ordering::Acquire)
    }

    /// Enables or disables background mode.
    pub fn set_run_in_background(&self, value: bool) {
        self.run_in_background.store(value, Ordering::Release);
    }

    /// Frame duration derived from the display refresh rate; zero if unknown.
    pub fn target_frame_duration(&self) -> Duration {
        Duration::from_micros(self.target_frame_duration_us.load(Ordering::Acquire))
    }

    /// Sets the frame duration used to pace background rendering.
    pub fn set_target_frame_duration(&self, duration: Duration) {
        self.target_frame_duration_us
            .store(duration.as_micros() as u64, Ordering::Release);
    }

    /// Directory holding configuration files.
    pub fn configuration_path(&self) -> String {
        self.configuration_path.read().clone()
    }

    /// Sets the directory holding configuration files.
    pub fn set_configuration_path(&self, path: impl Into<String>) {
        *self.configuration_path.write() = path.into();
    }

    /// Directory holding media files.
    pub fn media_path(&self) -> String {
        self.media_path.read().clone()
    }

    /// Sets the directory holding media files.
    pub fn set_media_path(&self, path: impl Into<String>) {
        *self.media_path.write() = path.into();
    }
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self::new()
    }
}
