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

//! Input state gathered by the render thread.

use lumen_core::graphics::InputEvent;
use std::collections::BTreeSet;

/// The last known keyboard and mouse state.
///
/// Read-only for the overlay and scripting collaborators; only the render
/// thread writes it, once per loop iteration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputSnapshot {
    /// Keys currently held down.
    pub keys: BTreeSet<String>,
    /// Last cursor position, in window coordinates.
    pub cursor: (f64, f64),
    /// Whether a window asked the process to close.
    pub quit_requested: bool,
}

impl InputSnapshot {
    /// Applies polled events. Returns `true` if one of them asked to quit.
    pub fn apply(&mut self, events: impl IntoIterator<Item = InputEvent>) -> bool {
        let mut quit = false;
        for event in events {
            match event {
                InputEvent::KeyPressed(key) => {
                    self.keys.insert(key);
                }
                InputEvent::KeyReleased(key) => {
                    self.keys.remove(&key);
                }
                InputEvent::CursorMoved { x, y } => self.cursor = (x, y),
                InputEvent::CloseRequested => quit = true,
            }
        }
        self.quit_requested |= quit;
        quit
    }

    /// Whether `key` is held down.
    pub fn is_pressed(&self, key: &str) -> bool {
        self.keys.contains(key)
    }
}
