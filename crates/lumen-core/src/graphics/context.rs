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

use super::error::GraphicsError;
use super::fence::GpuSync;
use std::sync::Arc;

/// Capabilities discovered once, when the process brings up its first context.
///
/// This record replaces process-wide mutable flags: it is built at startup and
/// handed by reference to whoever needs it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphicsCaps {
    /// The `(major, minor)` version of the rendering API obtained.
    pub version: (u32, u32),
    /// Whether the display system supports hardware swap groups.
    pub has_swap_group: bool,
}

impl Default for GraphicsCaps {
    fn default() -> Self {
        Self {
            version: (0, 0),
            has_swap_group: false,
        }
    }
}

/// An input event gathered while polling a context.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// A key went down. Keys are identified by their printable name.
    KeyPressed(String),
    /// A key went up.
    KeyReleased(String),
    /// The cursor moved, in window coordinates.
    CursorMoved {
        /// Horizontal position.
        x: f64,
        /// Vertical position.
        y: f64,
    },
    /// The user asked for the window (and the process) to close.
    CloseRequested,
}

/// A rendering context bound to a display surface.
///
/// A context is owned by exactly one thread at a time; it is moved to the
/// thread that uses it and made current there.
pub trait GraphicsContext: Send {
    /// Returns a human-readable label, used in logs.
    fn label(&self) -> &str;

    /// Makes this context current on the calling thread.
    fn make_current(&self) -> Result<(), GraphicsError>;

    /// Releases this context from the calling thread.
    fn release(&self);

    /// Presents the back buffer of the surface.
    fn swap_buffers(&self);

    /// Collects pending input events.
    fn poll_events(&self) -> Vec<InputEvent>;
}

/// Factory for graphics contexts and the shared GPU synchronization device.
pub trait ContextProvider: Send + Sync {
    /// Finds a suitable rendering API version and the optional capabilities.
    ///
    /// Failing here means the process cannot render at all.
    fn probe(&self) -> Result<GraphicsCaps, GraphicsError>;

    /// Creates the main context of the process, with its hidden surface.
    fn create_main_context(&self, name: &str) -> Result<Box<dyn GraphicsContext>, GraphicsError>;

    /// Creates a context sharing resources with the main context.
    fn create_shared_context(&self, name: &str)
        -> Result<Box<dyn GraphicsContext>, GraphicsError>;

    /// Returns the fence device shared by every context of this provider.
    fn gpu(&self) -> Arc<dyn GpuSync>;

    /// Returns the refresh rate of the primary display, in Hz, if known.
    fn refresh_rate(&self) -> Option<u32>;
}
