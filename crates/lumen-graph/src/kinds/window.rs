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

use super::{number, pair};
use crate::object::{
    Category, GraphObject, LinkPeer, ObjectError, Priority, Renderable, WindowLike,
};
use lumen_control::AttributeTable;
use lumen_core::graphics::GraphicsContext;
use lumen_core::value::Value;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::OnceLock;

/// A display surface showing the cameras, warps and textures linked into it.
pub struct Window {
    context: Option<Box<dyn GraphicsContext>>,
    inputs: BTreeSet<String>,
    position: (i64, i64),
    size: (i64, i64),
    fullscreen: i64,
    swap_test: bool,
    swap_test_color: [f64; 4],
    frames: u64,
    swaps: u64,
}

impl Window {
    /// Creates a window drawing through `context`, or nowhere if `None`.
    pub fn new(context: Option<Box<dyn GraphicsContext>>) -> Self {
        Self {
            context,
            inputs: BTreeSet::new(),
            position: (0, 0),
            size: (640, 480),
            fullscreen: -1,
            swap_test: false,
            swap_test_color: [0.0; 4],
            frames: 0,
            swaps: 0,
        }
    }

    fn attributes() -> &'static AttributeTable<Self> {
        static TABLE: OnceLock<AttributeTable<Window>> = OnceLock::new();
        TABLE.get_or_init(|| {
            let mut table = AttributeTable::new();
            table
                .add("position", "nn", |window: &mut Window, args| {
                    match (number(args, 0), number(args, 1)) {
                        (Some(x), Some(y)) => {
                            window.position = (x as i64, y as i64);
                            true
                        }
                        _ => false,
                    }
                })
                .with_getter(|window| pair(window.position))
                .describe("Window position on the desktop");
            table
                .add("size", "nn", |window: &mut Window, args| {
                    match (number(args, 0), number(args, 1)) {
                        (Some(w), Some(h)) if w >= 1.0 && h >= 1.0 => {
                            window.size = (w as i64, h as i64);
                            true
                        }
                        _ => false,
                    }
                })
                .with_getter(|window| pair(window.size))
                .describe("Window size");
            table
                .add("fullscreen", "n", |window: &mut Window, args| {
                    window.fullscreen = number(args, 0).map_or(-1, |n| n as i64);
                    true
                })
                .with_getter(|window| vec![Value::Int(window.fullscreen)])
                .describe("Index of the screen to go fullscreen on, -1 for windowed");
            table
                .add("swapTest", "n", |window: &mut Window, args| {
                    window.swap_test = number(args, 0).is_some_and(|n| n != 0.0);
                    true
                })
                .describe("Alternate black and white frames to check synchronization")
                .not_savable();
            table
                .add("swapTestColor", "nnnn", |window: &mut Window, args| {
                    for (index, channel) in window.swap_test_color.iter_mut().enumerate() {
                        *channel = number(args, index).unwrap_or_default();
                    }
                    true
                })
                .describe("Color used by the swap test")
                .not_savable();
            table.add_read_only("frames", |window: &Window| {
                vec![Value::Int(window.frames as i64)]
            });
            table.add_read_only("swaps", |window: &Window| {
                vec![Value::Int(window.swaps as i64)]
            });
            table
        })
    }
}

impl fmt::Debug for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Window")
            .field("context", &self.context.as_ref().map(|c| c.label().to_string()))
            .field("inputs", &self.inputs)
            .field("size", &self.size)
            .finish()
    }
}

impl Renderable for Window {
    fn render(&mut self) -> Result<(), ObjectError> {
        if let Some(context) = &self.context {
            context
                .make_current()
                .map_err(|e| ObjectError::Render(e.to_string()))?;
            context.release();
        }
        self.frames += 1;
        Ok(())
    }
}

impl WindowLike for Window {
    fn swap_buffers(&mut self) {
        if let Some(context) = &self.context {
            context.swap_buffers();
        }
        self.swaps += 1;
    }
}

impl GraphObject for Window {
    fn type_name(&self) -> &str {
        "window"
    }

    fn rendering_priority(&self) -> Priority {
        Priority::Window
    }

    fn link_to(&mut self, peer: &LinkPeer) -> bool {
        let accepted = matches!(peer.type_name.as_str(), "camera" | "warp")
            || matches!(peer.category, Category::Image | Category::Texture);
        accepted && self.inputs.insert(peer.name.clone())
    }

    fn unlink_from(&mut self, peer: &LinkPeer) {
        self.inputs.remove(&peer.name);
    }

    fn as_renderable(&mut self) -> Option<&mut dyn Renderable> {
        Some(self)
    }

    fn as_window(&mut self) -> Option<&mut dyn WindowLike> {
        Some(self)
    }

    crate::forward_attributes!(Self::attributes());
}
