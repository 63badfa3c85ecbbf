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

use super::number;
use crate::object::{GraphObject, LinkPeer, ObjectError, Priority, Renderable};
use lumen_control::AttributeTable;
use lumen_core::value::Value;
use std::sync::OnceLock;

/// A deformation applied to the output of a single camera.
#[derive(Debug)]
pub struct Warp {
    camera: Option<String>,
    patch_resolution: i64,
    frames: u64,
}

impl Warp {
    /// Creates a warp with no input camera.
    pub fn new() -> Self {
        Self {
            camera: None,
            patch_resolution: 32,
            frames: 0,
        }
    }

    fn attributes() -> &'static AttributeTable<Self> {
        static TABLE: OnceLock<AttributeTable<Warp>> = OnceLock::new();
        TABLE.get_or_init(|| {
            let mut table = AttributeTable::new();
            table
                .add("patchResolution", "n", |warp: &mut Warp, args| {
                    match number(args, 0) {
                        Some(n) if n >= 1.0 => {
                            warp.patch_resolution = n as i64;
                            true
                        }
                        _ => false,
                    }
                })
                .with_getter(|warp| vec![Value::Int(warp.patch_resolution)])
                .describe("Resolution of the warping patch");
            table.add_read_only("frames", |warp: &Warp| {
                vec![Value::Int(warp.frames as i64)]
            });
            table
        })
    }
}

impl Default for Warp {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderable for Warp {
    fn render(&mut self) -> Result<(), ObjectError> {
        if self.camera.is_some() {
            self.frames += 1;
        }
        Ok(())
    }
}

impl GraphObject for Warp {
    fn type_name(&self) -> &str {
        "warp"
    }

    fn rendering_priority(&self) -> Priority {
        Priority::Warp
    }

    // A warp deforms exactly one camera.
    fn link_to(&mut self, peer: &LinkPeer) -> bool {
        if peer.type_name != "camera" || self.camera.is_some() {
            return false;
        }
        self.camera = Some(peer.name.clone());
        true
    }

    fn unlink_from(&mut self, peer: &LinkPeer) {
        if self.camera.as_deref() == Some(peer.name.as_str()) {
            self.camera = None;
        }
    }

    fn as_renderable(&mut self) -> Option<&mut dyn Renderable> {
        Some(self)
    }

    crate::forward_attributes!(Self::attributes());
}
