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
use crate::object::{Category, GraphObject, LinkPeer, ObjectError, Priority, Renderable};
use lumen_control::AttributeTable;
use lumen_core::value::Value;
use std::collections::BTreeSet;
use std::sync::OnceLock;

/// A virtual projector rendering the meshes and textures linked into it.
#[derive(Debug)]
pub struct Camera {
    inputs: BTreeSet<String>,
    size: (i64, i64),
    wireframe: bool,
    hidden: bool,
    frames: u64,
}

impl Camera {
    /// Creates a camera with the default output size.
    pub fn new() -> Self {
        Self {
            inputs: BTreeSet::new(),
            size: (512, 512),
            wireframe: false,
            hidden: false,
            frames: 0,
        }
    }

    fn attributes() -> &'static AttributeTable<Self> {
        static TABLE: OnceLock<AttributeTable<Camera>> = OnceLock::new();
        TABLE.get_or_init(|| {
            let mut table = AttributeTable::new();
            table
                .add("size", "nn", |camera: &mut Camera, args| {
                    match (number(args, 0), number(args, 1)) {
                        (Some(w), Some(h)) if w >= 1.0 && h >= 1.0 => {
                            camera.size = (w as i64, h as i64);
                            true
                        }
                        _ => false,
                    }
                })
                .with_getter(|camera| pair(camera.size))
                .describe("Output resolution");
            table
                .add("wireframe", "n", |camera: &mut Camera, args| {
                    camera.wireframe = number(args, 0).is_some_and(|n| n != 0.0);
                    true
                })
                .with_getter(|camera| vec![Value::Bool(camera.wireframe)])
                .describe("Draw meshes as wireframe");
            table
                .add("hide", "n", |camera: &mut Camera, args| {
                    camera.hidden = number(args, 0).is_some_and(|n| n != 0.0);
                    true
                })
                .with_getter(|camera| vec![Value::Bool(camera.hidden)])
                .describe("Skip this camera when rendering")
                .not_savable();
            table.add_read_only("frames", |camera: &Camera| {
                vec![Value::Int(camera.frames as i64)]
            });
            table
        })
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderable for Camera {
    fn render(&mut self) -> Result<(), ObjectError> {
        self.frames += 1;
        Ok(())
    }
}

impl GraphObject for Camera {
    fn type_name(&self) -> &str {
        "camera"
    }

    fn rendering_priority(&self) -> Priority {
        if self.hidden {
            Priority::NoRender
        } else {
            Priority::Camera
        }
    }

    fn link_to(&mut self, peer: &LinkPeer) -> bool {
        match peer.category {
            Category::Mesh | Category::Image | Category::Texture => {
                self.inputs.insert(peer.name.clone())
            }
            Category::Misc => false,
        }
    }

    fn unlink_from(&mut self, peer: &LinkPeer) {
        self.inputs.remove(&peer.name);
    }

    fn as_renderable(&mut self) -> Option<&mut dyn Renderable> {
        Some(self)
    }

    crate::forward_attributes!(Self::attributes());
}
