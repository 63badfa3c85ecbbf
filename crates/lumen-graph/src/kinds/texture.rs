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
use crate::object::{Category, GraphObject, LinkPeer, ObjectError, Priority, TextureLike};
use lumen_control::AttributeTable;
use lumen_core::value::Value;
use std::sync::OnceLock;

/// A GPU texture fed by an image.
///
/// Uploads happen on the upload thread through [`TextureLike`]; the render walk
/// only observes whether a new upload landed since the previous frame.
#[derive(Debug)]
pub struct Texture {
    source: Option<String>,
    filtering: bool,
    uploads: u64,
    flushes: u64,
    observed_uploads: u64,
}

impl Texture {
    /// Creates a texture with no source.
    pub fn new() -> Self {
        Self {
            source: None,
            filtering: true,
            uploads: 0,
            flushes: 0,
            observed_uploads: 0,
        }
    }

    fn attributes() -> &'static AttributeTable<Self> {
        static TABLE: OnceLock<AttributeTable<Texture>> = OnceLock::new();
        TABLE.get_or_init(|| {
            let mut table = AttributeTable::new();
            table
                .add("filtering", "n", |texture: &mut Texture, args| {
                    texture.filtering = number(args, 0).is_some_and(|n| n != 0.0);
                    true
                })
                .with_getter(|texture| vec![Value::Bool(texture.filtering)])
                .describe("Enable mipmapped filtering");
            table.add_read_only("source", |texture: &Texture| {
                texture
                    .source
                    .iter()
                    .map(|s| Value::from(s.as_str()))
                    .collect()
            });
            table
                .add_read_only("uploads", |texture: &Texture| {
                    vec![Value::Int(texture.uploads as i64)]
                })
                .describe("Number of uploads performed");
            table.add_read_only("flushes", |texture: &Texture| {
                vec![Value::Int(texture.flushes as i64)]
            });
            table
        })
    }
}

impl Default for Texture {
    fn default() -> Self {
        Self::new()
    }
}

impl TextureLike for Texture {
    fn upload(&mut self) -> Result<(), ObjectError> {
        if self.source.is_some() {
            self.uploads += 1;
        }
        Ok(())
    }

    fn flush(&mut self) {
        self.flushes += 1;
    }
}

impl GraphObject for Texture {
    fn type_name(&self) -> &str {
        "texture"
    }

    fn category(&self) -> Category {
        Category::Texture
    }

    fn rendering_priority(&self) -> Priority {
        Priority::PreCamera
    }

    fn link_to(&mut self, peer: &LinkPeer) -> bool {
        if peer.category != Category::Image {
            return false;
        }
        self.source = Some(peer.name.clone());
        true
    }

    fn unlink_from(&mut self, peer: &LinkPeer) {
        if self.source.as_deref() == Some(peer.name.as_str()) {
            self.source = None;
        }
    }

    fn update(&mut self) -> Result<bool, ObjectError> {
        let changed = self.uploads != self.observed_uploads;
        self.observed_uploads = self.uploads;
        Ok(changed)
    }

    fn as_texture(&mut self) -> Option<&mut dyn TextureLike> {
        Some(self)
    }

    crate::forward_attributes!(Self::attributes());
}
