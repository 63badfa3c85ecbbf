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

use super::text;
use crate::object::{Category, GraphObject, ObjectError, Priority};
use lumen_control::AttributeTable;
use lumen_core::value::Value;
use std::sync::OnceLock;

/// A geometry producer. A change forces the blending to be recomputed.
#[derive(Debug, Default)]
pub struct Mesh {
    file: String,
    pending: bool,
    revisions: u64,
}

impl Mesh {
    /// Creates an empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    fn attributes() -> &'static AttributeTable<Self> {
        static TABLE: OnceLock<AttributeTable<Mesh>> = OnceLock::new();
        TABLE.get_or_init(|| {
            let mut table = AttributeTable::new();
            table
                .add("file", "s", |mesh: &mut Mesh, args| {
                    mesh.file = text(args, 0).unwrap_or_default();
                    mesh.pending = true;
                    true
                })
                .with_getter(|mesh| vec![Value::from(&mesh.file)])
                .describe("Path of the mesh to load");
            table
                .add("reload", "", |mesh: &mut Mesh, _| {
                    mesh.pending = true;
                    true
                })
                .describe("Reload the mesh from its source");
            table
                .add_read_only("revisions", |mesh: &Mesh| {
                    vec![Value::Int(mesh.revisions as i64)]
                });
            table
        })
    }
}

impl GraphObject for Mesh {
    fn type_name(&self) -> &str {
        "mesh"
    }

    fn category(&self) -> Category {
        Category::Mesh
    }

    fn rendering_priority(&self) -> Priority {
        Priority::Media
    }

    fn update(&mut self) -> Result<bool, ObjectError> {
        if !self.pending {
            return Ok(false);
        }
        self.pending = false;
        self.revisions += 1;
        Ok(true)
    }

    crate::forward_attributes!(Self::attributes());
}
