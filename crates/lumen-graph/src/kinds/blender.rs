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

use crate::object::{GraphObject, ObjectError, Priority};
use lumen_control::AttributeTable;
use lumen_core::value::Value;
use std::sync::OnceLock;

/// How often the blending computation runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlendingMode {
    None,
    Once,
    Continuous,
}

impl BlendingMode {
    fn parse(mode: &str) -> Option<Self> {
        match mode {
            "none" => Some(Self::None),
            "once" => Some(Self::Once),
            "continuous" => Some(Self::Continuous),
            _ => None,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Once => "once",
            Self::Continuous => "continuous",
        }
    }
}

/// Computes the blending between overlapping projections.
///
/// Every scene owns exactly one, named `"blender"`. It is recomputed when a
/// mesh changes, one frame after the change was observed.
#[derive(Debug)]
pub struct Blender {
    mode: BlendingMode,
    pending: bool,
    computations: u64,
}

impl Blender {
    /// Creates a blender that computes once.
    pub fn new() -> Self {
        Self {
            mode: BlendingMode::Once,
            pending: true,
            computations: 0,
        }
    }

    fn attributes() -> &'static AttributeTable<Self> {
        static TABLE: OnceLock<AttributeTable<Blender>> = OnceLock::new();
        TABLE.get_or_init(|| {
            let mut table = AttributeTable::new();
            table
                .add("mode", "s", |b: &mut Blender, args| {
                    match args[0].as_str().and_then(BlendingMode::parse) {
                        Some(mode) => {
                            b.mode = mode;
                            b.pending = mode != BlendingMode::None;
                            true
                        }
                        None => false,
                    }
                })
                .with_getter(|b| vec![Value::from(b.mode.as_str())])
                .describe("Blending mode: none, once or continuous");
            table
                .add_read_only("computations", |b: &Blender| {
                    vec![Value::Int(b.computations as i64)]
                })
                .describe("Number of blending computations so far");
            table
        })
    }
}

impl Default for Blender {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphObject for Blender {
    fn type_name(&self) -> &str {
        "blender"
    }

    fn rendering_priority(&self) -> Priority {
        Priority::Blending
    }

    fn savable(&self) -> bool {
        false
    }

    fn update(&mut self) -> Result<bool, ObjectError> {
        if self.mode == BlendingMode::Continuous || self.pending {
            self.pending = false;
            self.computations += 1;
            return Ok(true);
        }
        Ok(false)
    }

    fn force_update(&mut self) {
        if self.mode != BlendingMode::None {
            self.pending = true;
        }
    }

    crate::forward_attributes!(Self::attributes());
}
