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

//! Registry entries.
//!
//! An [`ObjectSlot`] pairs the immutable identity of an object with its
//! mutable state behind a lock. Slots are shared as [`ObjectRef`]s: the
//! registry hands clones to the render walk and to the upload thread, so a slot
//! erased from the registry stays alive until the last of them is dropped.

use crate::object::{Category, GraphObject, LinkPeer, Priority};
use parking_lot::{Mutex, MutexGuard};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

/// A shared handle to a registry entry.
pub type ObjectRef = Arc<ObjectSlot>;

/// Mutable state of a registry entry.
pub struct ObjectState {
    /// The object itself.
    pub object: Box<dyn GraphObject>,
    /// Type name the controller knows this object under.
    pub remote_type: String,
    /// Display alias, defaults to the object name.
    pub alias: String,
    /// Whether the object is written to the configuration document.
    pub savable: bool,
    /// Names of the objects linked into this one.
    pub links: BTreeSet<String>,
    /// Whether the last update reported a change not yet observed.
    pub updated: bool,
}

/// An entry of the [`ObjectRegistry`](crate::ObjectRegistry).
pub struct ObjectSlot {
    name: String,
    type_name: String,
    category: Category,
    ghost: bool,
    texture: bool,
    window: bool,
    state: Mutex<ObjectState>,
}

impl ObjectSlot {
    /// Wraps a freshly created object.
    pub fn new(name: &str, mut object: Box<dyn GraphObject>, ghost: bool) -> Self {
        let type_name = object.type_name().to_string();
        let category = object.category();
        let texture = object.as_texture().is_some();
        let window = object.as_window().is_some();
        let savable = object.savable();
        Self {
            name: name.to_string(),
            type_name: type_name.clone(),
            category,
            ghost,
            texture,
            window,
            state: Mutex::new(ObjectState {
                object,
                remote_type: type_name,
                alias: name.to_string(),
                savable,
                links: BTreeSet::new(),
                updated: false,
            }),
        }
    }

    /// The unique name of this object.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The type of this object.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// The coarse category of this object.
    pub fn category(&self) -> Category {
        self.category
    }

    /// Whether this object mirrors a remote one and is never rendered locally.
    pub fn is_ghost(&self) -> bool {
        self.ghost
    }

    /// Whether this object goes through the texture upload pipeline.
    pub fn is_texture(&self) -> bool {
        self.texture
    }

    /// Whether this object owns a display surface.
    pub fn is_window(&self) -> bool {
        self.window
    }

    /// Locks the mutable state.
    pub fn lock(&self) -> MutexGuard<'_, ObjectState> {
        self.state.lock()
    }

    /// The current rendering band of this object.
    pub fn priority(&self) -> Priority {
        self.state.lock().object.rendering_priority()
    }

    /// Describes this object to a link target.
    pub fn peer(&self) -> LinkPeer {
        LinkPeer {
            name: self.name.clone(),
            type_name: self.type_name.clone(),
            category: self.category,
        }
    }
}

impl fmt::Debug for ObjectSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectSlot")
            .field("name", &self.name)
            .field("type_name", &self.type_name)
            .field("ghost", &self.ghost)
            .finish()
    }
}
