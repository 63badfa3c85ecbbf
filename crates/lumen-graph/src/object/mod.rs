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

//! Capability interfaces of graph objects.
//!
//! The scheduler never downcasts to concrete kinds. Every object implements
//! [`GraphObject`] and exposes the capabilities it supports ([`Renderable`],
//! [`TextureLike`], [`WindowLike`]) through accessor methods returning `Option`.

mod priority;

pub use self::priority::{Category, Priority};

use lumen_control::AttributeError;
use lumen_core::value::{Value, Values};

/// A per-object runtime failure, isolated to the object that raised it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ObjectError {
    /// The update step failed.
    #[error("update failed: {0}")]
    Update(String),
    /// The render step failed.
    #[error("render failed: {0}")]
    Render(String),
    /// A texture upload failed.
    #[error("upload failed: {0}")]
    Upload(String),
}

/// What a link target gets to know about the object trying to link into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkPeer {
    /// Name of the source object.
    pub name: String,
    /// Type of the source object.
    pub type_name: String,
    /// Coarse category of the source object.
    pub category: Category,
}

/// An object that can be drawn during the priority-ordered walk.
pub trait Renderable {
    /// Issues the draw commands of this object.
    fn render(&mut self) -> Result<(), ObjectError>;
}

/// An object whose data is uploaded off the render path, by the upload thread.
pub trait TextureLike {
    /// Uploads pending data to the GPU.
    fn upload(&mut self) -> Result<(), ObjectError>;

    /// Flushes upload buffers once the upload fence is queued.
    fn flush(&mut self) {}
}

/// An object owning a display surface.
pub trait WindowLike {
    /// Presents the surface.
    fn swap_buffers(&mut self);
}

/// A node of the render graph.
pub trait GraphObject: Send {
    /// The producer/consumer kind, as used by the factory (e.g. `"camera"`).
    fn type_name(&self) -> &str;

    /// The coarse category, used to trigger dependent updates.
    fn category(&self) -> Category {
        Category::Misc
    }

    /// The band in which this object is updated and rendered.
    fn rendering_priority(&self) -> Priority {
        Priority::NoRender
    }

    /// Whether this object is written to the configuration document.
    fn savable(&self) -> bool {
        true
    }

    /// Accepts or refuses a link from `peer` into this object.
    fn link_to(&mut self, peer: &LinkPeer) -> bool {
        let _ = peer;
        false
    }

    /// Forgets a link from `peer` that was previously accepted.
    fn unlink_from(&mut self, peer: &LinkPeer) {
        let _ = peer;
    }

    /// Advances the object; returns `true` if its content changed.
    fn update(&mut self) -> Result<bool, ObjectError> {
        Ok(false)
    }

    /// Requests a full recomputation on the next update.
    fn force_update(&mut self) {}

    /// The render capability, if supported.
    fn as_renderable(&mut self) -> Option<&mut dyn Renderable> {
        None
    }

    /// The texture capability, if supported.
    fn as_texture(&mut self) -> Option<&mut dyn TextureLike> {
        None
    }

    /// The display-surface capability, if supported.
    fn as_window(&mut self) -> Option<&mut dyn WindowLike> {
        None
    }

    /// Dispatches an attribute call onto this object.
    fn set_attribute(&mut self, name: &str, args: &[Value]) -> Result<(), AttributeError>;

    /// Reads an attribute value.
    fn attribute(&self, name: &str) -> Option<Values>;

    /// Returns the human-readable description of an attribute.
    fn attribute_description(&self, name: &str) -> Option<String>;

    /// Returns every attribute written to the configuration document.
    fn saved_attributes(&self) -> Vec<(String, Values)>;
}

/// Implements the attribute methods of [`GraphObject`] by forwarding to a
/// static [`AttributeTable`](lumen_control::AttributeTable) of the same type.
#[macro_export]
macro_rules! forward_attributes {
    ($table:expr) => {
        fn set_attribute(
            &mut self,
            name: &str,
            args: &[lumen_core::value::Value],
        ) -> Result<(), lumen_control::AttributeError> {
            $table.set(self, name, args)
        }

        fn attribute(&self, name: &str) -> Option<lumen_core::value::Values> {
            $table.get(self, name)
        }

        fn attribute_description(&self, name: &str) -> Option<String> {
            $table.description(name).map(str::to_string)
        }

        fn saved_attributes(&self) -> Vec<(String, lumen_core::value::Values)> {
            $table.savable_values(self)
        }
    };
}
