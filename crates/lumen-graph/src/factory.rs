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

//! Construction of graph objects by type name.

use crate::error::GraphError;
use crate::kinds::{Blender, Camera, Image, Mesh, Texture, Warp, Window};
use crate::object::GraphObject;
use lumen_core::graphics::ContextProvider;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Builds an object from its name.
pub type Constructor = Box<dyn Fn(&str) -> Result<Box<dyn GraphObject>, GraphError> + Send + Sync>;

/// A table of object constructors keyed by type name.
pub struct ObjectFactory {
    constructors: BTreeMap<String, Constructor>,
}

impl ObjectFactory {
    /// Creates a factory that knows no type.
    pub fn new() -> Self {
        Self {
            constructors: BTreeMap::new(),
        }
    }

    /// Creates a factory knowing every built-in type.
    ///
    /// Windows get a context shared with the main one when a `provider` is
    /// given, and render nowhere otherwise.
    pub fn with_builtin_types(provider: Option<Arc<dyn ContextProvider>>) -> Self {
        let mut factory = Self::new();
        factory.register("blender", |_| Ok(Box::new(Blender::new())));
        factory.register("camera", |_| Ok(Box::new(Camera::new())));
        factory.register("image", |_| Ok(Box::new(Image::new())));
        factory.register("mesh", |_| Ok(Box::new(Mesh::new())));
        factory.register("texture", |_| Ok(Box::new(Texture::new())));
        factory.register("warp", |_| Ok(Box::new(Warp::new())));
        factory.register("window", move |name| {
            let context = match &provider {
                Some(provider) => Some(
                    provider
                        .create_shared_context(name)
                        .map_err(|e| GraphError::Creation(e.to_string()))?,
                ),
                None => None,
            };
            Ok(Box::new(Window::new(context)))
        });
        factory
    }

    /// Registers (or replaces) the constructor of `type_name`.
    pub fn register<F>(&mut self, type_name: &str, constructor: F)
    where
        F: Fn(&str) -> Result<Box<dyn GraphObject>, GraphError> + Send + Sync + 'static,
    {
        self.constructors
            .insert(type_name.to_string(), Box::new(constructor));
    }

    /// Returns `true` if `type_name` can be built.
    pub fn contains(&self, type_name: &str) -> bool {
        self.constructors.contains_key(type_name)
    }

    /// Names of every known type.
    pub fn types(&self) -> impl Iterator<Item = &str> {
        self.constructors.keys().map(String::as_str)
    }

    /// Builds an object of type `type_name` named `name`.
    pub fn create(&self, type_name: &str, name: &str) -> Result<Box<dyn GraphObject>, GraphError> {
        let constructor = self
            .constructors
            .get(type_name)
            .ok_or_else(|| GraphError::UnknownType(type_name.to_string()))?;
        constructor(name)
    }
}

impl Default for ObjectFactory {
    fn default() -> Self {
        Self::new()
    }
}
