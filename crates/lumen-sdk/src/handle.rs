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

//! The thread-safe side of a scene.
//!
//! A [`SceneHandle`] is what attribute setters work on. It may be used from
//! any thread: everything touching the registry or per-object state is
//! deferred as a task, run by the render thread at the start of its next
//! loop iteration.

use crate::input::InputSnapshot;
use lumen_control::{SceneSettings, TaskSender};
use lumen_core::graphics::GraphicsCaps;
use lumen_core::link::WORLD;
use lumen_core::value::{Value, Values};
use lumen_core::Link;
use lumen_graph::{
    export_configuration, replay_configuration, GhostPolicy, GraphError, ObjectRegistry,
    Placement, ReplaySummary,
};
use lumen_telemetry::FrameTimers;
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;

pub(crate) struct SceneShared {
    pub(crate) name: String,
    pub(crate) caps: GraphicsCaps,
    pub(crate) registry: Arc<ObjectRegistry>,
    pub(crate) tasks: TaskSender,
    pub(crate) settings: Arc<SceneSettings>,
    pub(crate) timers: Arc<FrameTimers>,
    pub(crate) link: Arc<dyn Link>,
    pub(crate) ghosts: GhostPolicy,
    pub(crate) input: RwLock<InputSnapshot>,
    pub(crate) answer_timeout: Duration,
}

/// A cloneable, thread-safe handle on a scene.
#[derive(Clone)]
pub struct SceneHandle {
    pub(crate) shared: Arc<SceneShared>,
}

impl SceneHandle {
    /// The scene name.
    pub fn name(&self) -> &str {
        &self.shared.name
    }

    /// Capabilities discovered when the scene was created.
    pub fn caps(&self) -> GraphicsCaps {
        self.shared.caps
    }

    /// The object registry.
    pub fn registry(&self) -> &Arc<ObjectRegistry> {
        &self.shared.registry
    }

    /// The settings mutated by the control surface.
    pub fn settings(&self) -> &Arc<SceneSettings> {
        &self.shared.settings
    }

    /// The frame timers.
    pub fn timers(&self) -> &Arc<FrameTimers> {
        &self.shared.timers
    }

    /// The last polled input state.
    pub fn input(&self) -> InputSnapshot {
        self.shared.input.read().clone()
    }

    /// Defers `task` to the next loop iteration of the render thread.
    pub fn add_task<F>(&self, task: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.shared.tasks.add_task(task);
    }

    /// Sends a message to the controller.
    pub fn send_to_world(&self, message: &str, args: Values) {
        self.shared.link.send_message(WORLD, message, args);
    }

    /// Answers the controller's `request` with `payload`.
    pub fn send_answer(&self, request: &str, payload: Values) {
        let mut args = Vec::with_capacity(payload.len() + 2);
        args.push(Value::from(request));
        args.push(Value::from(self.name()));
        args.extend(payload);
        self.send_to_world("answerMessage", args);
    }

    /// Requests the creation of `name` of type `type_name` in scene `target`
    /// (the local scene if empty).
    ///
    /// Requests for another scene create a ghost when this scene is the master
    /// and the type is ghostable; they are ignored otherwise.
    pub fn add_object(&self, type_name: &str, name: &str, target: &str) {
        let placement = self.shared.ghosts.placement(
            type_name,
            target,
            self.name(),
            self.shared.settings.is_master(),
        );
        let registry = Arc::clone(&self.shared.registry);
        let (type_name, name) = (type_name.to_string(), name.to_string());
        match placement {
            Placement::Local => self.add_task(move || {
                log_structural(registry.add(&type_name, &name).map(drop));
            }),
            Placement::Ghost => self.add_task(move || {
                log_structural(registry.add_ghost(&type_name, &name).map(drop));
            }),
            Placement::Ignore => {
                log::trace!("Scene: '{}' is meant for scene '{}', ignoring", name, target);
            }
        }
    }

    /// Requests the deletion of `name`, after it has been unlinked from
    /// every other object.
    pub fn delete_object(&self, name: &str) {
        let registry = Arc::clone(&self.shared.registry);
        let name = name.to_string();
        self.add_task(move || log_structural(registry.remove(&name)));
    }

    /// Requests a link from `source` into `target`.
    pub fn link_objects(&self, source: &str, target: &str) {
        let registry = Arc::clone(&self.shared.registry);
        let (source, target) = (source.to_string(), target.to_string());
        self.add_task(move || log_structural(registry.link(&source, &target)));
    }

    /// Requests the removal of the link from `source` into `target`.
    pub fn unlink_objects(&self, source: &str, target: &str) {
        let registry = Arc::clone(&self.shared.registry);
        let (source, target) = (source.to_string(), target.to_string());
        self.add_task(move || log_structural(registry.unlink(&source, &target).map(drop)));
    }

    /// Requests a new alias for `name`.
    pub fn set_alias(&self, name: &str, alias: &str) {
        let registry = Arc::clone(&self.shared.registry);
        let (name, alias) = (name.to_string(), alias.to_string());
        self.add_task(move || match registry.get(&name) {
            Some(slot) => slot.lock().alias = alias,
            None => log_structural(Err(GraphError::NotFound(name))),
        });
    }

    /// Requests an attribute call on the object `name`.
    pub fn set_object_attribute(&self, name: &str, attribute: &str, args: Values) {
        let registry = Arc::clone(&self.shared.registry);
        let (name, attribute) = (name.to_string(), attribute.to_string());
        self.add_task(move || {
            let Some(slot) = registry.get(&name) else {
                log_structural(Err(GraphError::NotFound(name)));
                return;
            };
            let result = slot.lock().object.set_attribute(&attribute, &args);
            if let Err(e) = result {
                log::warn!("Scene: '{}': {}", name, e);
            }
        });
    }

    /// Requests the same attribute call on every local object of `type_name`.
    pub fn set_attribute_of_type(&self, type_name: &str, attribute: &str, args: Values) {
        let registry = Arc::clone(&self.shared.registry);
        let (type_name, attribute) = (type_name.to_string(), attribute.to_string());
        self.add_task(move || {
            for slot in registry.slots() {
                if slot.type_name() != type_name || slot.is_ghost() {
                    continue;
                }
                if let Err(e) = slot.lock().object.set_attribute(&attribute, &args) {
                    log::warn!("Scene: '{}': {}", slot.name(), e);
                }
            }
        });
    }

    /// Reads an attribute of the object `name`.
    ///
    /// Objects unknown here are asked to the controller. An empty result means
    /// the value is unknown.
    pub fn object_attribute(&self, name: &str, attribute: &str) -> Values {
        if let Some(slot) = self.shared.registry.get(name) {
            return slot.lock().object.attribute(attribute).unwrap_or_default();
        }
        self.ask_world("getAttribute", name, attribute)
    }

    /// Reads the description of an attribute of the object `name`, asking the
    /// controller for objects unknown here.
    pub fn object_attribute_description(&self, name: &str, attribute: &str) -> Values {
        if let Some(slot) = self.shared.registry.get(name) {
            return slot
                .lock()
                .object
                .attribute_description(attribute)
                .map(|d| vec![Value::from(d)])
                .unwrap_or_default();
        }
        self.ask_world("getAttributeDescription", name, attribute)
    }

    // The answer starts with the attribute name.
    fn ask_world(&self, query: &str, name: &str, attribute: &str) -> Values {
        let answer = self.shared.link.send_message_with_answer(
            WORLD,
            query,
            vec![Value::from(name), Value::from(attribute)],
            self.shared.answer_timeout,
        );
        answer.into_iter().skip(1).collect()
    }

    /// Names of the objects of `type_name`.
    pub fn objects_by_type(&self, type_name: &str) -> Vec<String> {
        self.shared.registry.names_by_type(type_name)
    }

    /// The configuration document of this scene.
    pub fn configuration(&self) -> serde_json::Value {
        let attributes = crate::rpc::scene_attributes().savable_values(self);
        export_configuration(&self.shared.registry, &attributes)
    }

    /// Recreates the objects and links of `document`, then applies the scene
    /// attributes it carries. Runs on the calling thread.
    pub fn apply_configuration(&self, document: &serde_json::Value) -> Result<ReplaySummary, GraphError> {
        let summary = replay_configuration(&self.shared.registry, document)?;
        let table = crate::rpc::scene_attributes();
        if let Some(entries) = document.as_object() {
            for (attribute, json) in entries {
                if !table.attribute(attribute).is_some_and(|a| a.is_savable()) {
                    continue;
                }
                let Some(args) = lumen_core::value::values_from_json(json) else {
                    continue;
                };
                if let Err(e) = table.set(&mut self.clone(), attribute, &args) {
                    log::warn!("Scene: configuration attribute '{}': {}", attribute, e);
                }
            }
        }
        Ok(summary)
    }
}

impl std::fmt::Debug for SceneHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneHandle").field("name", &self.shared.name).finish()
    }
}

fn log_structural(result: Result<(), GraphError>) {
    if let Err(e) = result {
        log::warn!("Scene: {}", e);
    }
}
