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

//! The remote control surface of a scene.

use crate::handle::SceneHandle;
use lumen_control::AttributeTable;
use lumen_core::value::{Value, Values};
use lumen_telemetry::{level_from_priority, set_target_level, MasterClock};
use std::sync::OnceLock;
use std::time::Duration;

fn text(args: &[Value], index: usize) -> &str {
    args.get(index).and_then(Value::as_str).unwrap_or_default()
}

fn integer(args: &[Value], index: usize) -> i64 {
    args.get(index).and_then(Value::as_i64).unwrap_or_default()
}

fn flag(args: &[Value], index: usize) -> bool {
    args.get(index).and_then(Value::as_bool).unwrap_or_default()
}

/// The attribute table shared by every scene.
pub(crate) fn scene_attributes() -> &'static AttributeTable<SceneHandle> {
    static TABLE: OnceLock<AttributeTable<SceneHandle>> = OnceLock::new();
    TABLE.get_or_init(build)
}

fn build() -> AttributeTable<SceneHandle> {
    let mut table = AttributeTable::new();
    register_graph(&mut table);
    register_lifecycle(&mut table);
    register_display(&mut table);
    register_diagnostics(&mut table);
    register_paths(&mut table);
    table
}

/// Structural edits of the object graph. All of them are deferred.
fn register_graph(table: &mut AttributeTable<SceneHandle>) {
    table
        .add("addObject", "ss", |scene: &mut SceneHandle, args| {
            scene.add_object(text(args, 0), text(args, 1), text(args, 2));
            true
        })
        .describe("Add an object of the given type and name, optionally for another scene");

    table
        .add("deleteObject", "s", |scene: &mut SceneHandle, args| {
            scene.delete_object(text(args, 0));
            true
        })
        .describe("Delete an object given its name");

    table
        .add("remove", "s", |scene: &mut SceneHandle, args| {
            scene.delete_object(text(args, 0));
            true
        })
        .describe("Remove the object of the given name");

    table
        .add("link", "ss", |scene: &mut SceneHandle, args| {
            scene.link_objects(text(args, 0), text(args, 1));
            true
        })
        .describe("Link the two given objects");

    table
        .add("unlink", "ss", |scene: &mut SceneHandle, args| {
            scene.unlink_objects(text(args, 0), text(args, 1));
            true
        })
        .describe("Unlink the two given objects");

    table
        .add("setAlias", "ss", |scene: &mut SceneHandle, args| {
            scene.set_alias(text(args, 0), text(args, 1));
            true
        })
        .describe("Set an alias for the given object");

    table
        .add("setObjectAttribute", "ss", |scene: &mut SceneHandle, args| {
            scene.set_object_attribute(text(args, 0), text(args, 1), args[2..].to_vec());
            true
        })
        .describe("Set an attribute of the given object");

    table
        .add("getObjectsNameByType", "s", |scene: &mut SceneHandle, args| {
            let answer = scene.clone();
            let type_name = text(args, 0).to_string();
            scene.add_task(move || {
                let names: Values = answer
                    .objects_by_type(&type_name)
                    .into_iter()
                    .map(Value::from)
                    .collect();
                answer.send_answer("getObjectsNameByType", vec![Value::List(names)]);
            });
            true
        })
        .describe("Answer with the names of the objects of the given type");

    table
        .add("getAttribute", "ss", |scene: &mut SceneHandle, args| {
            let answer = scene.clone();
            let (name, attribute) = (text(args, 0).to_string(), text(args, 1).to_string());
            scene.add_task(move || {
                let mut payload = vec![Value::from(&attribute)];
                payload.extend(answer.object_attribute(&name, &attribute));
                answer.send_answer("getAttribute", payload);
            });
            true
        })
        .describe("Answer with the value of an attribute of the given object");

    table
        .add("getAttributeDescription", "ss", |scene: &mut SceneHandle, args| {
            let answer = scene.clone();
            let (name, attribute) = (text(args, 0).to_string(), text(args, 1).to_string());
            scene.add_task(move || {
                let mut payload = vec![Value::from(&attribute)];
                payload.extend(answer.object_attribute_description(&name, &attribute));
                answer.send_answer("getAttributeDescription", payload);
            });
            true
        })
        .describe("Answer with the description of an attribute of the given object");

    table
        .add("config", "", |scene: &mut SceneHandle, _| {
            let answer = scene.clone();
            scene.add_task(move || {
                let document = answer.configuration().to_string();
                answer.send_answer("config", vec![Value::from(document)]);
            });
            true
        })
        .describe("Answer with the configuration document of the scene");
}

/// Start, stop and coordination. These only touch settings and answer inline.
fn register_lifecycle(table: &mut AttributeTable<SceneHandle>) {
    table
        .add("start", "", |scene: &mut SceneHandle, _| {
            scene.settings().set_started(true);
            scene.send_answer("start", Values::new());
            true
        })
        .describe("Start the scene");

    table
        .add("stop", "", |scene: &mut SceneHandle, _| {
            scene.settings().set_started(false);
            true
        })
        .describe("Stop the scene");

    table
        .add("quit", "", |scene: &mut SceneHandle, _| {
            log::info!("Scene '{}': quit requested", scene.name());
            scene.settings().request_quit();
            true
        })
        .describe("Ask the scene to quit");

    table
        .add("ping", "", |scene: &mut SceneHandle, _| {
            scene.send_to_world("pong", vec![Value::from(scene.name())]);
            true
        })
        .describe("Answer a ping from the controller");

    table
        .add("sync", "", |scene: &mut SceneHandle, _| {
            let answer = scene.clone();
            scene.add_task(move || answer.send_answer("sync", Values::new()));
            true
        })
        .describe("Answer once every previously queued task has run");

    table
        .add("setMaster", "", |scene: &mut SceneHandle, args| {
            scene.settings().set_master(true);
            if let Some(path) = args.first().and_then(Value::as_str) {
                scene.settings().set_configuration_path(path);
            }
            true
        })
        .describe("Make this scene the master, optionally with its configuration path");
}

/// Settings of the display surfaces.
fn register_display(table: &mut AttributeTable<SceneHandle>) {
    table
        .add("swapInterval", "n", |scene: &mut SceneHandle, args| {
            scene.settings().set_swap_interval(integer(args, 0).clamp(-1, i32::MAX as i64) as i32);
            true
        })
        .with_getter(|scene| vec![Value::from(scene.settings().swap_interval())])
        .describe("Set the swap interval: 1 synced, 0 unsynced, -1 adaptive");

    table
        .add("swapTest", "n", |scene: &mut SceneHandle, args| {
            scene.set_attribute_of_type("window", "swapTest", args.to_vec());
            true
        })
        .describe("Activate the swap test on every window");

    table
        .add("swapTestColor", "nnnn", |scene: &mut SceneHandle, args| {
            scene.set_attribute_of_type("window", "swapTestColor", args.to_vec());
            true
        })
        .describe("Set the swap test color of every window");

    table
        .add("wireframe", "n", |scene: &mut SceneHandle, args| {
            scene.set_attribute_of_type("camera", "wireframe", args.to_vec());
            true
        })
        .describe("Draw every camera in wireframe");

    table
        .add("runInBackground", "n", |scene: &mut SceneHandle, args| {
            let background = flag(args, 0);
            scene.settings().set_run_in_background(background);
            scene.registry().set_windows_enabled(!background);
            true
        })
        .with_getter(|scene| vec![Value::Bool(scene.settings().run_in_background())])
        .describe("Run without any visible window");
}

/// Logging and timing.
fn register_diagnostics(table: &mut AttributeTable<SceneHandle>) {
    table
        .add("log", "sn", |scene: &mut SceneHandle, args| {
            let Some(filter) = level_from_priority(integer(args, 1)) else {
                return false;
            };
            if let Some(level) = filter.to_level() {
                log::log!(level, "[{}] {}", scene.name(), text(args, 0));
            }
            true
        })
        .describe("Add a message to the log, with a priority from 0 (debug) to 4 (off)");

    table
        .add("logLevel", "sn", |_: &mut SceneHandle, args| {
            let Some(level) = level_from_priority(integer(args, 1)) else {
                return false;
            };
            if !set_target_level(text(args, 0), level) {
                log::debug!("Runtime log levels need the process logger");
            }
            true
        })
        .describe("Set the log level of a target, from 0 (debug) to 4 (off)");

    table
        .add("duration", "sn", |scene: &mut SceneHandle, args| {
            let micros = integer(args, 1).max(0) as u64;
            scene
                .timers()
                .record(text(args, 0), Duration::from_micros(micros));
            true
        })
        .describe("Set the duration of the given timer, in microseconds");

    table
        .add("masterClock", "nnnnnnn", |scene: &mut SceneHandle, args| {
            scene.timers().set_master_clock(MasterClock {
                years: integer(args, 0),
                months: integer(args, 1),
                days: integer(args, 2),
                hours: integer(args, 3),
                minutes: integer(args, 4),
                seconds: integer(args, 5),
                frame: integer(args, 6),
                paused: flag(args, 7),
            });
            true
        })
        .describe("Set the timing of the master clock");
}

fn register_paths(table: &mut AttributeTable<SceneHandle>) {
    table
        .add("configurationPath", "s", |scene: &mut SceneHandle, args| {
            scene.settings().set_configuration_path(text(args, 0));
            true
        })
        .with_getter(|scene| vec![Value::from(scene.settings().configuration_path())])
        .describe("Path to the configuration files");

    table
        .add("mediaPath", "s", |scene: &mut SceneHandle, args| {
            scene.settings().set_media_path(text(args, 0));
            true
        })
        .with_getter(|scene| vec![Value::from(scene.settings().media_path())])
        .describe("Path to the media files");
}
