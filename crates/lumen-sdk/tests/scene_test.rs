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

use lumen_control::AttributeError;
use lumen_core::graphics::{ContextProvider, InputEvent};
use lumen_core::value::{Value, ValueKind, Values};
use lumen_core::Link;
use lumen_render::headless::HeadlessProvider;
use lumen_sdk::{DetachedLink, Scene, SceneConfig};
use lumen_telemetry::{init_logging, recent_lines, LoggingConfig};
use parking_lot::Mutex;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

// --- MOCK TRANSPORT ---

/// Records every message and answers queries from a fixed table.
#[derive(Default)]
struct RecordingLink {
    sent: Mutex<Vec<(String, String, Values)>>,
    answers: Mutex<HashMap<String, Values>>,
}

impl RecordingLink {
    fn answers_to(&self, request: &str) -> Vec<Values> {
        self.sent
            .lock()
            .iter()
            .filter(|(target, message, args)| {
                target == "world"
                    && message == "answerMessage"
                    && args.first().and_then(Value::as_str) == Some(request)
            })
            .map(|(_, _, args)| args.clone())
            .collect()
    }

    fn messages(&self, name: &str) -> usize {
        self.sent
            .lock()
            .iter()
            .filter(|(_, message, _)| message == name)
            .count()
    }
}

impl Link for RecordingLink {
    fn send_message(&self, target: &str, message: &str, args: Values) {
        self.sent
            .lock()
            .push((target.to_string(), message.to_string(), args));
    }

    fn send_message_with_answer(
        &self,
        _target: &str,
        message: &str,
        _args: Values,
        _timeout: Duration,
    ) -> Values {
        self.answers.lock().get(message).cloned().unwrap_or_default()
    }
}

// --- HELPERS ---

fn config() -> SceneConfig {
    SceneConfig {
        idle_sleep: Duration::from_millis(1),
        ..SceneConfig::default()
    }
}

fn scene_with(config: SceneConfig) -> (Scene, Arc<RecordingLink>) {
    let link = Arc::new(RecordingLink::default());
    let scene = Scene::new(config, Arc::new(HeadlessProvider::new()), link.clone())
        .expect("headless scene should initialize");
    scene.set_attribute("start", &[]).unwrap();
    (scene, link)
}

fn scene() -> (Scene, Arc<RecordingLink>) {
    scene_with(config())
}

fn s(text: &str) -> Value {
    Value::from(text)
}

// --- TESTS ---

#[test]
fn test_linked_objects_are_exported_and_unlinked_on_delete() {
    // --- 1. ARRANGE ---
    let (mut scene, _) = scene();
    scene.set_attribute("addObject", &[s("image"), s("clip1")]).unwrap();
    scene.set_attribute("addObject", &[s("camera"), s("cam1")]).unwrap();
    scene.set_attribute("link", &[s("clip1"), s("cam1")]).unwrap();

    // --- 2. ACT ---
    scene.step();
    let before = scene.handle().configuration();
    scene.set_attribute("deleteObject", &[s("clip1")]).unwrap();
    scene.step();
    let after = scene.handle().configuration();

    // --- 3. ASSERT ---
    assert_eq!(before["links"], json!([["clip1", "cam1"]]));
    assert!(before["objects"].get("clip1").is_some());
    assert!(before["objects"].get("cam1").is_some());
    assert!(before["objects"].get("blender").is_none(), "the blender is never saved");
    assert_eq!(after["links"], json!([]));
    assert!(after["objects"].get("clip1").is_none());
    assert!(scene.registry().get("clip1").is_none());
}

#[test]
fn test_swap_interval_rejects_malformed_calls() {
    let (scene, _) = scene();

    let rejected = scene.set_attribute("swapInterval", &[s("fast")]);
    assert_eq!(
        rejected,
        Err(AttributeError::Kind {
            name: "swapInterval".to_string(),
            index: 0,
            expected: ValueKind::Number,
            found: ValueKind::String,
        })
    );
    assert_eq!(scene.get_attribute("swapInterval"), Some(vec![Value::Int(1)]));

    scene.set_attribute("swapInterval", &[Value::Int(0)]).unwrap();
    assert_eq!(scene.get_attribute("swapInterval"), Some(vec![Value::Int(0)]));
}

#[test]
fn test_malformed_calls_enqueue_nothing() {
    let (mut scene, _) = scene();

    assert!(matches!(
        scene.set_attribute("link", &[s("only_one")]),
        Err(AttributeError::Arity { expected: 2, got: 1, .. })
    ));
    assert!(matches!(
        scene.set_attribute("teleport", &[]),
        Err(AttributeError::Unknown(_))
    ));
    let report = scene.step().expect("scene is started");

    assert_eq!(report.tasks_run, 0);
}

#[test]
fn test_duplicate_window_names_keep_a_single_window() {
    let (mut scene, _) = scene();
    scene.set_attribute("addObject", &[s("window"), s("W")]).unwrap();
    scene.set_attribute("addObject", &[s("window"), s("W")]).unwrap();

    let report = scene.step().unwrap();

    assert_eq!(report.tasks_run, 2);
    assert_eq!(scene.handle().objects_by_type("window"), vec!["W".to_string()]);
    assert_eq!(report.swapped, 1);
}

#[test]
fn test_background_scenes_refuse_windows() {
    let (mut scene, _) = scene_with(SceneConfig {
        run_in_background: true,
        ..config()
    });
    scene.set_attribute("addObject", &[s("window"), s("W")]).unwrap();
    scene.set_attribute("addObject", &[s("camera"), s("cam1")]).unwrap();

    scene.step();

    assert!(scene.handle().objects_by_type("window").is_empty());
    assert_eq!(scene.handle().objects_by_type("camera"), vec!["cam1".to_string()]);
    assert_eq!(scene.get_attribute("runInBackground"), Some(vec![Value::Bool(true)]));
}

#[test]
fn test_master_mirrors_ghostable_objects_of_other_scenes() {
    // --- 1. ARRANGE ---
    let (mut scene, _) = scene();
    scene.set_attribute("setMaster", &[]).unwrap();
    scene
        .set_attribute("addObject", &[s("camera"), s("remote_cam"), s("screen2")])
        .unwrap();
    scene
        .set_attribute("addObject", &[s("image"), s("remote_img"), s("screen2")])
        .unwrap();
    scene
        .set_attribute("addObject", &[s("camera"), s("local_cam"), s("local")])
        .unwrap();

    // --- 2. ACT ---
    let report = scene.step().unwrap();

    // --- 3. ASSERT ---
    let ghost = scene.registry().get("remote_cam").expect("ghost should exist");
    assert!(ghost.is_ghost());
    assert!(scene.registry().get("remote_img").is_none());
    let walked: Vec<&String> = report.buckets.iter().flat_map(|(_, names)| names).collect();
    assert!(walked.contains(&&"local_cam".to_string()));
    assert!(!walked.contains(&&"remote_cam".to_string()));
    assert!(scene.handle().configuration()["objects"].get("remote_cam").is_none());
}

#[test]
fn test_requests_for_other_scenes_are_ignored_without_master_role() {
    let (mut scene, _) = scene();
    scene
        .set_attribute("addObject", &[s("camera"), s("remote_cam"), s("screen2")])
        .unwrap();

    scene.step();

    assert!(!scene.registry().contains("remote_cam"));
}

#[test]
fn test_object_attributes_are_applied_on_the_next_iteration() {
    let (mut scene, _) = scene();
    scene.set_attribute("addObject", &[s("camera"), s("cam1")]).unwrap();
    scene.step();

    scene
        .set_attribute(
            "setObjectAttribute",
            &[s("cam1"), s("size"), Value::Int(800), Value::Int(600)],
        )
        .unwrap();
    let before = scene.handle().object_attribute("cam1", "size");
    scene.step();
    let after = scene.handle().object_attribute("cam1", "size");

    assert_eq!(before, vec![Value::Int(512), Value::Int(512)]);
    assert_eq!(after, vec![Value::Int(800), Value::Int(600)]);
}

#[test]
fn test_unknown_objects_are_asked_to_the_controller() {
    // --- 1. ARRANGE ---
    let (scene, link) = scene();
    link.answers.lock().insert(
        "getAttribute".to_string(),
        vec![s("size"), Value::Int(1920), Value::Int(1080)],
    );

    // --- 2. ACT ---
    let remote = scene.handle().object_attribute("elsewhere", "size");
    let description = scene.handle().object_attribute_description("elsewhere", "size");

    // --- 3. ASSERT ---
    assert_eq!(remote, vec![Value::Int(1920), Value::Int(1080)]);
    assert!(description.is_empty(), "no answer means unknown");
}

#[test]
fn test_detached_scenes_get_empty_remote_answers() {
    let scene = Scene::new(
        config(),
        Arc::new(HeadlessProvider::new()),
        Arc::new(DetachedLink),
    )
    .unwrap();

    assert!(scene.handle().object_attribute("elsewhere", "size").is_empty());
}

#[test]
fn test_queries_are_answered_to_the_world() {
    // --- 1. ARRANGE ---
    let (mut scene, link) = scene();
    scene.set_attribute("addObject", &[s("camera"), s("cam1")]).unwrap();
    scene.set_attribute("addObject", &[s("camera"), s("cam2")]).unwrap();
    scene.set_attribute("getObjectsNameByType", &[s("camera")]).unwrap();
    scene.set_attribute("sync", &[]).unwrap();
    scene.set_attribute("config", &[]).unwrap();
    scene.set_attribute("ping", &[]).unwrap();

    // --- 2. ACT ---
    scene.step();

    // --- 3. ASSERT ---
    assert_eq!(link.answers_to("start"), vec![vec![s("start"), s("local")]]);
    assert_eq!(
        link.answers_to("getObjectsNameByType"),
        vec![vec![
            s("getObjectsNameByType"),
            s("local"),
            Value::List(vec![s("cam1"), s("cam2")]),
        ]]
    );
    assert_eq!(link.answers_to("sync").len(), 1);
    let config = &link.answers_to("config")[0];
    let document: serde_json::Value = serde_json::from_str(config[2].as_str().unwrap()).unwrap();
    assert!(document["objects"].get("cam1").is_some());
    assert_eq!(link.messages("pong"), 1);
}

#[test]
fn test_configuration_replays_into_a_fresh_scene() {
    // --- 1. ARRANGE ---
    let (mut original, _) = scene();
    for (type_name, name) in [("image", "clip1"), ("mesh", "mesh1"), ("camera", "cam1"), ("window", "win")] {
        original.set_attribute("addObject", &[s(type_name), s(name)]).unwrap();
    }
    original.set_attribute("link", &[s("clip1"), s("cam1")]).unwrap();
    original.set_attribute("link", &[s("mesh1"), s("cam1")]).unwrap();
    original.set_attribute("link", &[s("cam1"), s("win")]).unwrap();
    original.set_attribute("setAlias", &[s("cam1"), s("front")]).unwrap();
    original.set_attribute("swapInterval", &[Value::Int(0)]).unwrap();
    original.step();
    let document = original.handle().configuration();

    // --- 2. ACT ---
    let (fresh, _) = scene();
    let summary = fresh.handle().apply_configuration(&document).unwrap();

    // --- 3. ASSERT ---
    assert!(summary.failures.is_empty(), "{:?}", summary.failures);
    assert_eq!(summary.linked.len(), 3);
    assert_eq!(fresh.handle().configuration(), document);
    assert_eq!(fresh.get_attribute("swapInterval"), Some(vec![Value::Int(0)]));
    assert_eq!(fresh.registry().get("cam1").unwrap().lock().alias, "front");
}

#[test]
fn test_stopped_scenes_only_drain_tasks() {
    let (mut scene, _) = scene();
    scene.set_attribute("stop", &[]).unwrap();
    scene.set_attribute("addObject", &[s("camera"), s("cam1")]).unwrap();

    let report = scene.step();

    assert!(report.is_none());
    assert!(scene.registry().contains("cam1"));
    assert!(scene.timers().duration("loop_scene").is_some());
}

#[test]
fn test_quit_ends_the_loop_and_joins_the_upload_thread() {
    let (mut scene, _) = scene();
    scene.set_attribute("quit", &[]).unwrap();

    scene.run();

    assert!(!scene.is_running());
    assert!(!scene.settings().is_started());
}

#[test]
fn test_window_close_requests_are_forwarded_to_the_world() {
    // --- 1. ARRANGE ---
    let provider = Arc::new(HeadlessProvider::new());
    let link = Arc::new(RecordingLink::default());
    let mut scene = Scene::new(
        config(),
        provider.clone() as Arc<dyn ContextProvider>,
        link.clone(),
    )
    .unwrap();
    provider.inject_event(InputEvent::KeyPressed("space".to_string()));
    provider.inject_event(InputEvent::CloseRequested);

    // --- 2. ACT ---
    scene.step();

    // --- 3. ASSERT ---
    let input = scene.handle().input();
    assert!(input.is_pressed("space"));
    assert!(input.quit_requested);
    assert_eq!(link.messages("quit"), 1);
}

#[test]
fn test_log_levels_are_validated() {
    let (scene, _) = scene();

    assert_eq!(
        scene.set_attribute("logLevel", &[s("lumen_render"), Value::Int(9)]),
        Err(AttributeError::Rejected("logLevel".to_string()))
    );
    assert!(scene
        .set_attribute("logLevel", &[s("lumen_render"), Value::Int(2)])
        .is_ok());
    assert!(scene.set_attribute("log", &[s("hello"), Value::Int(1)]).is_ok());
}

#[test]
fn test_log_priorities_follow_the_log_level_mapping() {
    // --- 1. ARRANGE ---
    init_logging(LoggingConfig {
        env_filter: Some("info".to_string()),
        history: 4096,
        ..LoggingConfig::default()
    });
    let (scene, _) = scene();

    // --- 2. ACT ---
    let silenced = scene.set_attribute("log", &[s("muted by priority four"), Value::Int(4)]);
    let shown = scene.set_attribute("log", &[s("raised by priority three"), Value::Int(3)]);
    let invalid = scene.set_attribute("log", &[s("never sent"), Value::Int(9)]);

    // --- 3. ASSERT ---
    assert!(silenced.is_ok());
    assert!(shown.is_ok());
    assert_eq!(invalid, Err(AttributeError::Rejected("log".to_string())));
    let lines = recent_lines();
    assert!(lines.iter().any(|l| l.contains("raised by priority three")));
    assert!(!lines.iter().any(|l| l.contains("muted by priority four")));
    assert!(!lines.iter().any(|l| l.contains("never sent")));
}

#[test]
fn test_scene_creation_fails_without_graphics() {
    let result = Scene::new(
        config(),
        Arc::new(HeadlessProvider::unavailable()),
        Arc::new(DetachedLink),
    );

    assert!(result.is_err());
}
